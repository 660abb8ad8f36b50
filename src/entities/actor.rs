use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::lifecycle::Role;

/// An authenticated identity: reporter, volunteer, or administrator.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::alert::Entity")]
    Alert,
    #[sea_orm(has_many = "super::alert_responder::Entity")]
    AlertResponder,
    #[sea_orm(has_many = "super::session_token::Entity")]
    SessionToken,
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl Related<super::alert_responder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlertResponder.def()
    }
}

impl Related<super::session_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
