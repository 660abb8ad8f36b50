use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::lifecycle::{AlertStatus, EmergencyType, Priority};

/// A single emergency report. Reporter, category, location, and creation
/// time are set once at submission; only `status` and `updated_at` move
/// afterwards, through the lifecycle guards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub emergency_type: EmergencyType,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub priority: Priority,
    pub status: AlertStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::actor::Entity",
        from = "Column::ReporterId",
        to = "super::actor::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Reporter,
    #[sea_orm(has_many = "super::alert_responder::Entity")]
    AlertResponder,
}

impl Related<super::actor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl Related<super::alert_responder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlertResponder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
