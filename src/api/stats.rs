use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Select};
use serde_json::json;

use crate::api::error::ApiError;
use crate::domain::lifecycle::{AlertStatus, Role};
use crate::entities::{actor, alert, prelude::*};

fn alerts_with_status(status: AlertStatus) -> Select<alert::Entity> {
    Alert::find().filter(alert::Column::Status.eq(status))
}

fn volunteers() -> Select<actor::Entity> {
    Actor::find().filter(actor::Column::Role.eq(Role::Volunteer))
}

// GET /stats - derived counts over the collections, recomputed per request.
pub async fn get_stats(Extension(db): Extension<DatabaseConnection>) -> Result<Response, ApiError> {
    let (active_alerts, resolved_alerts, total_alerts, total_volunteers) = futures::try_join!(
        alerts_with_status(AlertStatus::Active).count(&db),
        alerts_with_status(AlertStatus::Resolved).count(&db),
        Alert::find().count(&db),
        volunteers().count(&db),
    )?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "activeAlerts": active_alerts,
            "resolvedAlerts": resolved_alerts,
            "totalVolunteers": total_volunteers,
            "totalAlerts": total_alerts,
        })),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn status_counts_filter_on_one_status() {
        let sql = alerts_with_status(AlertStatus::Resolved)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""alerts"."status" = 'resolved'"#));
    }

    #[test]
    fn volunteer_count_ignores_other_roles() {
        let sql = volunteers().build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#""actors"."role" = 'volunteer'"#));
    }
}
