use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::domain::lifecycle::{AlertStatus, Role};
use crate::entities::{actor, alert};

/// Seed the gauges from the database at boot so restarts do not zero out
/// dashboards.
pub async fn init_metrics(db: &DatabaseConnection) {
    let actor_count = actor::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("safelink_actors_total").set(actor_count as f64);

    let volunteer_count = actor::Entity::find()
        .filter(actor::Column::Role.eq(Role::Volunteer))
        .count(db)
        .await
        .unwrap_or(0);
    metrics::gauge!("safelink_volunteers_total").set(volunteer_count as f64);

    let alert_count = alert::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("safelink_alerts_total").set(alert_count as f64);

    for status in [
        AlertStatus::Active,
        AlertStatus::Assigned,
        AlertStatus::Resolved,
        AlertStatus::Cancelled,
    ] {
        let count = alert::Entity::find()
            .filter(alert::Column::Status.eq(status))
            .count(db)
            .await
            .unwrap_or(0);
        metrics::gauge!("safelink_alerts_by_status", "status" => status.as_str())
            .set(count as f64);
    }

    tracing::info!(
        "Initialized metrics: actors={}, volunteers={}, alerts={}",
        actor_count,
        volunteer_count,
        alert_count
    );
}

pub fn increment_alerts_created(emergency_type: &str) {
    metrics::counter!("safelink_alerts_created_total", "type" => emergency_type.to_string())
        .increment(1);
    metrics::gauge!("safelink_alerts_total").increment(1.0);
    metrics::gauge!("safelink_alerts_by_status", "status" => "active").increment(1.0);
}

pub fn increment_status_transitions(to: &str) {
    metrics::counter!("safelink_alert_transitions_total", "to" => to.to_string()).increment(1);
}

pub fn increment_assignments() {
    metrics::counter!("safelink_alert_assignments_total").increment(1);
}

pub fn increment_notifications_sent(channel: &str) {
    metrics::counter!("safelink_notifications_sent_total", "channel" => channel.to_string())
        .increment(1);
}

pub fn increment_notifications_failed(channel: &str) {
    metrics::counter!("safelink_notifications_failed_total", "channel" => channel.to_string())
        .increment(1);
}
