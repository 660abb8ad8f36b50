use std::collections::HashMap;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, Insert, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::field::display;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::domain::lifecycle::{self, AlertStatus, EmergencyType, Priority};
use crate::domain::session::Session;
use crate::domain::submission::ReportDraft;
use crate::entities::{actor, alert, alert_responder, prelude::*};
use crate::notifications::{TwilioNotifier, WebhookDispatcher};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub emergency_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

/// Reporter contact surfaced to responders so they can reach whoever asked
/// for help.
#[derive(Serialize)]
pub struct ReporterInfo {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub emergency_type: EmergencyType,
    pub description: Option<String>,
    pub location: LocationResponse,
    pub address: Option<String>,
    pub priority: Priority,
    pub status: AlertStatus,
    pub assigned_responders: Vec<Uuid>,
    pub reporter: Option<ReporterInfo>,
    pub created_at: chrono::NaiveDateTime,
}

fn alert_response(
    alert: alert::Model,
    responders: Vec<Uuid>,
    reporter: Option<&actor::Model>,
) -> AlertResponse {
    AlertResponse {
        id: alert.id,
        reporter_id: alert.reporter_id,
        emergency_type: alert.emergency_type,
        description: alert.description,
        location: LocationResponse {
            latitude: alert.latitude,
            longitude: alert.longitude,
        },
        address: alert.address,
        priority: alert.priority,
        status: alert.status,
        assigned_responders: responders,
        reporter: reporter.map(|a| ReporterInfo {
            id: a.id,
            name: a.name.clone(),
            phone: a.phone.clone(),
        }),
        created_at: alert.created_at,
    }
}

/// "My Alerts": everything the actor reported, any status, newest first.
fn my_alerts_query(actor_id: Uuid) -> Select<alert::Entity> {
    Alert::find()
        .filter(alert::Column::ReporterId.eq(actor_id))
        .order_by_desc(alert::Column::CreatedAt)
}

/// Active roster: unclaimed open alerts across all reporters. An alert
/// leaves this view at its first assignment and never returns.
fn active_roster_query() -> Select<alert::Entity> {
    Alert::find()
        .filter(alert::Column::Status.eq(AlertStatus::Active))
        .order_by_desc(alert::Column::CreatedAt)
}

/// Responder membership insert; the composite-key conflict clause is what
/// makes repeat claims by the same actor a no-op.
fn responder_insert(
    alert_id: Uuid,
    actor_id: Uuid,
    assigned_at: chrono::NaiveDateTime,
) -> Insert<alert_responder::ActiveModel> {
    AlertResponder::insert(alert_responder::ActiveModel {
        alert_id: Set(alert_id),
        actor_id: Set(actor_id),
        assigned_at: Set(assigned_at),
    })
    .on_conflict(
        OnConflict::columns([
            alert_responder::Column::AlertId,
            alert_responder::Column::ActorId,
        ])
        .do_nothing()
        .to_owned(),
    )
}

// GET /alerts - role-scoped: plain users see their own reports, responders
// see the active roster.
pub async fn list_alerts(
    Extension(db): Extension<DatabaseConnection>,
    Extension(session): Extension<Session>,
) -> Result<Response, ApiError> {
    let query = if session.can_view_roster() {
        active_roster_query()
    } else {
        my_alerts_query(session.actor_id)
    };
    let alerts = hydrate(&db, query.all(&db).await?).await?;
    Ok((StatusCode::OK, Json(json!({ "alerts": alerts }))).into_response())
}

// GET /alerts/mine - own reports for any role, any status, newest first.
pub async fn list_my_alerts(
    Extension(db): Extension<DatabaseConnection>,
    Extension(session): Extension<Session>,
) -> Result<Response, ApiError> {
    let alerts = hydrate(&db, my_alerts_query(session.actor_id).all(&db).await?).await?;
    Ok((StatusCode::OK, Json(json!({ "alerts": alerts }))).into_response())
}

// POST /alerts - validate and record a new emergency report.
pub async fn create_alert(
    Extension(db): Extension<DatabaseConnection>,
    Extension(session): Extension<Session>,
    Extension(notifier): Extension<TwilioNotifier>,
    Extension(webhook): Extension<WebhookDispatcher>,
    Json(payload): Json<CreateAlertRequest>,
) -> Result<Response, ApiError> {
    // Nothing is written unless the draft validates.
    let report = ReportDraft {
        emergency_type: payload.emergency_type,
        description: payload.description,
        latitude: payload.latitude,
        longitude: payload.longitude,
        address: payload.address,
    }
    .validate()?;

    let now = chrono::Utc::now().naive_utc();
    let alert = alert::ActiveModel {
        id: Set(Uuid::new_v4()),
        reporter_id: Set(session.actor_id),
        emergency_type: Set(report.emergency_type),
        description: Set(report.description),
        latitude: Set(report.latitude),
        longitude: Set(report.longitude),
        address: Set(report.address),
        priority: Set(report.priority),
        status: Set(AlertStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    tracing::Span::current()
        .record("action", "create_alert")
        .record("alert_id", display(alert.id))
        .record("actor_id", display(session.actor_id))
        .record("business_event", "Emergency alert created");

    crate::metrics::increment_alerts_created(alert.emergency_type.as_str());

    let reporter = Actor::find_by_id(session.actor_id).one(&db).await?;
    if let Some(reporter) = &reporter {
        notifier.notify_alert_created(reporter, &alert);
    }
    webhook.dispatch("created", &alert);

    Ok((
        StatusCode::CREATED,
        Json(alert_response(alert, Vec::new(), reporter.as_ref())),
    )
        .into_response())
}

// PUT /alerts/:id - explicit status transition (resolve / cancel).
pub async fn update_alert_status(
    Extension(db): Extension<DatabaseConnection>,
    Extension(session): Extension<Session>,
    Extension(notifier): Extension<TwilioNotifier>,
    Extension(webhook): Extension<WebhookDispatcher>,
    Path(alert_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Response, ApiError> {
    let target = AlertStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::Validation(format!("unknown status `{}`", payload.status)))?;

    // Row lock so racing transitions on the same alert serialize; a failed
    // guard rolls back with the lock released and the row untouched.
    let txn = db.begin().await?;
    let alert = Alert::find_by_id(alert_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(ApiError::NotFound("alert"))?;

    lifecycle::authorize_transition(
        alert.status,
        target,
        session.role,
        session.is_reporter(alert.reporter_id),
    )?;

    let mut active: alert::ActiveModel = alert.into();
    active.status = Set(target);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let alert = active.update(&txn).await?;
    txn.commit().await?;

    tracing::Span::current()
        .record("action", "update_alert_status")
        .record("alert_id", display(alert.id))
        .record("actor_id", display(session.actor_id))
        .record("business_event", format!("Alert {}", target).as_str());

    crate::metrics::increment_status_transitions(target.as_str());

    let reporter = Actor::find_by_id(alert.reporter_id).one(&db).await?;
    if let Some(reporter) = &reporter {
        notifier.notify_alert_update(reporter, &alert);
    }
    webhook.dispatch(target.as_str(), &alert);

    let responders = responder_ids(&db, alert.id).await?;
    Ok((
        StatusCode::OK,
        Json(alert_response(alert, responders, reporter.as_ref())),
    )
        .into_response())
}

// POST /alerts/:id/assign - claim an alert as responder.
pub async fn assign_alert(
    Extension(db): Extension<DatabaseConnection>,
    Extension(session): Extension<Session>,
    Extension(notifier): Extension<TwilioNotifier>,
    Extension(webhook): Extension<WebhookDispatcher>,
    Path(alert_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let txn = db.begin().await?;
    let alert = Alert::find_by_id(alert_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(ApiError::NotFound("alert"))?;

    lifecycle::authorize_assign(alert.status, session.role)?;

    let now = chrono::Utc::now().naive_utc();
    let inserted = responder_insert(alert.id, session.actor_id, now)
        .exec_without_returning(&txn)
        .await?;

    // First claim flips active -> assigned; later claims leave status alone.
    let next = lifecycle::status_after_assign(alert.status);
    let alert = if next != alert.status {
        let mut active: alert::ActiveModel = alert.into();
        active.status = Set(next);
        active.updated_at = Set(now);
        active.update(&txn).await?
    } else {
        alert
    };
    txn.commit().await?;

    tracing::Span::current()
        .record("action", "assign_alert")
        .record("alert_id", display(alert.id))
        .record("actor_id", display(session.actor_id));

    let reporter = Actor::find_by_id(alert.reporter_id).one(&db).await?;
    if inserted > 0 {
        tracing::Span::current().record("business_event", "Responder claimed alert");
        crate::metrics::increment_assignments();
        if let Some(reporter) = &reporter {
            notifier.notify_alert_update(reporter, &alert);
        }
        webhook.dispatch("assigned", &alert);
    }

    let responders = responder_ids(&db, alert.id).await?;
    Ok((
        StatusCode::OK,
        Json(alert_response(alert, responders, reporter.as_ref())),
    )
        .into_response())
}

async fn responder_ids<C: ConnectionTrait>(db: &C, alert_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
    Ok(AlertResponder::find()
        .filter(alert_responder::Column::AlertId.eq(alert_id))
        .order_by_asc(alert_responder::Column::AssignedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.actor_id)
        .collect())
}

/// Attach responder sets and reporter contact to a page of alerts with two
/// batched lookups instead of one pair per row.
async fn hydrate(
    db: &DatabaseConnection,
    alerts: Vec<alert::Model>,
) -> Result<Vec<AlertResponse>, DbErr> {
    if alerts.is_empty() {
        return Ok(Vec::new());
    }

    let alert_ids: Vec<Uuid> = alerts.iter().map(|a| a.id).collect();
    let mut responders_by_alert: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let memberships = AlertResponder::find()
        .filter(alert_responder::Column::AlertId.is_in(alert_ids))
        .order_by_asc(alert_responder::Column::AssignedAt)
        .all(db)
        .await?;
    for m in memberships {
        responders_by_alert
            .entry(m.alert_id)
            .or_default()
            .push(m.actor_id);
    }

    let reporter_ids: Vec<Uuid> = alerts.iter().map(|a| a.reporter_id).collect();
    let reporters: HashMap<Uuid, actor::Model> = Actor::find()
        .filter(actor::Column::Id.is_in(reporter_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(alerts
        .into_iter()
        .map(|a| {
            let responders = responders_by_alert.remove(&a.id).unwrap_or_default();
            let reporter = reporters.get(&a.reporter_id);
            alert_response(a, responders, reporter)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn my_alerts_filters_by_reporter_and_sorts_newest_first() {
        let sql = my_alerts_query(Uuid::nil())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""alerts"."reporter_id" ="#));
        assert!(sql.contains(r#"ORDER BY "alerts"."created_at" DESC"#));
        // Any status: "My Alerts" keeps resolved and cancelled reports.
        assert!(!sql.contains(r#""alerts"."status" ="#));
    }

    #[test]
    fn active_roster_keeps_only_unclaimed_alerts() {
        let sql = active_roster_query().build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#""alerts"."status" = 'active'"#));
        assert!(sql.contains(r#"ORDER BY "alerts"."created_at" DESC"#));
        assert!(!sql.contains("assigned"));
        assert!(!sql.contains("resolved"));
        assert!(!sql.contains("cancelled"));
    }

    #[test]
    fn repeat_claims_hit_the_conflict_clause() {
        let sql = responder_insert(Uuid::nil(), Uuid::nil(), chrono::Utc::now().naive_utc())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"ON CONFLICT ("alert_id", "actor_id") DO NOTHING"#));
    }

    #[tokio::test]
    async fn hydrate_groups_responders_by_alert() {
        use crate::domain::lifecycle::Role;
        use sea_orm::{DatabaseBackend, MockDatabase};

        let now = chrono::Utc::now().naive_utc();
        let reporter_id = Uuid::new_v4();
        let v1 = Uuid::new_v4();
        let v2 = Uuid::new_v4();

        let claimed = alert::Model {
            id: Uuid::new_v4(),
            reporter_id,
            emergency_type: EmergencyType::Fire,
            description: None,
            latitude: 12.97,
            longitude: 77.59,
            address: None,
            priority: Priority::Critical,
            status: AlertStatus::Assigned,
            created_at: now,
            updated_at: now,
        };
        let unclaimed = alert::Model {
            id: Uuid::new_v4(),
            reporter_id: Uuid::new_v4(),
            emergency_type: EmergencyType::Flood,
            description: None,
            latitude: 12.97,
            longitude: 77.59,
            address: None,
            priority: Priority::Medium,
            status: AlertStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                alert_responder::Model {
                    alert_id: claimed.id,
                    actor_id: v1,
                    assigned_at: now,
                },
                alert_responder::Model {
                    alert_id: claimed.id,
                    actor_id: v2,
                    assigned_at: now,
                },
            ]])
            .append_query_results([vec![actor::Model {
                id: reporter_id,
                name: "Asha".to_string(),
                phone: "+911234567890".to_string(),
                email: "asha@example.com".to_string(),
                password_hash: "argon2".to_string(),
                role: Role::User,
                created_at: now,
                updated_at: now,
            }]])
            .into_connection();

        let out = hydrate(&db, vec![claimed, unclaimed]).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].assigned_responders, vec![v1, v2]);
        assert_eq!(out[0].reporter.as_ref().unwrap().name, "Asha");
        assert!(out[1].assigned_responders.is_empty());
        assert!(out[1].reporter.is_none());
    }
}
