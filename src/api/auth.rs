use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use serde_json::json;
use tracing::field::display;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::middleware::BearerToken;
use crate::domain::lifecycle::Role;
use crate::entities::{actor, session_token};

#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    name: String,
    email: String,
    phone: String,
    password: String,
    role: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Actor as returned to clients; the password hash never leaves the server.
#[derive(Serialize)]
pub struct ActorResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
}

impl From<actor::Model> for ActorResponse {
    fn from(model: actor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            email: model.email,
            role: model.role,
        }
    }
}

/// Self-registration is limited to the two public roles; admin accounts are
/// provisioned out of band.
fn parse_registration_role(role: Option<&str>) -> Result<Role, ApiError> {
    match role.unwrap_or("user") {
        "user" => Ok(Role::User),
        "volunteer" => Ok(Role::Volunteer),
        other => Err(ApiError::Validation(format!(
            "role must be `user` or `volunteer`, got `{}`",
            other
        ))),
    }
}

pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    let phone = payload.phone.trim();
    if name.is_empty() || email.is_empty() || phone.is_empty() {
        return Err(ApiError::Validation(
            "name, email, and phone are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(ApiError::Validation("invalid email address".to_string()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    let role = parse_registration_role(payload.role.as_deref())?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal("failed to hash password"))?
        .to_string();

    let now = chrono::Utc::now().naive_utc();
    let new_actor = actor::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        phone: Set(phone.to_string()),
        password_hash: Set(password_hash),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let actor = match new_actor.insert(&db).await {
        Ok(actor) => actor,
        Err(e) => {
            // Postgres unique violation on the email column (code 23505).
            if e.to_string()
                .contains("duplicate key value violates unique constraint")
            {
                tracing::Span::current()
                    .record("action", "register_actor_failed")
                    .record("error", "duplicate_email");
                return Err(ApiError::Conflict("email already registered"));
            }
            return Err(e.into());
        }
    };

    tracing::Span::current()
        .record("action", "register_actor")
        .record("actor_id", display(actor.id))
        .record("actor_email", &actor.email)
        .record("business_event", "Actor registered successfully");

    metrics::counter!("safelink_actors_registered_total", "role" => role.as_str()).increment(1);
    metrics::gauge!("safelink_actors_total").increment(1.0);
    if role == Role::Volunteer {
        metrics::gauge!("safelink_volunteers_total").increment(1.0);
    }

    let token = issue_token(&db, actor.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"token": token, "actor": ActorResponse::from(actor)})),
    )
        .into_response())
}

pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    // One message for unknown email and bad password.
    let actor = actor::Entity::find()
        .filter(actor::Column::Email.eq(payload.email.trim()))
        .one(&db)
        .await?
        .ok_or(ApiError::Auth("invalid email or password"))?;

    let parsed_hash = PasswordHash::new(&actor.password_hash)
        .map_err(|_| ApiError::Internal("invalid password hash in database"))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::Span::current()
            .record("action", "login_actor_failed")
            .record("error", "invalid_credentials");
        return Err(ApiError::Auth("invalid email or password"));
    }

    tracing::Span::current()
        .record("action", "login_actor")
        .record("actor_id", display(actor.id))
        .record("actor_email", &actor.email)
        .record("business_event", "Actor logged in successfully");

    let token = issue_token(&db, actor.id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({"token": token, "actor": ActorResponse::from(actor)})),
    )
        .into_response())
}

pub async fn logout(
    Extension(db): Extension<DatabaseConnection>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<Response, ApiError> {
    session_token::Entity::delete_by_id(token).exec(&db).await?;

    tracing::Span::current()
        .record("action", "logout_actor")
        .record("business_event", "Session token destroyed");

    Ok((StatusCode::OK, Json(json!({"message": "Logged out"}))).into_response())
}

async fn issue_token(db: &DatabaseConnection, actor_id: Uuid) -> Result<Uuid, sea_orm::DbErr> {
    let token = Uuid::new_v4();
    session_token::ActiveModel {
        token: Set(token),
        actor_id: Set(actor_id),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(db)
    .await?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_roles_are_limited() {
        assert_eq!(parse_registration_role(None).unwrap(), Role::User);
        assert_eq!(parse_registration_role(Some("user")).unwrap(), Role::User);
        assert_eq!(
            parse_registration_role(Some("volunteer")).unwrap(),
            Role::Volunteer
        );
        assert!(matches!(
            parse_registration_role(Some("admin")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_registration_role(Some("superuser")),
            Err(ApiError::Validation(_))
        ));
    }
}
