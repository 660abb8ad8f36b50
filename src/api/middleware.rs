use axum::{
    extract::{Extension, Request},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::domain::session::Session;
use crate::entities::{actor, session_token};

/// Bearer tokens older than this are rejected and removed.
const TOKEN_TTL_DAYS: i64 = 7;

/// The raw token presented on the current request, kept so logout can
/// destroy exactly this session.
#[derive(Debug, Clone, Copy)]
pub struct BearerToken(pub Uuid);

pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(t) => t,
        None => return ApiError::Auth("missing or malformed bearer token").into_response(),
    };

    let record = match session_token::Entity::find_by_id(token).one(&db).await {
        Ok(Some(r)) => r,
        Ok(None) => return ApiError::Auth("invalid or expired token").into_response(),
        Err(e) => return ApiError::Db(e).into_response(),
    };

    let age = chrono::Utc::now().naive_utc() - record.created_at;
    if age > chrono::Duration::days(TOKEN_TTL_DAYS) {
        let _ = session_token::Entity::delete_by_id(token).exec(&db).await;
        return ApiError::Auth("invalid or expired token").into_response();
    }

    let actor = match actor::Entity::find_by_id(record.actor_id).one(&db).await {
        Ok(Some(a)) => a,
        Ok(None) => return ApiError::Auth("invalid or expired token").into_response(),
        Err(e) => return ApiError::Db(e).into_response(),
    };

    request.extensions_mut().insert(Session {
        actor_id: actor.id,
        role: actor.role,
    });
    request.extensions_mut().insert(BearerToken(token));
    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<Uuid> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .and_then(|t| Uuid::parse_str(t.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: &str) -> Request {
        axum::http::Request::builder()
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn well_formed_bearer_token_parses() {
        let token = Uuid::new_v4();
        let request = request_with_auth(&format!("Bearer {}", token));
        assert_eq!(bearer_token(&request), Some(token));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert_eq!(bearer_token(&request_with_auth("Bearer not-a-uuid")), None);
        assert_eq!(
            bearer_token(&request_with_auth(&Uuid::new_v4().to_string())),
            None
        );
        let request = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(bearer_token(&request), None);
    }
}
