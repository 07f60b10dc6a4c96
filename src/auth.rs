//! # Authentication
//!
//! This module provides session-token authentication for protected API
//! endpoints. It is the server-side enforcement point of the access gate:
//! absence of authentication is a terminal 401 JSON response, never a
//! redirect, and there is no grace window on the API surface.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::config::AppConfig;
use crate::error::{ApiError, unauthorized};
use crate::identity::{SessionIdentity, verify_session_token};
use crate::server::AppState;

/// Session-scoped override that lets an admin browse with regular-user
/// privileges. Carried as an explicit request header, never process state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewAsUser(pub bool);

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

/// Authentication middleware that verifies session tokens and injects the
/// session identity into the request.
pub async fn session_auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;

    let identity = verify_session_token(&config, token).map_err(|err| {
        tracing::warn!(error = %err, "Session token rejected");
        unauthorized(Some("Invalid session token"))
    })?;

    let view_as_user = ViewAsUser(view_as_user_requested(request.headers()));

    tracing::debug!(user_id = %identity.id, "Authenticated request");

    request.extensions_mut().insert(identity);
    request.extensions_mut().insert(view_as_user);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized(Some("Missing Authorization header")))
        .and_then(|value| {
            value
                .to_str()
                .map_err(|_| unauthorized(Some("Invalid Authorization header")))
        })
        .and_then(|header| {
            header
                .strip_prefix("Bearer ")
                .ok_or_else(|| unauthorized(Some("Authorization header must use Bearer scheme")))
        })
}

fn view_as_user_requested(headers: &HeaderMap) -> bool {
    headers
        .get("X-View-As-User")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

impl<S> FromRequestParts<S> for SessionIdentity
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionIdentity>()
            .cloned()
            .ok_or_else(|| unauthorized(None))
    }
}

impl<S> FromRequestParts<S> for ViewAsUser
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ViewAsUser>()
            .copied()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use jsonwebtoken::{EncodingKey, Header, encode};
    use tower::ServiceExt;

    use crate::identity::SessionClaims;

    fn create_test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            profile: "test".to_string(),
            session_jwt_secret: Some("test-secret".to_string()),
            ..Default::default()
        })
    }

    fn make_token(secret: &str, sub: &str) -> String {
        let claims = SessionClaims {
            sub: sub.to_string(),
            email: None,
            github_username: None,
            avatar_url: None,
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    async fn run_middleware(config: Arc<AppConfig>, request: Request<Body>) -> Response {
        async fn handler(identity: SessionIdentity, view_as: ViewAsUser) -> String {
            format!("{}:{}", identity.id, view_as.0)
        }

        Router::new()
            .route("/test", get(handler))
            .layer(axum::middleware::from_fn_with_state(
                Arc::clone(&config),
                session_auth_middleware,
            ))
            .with_state(AppState {
                config,
                db: sea_orm::DatabaseConnection::default(),
            })
            .oneshot(request)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_auth_header_returns_401() {
        let config = create_test_config();
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = run_middleware(config, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_auth_scheme_returns_401() {
        let config = create_test_config();
        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dGVzdDoxMjM=")
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(config, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn forged_token_returns_401() {
        let config = create_test_config();
        let request = Request::builder()
            .uri("/test")
            .header(
                "Authorization",
                format!("Bearer {}", make_token("other-secret", "user_1")),
            )
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(config, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_through() {
        let config = create_test_config();
        let request = Request::builder()
            .uri("/test")
            .header(
                "Authorization",
                format!("Bearer {}", make_token("test-secret", "user_1")),
            )
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(config, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn view_as_user_header_is_propagated() {
        let config = create_test_config();
        let request = Request::builder()
            .uri("/test")
            .header(
                "Authorization",
                format!("Bearer {}", make_token("test-secret", "user_1")),
            )
            .header("X-View-As-User", "true")
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(config, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"user_1:true");
    }
}
