use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .with_state(service)
}

/// Protected auth routes (require JWT authentication)
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::users::UserService;
    use crate::shared::test_helpers::lazy_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::time::Duration;

    fn service() -> Arc<AuthService> {
        let tokens = Arc::new(crate::features::auth::TokenService::new(&AuthConfig {
            jwt_secret: "routes-test-secret-0123456789abcdefgh".to_string(),
            issuer: "perdin-test".to_string(),
            token_ttl: Duration::from_secs(600),
            jwt_leeway: Duration::from_secs(0),
        }));
        Arc::new(AuthService::new(
            Arc::new(UserService::new(lazy_pool())),
            tokens,
        ))
    }

    #[tokio::test]
    async fn test_login_with_malformed_username_is_invalid_credentials() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "username": "walter white", "password": "password123" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let envelope: serde_json::Value = response.json();
        assert_eq!(envelope["message"], "Username atau password salah");
    }

    #[tokio::test]
    async fn test_login_with_overlong_username_is_invalid_credentials() {
        let server = TestServer::new(public_routes(service())).unwrap();

        server
            .post("/api/auth/login")
            .json(&json!({ "username": "w".repeat(80), "password": "password123" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_rejects_empty_password() {
        let server = TestServer::new(public_routes(service())).unwrap();

        server
            .post("/api/auth/login")
            .json(&json!({ "username": "walter", "password": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_without_identity_is_unauthorized() {
        let server = TestServer::new(protected_routes(service())).unwrap();

        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
