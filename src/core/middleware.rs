use crate::core::error::AppError;
use crate::features::auth::TokenService;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Basic auth gate for the Swagger UI
pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let authorized = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Basic "))
                .and_then(|encoded| BASE64_STANDARD.decode(encoded).ok())
                .and_then(|decoded| String::from_utf8(decoded).ok())
                .is_some_and(|creds| creds == *credentials);

            if authorized {
                return Ok(next.run(req).await);
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                "Unauthorized",
            )
                .into_response())
        })
    }
}

pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let user = tokens.validate_token(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::users::{Role, User};
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use chrono::Utc;
    use std::time::Duration;

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(&AuthConfig {
            jwt_secret: "middleware-test-secret-0123456789abcdef".to_string(),
            issuer: "perdin-test".to_string(),
            token_ttl: Duration::from_secs(600),
            jwt_leeway: Duration::from_secs(0),
        }))
    }

    async fn whoami(user: AuthenticatedUser) -> String {
        user.username
    }

    fn server(tokens: Arc<TokenService>) -> TestServer {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(tokens, auth_middleware));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let server = server(token_service());
        server
            .get("/whoami")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_unauthorized() {
        let server = server(token_service());
        server
            .get("/whoami")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_static("Basic d2FsdGVyOnB3"),
            )
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let tokens = token_service();
        let user = User {
            id: Uuid::new_v4(),
            username: "walter".to_string(),
            password_hash: String::new(),
            nama: "Walter White".to_string(),
            role: Role::Pegawai,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let token = tokens.issue(&user).unwrap();
        let server = server(tokens);

        let response = server
            .get("/whoami")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token.access_token)).unwrap(),
            )
            .await;

        response.assert_status_ok();
        response.assert_text("walter");
    }

    #[tokio::test]
    async fn test_swagger_basic_auth() {
        let app = Router::new()
            .route("/docs", get(|| async { "docs" }))
            .layer(axum::middleware::from_fn(basic_auth_middleware(Arc::new(
                "admin:secret".to_string(),
            ))));
        let server = TestServer::new(app).unwrap();

        server
            .get("/docs")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let encoded = BASE64_STANDARD.encode("admin:secret");
        server
            .get("/docs")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Basic {}", encoded)).unwrap(),
            )
            .await
            .assert_status_ok();
    }
}
