use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Query string extractor that reports failures in the standard envelope
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::BadRequest(format!(
                "Invalid query parameters: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Path parameter extractor that reports failures in the standard envelope
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::BadRequest(format!(
                "Invalid path parameter: {}",
                rejection.body_text()
            ))),
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        nama: String,
    }

    async fn echo(AppJson(_payload): AppJson<Payload>) -> StatusCode {
        StatusCode::OK
    }

    async fn whoami(user: AuthenticatedUser) -> String {
        user.username
    }

    #[derive(Deserialize)]
    struct Paging {
        page: i64,
    }

    async fn paging(AppQuery(q): AppQuery<Paging>) -> String {
        q.page.to_string()
    }

    async fn by_id(AppPath(id): AppPath<uuid::Uuid>) -> String {
        id.to_string()
    }

    #[tokio::test]
    async fn test_malformed_json_returns_bad_request_envelope() {
        let app = Router::new().route("/", post(echo));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/")
            .bytes(axum::body::Bytes::from_static(b"{not json"))
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON syntax"));
    }

    #[tokio::test]
    async fn test_missing_field_returns_bad_request() {
        let app = Router::new().route("/", post(echo));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/")
            .json(&serde_json::json!({ "other": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_query_returns_envelope() {
        let app = Router::new().route("/", axum::routing::get(paging));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").add_query_param("page", "abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query parameters"));

        server
            .get("/")
            .add_query_param("page", "3")
            .await
            .assert_text("3");
    }

    #[tokio::test]
    async fn test_bad_path_returns_envelope() {
        let app = Router::new().route("/items/{id}", axum::routing::get(by_id));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/items/not-a-uuid").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid path parameter"));
    }

    #[tokio::test]
    async fn test_authenticated_user_required() {
        let app = Router::new().route("/", axum::routing::get(whoami));
        let server = TestServer::new(app).unwrap();

        server.get("/").await.assert_status(StatusCode::UNAUTHORIZED);
    }
}
