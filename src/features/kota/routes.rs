use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::kota::handlers;
use crate::features::kota::services::KotaService;

/// Create routes for the city registry
///
/// Reads are open to any authenticated user, writes are checked by `RequireReviewer`
pub fn routes(service: Arc<KotaService>) -> Router {
    Router::new()
        .route(
            "/api/kota",
            get(handlers::list_kota).post(handlers::create_kota),
        )
        .route(
            "/api/kota/{id}",
            get(handlers::get_kota)
                .put(handlers::update_kota)
                .delete(handlers::delete_kota),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::Role;
    use crate::shared::test_helpers::{create_user, lazy_pool, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server(role: Role) -> TestServer {
        let service = Arc::new(KotaService::new(lazy_pool()));
        let app = with_user(routes(service), create_user(role));
        TestServer::new(app).unwrap()
    }

    fn payload() -> serde_json::Value {
        json!({
            "nama_kota": "Pontianak",
            "latitude": -0.026353,
            "longitude": 109.342003,
            "provinsi": "Kalimantan Barat",
            "pulau": "Kalimantan",
            "luar_negeri": false
        })
    }

    #[tokio::test]
    async fn test_pegawai_cannot_create_kota() {
        let server = server(Role::Pegawai);
        server
            .post("/api/kota")
            .json(&payload())
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_pegawai_cannot_delete_kota() {
        let server = server(Role::Pegawai);
        server
            .delete(&format!("/api/kota/{}", uuid::Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reviewer_gets_validation_error_before_database() {
        let server = server(Role::DivisiSdm);
        let mut body = payload();
        body["latitude"] = json!(120.0);

        let response = server.post("/api/kota").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let envelope: serde_json::Value = response.json();
        assert_eq!(envelope["success"], false);
        assert!(envelope["errors"].is_array());
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected() {
        let server = server(Role::Admin);
        let response = server
            .put("/api/kota/not-a-uuid")
            .json(&payload())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }
}
