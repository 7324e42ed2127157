use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::auth::guards::RequireReviewer;
use crate::features::kota::dtos::{KotaResponseDto, UpsertKotaDto};
use crate::features::kota::services::KotaService;
use crate::shared::types::{ApiResponse, Meta};

/// List all cities, ordered by name
#[utoipa::path(
    get,
    path = "/api/kota",
    responses(
        (status = 200, description = "List of cities", body = ApiResponse<Vec<KotaResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "kota",
    security(("bearer_auth" = []))
)]
pub async fn list_kota(
    State(service): State<Arc<KotaService>>,
) -> Result<Json<ApiResponse<Vec<KotaResponseDto>>>> {
    let cities = service.list().await?;
    let total = cities.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(cities),
        None,
        Some(Meta { total }),
    )))
}

/// Get a city by ID
#[utoipa::path(
    get,
    path = "/api/kota/{id}",
    params(
        ("id" = Uuid, Path, description = "Kota ID")
    ),
    responses(
        (status = 200, description = "City found", body = ApiResponse<KotaResponseDto>),
        (status = 404, description = "City not found")
    ),
    tag = "kota",
    security(("bearer_auth" = []))
)]
pub async fn get_kota(
    State(service): State<Arc<KotaService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<KotaResponseDto>>> {
    let kota = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(kota), None, None)))
}

/// Add a city (Divisi SDM / admin)
#[utoipa::path(
    post,
    path = "/api/kota",
    request_body = UpsertKotaDto,
    responses(
        (status = 201, description = "City created", body = ApiResponse<KotaResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - reviewer only"),
        (status = 409, description = "City name already exists")
    ),
    tag = "kota",
    security(("bearer_auth" = []))
)]
pub async fn create_kota(
    RequireReviewer(_user): RequireReviewer,
    State(service): State<Arc<KotaService>>,
    AppJson(dto): AppJson<UpsertKotaDto>,
) -> Result<(StatusCode, Json<ApiResponse<KotaResponseDto>>)> {
    dto.validate()?;

    let kota = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(kota), None, None)),
    ))
}

/// Replace a city's data (Divisi SDM / admin)
#[utoipa::path(
    put,
    path = "/api/kota/{id}",
    params(
        ("id" = Uuid, Path, description = "Kota ID")
    ),
    request_body = UpsertKotaDto,
    responses(
        (status = 200, description = "City updated", body = ApiResponse<KotaResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - reviewer only"),
        (status = 404, description = "City not found"),
        (status = 409, description = "City name already exists")
    ),
    tag = "kota",
    security(("bearer_auth" = []))
)]
pub async fn update_kota(
    RequireReviewer(_user): RequireReviewer,
    State(service): State<Arc<KotaService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<UpsertKotaDto>,
) -> Result<Json<ApiResponse<KotaResponseDto>>> {
    dto.validate()?;

    let kota = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(kota), None, None)))
}

/// Delete a city (Divisi SDM / admin)
#[utoipa::path(
    delete,
    path = "/api/kota/{id}",
    params(
        ("id" = Uuid, Path, description = "Kota ID")
    ),
    responses(
        (status = 200, description = "City deleted"),
        (status = 403, description = "Forbidden - reviewer only"),
        (status = 404, description = "City not found"),
        (status = 409, description = "City is referenced by perdin")
    ),
    tag = "kota",
    security(("bearer_auth" = []))
)]
pub async fn delete_kota(
    RequireReviewer(_user): RequireReviewer,
    State(service): State<Arc<KotaService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Kota berhasil dihapus".to_string()),
        None,
    )))
}
