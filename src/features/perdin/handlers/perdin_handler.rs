use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::auth::guards::RequireReviewer;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::perdin::dtos::{
    ApprovalDto, CalculatePerdinDto, CreatePerdinDto, PerdinResponseDto, ReviewListQuery,
};
use crate::features::perdin::services::{AllowanceBreakdown, PerdinService};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Preview the allowance for a trip
#[utoipa::path(
    post,
    path = "/api/perdin/calculate",
    request_body = CalculatePerdinDto,
    responses(
        (status = 200, description = "Allowance breakdown", body = ApiResponse<AllowanceBreakdown>),
        (status = 400, description = "Same city or return before departure"),
        (status = 404, description = "City not found")
    ),
    tag = "perdin",
    security(("bearer_auth" = []))
)]
pub async fn calculate_perdin(
    _user: AuthenticatedUser,
    State(service): State<Arc<PerdinService>>,
    AppJson(dto): AppJson<CalculatePerdinDto>,
) -> Result<Json<ApiResponse<AllowanceBreakdown>>> {
    let breakdown = service.calculate(&dto).await?;
    Ok(Json(ApiResponse::success(Some(breakdown), None, None)))
}

/// Submit a new perdin
#[utoipa::path(
    post,
    path = "/api/perdin",
    request_body = CreatePerdinDto,
    responses(
        (status = 201, description = "Perdin submitted", body = ApiResponse<PerdinResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "City not found")
    ),
    tag = "perdin",
    security(("bearer_auth" = []))
)]
pub async fn create_perdin(
    user: AuthenticatedUser,
    State(service): State<Arc<PerdinService>>,
    AppJson(dto): AppJson<CreatePerdinDto>,
) -> Result<(StatusCode, Json<ApiResponse<PerdinResponseDto>>)> {
    dto.validate()?;

    let perdin = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(perdin),
            Some("Perdin berhasil diajukan".to_string()),
            None,
        )),
    ))
}

/// List the caller's own perdin, newest first
#[utoipa::path(
    get,
    path = "/api/perdin",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Own perdin", body = ApiResponse<Vec<PerdinResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "perdin",
    security(("bearer_auth" = []))
)]
pub async fn list_my_perdin(
    user: AuthenticatedUser,
    State(service): State<Arc<PerdinService>>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PerdinResponseDto>>>> {
    let (items, total) = service.list_own(&user, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// List perdin across employees for review (Divisi SDM / admin)
#[utoipa::path(
    get,
    path = "/api/perdin/sdm",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "Perdin for review", body = ApiResponse<Vec<PerdinResponseDto>>),
        (status = 400, description = "Unknown status in filter"),
        (status = 403, description = "Forbidden - reviewer only")
    ),
    tag = "perdin",
    security(("bearer_auth" = []))
)]
pub async fn list_perdin_for_review(
    RequireReviewer(_user): RequireReviewer,
    State(service): State<Arc<PerdinService>>,
    AppQuery(query): AppQuery<ReviewListQuery>,
) -> Result<Json<ApiResponse<Vec<PerdinResponseDto>>>> {
    let statuses = query.statuses()?;

    let (items, total) = service
        .list_for_review(statuses, &query.pagination())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get a perdin by ID (owner or reviewer)
#[utoipa::path(
    get,
    path = "/api/perdin/{id}",
    params(
        ("id" = Uuid, Path, description = "Perdin ID")
    ),
    responses(
        (status = 200, description = "Perdin found", body = ApiResponse<PerdinResponseDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Perdin not found")
    ),
    tag = "perdin",
    security(("bearer_auth" = []))
)]
pub async fn get_perdin(
    user: AuthenticatedUser,
    State(service): State<Arc<PerdinService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<PerdinResponseDto>>> {
    let perdin = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(perdin), None, None)))
}

/// Approve or reject a pending perdin (Divisi SDM / admin)
#[utoipa::path(
    patch,
    path = "/api/perdin/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Perdin ID")
    ),
    request_body = ApprovalDto,
    responses(
        (status = 200, description = "Decision recorded", body = ApiResponse<PerdinResponseDto>),
        (status = 400, description = "Missing rejection reason"),
        (status = 403, description = "Reviewer only, or own perdin"),
        (status = 404, description = "Perdin not found"),
        (status = 409, description = "Perdin already decided")
    ),
    tag = "perdin",
    security(("bearer_auth" = []))
)]
pub async fn decide_perdin(
    RequireReviewer(reviewer): RequireReviewer,
    State(service): State<Arc<PerdinService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<ApprovalDto>,
) -> Result<Json<ApiResponse<PerdinResponseDto>>> {
    let (status, rejection_reason) = dto.resolve()?;

    let perdin = service
        .decide(&reviewer, id, status, rejection_reason)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(perdin),
        Some(format!("Perdin {}", status.as_str().to_lowercase())),
        None,
    )))
}
