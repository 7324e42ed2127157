//! Role-based authorization guards.
//!
//! These guards extract the authenticated user and verify they have the required role.
//!
//! Roles:
//! - ADMIN: full access
//! - DIVISI_SDM: reviews travel requests and manages the city registry
//! - PEGAWAI: submits and tracks their own travel requests
//!
//! Any authenticated user can use the plain `AuthenticatedUser` extractor.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn current_user(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for reviewer access (DIVISI_SDM or ADMIN).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireReviewer(user): RequireReviewer) { ... }
/// ```
pub struct RequireReviewer(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireReviewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_reviewer() {
            return Err(AppError::Forbidden(
                "Divisi SDM or admin access required".to_string(),
            ));
        }

        Ok(RequireReviewer(user.clone()))
    }
}
