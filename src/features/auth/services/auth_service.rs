use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::TokenService;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::UserService;
use crate::shared::validation::USERNAME_REGEX;

const INVALID_CREDENTIALS: &str = "Username atau password salah";

/// Longest username the users table can hold
const MAX_USERNAME_LEN: usize = 50;

/// Whether `username` could belong to any stored account
fn is_possible_username(username: &str) -> bool {
    username.len() <= MAX_USERNAME_LEN && USERNAME_REGEX.is_match(username)
}

/// Service for password login and session identity
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        // No account can match, answer like an unknown user without a lookup
        if !is_possible_username(&dto.username) {
            tracing::info!("Login failed: malformed username");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let user = self
            .user_service
            .find_by_username(&dto.username)
            .await?
            .ok_or_else(|| {
                tracing::info!("Login failed: unknown username '{}'", dto.username);
                AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
            })?;

        if !verify_password(dto.password, user.password_hash.clone()).await? {
            tracing::info!("Login failed: wrong password for '{}'", user.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.token_service.issue(&user)?;
        tracing::info!("User {} ({}) logged in", user.username, user.role);

        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user: user.into(),
        })
    }

    /// Load the current user's profile
    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<UserResponseDto> {
        self.user_service
            .find_by_id(user.user_id)
            .await?
            .map(UserResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))
    }
}

/// bcrypt verification is CPU bound, run it off the async workers
async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_password() {
        let hash = bcrypt::hash("password123", 4).unwrap();

        assert!(verify_password("password123".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }

    #[test]
    fn test_possible_usernames() {
        assert!(is_possible_username("walter"));
        assert!(is_possible_username("jane_doe"));
        assert!(!is_possible_username("walter white"));
        assert!(!is_possible_username(&"a".repeat(MAX_USERNAME_LEN + 1)));
    }

    #[tokio::test]
    async fn test_verify_password_with_corrupt_hash() {
        let err = verify_password("password123".to_string(), "plain".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
