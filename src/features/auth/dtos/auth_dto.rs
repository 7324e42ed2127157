use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::dtos::UserResponseDto;

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Username dan password harus diisi"))]
    pub username: String,

    #[validate(length(min = 1, message = "Username dan password harus diisi"))]
    pub password: String,
}

/// Response DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    /// Authenticated user info
    pub user: UserResponseDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{faker::internet::en::Password, Fake};

    #[test]
    fn test_login_requires_both_fields() {
        let dto = LoginRequestDto {
            username: String::new(),
            password: Password(8..16).fake(),
        };
        assert!(dto.validate().is_err());

        let dto = LoginRequestDto {
            username: "walter".to_string(),
            password: String::new(),
        };
        assert!(dto.validate().is_err());

        let dto = LoginRequestDto {
            username: "walter".to_string(),
            password: Password(8..16).fake(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_login_shape_does_not_judge_username_format() {
        let dto = LoginRequestDto {
            username: "walter white".to_string(),
            password: "password123".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
