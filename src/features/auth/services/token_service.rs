use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::features::users::User;

/// Freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Issues and validates HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: i64,
    leeway: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl.as_secs() as i64,
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            nama: user.nama.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_secs,
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token validation failed: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        AuthenticatedUser::try_from(data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::Role;
    use std::time::Duration;
    use uuid::Uuid;

    fn config(secret: &str, ttl_secs: u64) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: "perdin-test".to_string(),
            token_ttl: Duration::from_secs(ttl_secs),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "janedoe".to_string(),
            password_hash: String::new(),
            nama: "Jane Doe".to_string(),
            role: Role::DivisiSdm,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issued_token_validates_to_same_identity() {
        let service = TokenService::new(&config(&"s".repeat(32), 3600));
        let user = user();

        let token = service.issue(&user).unwrap();
        assert_eq!(token.expires_in, 3600);

        let authenticated = service.validate_token(&token.access_token).unwrap();
        assert_eq!(authenticated.user_id, user.id);
        assert_eq!(authenticated.username, "janedoe");
        assert_eq!(authenticated.role, Role::DivisiSdm);
        assert!(authenticated.is_reviewer());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = TokenService::new(&config(&"a".repeat(32), 3600));
        let verifier = TokenService::new(&config(&"b".repeat(32), 3600));

        let token = issuer.issue(&user()).unwrap();
        let err = verifier.validate_token(&token.access_token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService {
            ttl_secs: -120,
            ..TokenService::new(&config(&"s".repeat(32), 0))
        };

        let token = service.issue(&user()).unwrap();
        assert!(service.validate_token(&token.access_token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new(&config(&"s".repeat(32), 3600));
        assert!(service.validate_token("not-a-jwt").is_err());
    }
}
