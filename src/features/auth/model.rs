use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::users::Role;

/// Identity attached to a request once its bearer token has been validated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub nama: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// DIVISI_SDM or ADMIN: may review requests and manage cities
    pub fn is_reviewer(&self) -> bool {
        self.role.is_reviewer()
    }
}

/// JWT claims issued on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub nama: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = uuid::Error;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            username: claims.username,
            nama: claims.nama,
            role: claims.role,
        })
    }
}
