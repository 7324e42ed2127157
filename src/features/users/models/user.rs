use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Employee submitting travel requests
    Pegawai,
    /// HR division, reviews travel requests
    DivisiSdm,
    Admin,
}

impl Role {
    /// Whether this role may approve/reject requests and manage the city registry
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Role::DivisiSdm | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Pegawai => write!(f, "PEGAWAI"),
            Role::DivisiSdm => write!(f, "DIVISI_SDM"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Database model for user
#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub nama: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("nama", &self.nama)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization_matches_db_labels() {
        for role in [Role::Pegawai, Role::DivisiSdm, Role::Admin] {
            let json = serde_json::to_value(role).unwrap();
            assert_eq!(json, serde_json::Value::String(role.to_string()));
        }
        let parsed: Role = serde_json::from_str("\"DIVISI_SDM\"").unwrap();
        assert_eq!(parsed, Role::DivisiSdm);
    }

    #[test]
    fn test_reviewer_roles() {
        assert!(!Role::Pegawai.is_reviewer());
        assert!(Role::DivisiSdm.is_reviewer());
        assert!(Role::Admin.is_reviewer());
    }

    #[test]
    fn test_debug_hides_password_hash() {
        let user = User {
            id: Uuid::nil(),
            username: "walter".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            nama: "Walter White".to_string(),
            role: Role::Pegawai,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!format!("{:?}", user).contains("secret"));
    }
}
