use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::kota::models::Kota;
use crate::shared::validation::not_blank;

/// Request body for creating or replacing a city
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertKotaDto {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub nama_kota: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub provinsi: String,

    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub pulau: String,

    /// Whether the city lies outside Indonesia
    #[serde(default)]
    pub luar_negeri: bool,
}

/// Response DTO for city
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KotaResponseDto {
    pub id: Uuid,
    pub nama_kota: String,
    pub latitude: f64,
    pub longitude: f64,
    pub provinsi: String,
    pub pulau: String,
    pub luar_negeri: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Kota> for KotaResponseDto {
    fn from(k: Kota) -> Self {
        Self {
            id: k.id,
            nama_kota: k.nama_kota,
            latitude: k.latitude,
            longitude: k.longitude,
            provinsi: k.provinsi,
            pulau: k.pulau,
            luar_negeri: k.luar_negeri,
            created_at: k.created_at,
            updated_at: k.updated_at,
        }
    }
}
