use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a city in the master-data registry
#[derive(Debug, Clone, FromRow)]
pub struct Kota {
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
