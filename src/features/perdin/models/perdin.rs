use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{
    RATE_DALAM_PROVINSI_IDR, RATE_DALAM_PULAU_IDR, RATE_LUAR_NEGERI_USD, RATE_LUAR_PULAU_IDR,
};

/// Perdin status enum matching database enum
///
/// `Pending` is the only non-final state; a decision moves it to
/// `Approved` or `Rejected` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "perdin_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PerdinStatus {
    Pending,
    Approved,
    Rejected,
}

impl PerdinStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerdinStatus::Pending => "PENDING",
            PerdinStatus::Approved => "APPROVED",
            PerdinStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, PerdinStatus::Pending)
    }
}

impl std::fmt::Display for PerdinStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerdinStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(PerdinStatus::Pending),
            "APPROVED" => Ok(PerdinStatus::Approved),
            "REJECTED" => Ok(PerdinStatus::Rejected),
            other => Err(format!("Unknown perdin status '{}'", other)),
        }
    }
}

/// Currency of the per-diem amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "currency_code", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Idr,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
            Currency::Usd => "USD",
        }
    }
}

/// Per-diem tier, decided by the boundary the trip crosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "perdin_tier", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Destination abroad
    LuarNegeri,
    /// Up to 60 km
    DalamKota,
    /// Over 60 km, same province
    DalamProvinsi,
    /// Other province, same island
    LuarProvinsiDalamPulau,
    /// Other island
    LuarPulau,
}

impl Tier {
    pub fn daily_rate(&self) -> Decimal {
        match self {
            Tier::LuarNegeri => RATE_LUAR_NEGERI_USD,
            Tier::DalamKota => Decimal::ZERO,
            Tier::DalamProvinsi => RATE_DALAM_PROVINSI_IDR,
            Tier::LuarProvinsiDalamPulau => RATE_DALAM_PULAU_IDR,
            Tier::LuarPulau => RATE_LUAR_PULAU_IDR,
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            Tier::LuarNegeri => Currency::Usd,
            _ => Currency::Idr,
        }
    }

    /// Human readable classification shown on the request form
    pub fn label(&self) -> &'static str {
        match self {
            Tier::LuarNegeri => "Luar Negeri",
            Tier::DalamKota => "Dalam Kota (≤60km)",
            Tier::DalamProvinsi => "Dalam Provinsi (>60km)",
            Tier::LuarProvinsiDalamPulau => "Luar Provinsi - Dalam Pulau",
            Tier::LuarPulau => "Luar Pulau",
        }
    }
}

/// Database model for perdin
#[derive(Debug, Clone, FromRow)]
pub struct Perdin {
    pub id: Uuid,
    pub pegawai_id: Uuid,
    pub kota_asal_id: Uuid,
    pub kota_tujuan_id: Uuid,
    pub tanggal_berangkat: NaiveDate,
    pub tanggal_pulang: NaiveDate,
    pub durasi_hari: i32,
    pub keterangan: String,
    pub jarak_km: Decimal,
    pub tier: Tier,
    pub uang_saku_per_hari: Decimal,
    pub total_uang_perdin: Decimal,
    pub currency_code: Currency,
    pub status: PerdinStatus,
    pub approved_by_id: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Perdin joined with the display names of its employee, cities and reviewer
#[derive(Debug, Clone, FromRow)]
pub struct PerdinDetail {
    #[sqlx(flatten)]
    pub perdin: Perdin,
    pub pegawai_nama: String,
    pub kota_asal_nama: String,
    pub kota_tujuan_nama: String,
    pub approved_by_nama: Option<String>,
}
