//! Per-diem (uang saku) calculation.
//!
//! Tiers are checked in order, first match wins:
//!
//! | tier                        | condition                    | rate / day   |
//! |-----------------------------|------------------------------|--------------|
//! | `LuarNegeri`                | destination abroad           | USD 50       |
//! | `DalamKota`                 | distance ≤ 60 km             | IDR 0        |
//! | `DalamProvinsi`             | same province                | IDR 200 000  |
//! | `LuarProvinsiDalamPulau`    | same island                  | IDR 250 000  |
//! | `LuarPulau`                 | otherwise                    | IDR 300 000  |
//!
//! The total is always `rate × durasi_hari`, both departure and return day included.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::kota::models::Kota;
use crate::features::perdin::models::{Currency, Tier};
use crate::shared::constants::{EARTH_RADIUS_KM, LOCAL_TRIP_MAX_KM, MAX_TRIP_DAYS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllowanceError {
    #[error("Kota asal dan kota tujuan tidak boleh sama")]
    SameCity,

    #[error("Tanggal pulang ({pulang}) tidak boleh sebelum tanggal berangkat ({berangkat})")]
    ReturnBeforeDeparture {
        berangkat: NaiveDate,
        pulang: NaiveDate,
    },

    #[error("Durasi perdin maksimal {max} hari, diajukan {days} hari")]
    TripTooLong { days: i64, max: i64 },

    #[error("Koordinat kota tidak valid untuk menghitung jarak")]
    InvalidCoordinates,
}

impl From<AllowanceError> for AppError {
    fn from(e: AllowanceError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Everything derived for a trip, as stored on the perdin and shown in the preview
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AllowanceBreakdown {
    pub durasi_hari: i32,
    pub jarak_km: Decimal,
    pub tier: Tier,
    pub klasifikasi: String,
    pub uang_saku_per_hari: Decimal,
    pub total_uang_perdin: Decimal,
    pub currency: Currency,
}

/// Great-circle distance in kilometres, rounded half-up to two decimals
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<Decimal, AllowanceError> {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    let km = Decimal::try_from(EARTH_RADIUS_KM * c).map_err(|e| {
        tracing::error!(
            "Distance between ({}, {}) and ({}, {}) is not representable: {}",
            lat1,
            lon1,
            lat2,
            lon2,
            e
        );
        AllowanceError::InvalidCoordinates
    })?;

    Ok(km.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Trip length in days, counting both the departure and the return day
pub fn duration_days(berangkat: NaiveDate, pulang: NaiveDate) -> Result<i32, AllowanceError> {
    if pulang < berangkat {
        return Err(AllowanceError::ReturnBeforeDeparture { berangkat, pulang });
    }

    let days = (pulang - berangkat).num_days() + 1;
    if days > MAX_TRIP_DAYS {
        return Err(AllowanceError::TripTooLong {
            days,
            max: MAX_TRIP_DAYS,
        });
    }
    Ok(days as i32)
}

/// Pick the tier for a trip between `asal` and `tujuan`
pub fn classify(jarak_km: Decimal, asal: &Kota, tujuan: &Kota) -> Tier {
    if tujuan.luar_negeri {
        Tier::LuarNegeri
    } else if jarak_km <= LOCAL_TRIP_MAX_KM {
        Tier::DalamKota
    } else if asal.provinsi == tujuan.provinsi {
        Tier::DalamProvinsi
    } else if asal.pulau == tujuan.pulau {
        Tier::LuarProvinsiDalamPulau
    } else {
        Tier::LuarPulau
    }
}

pub fn calculate(
    asal: &Kota,
    tujuan: &Kota,
    berangkat: NaiveDate,
    pulang: NaiveDate,
) -> Result<AllowanceBreakdown, AllowanceError> {
    if asal.id == tujuan.id {
        return Err(AllowanceError::SameCity);
    }

    let durasi_hari = duration_days(berangkat, pulang)?;
    let jarak_km = distance_km(asal.latitude, asal.longitude, tujuan.latitude, tujuan.longitude)?;
    let tier = classify(jarak_km, asal, tujuan);
    let uang_saku_per_hari = tier.daily_rate();

    Ok(AllowanceBreakdown {
        durasi_hari,
        jarak_km,
        tier,
        klasifikasi: tier.label().to_string(),
        uang_saku_per_hari,
        total_uang_perdin: uang_saku_per_hari * Decimal::from(durasi_hari),
        currency: tier.currency(),
    })
}
