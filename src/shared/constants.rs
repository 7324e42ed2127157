use rust_decimal::Decimal;

/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// PER-DIEM (UANG SAKU) TARIFFS
// =============================================================================

/// Mean Earth radius used for great-circle distance, in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Trips up to this distance count as local travel and carry no allowance
pub const LOCAL_TRIP_MAX_KM: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Daily allowance for international travel, in USD
pub const RATE_LUAR_NEGERI_USD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Daily allowance for a >60 km trip within one province, in IDR
pub const RATE_DALAM_PROVINSI_IDR: Decimal = Decimal::from_parts(200_000, 0, 0, false, 0);

/// Daily allowance for a trip to another province on the same island, in IDR
pub const RATE_DALAM_PULAU_IDR: Decimal = Decimal::from_parts(250_000, 0, 0, false, 0);

/// Daily allowance for a trip to another island, in IDR
pub const RATE_LUAR_PULAU_IDR: Decimal = Decimal::from_parts(300_000, 0, 0, false, 0);

/// Upper bound for a reviewer's rejection reason, in characters
pub const MAX_REJECTION_REASON_LEN: usize = 500;

/// Longest trip, in days, a single perdin may cover
pub const MAX_TRIP_DAYS: i64 = 365;
