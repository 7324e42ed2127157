use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::perdin::models::{Currency, PerdinDetail, PerdinStatus, Tier};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_REJECTION_REASON_LEN};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::not_blank;

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Trip parameters for an allowance preview
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculatePerdinDto {
    pub kota_asal_id: Uuid,
    pub kota_tujuan_id: Uuid,
    /// Departure date (YYYY-MM-DD)
    pub tanggal_berangkat: NaiveDate,
    /// Return date (YYYY-MM-DD), same day or later than departure
    pub tanggal_pulang: NaiveDate,
}

/// Request body for submitting a new perdin
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePerdinDto {
    pub kota_asal_id: Uuid,
    pub kota_tujuan_id: Uuid,
    pub tanggal_berangkat: NaiveDate,
    pub tanggal_pulang: NaiveDate,

    /// Purpose of the trip
    #[validate(length(min = 1, max = 1000), custom(function = "not_blank"))]
    pub keterangan: String,
}

impl CreatePerdinDto {
    pub fn trip(&self) -> CalculatePerdinDto {
        CalculatePerdinDto {
            kota_asal_id: self.kota_asal_id,
            kota_tujuan_id: self.kota_tujuan_id,
            tanggal_berangkat: self.tanggal_berangkat,
            tanggal_pulang: self.tanggal_pulang,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

/// Reviewer decision on a pending perdin
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApprovalDto {
    pub action: ApprovalAction,
    /// Required when rejecting
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl ApprovalDto {
    /// Resolve into the target status and the reason to store
    ///
    /// A rejection needs a non-blank reason; an approval never keeps one.
    pub fn resolve(self) -> Result<(PerdinStatus, Option<String>), AppError> {
        match self.action {
            ApprovalAction::Approve => Ok((PerdinStatus::Approved, None)),
            ApprovalAction::Reject => {
                let reason = self
                    .rejection_reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        AppError::Validation("rejection_reason is required to reject".to_string())
                    })?;

                if reason.chars().count() > MAX_REJECTION_REASON_LEN {
                    return Err(AppError::Validation(format!(
                        "rejection_reason must be at most {} characters",
                        MAX_REJECTION_REASON_LEN
                    )));
                }

                Ok((PerdinStatus::Rejected, Some(reason)))
            }
        }
    }
}

/// Query parameters for the reviewer list
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewListQuery {
    /// Comma-separated statuses, e.g. `PENDING` or `APPROVED,REJECTED`. Omit for all.
    pub status: Option<String>,

    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ReviewListQuery {
    /// Parse the status filter; `None` means no filtering
    pub fn statuses(&self) -> Result<Option<Vec<PerdinStatus>>, AppError> {
        let Some(raw) = self.status.as_deref() else {
            return Ok(None);
        };

        let mut statuses = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let status = part.parse::<PerdinStatus>().map_err(AppError::BadRequest)?;
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }

        if statuses.is_empty() {
            return Ok(None);
        }
        Ok(Some(statuses))
    }

    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PerdinResponseDto {
    pub id: Uuid,
    pub pegawai_id: Uuid,
    pub pegawai_nama: String,
    pub kota_asal_id: Uuid,
    pub kota_asal_nama: String,
    pub kota_tujuan_id: Uuid,
    pub kota_tujuan_nama: String,
    pub tanggal_berangkat: NaiveDate,
    pub tanggal_pulang: NaiveDate,
    pub durasi_hari: i32,
    pub keterangan: String,
    pub jarak_km: Decimal,
    pub tier: Tier,
    pub klasifikasi: String,
    pub uang_saku_per_hari: Decimal,
    pub total_uang_perdin: Decimal,
    pub currency: Currency,
    pub status: PerdinStatus,
    pub approved_by_id: Option<Uuid>,
    pub approved_by_nama: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PerdinDetail> for PerdinResponseDto {
    fn from(d: PerdinDetail) -> Self {
        let p = d.perdin;
        Self {
            id: p.id,
            pegawai_id: p.pegawai_id,
            pegawai_nama: d.pegawai_nama,
            kota_asal_id: p.kota_asal_id,
            kota_asal_nama: d.kota_asal_nama,
            kota_tujuan_id: p.kota_tujuan_id,
            kota_tujuan_nama: d.kota_tujuan_nama,
            tanggal_berangkat: p.tanggal_berangkat,
            tanggal_pulang: p.tanggal_pulang,
            durasi_hari: p.durasi_hari,
            keterangan: p.keterangan,
            jarak_km: p.jarak_km,
            tier: p.tier,
            klasifikasi: p.tier.label().to_string(),
            uang_saku_per_hari: p.uang_saku_per_hari,
            total_uang_perdin: p.total_uang_perdin,
            currency: p.currency_code,
            status: p.status,
            approved_by_id: p.approved_by_id,
            approved_by_nama: d.approved_by_nama,
            approved_at: p.approved_at,
            rejection_reason: p.rejection_reason,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{faker::lorem::en::Sentence, Fake};

    fn review_query(status: Option<&str>) -> ReviewListQuery {
        ReviewListQuery {
            status: status.map(str::to_string),
            page: 1,
            page_size: 10,
        }
    }

    fn create_dto(keterangan: String) -> CreatePerdinDto {
        CreatePerdinDto {
            kota_asal_id: Uuid::new_v4(),
            kota_tujuan_id: Uuid::new_v4(),
            tanggal_berangkat: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            tanggal_pulang: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            keterangan,
        }
    }

    #[test]
    fn test_keterangan_rules() {
        let sentence: String = Sentence(3..8).fake();
        assert!(create_dto(sentence).validate().is_ok());
        assert!(create_dto("  ".to_string()).validate().is_err());
        assert!(create_dto("x".repeat(1001)).validate().is_err());
    }

    #[test]
    fn test_dates_parse_as_plain_dates() {
        let dto: CalculatePerdinDto = serde_json::from_value(serde_json::json!({
            "kota_asal_id": Uuid::new_v4(),
            "kota_tujuan_id": Uuid::new_v4(),
            "tanggal_berangkat": "2022-09-28",
            "tanggal_pulang": "2022-10-09"
        }))
        .unwrap();
        assert_eq!(dto.tanggal_pulang, NaiveDate::from_ymd_opt(2022, 10, 9).unwrap());
    }

    #[test]
    fn test_approve_drops_reason() {
        let dto = ApprovalDto {
            action: ApprovalAction::Approve,
            rejection_reason: Some("ignored".to_string()),
        };
        assert_eq!(dto.resolve().unwrap(), (PerdinStatus::Approved, None));
    }

    #[test]
    fn test_reject_requires_reason() {
        for reason in [None, Some(String::new()), Some("   ".to_string())] {
            let dto = ApprovalDto {
                action: ApprovalAction::Reject,
                rejection_reason: reason,
            };
            assert!(matches!(dto.resolve(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_reject_reason_is_trimmed_and_bounded() {
        let dto = ApprovalDto {
            action: ApprovalAction::Reject,
            rejection_reason: Some("  Anggaran habis ".to_string()),
        };
        assert_eq!(
            dto.resolve().unwrap(),
            (PerdinStatus::Rejected, Some("Anggaran habis".to_string()))
        );

        let dto = ApprovalDto {
            action: ApprovalAction::Reject,
            rejection_reason: Some("x".repeat(MAX_REJECTION_REASON_LEN + 1)),
        };
        assert!(dto.resolve().is_err());
    }

    #[test]
    fn test_action_is_uppercase_on_the_wire() {
        let dto: ApprovalDto =
            serde_json::from_value(serde_json::json!({ "action": "REJECT", "rejection_reason": "no" }))
                .unwrap();
        assert_eq!(dto.action, ApprovalAction::Reject);
        assert!(serde_json::from_value::<ApprovalDto>(serde_json::json!({ "action": "MAYBE" })).is_err());
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!(review_query(None).statuses().unwrap(), None);
        assert_eq!(review_query(Some(" , ")).statuses().unwrap(), None);
        assert_eq!(
            review_query(Some("PENDING")).statuses().unwrap(),
            Some(vec![PerdinStatus::Pending])
        );
        assert_eq!(
            review_query(Some("approved,REJECTED,APPROVED")).statuses().unwrap(),
            Some(vec![PerdinStatus::Approved, PerdinStatus::Rejected])
        );
        assert!(matches!(
            review_query(Some("PENDING,DRAFT")).statuses(),
            Err(AppError::BadRequest(_))
        ));
    }
}
