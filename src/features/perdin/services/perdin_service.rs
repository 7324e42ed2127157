use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::kota::KotaService;
use crate::features::perdin::dtos::{CalculatePerdinDto, CreatePerdinDto, PerdinResponseDto};
use crate::features::perdin::models::{PerdinDetail, PerdinStatus};
use crate::features::perdin::services::allowance::{self, AllowanceBreakdown, AllowanceError};
use crate::shared::types::PaginationQuery;

const DETAIL_SELECT: &str = r#"
    SELECT
        p.id, p.pegawai_id, p.kota_asal_id, p.kota_tujuan_id,
        p.tanggal_berangkat, p.tanggal_pulang, p.durasi_hari, p.keterangan,
        p.jarak_km, p.tier, p.uang_saku_per_hari, p.total_uang_perdin, p.currency_code,
        p.status, p.approved_by_id, p.approved_at, p.rejection_reason,
        p.created_at, p.updated_at,
        u.nama AS pegawai_nama,
        ka.nama_kota AS kota_asal_nama,
        kt.nama_kota AS kota_tujuan_nama,
        r.nama AS approved_by_nama
    FROM perdin p
    JOIN users u ON u.id = p.pegawai_id
    JOIN kota ka ON ka.id = p.kota_asal_id
    JOIN kota kt ON kt.id = p.kota_tujuan_id
    LEFT JOIN users r ON r.id = p.approved_by_id
"#;

/// Error for a decision that found no PENDING row, given the row's current
/// owner and status
fn decision_error(
    id: Uuid,
    reviewer_id: Uuid,
    current: Option<(Uuid, PerdinStatus)>,
) -> AppError {
    match current {
        None => AppError::NotFound(format!("Perdin {} not found", id)),
        Some((_, status)) if status.is_final() => AppError::Conflict(format!(
            "Perdin {} has already been {}",
            id,
            status.as_str().to_lowercase()
        )),
        Some((pegawai_id, _)) if pegawai_id == reviewer_id => {
            AppError::Forbidden("You cannot decide your own perdin".to_string())
        }
        // Still PENDING and not the reviewer's own: it changed between the two statements
        Some(_) => AppError::Conflict(format!("Perdin {} could not be updated", id)),
    }
}

/// Service for submitting perdin and driving the approval workflow
pub struct PerdinService {
    pool: PgPool,
    kota_service: Arc<KotaService>,
}

impl PerdinService {
    pub fn new(pool: PgPool, kota_service: Arc<KotaService>) -> Self {
        Self { pool, kota_service }
    }

    /// Compute the allowance for a trip without persisting anything
    pub async fn calculate(&self, trip: &CalculatePerdinDto) -> Result<AllowanceBreakdown> {
        // Shape checks first so bad input never costs a lookup
        if trip.kota_asal_id == trip.kota_tujuan_id {
            return Err(AllowanceError::SameCity.into());
        }
        allowance::duration_days(trip.tanggal_berangkat, trip.tanggal_pulang)?;

        let asal = self.kota_service.find(trip.kota_asal_id).await?;
        let tujuan = self.kota_service.find(trip.kota_tujuan_id).await?;

        Ok(allowance::calculate(
            &asal,
            &tujuan,
            trip.tanggal_berangkat,
            trip.tanggal_pulang,
        )?)
    }

    /// Submit a new perdin for the caller; amounts are always derived here
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: CreatePerdinDto,
    ) -> Result<PerdinResponseDto> {
        let breakdown = self.calculate(&dto.trip()).await?;

        let id = sqlx::query_scalar!(
            r#"
            INSERT INTO perdin (
                pegawai_id, kota_asal_id, kota_tujuan_id,
                tanggal_berangkat, tanggal_pulang, durasi_hari, keterangan,
                jarak_km, tier, uang_saku_per_hari, total_uang_perdin, currency_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
            user.user_id,
            dto.kota_asal_id,
            dto.kota_tujuan_id,
            dto.tanggal_berangkat,
            dto.tanggal_pulang,
            breakdown.durasi_hari,
            dto.keterangan.trim(),
            breakdown.jarak_km,
            breakdown.tier as _,
            breakdown.uang_saku_per_hari,
            breakdown.total_uang_perdin,
            breakdown.currency as _
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create perdin: {:?}", e);
            AppError::from_db(
                e,
                "Perdin already exists",
                "Referenced kota or pegawai no longer exists",
            )
        })?;

        tracing::info!(
            "Perdin {} submitted by {} ({} {} {})",
            id,
            user.username,
            breakdown.tier.label(),
            breakdown.total_uang_perdin,
            breakdown.currency.as_str()
        );

        self.find_detail(id).await.map(PerdinResponseDto::from)
    }

    /// The caller's own requests, newest first
    pub async fn list_own(
        &self,
        user: &AuthenticatedUser,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<PerdinResponseDto>, i64)> {
        let total = sqlx::query_scalar!(
            r#"SELECT COUNT(*) as "count!" FROM perdin WHERE pegawai_id = $1"#,
            user.user_id
        )
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            "{} WHERE p.pegawai_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
            DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, PerdinDetail>(&query)
            .bind(user.user_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list perdin for {}: {:?}", user.user_id, e);
                AppError::Database(e)
            })?;

        Ok((rows.into_iter().map(PerdinResponseDto::from).collect(), total))
    }

    /// Requests across all employees, optionally filtered by status
    pub async fn list_for_review(
        &self,
        statuses: Option<Vec<PerdinStatus>>,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<PerdinResponseDto>, i64)> {
        let statuses: Option<Vec<String>> =
            statuses.map(|s| s.iter().map(|st| st.as_str().to_string()).collect());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM perdin WHERE ($1::text[] IS NULL OR status::text = ANY($1))",
        )
        .bind(&statuses)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            "{} WHERE ($1::text[] IS NULL OR p.status::text = ANY($1)) \
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
            DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, PerdinDetail>(&query)
            .bind(&statuses)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list perdin for review: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((rows.into_iter().map(PerdinResponseDto::from).collect(), total))
    }

    /// A single request, visible to its owner and to reviewers
    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<PerdinResponseDto> {
        let detail = self.find_detail(id).await?;

        if detail.perdin.pegawai_id != user.user_id && !user.is_reviewer() {
            return Err(AppError::Forbidden(
                "You can only view your own perdin".to_string(),
            ));
        }

        Ok(detail.into())
    }

    /// Move a PENDING request to `status`
    ///
    /// The status guard lives in the UPDATE itself, so of two concurrent
    /// reviewers exactly one sees a row come back.
    pub async fn decide(
        &self,
        reviewer: &AuthenticatedUser,
        id: Uuid,
        status: PerdinStatus,
        rejection_reason: Option<String>,
    ) -> Result<PerdinResponseDto> {
        if !status.is_final() {
            return Err(AppError::BadRequest(
                "A decision must approve or reject".to_string(),
            ));
        }

        let updated = sqlx::query_scalar!(
            r#"
            UPDATE perdin
            SET status = $2,
                approved_by_id = $3,
                approved_at = NOW(),
                rejection_reason = $4,
                updated_at = NOW()
            WHERE id = $1
              AND status = 'PENDING'
              AND pegawai_id <> $3
            RETURNING id
            "#,
            id,
            status as _,
            reviewer.user_id,
            rejection_reason.as_deref()
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to decide perdin {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if updated.is_none() {
            return Err(self.explain_rejected_decision(reviewer, id).await);
        }

        tracing::info!("Perdin {} {} by {}", id, status, reviewer.username);
        self.find_detail(id).await.map(PerdinResponseDto::from)
    }

    /// Work out why the conditional UPDATE matched nothing
    async fn explain_rejected_decision(&self, reviewer: &AuthenticatedUser, id: Uuid) -> AppError {
        let current = sqlx::query!(
            r#"SELECT pegawai_id, status as "status: PerdinStatus" FROM perdin WHERE id = $1"#,
            id
        )
        .fetch_optional(&self.pool)
        .await;

        match current {
            Ok(row) => {
                let current = row.map(|r| (r.pegawai_id, r.status));
                decision_error(id, reviewer.user_id, current)
            }
            Err(e) => AppError::Database(e),
        }
    }

    async fn find_detail(&self, id: Uuid) -> Result<PerdinDetail> {
        let query = format!("{} WHERE p.id = $1", DETAIL_SELECT);
        sqlx::query_as::<_, PerdinDetail>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get perdin {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Perdin {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_perdin_is_not_found() {
        let err = decision_error(Uuid::new_v4(), Uuid::new_v4(), None);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_decided_perdin_is_conflict() {
        let id = Uuid::new_v4();
        for status in [PerdinStatus::Approved, PerdinStatus::Rejected] {
            match decision_error(id, Uuid::new_v4(), Some((Uuid::new_v4(), status))) {
                AppError::Conflict(msg) => {
                    assert!(msg.ends_with(&status.as_str().to_lowercase()), "{}", msg)
                }
                other => panic!("expected conflict, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_already_decided_wins_over_self_review() {
        let reviewer = Uuid::new_v4();
        let err = decision_error(
            Uuid::new_v4(),
            reviewer,
            Some((reviewer, PerdinStatus::Approved)),
        );
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_own_pending_perdin_is_forbidden() {
        let reviewer = Uuid::new_v4();
        let err = decision_error(
            Uuid::new_v4(),
            reviewer,
            Some((reviewer, PerdinStatus::Pending)),
        );
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_pending_perdin_of_someone_else_is_conflict() {
        let err = decision_error(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some((Uuid::new_v4(), PerdinStatus::Pending)),
        );
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
