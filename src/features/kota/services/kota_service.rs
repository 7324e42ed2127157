use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::kota::dtos::{KotaResponseDto, UpsertKotaDto};
use crate::features::kota::models::Kota;

const DUPLICATE_NAME: &str = "A kota with this name already exists";
const STILL_REFERENCED: &str = "Kota is still referenced by existing perdin";

/// Map a failed registry write to the error the client sees
fn write_error(e: sqlx::Error) -> AppError {
    AppError::from_db(e, DUPLICATE_NAME, STILL_REFERENCED)
}

/// Service for the city master-data registry
pub struct KotaService {
    pool: PgPool,
}

impl KotaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all cities ordered by name
    pub async fn list(&self) -> Result<Vec<KotaResponseDto>> {
        let cities = sqlx::query_as!(
            Kota,
            r#"
            SELECT id, nama_kota, latitude, longitude, provinsi, pulau, luar_negeri, created_at, updated_at
            FROM kota
            ORDER BY nama_kota ASC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list kota: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(cities.into_iter().map(KotaResponseDto::from).collect())
    }

    /// Fetch the raw model, used by the perdin calculation
    pub async fn find(&self, id: Uuid) -> Result<Kota> {
        sqlx::query_as!(
            Kota,
            r#"
            SELECT id, nama_kota, latitude, longitude, provinsi, pulau, luar_negeri, created_at, updated_at
            FROM kota
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get kota: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Kota {} not found", id)))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<KotaResponseDto> {
        self.find(id).await.map(KotaResponseDto::from)
    }

    pub async fn create(&self, dto: UpsertKotaDto) -> Result<KotaResponseDto> {
        let kota = sqlx::query_as!(
            Kota,
            r#"
            INSERT INTO kota (nama_kota, latitude, longitude, provinsi, pulau, luar_negeri)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, nama_kota, latitude, longitude, provinsi, pulau, luar_negeri, created_at, updated_at
            "#,
            dto.nama_kota.trim(),
            dto.latitude,
            dto.longitude,
            dto.provinsi.trim(),
            dto.pulau.trim(),
            dto.luar_negeri
        )
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        tracing::info!("Kota {} ({}) created", kota.nama_kota, kota.id);
        Ok(kota.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpsertKotaDto) -> Result<KotaResponseDto> {
        let kota = sqlx::query_as!(
            Kota,
            r#"
            UPDATE kota
            SET nama_kota = $2,
                latitude = $3,
                longitude = $4,
                provinsi = $5,
                pulau = $6,
                luar_negeri = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, nama_kota, latitude, longitude, provinsi, pulau, luar_negeri, created_at, updated_at
            "#,
            id,
            dto.nama_kota.trim(),
            dto.latitude,
            dto.longitude,
            dto.provinsi.trim(),
            dto.pulau.trim(),
            dto.luar_negeri
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?
        .ok_or_else(|| AppError::NotFound(format!("Kota {} not found", id)))?;

        tracing::info!("Kota {} ({}) updated", kota.nama_kota, kota.id);
        Ok(kota.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query!("DELETE FROM kota WHERE id = $1", id)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Kota {} not found", id)));
        }

        tracing::info!("Kota {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::pg_error;

    #[test]
    fn test_duplicate_name_is_conflict() {
        match write_error(pg_error("23505")) {
            AppError::Conflict(msg) => assert_eq!(msg, DUPLICATE_NAME),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_of_referenced_kota_is_conflict() {
        match write_error(pg_error("23503")) {
            AppError::Conflict(msg) => assert_eq!(msg, STILL_REFERENCED),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_other_write_failures_stay_internal() {
        assert!(matches!(
            write_error(sqlx::Error::PoolTimedOut),
            AppError::Database(_)
        ));
    }
}
