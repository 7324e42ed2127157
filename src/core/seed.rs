//! Demo data for local and staging environments.
//!
//! Every step is idempotent: users and cities are matched on their unique
//! names, sample perdin are only created for employees without any.

use anyhow::Context;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::perdin::dtos::CreatePerdinDto;
use crate::features::perdin::PerdinService;
use crate::features::users::{Role, UserService};

const DEMO_PASSWORD: &str = "password123";

struct SeedUser {
    username: &'static str,
    nama: &'static str,
    role: Role,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        username: "walter",
        nama: "Walter White",
        role: Role::Pegawai,
    },
    SeedUser {
        username: "jesse",
        nama: "Jesse Pinkman",
        role: Role::Pegawai,
    },
    SeedUser {
        username: "janedoe",
        nama: "Jane Doe",
        role: Role::DivisiSdm,
    },
];

struct SeedKota {
    nama_kota: &'static str,
    latitude: f64,
    longitude: f64,
    provinsi: &'static str,
    pulau: &'static str,
    luar_negeri: bool,
}

const fn kota(
    nama_kota: &'static str,
    latitude: f64,
    longitude: f64,
    provinsi: &'static str,
    pulau: &'static str,
    luar_negeri: bool,
) -> SeedKota {
    SeedKota {
        nama_kota,
        latitude,
        longitude,
        provinsi,
        pulau,
        luar_negeri,
    }
}

const KOTA: &[SeedKota] = &[
    kota("Bandung", -6.917500, 107.619100, "Jawa Barat", "Jawa", false),
    kota("Surabaya", -7.250445, 112.768845, "Jawa Timur", "Jawa", false),
    kota("Jakarta", -6.208763, 106.845599, "DKI Jakarta", "Jawa", false),
    kota("Yogyakarta", -7.797068, 110.370529, "DI Yogyakarta", "Jawa", false),
    kota("Semarang", -6.966667, 110.416664, "Jawa Tengah", "Jawa", false),
    kota("Lampung", -5.429222, 105.262772, "Lampung", "Sumatera", false),
    kota("Medan", 3.595196, 98.672226, "Sumatera Utara", "Sumatera", false),
    kota("Denpasar", -8.670458, 115.212631, "Bali", "Bali", false),
    kota("Makassar", -5.147665, 119.432732, "Sulawesi Selatan", "Sulawesi", false),
    kota("Pontianak", -0.026353, 109.342003, "Kalimantan Barat", "Kalimantan", false),
    kota("Singapore", 1.352083, 103.819836, "Singapore", "Singapore", true),
    kota("Kuala Lumpur", 3.139003, 101.686855, "Federal Territory", "Malaysia", true),
];

struct SeedPerdin {
    username: &'static str,
    asal: &'static str,
    tujuan: &'static str,
    berangkat: (i32, u32, u32),
    pulang: (i32, u32, u32),
    keterangan: &'static str,
}

const PERDIN: &[SeedPerdin] = &[
    SeedPerdin {
        username: "walter",
        asal: "Bandung",
        tujuan: "Surabaya",
        berangkat: (2022, 9, 28),
        pulang: (2022, 10, 9),
        keterangan: "Koordinasi proyek dengan kantor wilayah Jawa Timur.",
    },
    SeedPerdin {
        username: "jesse",
        asal: "Lampung",
        tujuan: "Jakarta",
        berangkat: (2022, 10, 11),
        pulang: (2022, 11, 11),
        keterangan: "Pelatihan teknis di kantor pusat.",
    },
];

pub async fn seed_demo_data(
    pool: &PgPool,
    users: &UserService,
    perdin: &PerdinService,
) -> anyhow::Result<()> {
    seed_users(pool).await?;
    seed_kota(pool).await?;
    seed_perdin(pool, users, perdin).await?;
    tracing::info!("Demo data seeded");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    let hash = tokio::task::spawn_blocking(|| bcrypt::hash(DEMO_PASSWORD, bcrypt::DEFAULT_COST))
        .await
        .context("password hashing task failed")?
        .context("failed to hash demo password")?;

    for user in USERS {
        let inserted = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, nama, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(user.username)
        .bind(&hash)
        .bind(user.nama)
        .bind(user.role)
        .execute(pool)
        .await
        .with_context(|| format!("failed to seed user {}", user.username))?;

        if inserted.rows_affected() > 0 {
            tracing::info!("Seeded user {} ({})", user.username, user.role);
        }
    }
    Ok(())
}

async fn seed_kota(pool: &PgPool) -> anyhow::Result<()> {
    let mut created = 0;
    for k in KOTA {
        let inserted = sqlx::query(
            r#"
            INSERT INTO kota (nama_kota, latitude, longitude, provinsi, pulau, luar_negeri)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (nama_kota) DO NOTHING
            "#,
        )
        .bind(k.nama_kota)
        .bind(k.latitude)
        .bind(k.longitude)
        .bind(k.provinsi)
        .bind(k.pulau)
        .bind(k.luar_negeri)
        .execute(pool)
        .await
        .with_context(|| format!("failed to seed kota {}", k.nama_kota))?;

        created += inserted.rows_affected();
    }

    tracing::info!("Seeded {} of {} reference kota", created, KOTA.len());
    Ok(())
}

async fn seed_perdin(
    pool: &PgPool,
    users: &UserService,
    perdin: &PerdinService,
) -> anyhow::Result<()> {
    for sample in PERDIN {
        let Some(user) = users.find_by_username(sample.username).await? else {
            continue;
        };

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM perdin WHERE pegawai_id = $1")
            .bind(user.id)
            .fetch_one(pool)
            .await?;
        if existing > 0 {
            continue;
        }

        let kota_asal_id = kota_id(pool, sample.asal).await?;
        let kota_tujuan_id = kota_id(pool, sample.tujuan).await?;

        let dto = CreatePerdinDto {
            kota_asal_id,
            kota_tujuan_id,
            tanggal_berangkat: date(sample.berangkat)?,
            tanggal_pulang: date(sample.pulang)?,
            keterangan: sample.keterangan.to_string(),
        };
        let pegawai = AuthenticatedUser {
            user_id: user.id,
            username: user.username,
            nama: user.nama,
            role: user.role,
        };

        perdin.create(&pegawai, dto).await?;
    }
    Ok(())
}

async fn kota_id(pool: &PgPool, nama_kota: &str) -> anyhow::Result<uuid::Uuid> {
    sqlx::query_scalar("SELECT id FROM kota WHERE nama_kota = $1")
        .bind(nama_kota)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("kota {} missing after seeding", nama_kota))
}

fn date((y, m, d): (i32, u32, u32)) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {}-{}-{}", y, m, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reference_kota_are_unique_and_in_range() {
        let names: HashSet<_> = KOTA.iter().map(|k| k.nama_kota).collect();
        assert_eq!(names.len(), KOTA.len());
        for k in KOTA {
            assert!((-90.0..=90.0).contains(&k.latitude), "{}", k.nama_kota);
            assert!((-180.0..=180.0).contains(&k.longitude), "{}", k.nama_kota);
        }
        assert_eq!(KOTA.iter().filter(|k| k.luar_negeri).count(), 2);
    }

    #[test]
    fn test_sample_perdin_reference_seeded_rows() {
        let kota: HashSet<_> = KOTA.iter().map(|k| k.nama_kota).collect();
        let users: HashSet<_> = USERS.iter().map(|u| u.username).collect();
        for p in PERDIN {
            assert!(users.contains(p.username));
            assert!(kota.contains(p.asal) && kota.contains(p.tujuan));
            assert!(date(p.pulang).unwrap() >= date(p.berangkat).unwrap());
        }
    }

    #[test]
    fn test_only_one_reviewer_seeded() {
        assert_eq!(USERS.iter().filter(|u| u.role.is_reviewer()).count(), 1);
    }
}
