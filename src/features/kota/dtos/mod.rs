mod kota_dto;

pub use kota_dto::{KotaResponseDto, UpsertKotaDto};
