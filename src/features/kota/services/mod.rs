mod kota_service;

pub use kota_service::KotaService;
