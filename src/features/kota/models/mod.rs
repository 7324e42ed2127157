mod kota;

pub use kota::Kota;
