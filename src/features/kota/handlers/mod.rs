mod kota_handler;

pub use kota_handler::*;
