pub mod auth;
pub mod kota;
pub mod perdin;
pub mod users;
