pub mod allowance;
mod perdin_service;

pub use allowance::{AllowanceBreakdown, AllowanceError};
pub use perdin_service::PerdinService;
