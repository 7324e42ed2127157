mod perdin;

pub use perdin::{Currency, Perdin, PerdinDetail, PerdinStatus, Tier};
