mod perdin_handler;

pub use perdin_handler::*;
