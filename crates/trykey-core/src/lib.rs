pub mod config;
pub mod error;

pub use config::TrykeyConfig;
pub use error::{TrykeyError, TrykeyResult};
