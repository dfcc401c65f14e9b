pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use engines::{PatternSearch, SearchOutcome};
pub use error::{PatternError, Result};
