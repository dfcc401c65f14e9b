pub mod generation;
pub mod evaluation;
pub mod metrics;
pub mod search;

pub use search::{PatternSearch, SearchOutcome};
