pub mod matcher;
pub mod fitness;

pub use matcher::{PatternMatcher, RuleMatcher};
pub use fitness::Fitness;
