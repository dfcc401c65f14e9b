pub mod stats;
pub mod report;

pub use stats::{Stats, StatsSummary};
pub use report::ReportWriter;
