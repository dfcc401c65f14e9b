pub mod traits;
pub mod evolution;
pub mod grammar;
pub mod report;
pub mod manager;

pub use manager::AppConfig;
pub use evolution::{EvolutionConfig, FitnessType, RecombinationType, ReplacementType, SelectionType};
pub use grammar::GrammarConfig;
pub use report::{ReportConfig, ReportFormat};
