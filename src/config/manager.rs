use super::{
    evolution::EvolutionConfig, grammar::GrammarConfig, report::ReportConfig,
    traits::ConfigSection,
};
use crate::error::PatternError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables with this prefix override file values,
/// e.g. `PATTERNGEN_GE__MAX_RUNS=5`.
pub const ENV_PREFIX: &str = "PATTERNGEN";

/// Complete, immutable configuration of one execution.
///
/// Built once (from defaults, a file, or the environment) and then handed to
/// every component by reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub ge: EvolutionConfig,
    pub dgg: GrammarConfig,
    pub io: ReportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PatternError> {
        self.ge.validate()?;
        self.dgg.validate()?;
        self.io.validate()?;
        Ok(())
    }

    /// Load from an optional file plus environment overrides.
    ///
    /// A missing file is not an error: defaults are used, with a warning.
    pub fn load(path: Option<&Path>) -> Result<Self, PatternError> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) if path.exists() => {
                log::info!("Loading configuration from {}", path.display());
                builder = builder.add_source(config::File::from(path));
            }
            Some(path) => {
                log::warn!(
                    "Unable to locate {}, using default configuration parameters",
                    path.display()
                );
            }
            None => log::info!("No configuration file given, using default configuration parameters"),
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_settings(&settings)
    }

    pub fn from_settings(settings: &config::Config) -> Result<Self, PatternError> {
        let config = Self {
            ge: EvolutionConfig::from_settings(settings)?,
            dgg: GrammarConfig::from_settings(settings)?,
            io: ReportConfig::from_settings(settings)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PatternError> {
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
