use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("Malformed derivation: {0}")]
    MalformedDerivation(String),

    #[error("Matcher error: {0}")]
    Matcher(String),

    #[error("Feature source error: {0}")]
    FeatureSource(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PatternError>;
