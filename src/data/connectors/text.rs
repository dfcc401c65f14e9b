use crate::error::{PatternError, Result};
use std::path::Path;

pub struct TextConnector;

impl TextConnector {
    /// Load samples from a text file, one sample per non-blank line
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            PatternError::FeatureSource(format!(
                "Failed to read samples from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let samples = Self::parse(&contents);
        if samples.is_empty() {
            log::warn!("No samples found in {}", path.as_ref().display());
        }

        Ok(samples)
    }

    pub fn parse(contents: &str) -> Vec<String> {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}
