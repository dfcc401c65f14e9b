use crate::error::PatternError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), PatternError>;

    /// Build the section from layered settings, falling back to defaults field by field
    fn from_settings(settings: &config::Config) -> Result<Self, PatternError>;
}

/// Read `section.key`, keeping `default` when the key is absent or unreadable.
///
/// A value of the wrong type or format is not fatal: it is reported and the
/// documented default is used instead.
pub fn read_field<T: DeserializeOwned>(
    settings: &config::Config,
    section: &str,
    key: &str,
    default: T,
) -> T {
    let path = format!("{}.{}", section, key);
    match settings.get::<T>(&path) {
        Ok(value) => value,
        Err(config::ConfigError::NotFound(_)) => default,
        Err(e) => {
            log::warn!("Invalid value for `{}` ({}), using default", path, e);
            default
        }
    }
}

/// Read a policy selector. Unknown selector names fail instead of falling back.
pub fn read_selector<T>(
    settings: &config::Config,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, PatternError>
where
    T: FromStr<Err = PatternError>,
{
    let path = format!("{}.{}", section, key);
    match settings.get_string(&path) {
        Ok(name) => name.parse(),
        Err(config::ConfigError::NotFound(_)) => Ok(default),
        Err(e) => Err(PatternError::Configuration(format!(
            "Unreadable selector `{}`: {}",
            path, e
        ))),
    }
}

pub(crate) fn check_probability(name: &str, value: f64) -> Result<(), PatternError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PatternError::Configuration(format!(
            "{} must be between 0 and 1",
            name
        )));
    }
    Ok(())
}
