use super::traits::{read_field, ConfigSection};
use crate::error::PatternError;
use serde::{Deserialize, Serialize};

/// Dynamic grammar generation toggles (`[dgg]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Upper bound of features per token; 0 means every observed feature
    pub features_per_token: usize,
    pub use_boolean_features: bool,
    pub use_custom_attributes: bool,
    pub use_uniques: bool,
    pub use_grammar_operators: bool,
    pub use_token_wildcard: bool,
    pub use_extended_pattern_syntax: bool,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            features_per_token: 1,
            use_boolean_features: false,
            use_custom_attributes: false,
            use_uniques: true,
            use_grammar_operators: false,
            use_token_wildcard: false,
            use_extended_pattern_syntax: false,
        }
    }
}

impl GrammarConfig {
    /// Grammar operators and the extended pattern syntax cannot be combined:
    /// when both are requested the extended syntax is switched off.
    pub fn enforce_restrictions(mut self) -> Self {
        if self.use_extended_pattern_syntax && self.use_grammar_operators {
            log::warn!("Extended pattern syntax is not compatible with grammar operators");
            log::warn!("Extended pattern syntax has been disabled");
            self.use_extended_pattern_syntax = false;
        }
        self
    }
}

impl ConfigSection for GrammarConfig {
    fn section_name() -> &'static str {
        "dgg"
    }

    fn validate(&self) -> Result<(), PatternError> {
        if self.use_extended_pattern_syntax && self.use_grammar_operators {
            return Err(PatternError::Configuration(
                "Grammar operators and extended pattern syntax are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    fn from_settings(settings: &config::Config) -> Result<Self, PatternError> {
        let s = Self::section_name();
        let d = Self::default();

        Ok(Self {
            features_per_token: read_field(settings, s, "features_per_token", d.features_per_token),
            use_boolean_features: read_field(
                settings,
                s,
                "use_boolean_features",
                d.use_boolean_features,
            ),
            use_custom_attributes: read_field(
                settings,
                s,
                "use_custom_attributes",
                d.use_custom_attributes,
            ),
            use_uniques: read_field(settings, s, "use_uniques", d.use_uniques),
            use_grammar_operators: read_field(
                settings,
                s,
                "use_grammar_operators",
                d.use_grammar_operators,
            ),
            use_token_wildcard: read_field(settings, s, "use_token_wildcard", d.use_token_wildcard),
            use_extended_pattern_syntax: read_field(
                settings,
                s,
                "use_extended_pattern_syntax",
                d.use_extended_pattern_syntax,
            ),
        }
        .enforce_restrictions())
    }
}
