use super::matcher::PatternMatcher;
use crate::config::{AppConfig, FitnessType};
use crate::data::Doc;
use crate::error::{PatternError, Result};
use crate::types::Phenotype;

/// Scores a phenotype against the sample set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitness {
    fitness_type: FitnessType,
    use_token_wildcard: bool,
}

impl Fitness {
    pub fn new(fitness_type: FitnessType, use_token_wildcard: bool) -> Self {
        Self {
            fitness_type,
            use_token_wildcard,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ge.fitness_function_type, config.dgg.use_token_wildcard)
    }

    pub fn evaluate(
        &self,
        phenotype: &Phenotype,
        samples: &[Doc],
        matcher: &dyn PatternMatcher,
    ) -> Result<f64> {
        if samples.is_empty() {
            return Err(PatternError::Evaluation(
                "Cannot evaluate fitness without samples".to_string(),
            ));
        }

        let contact = match self.fitness_type {
            FitnessType::Basic => Self::basic(phenotype, samples, matcher)?,
            FitnessType::FullMatch => Self::full_match(phenotype, samples, matcher)?,
        };

        Ok(self.wildcard_penalty(phenotype, contact))
    }

    /// Share of samples with at least one match
    fn basic(phenotype: &Phenotype, samples: &[Doc], matcher: &dyn PatternMatcher) -> Result<f64> {
        let weight = 1.0 / samples.len() as f64;
        let mut contact = 0.0;

        for sample in samples {
            if !matcher.find_matches(phenotype, sample)?.is_empty() {
                contact += weight;
            }
        }

        Ok(contact)
    }

    /// Share of samples matched from their first to their last token
    fn full_match(phenotype: &Phenotype, samples: &[Doc], matcher: &dyn PatternMatcher) -> Result<f64> {
        let weight = 1.0 / samples.len() as f64;
        let mut contact = 0.0;

        for sample in samples {
            let full = matcher
                .find_matches(phenotype, sample)?
                .iter()
                .filter(|span| span.covers(sample.len()))
                .count();
            contact += weight * full as f64;
        }

        Ok(contact)
    }

    /// Subtracts `1 / tokens` for every token wildcard in the phenotype
    fn wildcard_penalty(&self, phenotype: &Phenotype, mut contact: f64) -> f64 {
        if self.use_token_wildcard {
            let penalty = 1.0 / phenotype.len() as f64;
            for token in phenotype.iter().filter(|token| token.is_empty()) {
                log::debug!("Applying token wildcard penalty to {:?}", token);
                contact -= penalty;
            }
        }
        contact
    }
}
