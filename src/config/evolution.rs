use super::traits::{check_probability, read_field, read_selector, ConfigSection};
use crate::error::PatternError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hyperparameters of the grammatical evolution search (`[ge]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub max_runs: usize,
    pub success_threshold: f64,
    pub population_size: usize,
    pub max_generations: usize,
    pub codon_length: usize,
    pub codons_per_individual: usize,
    pub mutation_probability: f64,
    pub offspring_max_size_factor: f64,
    pub mating_probability: f64,
    pub k_value: usize,
    pub selection_type: SelectionType,
    pub recombination_type: RecombinationType,
    pub replacement_type: ReplacementType,
    pub fitness_function_type: FitnessType,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionType {
    BinaryTournament,
    KTournament,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecombinationType {
    RandomOnePointCrossover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplacementType {
    MuPlusLambda,
    MuLambdaWithElitism,
    MuLambdaWithoutElitism,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitnessType {
    Basic,
    FullMatch,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

impl FromStr for SelectionType {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "BINARY_TOURNAMENT" => Ok(SelectionType::BinaryTournament),
            "K_TOURNAMENT" => Ok(SelectionType::KTournament),
            other => Err(PatternError::Configuration(format!(
                "Unknown selection type: {}",
                other
            ))),
        }
    }
}

impl FromStr for RecombinationType {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "RANDOM_ONE_POINT_CROSSOVER" => Ok(RecombinationType::RandomOnePointCrossover),
            other => Err(PatternError::Configuration(format!(
                "Unknown recombination type: {}",
                other
            ))),
        }
    }
}

impl FromStr for ReplacementType {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "MU_PLUS_LAMBDA" => Ok(ReplacementType::MuPlusLambda),
            "MU_LAMBDA_WITH_ELITISM" => Ok(ReplacementType::MuLambdaWithElitism),
            "MU_LAMBDA_WITHOUT_ELITISM" => Ok(ReplacementType::MuLambdaWithoutElitism),
            other => Err(PatternError::Configuration(format!(
                "Unknown replacement type: {}",
                other
            ))),
        }
    }
}

impl FromStr for FitnessType {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "BASIC" | "FITNESS_BASIC" => Ok(FitnessType::Basic),
            "FULL_MATCH" | "FITNESS_FULLMATCH" => Ok(FitnessType::FullMatch),
            other => Err(PatternError::Configuration(format!(
                "Unknown fitness function type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ReplacementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplacementType::MuPlusLambda => "MU_PLUS_LAMBDA",
            ReplacementType::MuLambdaWithElitism => "MU_LAMBDA_WITH_ELITISM",
            ReplacementType::MuLambdaWithoutElitism => "MU_LAMBDA_WITHOUT_ELITISM",
        };
        write!(f, "{}", name)
    }
}

impl EvolutionConfig {
    /// Number of bits in every genome
    pub fn dna_length(&self) -> usize {
        self.codon_length * self.codons_per_individual
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            max_runs: 1,
            success_threshold: 0.8,
            population_size: 10,
            max_generations: 3,
            codon_length: 8,
            codons_per_individual: 4,
            mutation_probability: 0.5,
            offspring_max_size_factor: 3.5,
            mating_probability: 0.9,
            k_value: 3,
            selection_type: SelectionType::BinaryTournament,
            recombination_type: RecombinationType::RandomOnePointCrossover,
            replacement_type: ReplacementType::MuPlusLambda,
            fitness_function_type: FitnessType::FullMatch,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "ge"
    }

    fn validate(&self) -> Result<(), PatternError> {
        if self.max_runs == 0 {
            return Err(PatternError::Configuration(
                "At least one run is required".to_string(),
            ));
        }
        if self.population_size < 2 {
            return Err(PatternError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if !(2..=64).contains(&self.codon_length) {
            return Err(PatternError::Configuration(
                "Codon length must be between 2 and 64 bits".to_string(),
            ));
        }
        if self.codons_per_individual == 0 {
            return Err(PatternError::Configuration(
                "Individuals need at least one codon".to_string(),
            ));
        }
        check_probability("Mutation probability", self.mutation_probability)?;
        check_probability("Mating probability", self.mating_probability)?;
        if self.mating_probability <= 0.0 {
            return Err(PatternError::Configuration(
                "Mating probability must be positive".to_string(),
            ));
        }
        if self.offspring_max_size_factor < 1.0 {
            return Err(PatternError::Configuration(
                "Offspring maximum size factor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn from_settings(settings: &config::Config) -> Result<Self, PatternError> {
        let s = Self::section_name();
        let d = Self::default();

        Ok(Self {
            max_runs: read_field(settings, s, "max_runs", d.max_runs),
            success_threshold: read_field(settings, s, "success_threshold", d.success_threshold),
            population_size: read_field(settings, s, "population_size", d.population_size),
            max_generations: read_field(settings, s, "max_generations", d.max_generations),
            codon_length: read_field(settings, s, "codon_length", d.codon_length),
            codons_per_individual: read_field(
                settings,
                s,
                "codons_per_individual",
                d.codons_per_individual,
            ),
            mutation_probability: read_field(
                settings,
                s,
                "mutation_probability",
                d.mutation_probability,
            ),
            offspring_max_size_factor: read_field(
                settings,
                s,
                "offspring_max_size_factor",
                d.offspring_max_size_factor,
            ),
            mating_probability: read_field(settings, s, "mating_probability", d.mating_probability),
            k_value: read_field(settings, s, "k_value", d.k_value),
            selection_type: read_selector(settings, s, "selection_type", d.selection_type)?,
            recombination_type: read_selector(
                settings,
                s,
                "recombination_type",
                d.recombination_type,
            )?,
            replacement_type: read_selector(settings, s, "replacement_type", d.replacement_type)?,
            fitness_function_type: read_selector(
                settings,
                s,
                "fitness_function_type",
                d.fitness_function_type,
            )?,
            seed: read_field(settings, s, "seed", d.seed),
        })
    }
}
