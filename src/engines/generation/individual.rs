use super::decoder::Decoder;
use super::genome::Genome;
use super::grammar::Grammar;
use crate::config::{AppConfig, EvolutionConfig};
use crate::data::Doc;
use crate::engines::evaluation::{Fitness, PatternMatcher};
use crate::engines::metrics::Stats;
use crate::error::Result;
use crate::types::Phenotype;
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Read-only inputs shared by every individual of a search
#[derive(Clone, Copy)]
pub struct EvolutionContext<'a> {
    pub config: &'a EvolutionConfig,
    pub grammar: &'a Grammar,
    pub samples: &'a [Doc],
    pub fitness: Fitness,
    pub matcher: &'a dyn PatternMatcher,
}

impl<'a> EvolutionContext<'a> {
    pub fn new(
        config: &'a AppConfig,
        grammar: &'a Grammar,
        samples: &'a [Doc],
        matcher: &'a dyn PatternMatcher,
    ) -> Self {
        Self {
            config: &config.ge,
            grammar,
            samples,
            fitness: Fitness::from_config(config),
            matcher,
        }
    }

    pub fn decoder(&self) -> Decoder<'a> {
        Decoder::new(self.grammar, self.config.codon_length)
    }
}

/// A candidate solution: genome, its codons, decoded pattern and fitness.
/// Never mutated once built.
#[derive(Debug, Clone, Serialize)]
pub struct Individual {
    genome: Genome,
    #[serde(skip)]
    codons: Vec<u64>,
    phenotype: Phenotype,
    fitness: f64,
}

impl Individual {
    /// Fresh individual with a uniformly random genome
    pub fn genesis<R: Rng>(context: &EvolutionContext, stats: &mut Stats, rng: &mut R) -> Result<Self> {
        let genome = Genome::random(context.config.dna_length(), rng);
        Self::evaluate(context, stats, genome)
    }

    /// Offspring built from recombined DNA, which is mutated first
    pub fn offspring<R: Rng>(
        context: &EvolutionContext,
        stats: &mut Stats,
        dna: &Genome,
        rng: &mut R,
    ) -> Result<Self> {
        let genome = dna.mutate(context.config.mutation_probability, rng);
        Self::evaluate(context, stats, genome)
    }

    /// Decode and score `genome` as is
    pub fn evaluate(context: &EvolutionContext, stats: &mut Stats, genome: Genome) -> Result<Self> {
        let (codons, phenotype) = context.decoder().decode(&genome)?;
        let fitness = context
            .fitness
            .evaluate(&phenotype, context.samples, context.matcher)?;

        stats.record_evaluation(fitness, context.config.success_threshold);

        Ok(Self {
            genome,
            codons,
            phenotype,
            fitness,
        })
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn codons(&self) -> &[u64] {
        &self.codons
    }

    pub fn phenotype(&self) -> &Phenotype {
        &self.phenotype
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phenotype = serde_json::to_string(&self.phenotype).map_err(|_| fmt::Error)?;
        write!(f, "{} (fitness {:.4})", phenotype, self.fitness)
    }
}
