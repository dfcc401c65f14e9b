use super::individual::{EvolutionContext, Individual};
use crate::config::{RecombinationType, ReplacementType, SelectionType};
use crate::engines::metrics::Stats;
use crate::error::{PatternError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

/// Sort individuals by fitness, best first; equal fitness keeps the prior order
pub fn sort_by_fitness(individuals: &mut [Individual]) {
    individuals.sort_by(|a, b| b.fitness().partial_cmp(&a.fitness()).unwrap_or(Ordering::Equal));
}

/// Builds the mating pool from the current generation
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    selection_type: SelectionType,
    k_value: usize,
}

impl Selection {
    /// `k_value` is the tournament size of K tournament selection
    pub fn new(selection_type: SelectionType, k_value: usize) -> Self {
        Self {
            selection_type,
            k_value,
        }
    }

    pub fn select<'g, R: Rng>(
        &self,
        generation: &'g [Individual],
        rng: &mut R,
    ) -> Result<Vec<&'g Individual>> {
        match self.selection_type {
            SelectionType::BinaryTournament => binary_tournament(generation, rng),
            SelectionType::KTournament => Err(PatternError::NotImplemented(format!(
                "K tournament selection (k = {})",
                self.k_value
            ))),
        }
    }
}

/// Binary tournament: pit two distinct random individuals against each other
/// until the pool holds one more individual than the generation.
/// Ties go to the first contender.
pub fn binary_tournament<'g, R: Rng>(
    generation: &'g [Individual],
    rng: &mut R,
) -> Result<Vec<&'g Individual>> {
    if generation.len() < 2 {
        return Err(PatternError::Configuration(format!(
            "Binary tournament needs at least 2 individuals, got {}",
            generation.len()
        )));
    }

    let mut pool = Vec::with_capacity(generation.len() + 1);

    while pool.len() <= generation.len() {
        let i = rng.gen_range(0..generation.len());
        let mut j = rng.gen_range(0..generation.len());
        while j == i {
            j = rng.gen_range(0..generation.len());
        }

        let (first, second) = (&generation[i], &generation[j]);
        pool.push(if first.fitness() >= second.fitness() { first } else { second });
    }

    Ok(pool)
}

/// Cut point aligned on codon boundaries: a whole number of codon columns
pub fn crossover_point<R: Rng>(
    codon_length: usize,
    codons_per_individual: usize,
    rng: &mut R,
) -> usize {
    rng.gen_range(1..codon_length) * codons_per_individual
}

/// Produces offspring from the mating pool
#[derive(Debug, Clone, Copy)]
pub struct Recombination {
    recombination_type: RecombinationType,
}

impl Recombination {
    pub fn new(recombination_type: RecombinationType) -> Self {
        Self { recombination_type }
    }

    pub fn recombine<R: Rng>(
        &self,
        context: &EvolutionContext,
        stats: &mut Stats,
        mating_pool: &[&Individual],
        generation_size: usize,
        rng: &mut R,
    ) -> Result<Vec<Individual>> {
        match self.recombination_type {
            RecombinationType::RandomOnePointCrossover => {
                random_one_point_crossover(context, stats, mating_pool, generation_size, rng)
            }
        }
    }
}

/// One point crossover at a random codon-aligned cut.
///
/// Each draw of two parents mates with probability `mating_probability` and
/// yields two children, mutated on construction. Draws that do not mate add
/// nothing, so `mating_probability` must be positive.
pub fn random_one_point_crossover<R: Rng>(
    context: &EvolutionContext,
    stats: &mut Stats,
    mating_pool: &[&Individual],
    generation_size: usize,
    rng: &mut R,
) -> Result<Vec<Individual>> {
    let config = context.config;
    let max_size = (generation_size as f64 * config.offspring_max_size_factor).round() as usize;
    let mut offspring = Vec::with_capacity(max_size + 2);

    while offspring.len() <= max_size {
        let (Some(parent_1), Some(parent_2)) = (mating_pool.choose(rng), mating_pool.choose(rng)) else {
            return Err(PatternError::Evaluation("Mating pool is empty".to_string()));
        };

        if rng.gen::<f64>() < config.mating_probability {
            let cut = crossover_point(config.codon_length, config.codons_per_individual, rng);
            let dna_1 = parent_1.genome().splice(parent_2.genome(), cut);
            let dna_2 = parent_2.genome().splice(parent_1.genome(), cut);
            offspring.push(Individual::offspring(context, stats, &dna_1, rng)?);
            offspring.push(Individual::offspring(context, stats, &dna_2, rng)?);
        }
    }

    Ok(offspring)
}

/// Merges offspring into the generation, keeping its size
#[derive(Debug, Clone, Copy)]
pub struct Replacement {
    replacement_type: ReplacementType,
}

impl Replacement {
    pub fn new(replacement_type: ReplacementType) -> Self {
        Self { replacement_type }
    }

    /// Replace `generation` in place and drain `offspring`.
    /// The resulting generation is sorted best first.
    pub fn replace(&self, generation: &mut Vec<Individual>, offspring: &mut Vec<Individual>) {
        let size = generation.len();

        match self.replacement_type {
            ReplacementType::MuPlusLambda => {
                generation.append(offspring);
                sort_by_fitness(generation);
                generation.truncate(size);
            }
            ReplacementType::MuLambdaWithElitism => {
                sort_by_fitness(generation);
                sort_by_fitness(offspring);
                let elite = size.min(1);
                generation.truncate(elite);
                generation.extend(offspring.drain(..).take(size - elite));
                sort_by_fitness(generation);
            }
            ReplacementType::MuLambdaWithoutElitism => {
                sort_by_fitness(offspring);
                *generation = offspring.drain(..).take(size).collect();
            }
        }

        offspring.clear();
    }
}
