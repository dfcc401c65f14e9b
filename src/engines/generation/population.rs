use super::individual::{EvolutionContext, Individual};
use super::operators::{sort_by_fitness, Recombination, Replacement, Selection};
use super::progress::ProgressCallback;
use crate::engines::metrics::Stats;
use crate::error::{PatternError, Result};
use rand::Rng;

/// One run of the grammatical evolution search
pub struct Population<'a> {
    context: EvolutionContext<'a>,
    generation: Vec<Individual>,
    offspring: Vec<Individual>,
    best_individual: Option<Individual>,
    selection: Selection,
    recombination: Recombination,
    replacement: Replacement,
}

impl<'a> Population<'a> {
    /// Genesis: `population_size` random individuals
    pub fn new<R: Rng>(context: EvolutionContext<'a>, stats: &mut Stats, rng: &mut R) -> Result<Self> {
        let config = context.config;
        let generation = (0..config.population_size)
            .map(|_| Individual::genesis(&context, stats, rng))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Genesis created {} individuals", generation.len());

        Ok(Self {
            context,
            generation,
            offspring: Vec::new(),
            best_individual: None,
            selection: Selection::new(config.selection_type, config.k_value),
            recombination: Recombination::new(config.recombination_type),
            replacement: Replacement::new(config.replacement_type),
        })
    }

    pub fn generation(&self) -> &[Individual] {
        &self.generation
    }

    /// Install `generation`, sorted best first so its leader is the champion candidate
    pub fn set_generation(&mut self, mut generation: Vec<Individual>) {
        sort_by_fitness(&mut generation);
        self.generation = generation;
    }

    pub fn best_individual(&self) -> Option<&Individual> {
        self.best_individual.as_ref()
    }

    /// Keep the leading individual of the generation if it strictly beats the best so far
    pub fn best_challenge(&mut self) {
        let Some(leader) = self.generation.first() else {
            return;
        };

        let improved = match &self.best_individual {
            Some(best) => leader.fitness() > best.fitness(),
            None => true,
        };
        if improved {
            self.best_individual = Some(leader.clone());
        }
    }

    /// Run `max_generations` rounds of selection, recombination and
    /// replacement, then record the run's best individual in `stats`.
    pub fn evolve<R: Rng, C: ProgressCallback>(
        &mut self,
        stats: &mut Stats,
        rng: &mut R,
        callback: &mut C,
    ) -> Result<Individual> {
        log::info!("Evolution taking place, please wait...");

        for generation in 0..self.context.config.max_generations {
            callback.on_generation_start(generation);

            let mating_pool = self.selection.select(&self.generation, rng)?;
            self.offspring = self.recombination.recombine(
                &self.context,
                stats,
                &mating_pool,
                self.generation.len(),
                rng,
            )?;

            self.replacement.replace(&mut self.generation, &mut self.offspring);
            self.best_challenge();

            let best_fitness = self.best_individual.as_ref().map_or(0.0, Individual::fitness);
            callback.on_generation_complete(generation, best_fitness, self.generation.len());
        }

        if self.best_individual.is_none() {
            sort_by_fitness(&mut self.generation);
            self.best_challenge();
        }

        let best = self
            .best_individual
            .clone()
            .ok_or_else(|| PatternError::Evaluation("Population is empty".to_string()))?;

        log::info!("Best candidate found on this run: {}", best);

        stats.add_most_fitted(best.clone());
        stats.add_mbf(best.fitness());
        stats.add_sr(best.fitness() > self.context.config.success_threshold);

        Ok(best)
    }
}
