use crate::engines::generation::Individual;
use serde::Serialize;
use std::time::Duration;

/// Aggregated results of a search, one entry per run
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    #[serde(rename = "SR")]
    pub success_rate: f64,
    #[serde(rename = "MBF")]
    pub mean_best_fitness: f64,
    #[serde(rename = "AES")]
    pub average_evaluations_to_solution: f64,
    #[serde(rename = "Mean Time")]
    pub mean_time: f64,
    #[serde(rename = "Best Individual")]
    pub best_individual: Option<Individual>,
}

/// Per-run accumulators and the metrics derived from them.
///
/// Mutated only by the run that owns it: the orchestrator resets the
/// per-run state before each run and individuals report their evaluations
/// through [`Stats::record_evaluation`].
#[derive(Debug, Clone, Default)]
pub struct Stats {
    success_rate_accumulator: Vec<bool>,
    mbf_accumulator: Vec<f64>,
    aes_accumulator: Vec<usize>,
    time_accumulator: Vec<Duration>,
    most_fitted_accumulator: Vec<Individual>,
    solution_found: bool,
    aes_counter: usize,
    success_rate: f64,
    mbf: f64,
    aes: f64,
    mean_time: f64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sr(&mut self, solved: bool) {
        self.success_rate_accumulator.push(solved);
    }

    pub fn add_mbf(&mut self, fitness: f64) {
        self.mbf_accumulator.push(fitness);
    }

    pub fn add_aes(&mut self, evaluations: usize) {
        self.aes_accumulator.push(evaluations);
    }

    pub fn add_time(&mut self, elapsed: Duration) {
        self.time_accumulator.push(elapsed);
    }

    pub fn add_most_fitted(&mut self, individual: Individual) {
        self.most_fitted_accumulator.push(individual);
    }

    /// Count one evaluation towards AES while no solution has been found,
    /// and flag the run as solved once `fitness` reaches `threshold`.
    pub fn record_evaluation(&mut self, fitness: f64, threshold: f64) {
        if self.solution_found {
            return;
        }

        self.aes_counter += 1;
        if fitness >= threshold {
            log::debug!("Solution found after {} evaluations", self.aes_counter);
            self.solution_found = true;
        }
    }

    /// Start a new run: clear the solved flag and the evaluation counter
    pub fn reset(&mut self) {
        self.solution_found = false;
        self.aes_counter = 0;
    }

    pub fn solution_found(&self) -> bool {
        self.solution_found
    }

    pub fn evaluations(&self) -> usize {
        self.aes_counter
    }

    /// Close the current run's AES entry and refresh the averages
    pub fn calculate_metrics(&mut self) {
        self.add_aes(self.aes_counter);

        self.success_rate = mean(self.success_rate_accumulator.iter().map(|s| f64::from(u8::from(*s))));
        self.mbf = mean(self.mbf_accumulator.iter().copied());
        self.aes = mean(self.aes_accumulator.iter().map(|a| *a as f64));
        self.mean_time = mean(self.time_accumulator.iter().map(Duration::as_secs_f64));
    }

    /// Fittest individual across all runs; ties go to the earliest run
    pub fn most_fitted(&self) -> Option<&Individual> {
        self.most_fitted_accumulator.iter().fold(None, |best, individual| match best {
            Some(best) if best.fitness() >= individual.fitness() => Some(best),
            _ => Some(individual),
        })
    }

    /// Best individual of every run so far, in run order
    pub fn champions(&self) -> &[Individual] {
        &self.most_fitted_accumulator
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn mbf(&self) -> f64 {
        self.mbf
    }

    pub fn aes(&self) -> f64 {
        self.aes
    }

    pub fn mean_time(&self) -> f64 {
        self.mean_time
    }

    pub fn runs(&self) -> usize {
        self.mbf_accumulator.len()
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            success_rate: self.success_rate,
            mean_best_fitness: self.mbf,
            average_evaluations_to_solution: self.aes,
            mean_time: self.mean_time,
            best_individual: self.most_fitted().cloned(),
        }
    }
}

/// Arithmetic mean, 0.0 for no values
fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}
