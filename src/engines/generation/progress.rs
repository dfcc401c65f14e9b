/// Observer of a running search
pub trait ProgressCallback {
    fn on_run_start(&mut self, run: usize, total_runs: usize);
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, generation_size: usize);
    fn on_run_complete(&mut self, run: usize, best_fitness: f64);
}

/// Reports progress through the `log` facade
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_run_start(&mut self, run: usize, total_runs: usize) {
        log::info!("Run {}/{} starting...", run + 1, total_runs);
    }

    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, generation_size: usize) {
        log::debug!(
            "Generation {} complete. Best fitness: {:.4}, generation size: {}",
            generation + 1,
            best_fitness,
            generation_size
        );
    }

    fn on_run_complete(&mut self, run: usize, best_fitness: f64) {
        log::info!("Run {} complete. Best fitness: {:.4}", run + 1, best_fitness);
    }
}

/// Discards every notification
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_run_start(&mut self, _run: usize, _total_runs: usize) {}
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64, _generation_size: usize) {}
    fn on_run_complete(&mut self, _run: usize, _best_fitness: f64) {}
}
