use crate::config::AppConfig;
use crate::data::FeatureSource;
use crate::engines::evaluation::PatternMatcher;
use crate::engines::generation::operators::sort_by_fitness;
use crate::engines::generation::{
    EvolutionContext, Grammar, GrammarBuilder, Individual, LogProgressCallback, Population,
    ProgressCallback,
};
use crate::engines::metrics::{ReportWriter, Stats};
use crate::error::{PatternError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Result of a complete search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best individual of every run, fittest first
    pub champions: Vec<Individual>,
    pub stats: Stats,
    pub grammar: Grammar,
}

impl SearchOutcome {
    pub fn best(&self) -> Option<&Individual> {
        self.champions.first()
    }
}

/// Runs `max_runs` independent evolutions over one grammar and sample set
pub struct PatternSearch<'a> {
    config: &'a AppConfig,
    source: &'a dyn FeatureSource,
    matcher: &'a dyn PatternMatcher,
}

impl<'a> PatternSearch<'a> {
    pub fn new(
        config: &'a AppConfig,
        source: &'a dyn FeatureSource,
        matcher: &'a dyn PatternMatcher,
    ) -> Self {
        Self {
            config,
            source,
            matcher,
        }
    }

    /// Custom-attribute grammars emit `_` constraints, which the matcher must understand
    fn check_custom_attributes(&self) -> Result<()> {
        if self.config.dgg.use_custom_attributes
            && self.source.custom_attributes().is_some()
            && !self.matcher.supports_custom_attributes()
        {
            return Err(PatternError::Configuration(
                "Custom attributes are enabled but the matcher cannot evaluate them; \
                 build it with the feature source's custom attributes"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn find_patterns(&self, texts: &[String]) -> Result<SearchOutcome> {
        self.find_patterns_with(texts, &mut LogProgressCallback)
    }

    pub fn find_patterns_with<C: ProgressCallback>(
        &self,
        texts: &[String],
        callback: &mut C,
    ) -> Result<SearchOutcome> {
        self.check_custom_attributes()?;

        log::info!("Building docs for {} samples...", texts.len());
        let samples = self.source.annotate_all(texts)?;

        let grammar =
            GrammarBuilder::new(&self.config.dgg).build(&samples, self.source.custom_attributes())?;

        let mut rng = match self.config.ge.seed {
            Some(seed) => {
                log::info!("Using seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let context = EvolutionContext::new(self.config, &grammar, &samples, self.matcher);
        let mut stats = Stats::new();
        let max_runs = self.config.ge.max_runs;

        log::info!("Starting execution...");
        for run in 0..max_runs {
            callback.on_run_start(run, max_runs);
            stats.reset();

            let start = Instant::now();
            let mut population = Population::new(context, &mut stats, &mut rng)?;
            let best = population.evolve(&mut stats, &mut rng, callback)?;
            stats.add_time(start.elapsed());
            stats.calculate_metrics();

            callback.on_run_complete(run, best.fitness());
        }

        log::info!("Execution report {}", serde_json::to_string(&stats.summary())?);

        if let Some(writer) = ReportWriter::from_config(&self.config.io) {
            writer.write(&stats)?;
        }

        let mut champions = stats.champions().to_vec();
        sort_by_fitness(&mut champions);

        log::info!("Best individuals for this execution:");
        for individual in &champions {
            log::info!("{}", individual);
        }

        Ok(SearchOutcome {
            champions,
            stats,
            grammar,
        })
    }
}
