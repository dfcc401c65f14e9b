use patterngen::config::{AppConfig, ReplacementType, SelectionType};
use patterngen::data::{Doc, FeatureSource, SimpleFeatureSource};
use patterngen::engines::evaluation::RuleMatcher;
use patterngen::engines::generation::operators::{crossover_point, sort_by_fitness};
use patterngen::engines::generation::{
    EvolutionContext, Genome, Grammar, GrammarBuilder, Individual, Population, ProgressCallback,
    Replacement, Selection,
};
use patterngen::engines::metrics::Stats;
use patterngen::error::PatternError;
use patterngen::PatternSearch;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLES: [&str; 4] = ["I am a raccoon!", "You are a cat!", "Is she a rabbit?", "This is a test"];

/// Records the best fitness reported after every generation
#[derive(Default)]
struct TestProgressCallback {
    best_fitness: Vec<f64>,
    runs_completed: usize,
}

impl ProgressCallback for TestProgressCallback {
    fn on_run_start(&mut self, _run: usize, _total_runs: usize) {}

    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, best_fitness: f64, _generation_size: usize) {
        self.best_fitness.push(best_fitness);
    }

    fn on_run_complete(&mut self, _run: usize, _best_fitness: f64) {
        self.runs_completed += 1;
    }
}

fn texts() -> Vec<String> {
    SAMPLES.iter().map(|s| s.to_string()).collect()
}

fn samples() -> Vec<Doc> {
    SimpleFeatureSource::new().annotate_all(&texts()).unwrap()
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.ge.seed = Some(2024);
    config
}

fn build_grammar(config: &AppConfig, samples: &[Doc]) -> Grammar {
    GrammarBuilder::new(&config.dgg).build(samples, None).unwrap()
}

fn random_individuals(context: &EvolutionContext, count: usize, rng: &mut StdRng) -> Vec<Individual> {
    let mut stats = Stats::new();
    (0..count)
        .map(|_| Individual::genesis(context, &mut stats, rng).unwrap())
        .collect()
}

fn is_sorted_descending(individuals: &[Individual]) -> bool {
    individuals.windows(2).all(|w| w[0].fitness() >= w[1].fitness())
}

#[test]
fn test_genesis_uses_population_size() {
    let config = test_config();
    let samples = samples();
    let grammar = build_grammar(&config, &samples);
    let matcher = RuleMatcher::new();
    let context = EvolutionContext::new(&config, &grammar, &samples, &matcher);
    let mut rng = StdRng::seed_from_u64(1);
    let mut stats = Stats::new();

    let population = Population::new(context, &mut stats, &mut rng).unwrap();

    assert_eq!(population.generation().len(), config.ge.population_size);
    assert!(population.best_individual().is_none());
    for individual in population.generation() {
        assert_eq!(individual.genome().len(), config.ge.dna_length());
        assert!((0.0..=1.0).contains(&individual.fitness()));
    }
    assert!(stats.evaluations() >= 1);
}

#[test]
fn test_mating_pool_is_one_larger_than_generation() {
    let config = test_config();
    let samples = samples();
    let grammar = build_grammar(&config, &samples);
    let matcher = RuleMatcher::new();
    let context = EvolutionContext::new(&config, &grammar, &samples, &matcher);
    let mut rng = StdRng::seed_from_u64(2);
    let generation = random_individuals(&context, 7, &mut rng);

    let pool = Selection::new(SelectionType::BinaryTournament, 3)
        .select(&generation, &mut rng)
        .unwrap();
    assert_eq!(pool.len(), 8);

    let result = Selection::new(SelectionType::BinaryTournament, 3).select(&generation[..1], &mut rng);
    assert!(matches!(result, Err(PatternError::Configuration(_))));
}

#[test]
fn test_tournament_never_pairs_an_individual_with_itself() {
    let config = test_config();
    let samples = samples();
    let grammar = build_grammar(&config, &samples);
    let matcher = RuleMatcher::new();
    let context = EvolutionContext::new(&config, &grammar, &samples, &matcher);
    let mut stats = Stats::new();

    // 0.25 against 0.0: only a self-pairing could let the weaker one win
    let stronger = Individual::evaluate(
        &context,
        &mut stats,
        "0010011000011000000010000110001010".parse().unwrap(),
    )
    .unwrap();
    let weaker = Individual::evaluate(&context, &mut stats, "11111111".parse().unwrap()).unwrap();
    assert!(stronger.fitness() > weaker.fitness());

    for generation in [vec![stronger.clone(), weaker.clone()], vec![weaker, stronger]] {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool = Selection::new(SelectionType::BinaryTournament, 3)
                .select(&generation, &mut rng)
                .unwrap();

            assert_eq!(pool.len(), 3);
            assert!(pool.iter().all(|i| i.fitness() == 0.25));
        }
    }
}

#[test]
fn test_k_tournament_is_not_implemented() {
    let config = test_config();
    let samples = samples();
    let grammar = build_grammar(&config, &samples);
    let matcher = RuleMatcher::new();
    let context = EvolutionContext::new(&config, &grammar, &samples, &matcher);
    let mut rng = StdRng::seed_from_u64(3);
    let generation = random_individuals(&context, 4, &mut rng);

    let result = Selection::new(SelectionType::KTournament, config.ge.k_value).select(&generation, &mut rng);
    match result {
        Err(PatternError::NotImplemented(message)) => assert!(message.contains("k = 3")),
        other => panic!("expected NotImplemented, got {:?}", other.map(|pool| pool.len())),
    }
}

#[test]
fn test_crossover_point_is_codon_aligned_and_interior() {
    let mut rng = StdRng::seed_from_u64(4);

    for _ in 0..500 {
        let cut = crossover_point(8, 4, &mut rng);
        assert_eq!(cut % 4, 0);
        assert!(cut > 0 && cut < 32);
    }
}

#[test]
fn test_replacement_policies_keep_generation_size() {
    let config = test_config();
    let samples = samples();
    let grammar = build_grammar(&config, &samples);
    let matcher = RuleMatcher::new();
    let context = EvolutionContext::new(&config, &grammar, &samples, &matcher);
    let mut rng = StdRng::seed_from_u64(5);

    for policy in [
        ReplacementType::MuPlusLambda,
        ReplacementType::MuLambdaWithElitism,
        ReplacementType::MuLambdaWithoutElitism,
    ] {
        let mut generation = random_individuals(&context, 10, &mut rng);
        let mut offspring = random_individuals(&context, 36, &mut rng);
        let prior_best = generation
            .iter()
            .map(Individual::fitness)
            .fold(f64::MIN, f64::max);

        Replacement::new(policy).replace(&mut generation, &mut offspring);

        assert_eq!(generation.len(), 10, "{} changed the generation size", policy);
        assert!(offspring.is_empty(), "{} left offspring behind", policy);
        assert!(is_sorted_descending(&generation), "{} left the generation unsorted", policy);

        if policy != ReplacementType::MuLambdaWithoutElitism {
            assert!(generation[0].fitness() >= prior_best);
        }
    }
}

#[test]
fn test_elitism_keeps_the_best_prior_individual() {
    let config = test_config();
    let samples = samples();
    let grammar = build_grammar(&config, &samples);
    let matcher = RuleMatcher::new();
    let context = EvolutionContext::new(&config, &grammar, &samples, &matcher);
    let mut stats = Stats::new();

    // Full sentence pattern for "This is a test" scores 0.25 on these samples
    let genome: Genome = "0010011000011000000010000110001010".parse().unwrap();
    let champion = Individual::evaluate(&context, &mut stats, genome).unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let mut generation = random_individuals(&context, 5, &mut rng);
    generation.push(champion);
    sort_by_fitness(&mut generation);
    let elite = generation[0].genome().clone();
    let mut offspring = random_individuals(&context, 20, &mut rng);

    Replacement::new(ReplacementType::MuLambdaWithElitism).replace(&mut generation, &mut offspring);

    assert_eq!(generation.len(), 6);
    assert!(generation.iter().any(|i| i.genome() == &elite));
}

#[test]
fn test_best_challenge_needs_strict_improvement() {
    let config = test_config();
    let samples = samples();
    let grammar = build_grammar(&config, &samples);
    let matcher = RuleMatcher::new();
    let context = EvolutionContext::new(&config, &grammar, &samples, &matcher);
    let mut rng = StdRng::seed_from_u64(7);
    let mut stats = Stats::new();
    let mut population = Population::new(context, &mut stats, &mut rng).unwrap();

    let first: Genome = "0010011000011000000010000110001010".parse().unwrap();
    let leader = Individual::evaluate(&context, &mut stats, first.clone()).unwrap();
    population.set_generation(vec![leader.clone()]);
    population.best_challenge();
    assert_eq!(population.best_individual().unwrap().genome(), &first);

    // A leading zero in the partial last codon keeps its value: same codons, other genome
    let mut rival_bits = first.bits()[..28].to_vec();
    rival_bits.push(false);
    rival_bits.extend_from_slice(&first.bits()[28..]);
    let rival = Individual::evaluate(&context, &mut stats, Genome::from_bits(rival_bits)).unwrap();
    assert_eq!(rival.codons(), leader.codons());
    assert_ne!(rival.genome(), &first);
    population.set_generation(vec![rival]);
    population.best_challenge();
    assert_eq!(population.best_individual().unwrap().genome(), &first);

    // Nothing in "11111111" matches any sample
    let weaker = Individual::evaluate(&context, &mut stats, "11111111".parse().unwrap()).unwrap();
    assert_eq!(weaker.fitness(), 0.0);
    population.set_generation(vec![weaker.clone(), leader.clone()]);
    assert_eq!(population.generation()[0].genome(), &first);
    population.set_generation(vec![weaker]);
    population.best_challenge();
    assert_eq!(population.best_individual().unwrap().fitness(), leader.fitness());
}

#[test]
fn test_evolve_best_fitness_never_decreases() {
    let mut config = test_config();
    config.ge.max_generations = 6;
    let samples = samples();
    let grammar = build_grammar(&config, &samples);
    let matcher = RuleMatcher::new();
    let context = EvolutionContext::new(&config, &grammar, &samples, &matcher);
    let mut rng = StdRng::seed_from_u64(8);
    let mut stats = Stats::new();
    let mut callback = TestProgressCallback::default();

    let mut population = Population::new(context, &mut stats, &mut rng).unwrap();
    let best = population.evolve(&mut stats, &mut rng, &mut callback).unwrap();

    assert_eq!(callback.best_fitness.len(), 6);
    assert!(callback.best_fitness.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(best.fitness(), *callback.best_fitness.last().unwrap());
    assert_eq!(stats.champions().len(), 1);
}

#[test]
fn test_every_replacement_policy_runs_end_to_end() {
    for policy in [
        ReplacementType::MuPlusLambda,
        ReplacementType::MuLambdaWithElitism,
        ReplacementType::MuLambdaWithoutElitism,
    ] {
        let mut config = test_config();
        config.ge.replacement_type = policy;
        let source = SimpleFeatureSource::new();
        let matcher = RuleMatcher::new();

        let outcome = PatternSearch::new(&config, &source, &matcher)
            .find_patterns(&texts())
            .unwrap();

        assert_eq!(outcome.champions.len(), 1, "{}", policy);
        assert!((0.0..=1.0).contains(&outcome.best().unwrap().fitness()));
    }
}

#[test]
fn test_search_runs_and_ranks_champions() {
    let mut config = test_config();
    config.ge.max_runs = 3;
    let source = SimpleFeatureSource::new();
    let matcher = RuleMatcher::new();
    let mut callback = TestProgressCallback::default();

    let outcome = PatternSearch::new(&config, &source, &matcher)
        .find_patterns_with(&texts(), &mut callback)
        .unwrap();

    assert_eq!(callback.runs_completed, 3);
    assert_eq!(outcome.champions.len(), 3);
    assert_eq!(outcome.stats.runs(), 3);
    assert!(is_sorted_descending(&outcome.champions));

    let expected_mbf = outcome.champions.iter().map(Individual::fitness).sum::<f64>() / 3.0;
    assert!((outcome.stats.mbf() - expected_mbf).abs() < 1e-9);
    assert!((0.0..=1.0).contains(&outcome.stats.success_rate()));
    assert!(outcome.stats.aes() >= 1.0);
}

#[test]
fn test_seeded_search_is_reproducible() {
    let config = test_config();
    let source = SimpleFeatureSource::new();
    let matcher = RuleMatcher::new();
    let search = PatternSearch::new(&config, &source, &matcher);

    let first = search.find_patterns(&texts()).unwrap();
    let second = search.find_patterns(&texts()).unwrap();

    let best_first = first.best().unwrap();
    let best_second = second.best().unwrap();
    assert_eq!(best_first.genome(), best_second.genome());
    assert_eq!(best_first.phenotype(), best_second.phenotype());
    assert_eq!(best_first.fitness(), best_second.fitness());
}

#[test]
fn test_search_without_samples_fails() {
    let config = test_config();
    let source = SimpleFeatureSource::new();
    let matcher = RuleMatcher::new();

    let result = PatternSearch::new(&config, &source, &matcher).find_patterns(&[]);
    assert!(matches!(result, Err(PatternError::Grammar(_))));
}

#[test]
fn test_custom_attributes_need_a_capable_matcher() {
    let mut config = test_config();
    config.dgg.use_custom_attributes = true;
    let source = SimpleFeatureSource::new();

    let plain = RuleMatcher::new();
    let result = PatternSearch::new(&config, &source, &plain).find_patterns(&texts());
    assert!(matches!(result, Err(PatternError::Configuration(_))));

    let capable = RuleMatcher::with_custom_attributes(source.custom_attributes());
    let outcome = PatternSearch::new(&config, &source, &capable)
        .find_patterns(&texts())
        .unwrap();
    assert_eq!(outcome.champions.len(), 1);
}
