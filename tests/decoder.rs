use patterngen::{
    config::GrammarConfig,
    data::{Doc, FeatureSource, SimpleFeatureSource},
    engines::generation::{Decoder, Genome, Grammar, GrammarBuilder, Production, Symbol},
    error::PatternError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLES: [&str; 4] = ["I am a raccoon!", "You are a cat!", "Is she a rabbit?", "This is a test"];

fn samples() -> Vec<Doc> {
    let texts: Vec<String> = SAMPLES.iter().map(|s| s.to_string()).collect();
    SimpleFeatureSource::new().annotate_all(&texts).unwrap()
}

fn grammar(config: &GrammarConfig) -> Grammar {
    GrammarBuilder::new(config).build(&samples(), None).unwrap()
}

#[test]
fn test_all_ones_genome() {
    let grammar = grammar(&GrammarConfig::default());
    let genome: Genome = "11111111".parse().unwrap();

    let (codons, phenotype) = Decoder::new(&grammar, 8).decode(&genome).unwrap();

    assert_eq!(codons, vec![127, 1]);
    assert_eq!(
        serde_json::to_string(&phenotype).unwrap(),
        r#"[{"TEXT":"?"},{"LOWER":"?"},{"TEXT":"?"},{"LOWER":"?"},{"TEXT":"?"}]"#
    );
}

#[test]
fn test_pinned_34_bit_genome() {
    let grammar = grammar(&GrammarConfig::default());
    let genome: Genome = "0010011000011000000010000110001010".parse().unwrap();

    let (codons, phenotype) = Decoder::new(&grammar, 8).decode(&genome).unwrap();

    assert_eq!(codons, vec![19, 6, 1, 6, 10]);
    assert_eq!(
        serde_json::to_string(&phenotype).unwrap(),
        r#"[{"TEXT":"This"},{"TEXT":"is"},{"TEXT":"a"},{"SHAPE":"xxxx"}]"#
    );
}

#[test]
fn test_decoding_is_idempotent() {
    let grammar = grammar(&GrammarConfig {
        use_grammar_operators: true,
        use_token_wildcard: true,
        features_per_token: 3,
        ..Default::default()
    });
    let decoder = Decoder::new(&grammar, 8);
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..20 {
        let genome = Genome::random(32, &mut rng);
        let first = decoder.decode(&genome).unwrap();
        for _ in 0..3 {
            assert_eq!(decoder.decode(&genome).unwrap(), first);
        }
    }
}

#[test]
fn test_every_decoded_token_is_a_map() {
    let grammar = grammar(&GrammarConfig {
        use_extended_pattern_syntax: true,
        use_boolean_features: true,
        features_per_token: 2,
        ..Default::default()
    });
    let decoder = Decoder::new(&grammar, 8);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..50 {
        let (_, phenotype) = decoder.decode(&Genome::random(32, &mut rng)).unwrap();
        assert!((4..=5).contains(&phenotype.len()));
        assert!(phenotype.iter().all(|token| !token.is_empty()));
    }
}

#[test]
fn test_extended_pattern_renders_nested_map() {
    let grammar = grammar(&GrammarConfig {
        use_extended_pattern_syntax: true,
        ..Default::default()
    });
    let text_alternatives = grammar
        .get(&Symbol::Attribute(patterngen::data::TokenAttribute::Text))
        .unwrap()
        .len();
    let xps = text_alternatives as u64 - 1;

    // Rule order: S P T F XPS IN NOT_IN EQQ GEQ LEQ GTH LTH ORTH TEXT LOWER LENGTH SHAPE.
    // First pass: P=4 tokens, T=<F>, F=<TEXT>, TEXT=<XPS>.
    // Second pass: XPS=<GEQ>, GEQ=7 (index 5).
    let mut codons = vec![0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, xps, 0, 0, 0];
    codons.extend([0, 0, 0, 0, 3, 0, 0, 0, 5]);
    // The remaining tokens take the first alternative everywhere
    codons.extend(std::iter::repeat(0).take(64));

    let phenotype = Decoder::new(&grammar, 8).translate(&codons).unwrap();
    assert_eq!(
        serde_json::to_value(&phenotype[0]).unwrap(),
        serde_json::json!({"TEXT": {">=": 7}})
    );
}

#[test]
fn test_custom_attributes_render_under_underscore() {
    let source = SimpleFeatureSource::new();
    let config = GrammarConfig {
        use_custom_attributes: true,
        ..Default::default()
    };
    let grammar = GrammarBuilder::new(&config)
        .build(&samples(), source.custom_attributes())
        .unwrap();
    let decoder = Decoder::new(&grammar, 8);
    let mut rng = StdRng::seed_from_u64(11);

    let found = (0..200).any(|_| {
        let (_, phenotype) = decoder.decode(&Genome::random(32, &mut rng)).unwrap();
        phenotype
            .iter()
            .any(|token| token.get("_").map_or(false, |custom| custom.is_object()))
    });
    assert!(found, "some genome should reach the custom attribute branch");
}

#[test]
fn test_unexpandable_grammar_is_an_error() {
    let mut grammar = Grammar::new();
    grammar.insert(Symbol::Root, vec![Production::symbol(Symbol::Pattern)]);
    grammar.insert(Symbol::Pattern, vec![Production::symbol(Symbol::Token)]);

    let result = Decoder::new(&grammar, 8).translate(&[1, 2, 3]);
    assert!(matches!(result, Err(PatternError::MalformedDerivation(_))));
}
