use patterngen::{
    config::GrammarConfig,
    data::{Doc, FeatureSource, SimpleFeatureSource},
    engines::evaluation::{PatternMatcher, RuleMatcher},
    engines::generation::{Decoder, Genome, GrammarBuilder},
    types::{Span, TokenPattern},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

const SAMPLES: [&str; 4] = ["I am a raccoon!", "You are a cat!", "Is she a rabbit?", "This is a test"];

fn samples() -> Vec<Doc> {
    let texts: Vec<String> = SAMPLES.iter().map(|s| s.to_string()).collect();
    SimpleFeatureSource::new().annotate_all(&texts).unwrap()
}

fn pattern(value: serde_json::Value) -> Vec<TokenPattern> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_rendered_booleans_and_lengths_match() {
    let docs = samples();
    let matcher = RuleMatcher::new();

    let spans = matcher
        .find_matches(&pattern(json!([{"LOWER": "a"}, {}, {"IS_PUNCT": "true"}])), &docs[0])
        .unwrap();
    assert_eq!(spans, vec![Span::new(2, 5)]);

    let spans = matcher
        .find_matches(&pattern(json!([{"LENGTH": "4"}])), &docs[3])
        .unwrap();
    assert_eq!(spans, vec![Span::new(0, 1), Span::new(3, 4)]);
}

#[test]
fn test_spans_are_sorted_and_distinct() {
    let docs = samples();
    let spans = RuleMatcher::new()
        .find_matches(&pattern(json!([{"OP": "*"}, {"IS_ALPHA": "true"}])), &docs[1])
        .unwrap();

    let mut expected = spans.clone();
    expected.sort();
    expected.dedup();
    assert_eq!(spans, expected);
    assert!(spans.iter().all(|span| span.start < span.end));
    assert!(spans.contains(&Span::new(0, 4)));
}

#[test]
fn test_whole_sample_match() {
    let docs = samples();
    let spans = RuleMatcher::new()
        .find_matches(
            &pattern(json!([
                {"TEXT": "This"},
                {"TEXT": "is"},
                {"TEXT": "a"},
                {"SHAPE": "xxxx"}
            ])),
            &docs[3],
        )
        .unwrap();

    assert_eq!(spans, vec![Span::new(0, 4)]);
    assert!(spans[0].covers(docs[3].len()));
}

#[test]
fn test_every_decoded_phenotype_is_understood() {
    let docs = samples();
    let source = SimpleFeatureSource::new();
    let matcher = RuleMatcher::with_custom_attributes(source.custom_attributes());
    let mut rng = StdRng::seed_from_u64(77);

    for config in [
        GrammarConfig {
            use_grammar_operators: true,
            use_token_wildcard: true,
            use_boolean_features: true,
            ..Default::default()
        },
        GrammarConfig {
            use_extended_pattern_syntax: true,
            features_per_token: 2,
            ..Default::default()
        },
        GrammarConfig {
            use_custom_attributes: true,
            ..Default::default()
        },
    ] {
        let grammar = GrammarBuilder::new(&config)
            .build(&docs, source.custom_attributes())
            .unwrap();
        let decoder = Decoder::new(&grammar, 8);

        for _ in 0..30 {
            let (_, phenotype) = decoder.decode(&Genome::random(32, &mut rng)).unwrap();
            for doc in &docs {
                assert!(
                    matcher.find_matches(&phenotype, doc).is_ok(),
                    "rejected {}",
                    serde_json::to_string(&phenotype).unwrap()
                );
            }
        }
    }
}
