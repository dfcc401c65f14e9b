use super::grammar::Grammar;
use super::symbols::{Comparison, Membership, Production, Symbol};
use crate::config::GrammarConfig;
use crate::data::{CustomAttributes, Doc, TokenAttribute};
use crate::error::{PatternError, Result};
use crate::types::FeatureValue;

/// Operator terminals: negation, zero-or-one, one-or-more, zero-or-more
pub const OPERATORS: [&str; 4] = ["!", "?", "+", "*"];

/// Prefix stacks of a symbol: `X`, `X,X`, ... up to `max_length` repetitions.
///
/// The leading `min_length - 1` entries are dropped only when
/// `1 < min_length <= max_length`.
pub fn symbol_stacker(symbol: &Symbol, max_length: usize, min_length: usize) -> Vec<Production> {
    let stacks = (1..=max_length).map(|times| Production::Symbols(vec![symbol.clone(); times]));

    if 1 < min_length && min_length <= max_length {
        stacks.skip(min_length - 1).collect()
    } else {
        stacks.collect()
    }
}

/// Features observed in the samples, keyed in grammar order
#[derive(Debug, Clone, Default)]
struct FeaturesSeen {
    max_tokens: usize,
    min_tokens: usize,
    features: Vec<(Symbol, Vec<FeatureValue>)>,
    custom: Vec<(Symbol, Vec<FeatureValue>)>,
}

/// Builds a grammar that only produces the feature values seen in the samples
pub struct GrammarBuilder<'a> {
    config: &'a GrammarConfig,
}

impl<'a> GrammarBuilder<'a> {
    pub fn new(config: &'a GrammarConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, samples: &[Doc], custom: Option<&dyn CustomAttributes>) -> Result<Grammar> {
        if samples.is_empty() {
            return Err(PatternError::Grammar(
                "At least one sample is needed to generate a grammar".to_string(),
            ));
        }

        let sample_texts: Vec<&str> = samples.iter().map(|doc| doc.text.as_str()).collect();
        log::info!("Generating grammar based on the following samples: {:?}", sample_texts);

        let custom = if self.config.use_custom_attributes {
            if custom.is_none() {
                log::warn!("Custom attributes requested but the feature source provides none");
            }
            custom
        } else {
            None
        };

        let seen = self.features_seen(samples, custom);

        let mut grammar = Grammar::new();
        grammar.insert(Symbol::Root, vec![Production::symbol(Symbol::Pattern)]);

        let patterns = symbol_stacker(&Symbol::Token, seen.max_tokens, seen.min_tokens);
        if patterns.is_empty() {
            return Err(PatternError::Grammar("Samples contain no tokens".to_string()));
        }
        grammar.insert(Symbol::Pattern, patterns);

        let mut tokens = symbol_stacker(
            &Symbol::Feature,
            self.features_per_token(seen.features.len()),
            1,
        );
        if self.config.use_token_wildcard {
            tokens.push(Production::Wildcard);
        }
        grammar.insert(Symbol::Token, tokens);

        let feature_symbols: Vec<Symbol> = seen.features.iter().map(|(s, _)| s.clone()).collect();

        if self.config.use_grammar_operators {
            let mut alternatives = Vec::with_capacity(feature_symbols.len() * 2);
            for symbol in &feature_symbols {
                alternatives.push(Production::symbol(symbol.clone()));
                alternatives.push(Production::Symbols(vec![symbol.clone(), Symbol::Operator]));
            }
            grammar.insert(Symbol::Feature, alternatives);
            grammar.insert(
                Symbol::Operator,
                OPERATORS.iter().map(|op| Production::Value((*op).into())).collect(),
            );
        } else {
            grammar.insert(
                Symbol::Feature,
                feature_symbols.iter().cloned().map(Production::symbol).collect(),
            );
            if self.config.use_extended_pattern_syntax {
                self.add_extended_pattern_syntax(&mut grammar, &seen.features);
            }
        }

        for (symbol, values) in &seen.features {
            let mut alternatives: Vec<Production> =
                values.iter().cloned().map(Production::Value).collect();
            if self.config.use_extended_pattern_syntax && !self.config.use_grammar_operators {
                alternatives.push(Production::symbol(Symbol::ExtendedPattern));
            }
            grammar.insert(symbol.clone(), alternatives);
        }

        if custom.is_some() {
            self.add_custom_attributes(&mut grammar, &seen.custom);
        }

        grammar.validate()?;
        log::info!("Dynamically generated grammar:\n{}", grammar);

        Ok(grammar)
    }

    /// Effective number of features per token, given how many are available
    pub fn features_per_token(&self, available: usize) -> usize {
        match self.config.features_per_token {
            0 => available,
            wanted => wanted.min(available),
        }
    }

    fn features_seen(&self, samples: &[Doc], custom: Option<&dyn CustomAttributes>) -> FeaturesSeen {
        let max_tokens = samples.iter().map(Doc::len).max().unwrap_or(0);
        let min_tokens = samples.iter().map(Doc::len).min().unwrap_or(0);
        let tokens = || samples.iter().flat_map(|doc| doc.tokens.iter());

        let mut features: Vec<(Symbol, Vec<FeatureValue>)> = TokenAttribute::BASE
            .iter()
            .map(|attribute| {
                let values = tokens().map(|token| token.attribute(*attribute)).collect();
                (Symbol::Attribute(*attribute), self.uniques(values))
            })
            .collect();

        if self.config.use_boolean_features {
            for attribute in TokenAttribute::BOOLEAN {
                features.push((
                    Symbol::Attribute(attribute),
                    vec![FeatureValue::Flag(true), FeatureValue::Flag(false)],
                ));
            }
        }

        let custom = match custom {
            Some(custom) => custom
                .names()
                .into_iter()
                .map(|name| {
                    let mut values: Vec<FeatureValue> =
                        tokens().filter_map(|token| custom.get(token, &name)).collect();
                    values.sort();
                    values.dedup();
                    (Symbol::Custom(name), values)
                })
                .collect(),
            None => Vec::new(),
        };

        FeaturesSeen {
            max_tokens,
            min_tokens,
            features: prune(features),
            custom: prune(custom),
        }
    }

    fn uniques(&self, mut values: Vec<FeatureValue>) -> Vec<FeatureValue> {
        if self.config.use_uniques {
            values.sort();
            values.dedup();
        }
        values
    }

    fn add_extended_pattern_syntax(
        &self,
        grammar: &mut Grammar,
        features: &[(Symbol, Vec<FeatureValue>)],
    ) {
        let lengths: Vec<FeatureValue> = features
            .iter()
            .find(|(symbol, _)| *symbol == Symbol::Attribute(TokenAttribute::Length))
            .map(|(_, values)| values.clone())
            .unwrap_or_default();
        let terminal_stack = terminal_stack(features);

        let mut operators: Vec<Symbol> = Membership::ALL.into_iter().map(Symbol::Membership).collect();
        if lengths.is_empty() {
            log::warn!("No token lengths observed, numeric comparisons are left out of the grammar");
        } else {
            operators.extend(Comparison::ALL.into_iter().map(Symbol::Comparison));
        }

        grammar.insert(
            Symbol::ExtendedPattern,
            operators.iter().cloned().map(Production::symbol).collect(),
        );
        for membership in Membership::ALL {
            grammar.insert(
                Symbol::Membership(membership),
                terminal_stack.iter().cloned().map(Production::Values).collect(),
            );
        }
        if !lengths.is_empty() {
            for comparison in Comparison::ALL {
                grammar.insert(
                    Symbol::Comparison(comparison),
                    lengths.iter().cloned().map(Production::Value).collect(),
                );
            }
        }
    }

    fn add_custom_attributes(&self, grammar: &mut Grammar, custom: &[(Symbol, Vec<FeatureValue>)]) {
        if custom.is_empty() {
            log::warn!("No custom attribute values observed, custom attributes are left out");
            return;
        }

        grammar.insert(
            Symbol::Underscore,
            symbol_stacker(
                &Symbol::ExtendedFeature,
                self.features_per_token(custom.len()),
                1,
            ),
        );
        grammar.insert(
            Symbol::ExtendedFeature,
            custom.iter().map(|(s, _)| Production::symbol(s.clone())).collect(),
        );
        for (symbol, values) in custom {
            grammar.insert(
                symbol.clone(),
                values.iter().cloned().map(Production::Value).collect(),
            );
        }

        if let Some(tokens) = grammar.get_mut(&Symbol::Token) {
            tokens.push(Production::symbol(Symbol::Underscore));
            tokens.push(Production::Symbols(vec![Symbol::Feature, Symbol::Underscore]));
        }
    }
}

/// Drops features that carry no information: only empty text was observed
fn prune(features: Vec<(Symbol, Vec<FeatureValue>)>) -> Vec<(Symbol, Vec<FeatureValue>)> {
    features
        .into_iter()
        .filter(|(symbol, values)| {
            let keep = !values.iter().all(FeatureValue::is_empty_text);
            if !keep {
                log::debug!("Pruning feature {} with no observed values", symbol);
            }
            keep
        })
        .collect()
}

/// Cumulative prefixes of every feature's values, deduplicated in first-seen order
fn terminal_stack(features: &[(Symbol, Vec<FeatureValue>)]) -> Vec<Vec<FeatureValue>> {
    let mut stack: Vec<Vec<FeatureValue>> = Vec::new();

    for (_, values) in features {
        for end in 1..=values.len() {
            let prefix = values[..end].to_vec();
            if !stack.contains(&prefix) {
                stack.push(prefix);
            }
        }
    }

    stack
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(productions: &[Production]) -> Vec<String> {
        productions.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_symbol_stacker() {
        assert_eq!(
            rendered(&symbol_stacker(&Symbol::Feature, 3, 1)),
            vec!["<F>", "<F>,<F>", "<F>,<F>,<F>"]
        );
        assert_eq!(
            rendered(&symbol_stacker(&Symbol::Feature, 4, 2)),
            vec!["<F>,<F>", "<F>,<F>,<F>", "<F>,<F>,<F>,<F>"]
        );
        assert_eq!(rendered(&symbol_stacker(&Symbol::Feature, 2, 5)).len(), 2);
        assert!(symbol_stacker(&Symbol::Feature, 0, 1).is_empty());
    }

    #[test]
    fn test_features_per_token() {
        let mut config = GrammarConfig::default();
        assert_eq!(GrammarBuilder::new(&config).features_per_token(5), 1);

        config.features_per_token = 0;
        assert_eq!(GrammarBuilder::new(&config).features_per_token(5), 5);

        config.features_per_token = 9;
        assert_eq!(GrammarBuilder::new(&config).features_per_token(5), 5);
    }

    #[test]
    fn test_terminal_stack_dedups() {
        let features = vec![
            (Symbol::Feature, vec!["a".into(), "b".into()]),
            (Symbol::Token, vec!["a".into(), "c".into()]),
        ];
        let stack = terminal_stack(&features);
        assert_eq!(
            stack,
            vec![
                vec![FeatureValue::from("a")],
                vec!["a".into(), "b".into()],
                vec!["a".into(), "c".into()],
            ]
        );
    }

    #[test]
    fn test_empty_samples_error() {
        let config = GrammarConfig::default();
        let result = GrammarBuilder::new(&config).build(&[], None);
        assert!(matches!(result, Err(PatternError::Grammar(_))));
    }
}
