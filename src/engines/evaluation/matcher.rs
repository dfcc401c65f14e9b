use crate::data::{CustomAttributes, Doc, Token, TokenAttribute};
use crate::engines::generation::symbols::Comparison;
use crate::error::{PatternError, Result};
use crate::types::{FeatureValue, Span, TokenPattern};
use serde_json::Value;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Finds the spans of a document matched by a token pattern
pub trait PatternMatcher {
    fn find_matches(&self, pattern: &[TokenPattern], doc: &Doc) -> Result<Vec<Span>>;

    /// Whether constraints under the `_` key can be evaluated
    fn supports_custom_attributes(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantifier {
    One,
    Negate,
    Optional,
    OneOrMore,
    ZeroOrMore,
}

impl FromStr for Quantifier {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "!" => Ok(Quantifier::Negate),
            "?" => Ok(Quantifier::Optional),
            "+" => Ok(Quantifier::OneOrMore),
            "*" => Ok(Quantifier::ZeroOrMore),
            other => Err(PatternError::Matcher(format!("Unknown operator '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
enum Predicate {
    Equals(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Compare(Comparison, i64),
}

impl Predicate {
    /// Parse a constraint value: a literal, or a map of extended predicates
    fn parse(value: &Value) -> Result<Vec<Predicate>> {
        let extended = match value {
            Value::Object(extended) => extended,
            literal => return Ok(vec![Predicate::Equals(literal.clone())]),
        };

        extended
            .iter()
            .map(|(key, value)| match (key.as_str(), value) {
                ("IN", Value::Array(values)) => Ok(Predicate::In(values.clone())),
                ("NOT_IN", Value::Array(values)) => Ok(Predicate::NotIn(values.clone())),
                (operator, value) => {
                    let comparison = Comparison::from_operator(operator).ok_or_else(|| {
                        PatternError::Matcher(format!("Unknown predicate '{}'", operator))
                    })?;
                    let bound = value.as_i64().ok_or_else(|| {
                        PatternError::Matcher(format!(
                            "Predicate '{}' needs an integer, got {}",
                            operator, value
                        ))
                    })?;
                    Ok(Predicate::Compare(comparison, bound))
                }
            })
            .collect()
    }

    fn accepts(&self, actual: &FeatureValue) -> bool {
        match self {
            Predicate::Equals(expected) => value_equals(actual, expected),
            Predicate::In(values) => values.iter().any(|v| value_equals(actual, v)),
            Predicate::NotIn(values) => !values.iter().any(|v| value_equals(actual, v)),
            Predicate::Compare(comparison, bound) => match actual.as_integer() {
                Some(actual) => match comparison {
                    Comparison::Eq => actual == *bound,
                    Comparison::Ge => actual >= *bound,
                    Comparison::Le => actual <= *bound,
                    Comparison::Gt => actual > *bound,
                    Comparison::Lt => actual < *bound,
                },
                None => false,
            },
        }
    }
}

/// Token values are compared through their text form, so `"4"` matches a
/// length of 4 and `"true"` matches a set flag.
fn value_equals(actual: &FeatureValue, expected: &Value) -> bool {
    match expected {
        Value::String(text) => actual.to_string() == *text,
        Value::Number(number) => actual.to_string() == number.to_string(),
        Value::Bool(flag) => *actual == FeatureValue::Flag(*flag),
        _ => false,
    }
}

#[derive(Debug, Clone)]
enum Target {
    Attribute(TokenAttribute),
    Custom(String),
}

#[derive(Debug, Clone)]
struct Step {
    constraints: Vec<(Target, Vec<Predicate>)>,
    quantifier: Quantifier,
}

/// Rule-based matcher over annotated tokens.
///
/// Understands native attribute constraints, the `OP` quantifiers, the
/// extended predicates (`IN`, `NOT_IN`, `==`, `>=`, `<=`, `>`, `<`) and custom
/// attributes under the `_` key.
#[derive(Clone, Copy, Default)]
pub struct RuleMatcher<'a> {
    custom: Option<&'a dyn CustomAttributes>,
}

impl<'a> RuleMatcher<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_attributes(custom: Option<&'a dyn CustomAttributes>) -> Self {
        Self { custom }
    }

    fn compile(&self, pattern: &[TokenPattern]) -> Result<Vec<Step>> {
        pattern
            .iter()
            .map(|token_pattern| {
                let mut step = Step {
                    constraints: Vec::new(),
                    quantifier: Quantifier::One,
                };

                for (key, value) in token_pattern {
                    match key.as_str() {
                        "OP" => {
                            let op = value.as_str().ok_or_else(|| {
                                PatternError::Matcher(format!("Operator must be text, got {}", value))
                            })?;
                            step.quantifier = op.parse()?;
                        }
                        "_" => {
                            let custom = value.as_object().ok_or_else(|| {
                                PatternError::Matcher("Custom attributes must be a map".to_string())
                            })?;
                            if self.custom.is_none() {
                                return Err(PatternError::Matcher(
                                    "Pattern uses custom attributes but none are available".to_string(),
                                ));
                            }
                            for (name, value) in custom {
                                step.constraints
                                    .push((Target::Custom(name.clone()), Predicate::parse(value)?));
                            }
                        }
                        name => {
                            let attribute = TokenAttribute::from_str(name).map_err(|_| {
                                PatternError::Matcher(format!("Unknown token attribute '{}'", name))
                            })?;
                            step.constraints
                                .push((Target::Attribute(attribute), Predicate::parse(value)?));
                        }
                    }
                }

                Ok(step)
            })
            .collect()
    }

    fn accepts(&self, step: &Step, token: &Token) -> bool {
        step.constraints.iter().all(|(target, predicates)| {
            let actual = match target {
                Target::Attribute(attribute) => Some(token.attribute(*attribute)),
                Target::Custom(name) => self.custom.and_then(|custom| custom.get(token, name)),
            };

            match actual {
                Some(actual) => predicates.iter().all(|p| p.accepts(&actual)),
                None => false,
            }
        })
    }

    /// Positions reachable after `step` from any position in `from`.
    /// `accepted[p]` tells whether the step's constraints hold on token `p`.
    fn advance(step: &Step, accepted: &[bool], from: &BTreeSet<usize>) -> BTreeSet<usize> {
        let len = accepted.len();
        let accepts_at = |p: usize| p < len && accepted[p];
        let mut next = BTreeSet::new();

        for &pos in from {
            match step.quantifier {
                Quantifier::One => {
                    if accepts_at(pos) {
                        next.insert(pos + 1);
                    }
                }
                Quantifier::Negate => {
                    if pos < len && !accepted[pos] {
                        next.insert(pos + 1);
                    }
                }
                Quantifier::Optional => {
                    next.insert(pos);
                    if accepts_at(pos) {
                        next.insert(pos + 1);
                    }
                }
                Quantifier::ZeroOrMore | Quantifier::OneOrMore => {
                    if step.quantifier == Quantifier::ZeroOrMore {
                        next.insert(pos);
                    }
                    let mut p = pos;
                    while accepts_at(p) {
                        p += 1;
                        // The rest of this run is already collected
                        if !next.insert(p) {
                            break;
                        }
                    }
                }
            }
        }

        next
    }

    /// End positions of every match starting at `start`.
    ///
    /// The steps run as a state-set simulation: each step maps the set of
    /// positions it may start from to the set it may finish at, so the cost
    /// is polynomial in the number of steps and tokens.
    fn match_ends(steps: &[Step], table: &[Vec<bool>], start: usize) -> BTreeSet<usize> {
        let mut positions = BTreeSet::from([start]);

        for (step, accepted) in steps.iter().zip(table) {
            positions = Self::advance(step, accepted, &positions);
            if positions.is_empty() {
                break;
            }
        }

        positions
    }
}

impl PatternMatcher for RuleMatcher<'_> {
    fn supports_custom_attributes(&self) -> bool {
        self.custom.is_some()
    }

    fn find_matches(&self, pattern: &[TokenPattern], doc: &Doc) -> Result<Vec<Span>> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        let steps = self.compile(pattern)?;
        let table: Vec<Vec<bool>> = steps
            .iter()
            .map(|step| doc.tokens.iter().map(|token| self.accepts(step, token)).collect())
            .collect();
        let mut spans = BTreeSet::new();

        for start in 0..doc.len() {
            spans.extend(
                Self::match_ends(&steps, &table, start)
                    .into_iter()
                    .filter(|end| *end > start)
                    .map(|end| Span::new(start, end)),
            );
        }

        Ok(spans.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FeatureSource, SimpleFeatureSource};
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn pattern(value: Value) -> Vec<TokenPattern> {
        serde_json::from_value(value).unwrap()
    }

    fn doc(text: &str) -> Doc {
        SimpleFeatureSource::new().annotate(text).unwrap()
    }

    #[test]
    fn test_literal_match() {
        let spans = RuleMatcher::new()
            .find_matches(&pattern(json!([{"LOWER": "a"}, {"SHAPE": "xxx"}])), &doc("You are a cat!"))
            .unwrap();
        assert_eq!(spans, vec![Span::new(2, 4)]);
    }

    #[test]
    fn test_wildcard_and_length() {
        let spans = RuleMatcher::new()
            .find_matches(&pattern(json!([{}, {"LENGTH": "3"}])), &doc("You are a cat!"))
            .unwrap();
        assert_eq!(spans, vec![Span::new(0, 2), Span::new(2, 4)]);
    }

    #[test]
    fn test_quantifiers() {
        let d = doc("a a b");
        let matcher = RuleMatcher::new();

        let plus = matcher
            .find_matches(&pattern(json!([{"TEXT": "a", "OP": "+"}])), &d)
            .unwrap();
        assert_eq!(plus, vec![Span::new(0, 1), Span::new(0, 2), Span::new(1, 2)]);

        let negated = matcher
            .find_matches(&pattern(json!([{"TEXT": "a", "OP": "!"}])), &d)
            .unwrap();
        assert_eq!(negated, vec![Span::new(2, 3)]);

        let optional = matcher
            .find_matches(&pattern(json!([{"TEXT": "a", "OP": "?"}, {"TEXT": "b"}])), &d)
            .unwrap();
        assert_eq!(optional, vec![Span::new(1, 3), Span::new(2, 3)]);
    }

    #[test]
    fn test_extended_predicates() {
        let d = doc("I am a raccoon!");
        let matcher = RuleMatcher::new();

        let spans = matcher
            .find_matches(&pattern(json!([{"LENGTH": {">=": 4}}])), &d)
            .unwrap();
        assert_eq!(spans, vec![Span::new(3, 4)]);

        let spans = matcher
            .find_matches(&pattern(json!([{"TEXT": {"IN": ["I", "am"]}}])), &d)
            .unwrap();
        assert_eq!(spans, vec![Span::new(0, 1), Span::new(1, 2)]);
    }

    #[test]
    fn test_custom_attributes() {
        let source = SimpleFeatureSource::new();
        let matcher = RuleMatcher::with_custom_attributes(source.custom_attributes());
        let spans = matcher
            .find_matches(&pattern(json!([{"_": {"SUFFIX": "oon"}}])), &doc("I am a raccoon!"))
            .unwrap();
        assert_eq!(spans, vec![Span::new(3, 4)]);

        let result = RuleMatcher::new()
            .find_matches(&pattern(json!([{"_": {"SUFFIX": "oon"}}])), &doc("raccoon"));
        assert!(matches!(result, Err(PatternError::Matcher(_))));
    }

    #[test]
    fn test_unknown_attribute_errors() {
        let result = RuleMatcher::new().find_matches(&pattern(json!([{"COLOUR": "red"}])), &doc("red"));
        assert!(matches!(result, Err(PatternError::Matcher(_))));
    }

    #[test]
    fn test_many_quantified_steps_stay_fast() {
        let d = doc(&["a"; 24].join(" "));
        let steps = vec![json!({"LOWER": "a", "OP": "*"}); 12];

        let started = Instant::now();
        let spans = RuleMatcher::new().find_matches(&pattern(json!(steps)), &d).unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        // Every non-empty span of the doc
        assert_eq!(spans.len(), 24 * 25 / 2);
        assert_eq!(spans.first(), Some(&Span::new(0, 1)));
        assert_eq!(spans.last(), Some(&Span::new(23, 24)));
    }

    #[test]
    fn test_alternating_runs_over_a_long_sentence() {
        let d = doc("This is a rather long sentence , written only to give the matcher many tokens to walk over today !");
        assert!(d.len() >= 20);
        let steps: Vec<Value> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    json!({"IS_ASCII": "true", "OP": "*"})
                } else {
                    json!({"IS_ALPHA": "true", "OP": "+"})
                }
            })
            .collect();

        let started = Instant::now();
        let spans = RuleMatcher::new().find_matches(&pattern(json!(steps)), &d).unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        // The last step needs a word, so "!" can never close a match
        assert!(spans.contains(&Span::new(0, d.len() - 1)));
        assert!(!spans.contains(&Span::new(0, d.len())));
        assert!(spans.contains(&Span::new(0, 5)));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let spans = RuleMatcher::new().find_matches(&[], &doc("anything")).unwrap();
        assert!(spans.is_empty());
    }
}
