use super::token::{Doc, Token, TokenFlags};
use crate::error::Result;
use crate::types::FeatureValue;

/// Turns raw text into annotated tokens
pub trait FeatureSource {
    fn annotate(&self, text: &str) -> Result<Doc>;

    fn annotate_all(&self, texts: &[String]) -> Result<Vec<Doc>> {
        texts.iter().map(|text| self.annotate(text)).collect()
    }

    /// Additional token attributes outside the matcher's native set, if any
    fn custom_attributes(&self) -> Option<&dyn CustomAttributes> {
        None
    }
}

/// Capability set of named token attributes with per-attribute getters
pub trait CustomAttributes {
    fn names(&self) -> Vec<String>;
    fn get(&self, token: &Token, name: &str) -> Option<FeatureValue>;
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "am", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "do", "does", "for", "from", "had", "has", "have", "he", "her",
    "his", "how", "i", "if", "in", "into", "is", "it", "its", "me", "my", "no", "not", "of",
    "on", "or", "our", "she", "so", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "to", "was", "we", "were", "what", "when", "which", "who", "will", "with",
    "would", "you", "your",
];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "hundred", "thousand", "million", "billion",
];

/// Rule-based feature source.
///
/// Splits on whitespace and peels leading and trailing punctuation off every
/// chunk. No tagger or parser is involved, so POS, TAG, DEP, LEMMA and
/// ENT_TYPE stay empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFeatureSource {
    extensions: StandardExtensions,
}

impl SimpleFeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn split(text: &str) -> Vec<String> {
        let mut pieces = Vec::new();

        for chunk in text.split_whitespace() {
            let chars: Vec<char> = chunk.chars().collect();
            let mut start = 0;
            let mut end = chars.len();

            while start < end && !chars[start].is_alphanumeric() {
                pieces.push(chars[start].to_string());
                start += 1;
            }

            let mut suffixes = Vec::new();
            while end > start && !chars[end - 1].is_alphanumeric() {
                suffixes.push(chars[end - 1].to_string());
                end -= 1;
            }

            if start < end {
                pieces.push(chars[start..end].iter().collect());
            }
            pieces.extend(suffixes.into_iter().rev());
        }

        pieces
    }

    fn token(text: &str) -> Token {
        let lower = text.to_lowercase();

        Token {
            orth: text.to_string(),
            text: text.to_string(),
            lower: lower.clone(),
            length: text.chars().count(),
            shape: shape(text),
            flags: flags(text, &lower),
            ..Default::default()
        }
    }
}

impl FeatureSource for SimpleFeatureSource {
    fn annotate(&self, text: &str) -> Result<Doc> {
        Ok(Doc {
            text: text.to_string(),
            tokens: Self::split(text).iter().map(|piece| Self::token(piece)).collect(),
        })
    }

    fn custom_attributes(&self) -> Option<&dyn CustomAttributes> {
        Some(&self.extensions)
    }
}

/// Word shape: letters become X/x, digits d, other chars are kept; runs are capped at 4
pub fn shape(text: &str) -> String {
    let mut shape = String::new();
    let mut last = None;
    let mut run = 0;

    for c in text.chars() {
        let mapped = if c.is_uppercase() {
            'X'
        } else if c.is_alphabetic() {
            'x'
        } else if c.is_numeric() {
            'd'
        } else {
            c
        };

        if Some(mapped) == last {
            run += 1;
        } else {
            last = Some(mapped);
            run = 1;
        }

        if run <= 4 {
            shape.push(mapped);
        }
    }

    shape
}

fn flags(text: &str, lower: &str) -> TokenFlags {
    let non_empty = !text.is_empty();
    let has_cased = text.chars().any(|c| c.is_lowercase() || c.is_uppercase());
    let mut chars = text.chars();
    let is_title = match chars.next() {
        Some(first) => first.is_uppercase() && chars.all(|c| !c.is_uppercase()),
        None => false,
    };
    let numeric = text.replace([',', '.'], "");

    TokenFlags {
        is_alpha: non_empty && text.chars().all(char::is_alphabetic),
        is_ascii: text.is_ascii(),
        is_digit: non_empty && text.chars().all(|c| c.is_ascii_digit()),
        is_lower: has_cased && !text.chars().any(char::is_uppercase),
        is_upper: has_cased && !text.chars().any(char::is_lowercase),
        is_title,
        is_punct: non_empty && text.chars().all(|c| c.is_ascii_punctuation()),
        is_space: non_empty && text.chars().all(char::is_whitespace),
        is_stop: STOP_WORDS.contains(&lower),
        like_num: (!numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit()))
            || NUMBER_WORDS.contains(&lower),
        like_url: lower.starts_with("http://")
            || lower.starts_with("https://")
            || lower.starts_with("www."),
        like_email: match text.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        },
    }
}

/// Attributes the matcher cannot address natively, exposed under the `_` key
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardExtensions;

impl StandardExtensions {
    pub const NAMES: [&'static str; 9] = [
        "NORM",
        "PREFIX",
        "SUFFIX",
        "LANG",
        "IS_BRACKET",
        "IS_QUOTE",
        "IS_CURRENCY",
        "IS_LEFT_PUNCT",
        "IS_RIGHT_PUNCT",
    ];
}

impl CustomAttributes for StandardExtensions {
    fn names(&self) -> Vec<String> {
        Self::NAMES.iter().map(|name| name.to_string()).collect()
    }

    fn get(&self, token: &Token, name: &str) -> Option<FeatureValue> {
        let text = token.text.as_str();
        let is_one_of = |set: &str| text.chars().count() == 1 && set.contains(text);

        let value = match name {
            "NORM" => FeatureValue::from(token.lower.as_str()),
            "PREFIX" => FeatureValue::from(text.chars().take(1).collect::<String>()),
            "SUFFIX" => {
                let chars: Vec<char> = text.chars().collect();
                let skip = chars.len().saturating_sub(3);
                FeatureValue::from(chars[skip..].iter().collect::<String>())
            }
            "LANG" => FeatureValue::from("en"),
            "IS_BRACKET" => is_one_of("()[]{}").into(),
            "IS_QUOTE" => is_one_of("\"'`«»“”‘’").into(),
            "IS_CURRENCY" => is_one_of("$€£¥").into(),
            "IS_LEFT_PUNCT" => is_one_of("([{«“‘").into(),
            "IS_RIGHT_PUNCT" => is_one_of(")]}»”’").into(),
            _ => return None,
        };

        Some(value)
    }
}
