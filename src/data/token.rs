use crate::types::FeatureValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token attributes the pattern matcher understands natively
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenAttribute {
    Orth,
    Text,
    Lower,
    Length,
    Pos,
    Tag,
    Dep,
    Lemma,
    Shape,
    EntType,
    IsAlpha,
    IsAscii,
    IsDigit,
    IsLower,
    IsUpper,
    IsTitle,
    IsPunct,
    IsSpace,
    IsStop,
    LikeNum,
    LikeUrl,
    LikeEmail,
}

impl TokenAttribute {
    /// Value-carrying attributes, in grammar order
    pub const BASE: [TokenAttribute; 10] = [
        TokenAttribute::Orth,
        TokenAttribute::Text,
        TokenAttribute::Lower,
        TokenAttribute::Length,
        TokenAttribute::Pos,
        TokenAttribute::Tag,
        TokenAttribute::Dep,
        TokenAttribute::Lemma,
        TokenAttribute::Shape,
        TokenAttribute::EntType,
    ];

    /// Boolean predicates, in grammar order
    pub const BOOLEAN: [TokenAttribute; 12] = [
        TokenAttribute::IsAlpha,
        TokenAttribute::IsAscii,
        TokenAttribute::IsDigit,
        TokenAttribute::IsLower,
        TokenAttribute::IsUpper,
        TokenAttribute::IsTitle,
        TokenAttribute::IsPunct,
        TokenAttribute::IsSpace,
        TokenAttribute::IsStop,
        TokenAttribute::LikeNum,
        TokenAttribute::LikeUrl,
        TokenAttribute::LikeEmail,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TokenAttribute::Orth => "ORTH",
            TokenAttribute::Text => "TEXT",
            TokenAttribute::Lower => "LOWER",
            TokenAttribute::Length => "LENGTH",
            TokenAttribute::Pos => "POS",
            TokenAttribute::Tag => "TAG",
            TokenAttribute::Dep => "DEP",
            TokenAttribute::Lemma => "LEMMA",
            TokenAttribute::Shape => "SHAPE",
            TokenAttribute::EntType => "ENT_TYPE",
            TokenAttribute::IsAlpha => "IS_ALPHA",
            TokenAttribute::IsAscii => "IS_ASCII",
            TokenAttribute::IsDigit => "IS_DIGIT",
            TokenAttribute::IsLower => "IS_LOWER",
            TokenAttribute::IsUpper => "IS_UPPER",
            TokenAttribute::IsTitle => "IS_TITLE",
            TokenAttribute::IsPunct => "IS_PUNCT",
            TokenAttribute::IsSpace => "IS_SPACE",
            TokenAttribute::IsStop => "IS_STOP",
            TokenAttribute::LikeNum => "LIKE_NUM",
            TokenAttribute::LikeUrl => "LIKE_URL",
            TokenAttribute::LikeEmail => "LIKE_EMAIL",
        }
    }

    pub fn is_boolean(&self) -> bool {
        Self::BOOLEAN.contains(self)
    }
}

impl fmt::Display for TokenAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TokenAttribute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::BASE
            .iter()
            .chain(Self::BOOLEAN.iter())
            .find(|attribute| attribute.name() == s)
            .copied()
            .ok_or(())
    }
}

/// Boolean lexical predicates of a token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFlags {
    pub is_alpha: bool,
    pub is_ascii: bool,
    pub is_digit: bool,
    pub is_lower: bool,
    pub is_upper: bool,
    pub is_title: bool,
    pub is_punct: bool,
    pub is_space: bool,
    pub is_stop: bool,
    pub like_num: bool,
    pub like_url: bool,
    pub like_email: bool,
}

/// A token annotated with linguistic features
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub orth: String,
    pub text: String,
    pub lower: String,
    pub length: usize,
    pub pos: String,
    pub tag: String,
    pub dep: String,
    pub lemma: String,
    pub shape: String,
    pub ent_type: String,
    pub flags: TokenFlags,
}

impl Token {
    pub fn attribute(&self, attribute: TokenAttribute) -> FeatureValue {
        match attribute {
            TokenAttribute::Orth => self.orth.as_str().into(),
            TokenAttribute::Text => self.text.as_str().into(),
            TokenAttribute::Lower => self.lower.as_str().into(),
            TokenAttribute::Length => self.length.into(),
            TokenAttribute::Pos => self.pos.as_str().into(),
            TokenAttribute::Tag => self.tag.as_str().into(),
            TokenAttribute::Dep => self.dep.as_str().into(),
            TokenAttribute::Lemma => self.lemma.as_str().into(),
            TokenAttribute::Shape => self.shape.as_str().into(),
            TokenAttribute::EntType => self.ent_type.as_str().into(),
            TokenAttribute::IsAlpha => self.flags.is_alpha.into(),
            TokenAttribute::IsAscii => self.flags.is_ascii.into(),
            TokenAttribute::IsDigit => self.flags.is_digit.into(),
            TokenAttribute::IsLower => self.flags.is_lower.into(),
            TokenAttribute::IsUpper => self.flags.is_upper.into(),
            TokenAttribute::IsTitle => self.flags.is_title.into(),
            TokenAttribute::IsPunct => self.flags.is_punct.into(),
            TokenAttribute::IsSpace => self.flags.is_space.into(),
            TokenAttribute::IsStop => self.flags.is_stop.into(),
            TokenAttribute::LikeNum => self.flags.like_num.into(),
            TokenAttribute::LikeUrl => self.flags.like_url.into(),
            TokenAttribute::LikeEmail => self.flags.like_email.into(),
        }
    }
}

/// An annotated sample: source text plus its ordered tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doc {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Doc {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
