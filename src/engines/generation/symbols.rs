use crate::data::TokenAttribute;
use crate::types::FeatureValue;
use std::fmt;

/// Extended-syntax set membership operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    In,
    NotIn,
}

/// Extended-syntax numeric comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Membership {
    pub const ALL: [Membership; 2] = [Membership::In, Membership::NotIn];

    pub fn key(&self) -> &'static str {
        match self {
            Membership::In => "IN",
            Membership::NotIn => "NOT_IN",
        }
    }
}

impl Comparison {
    pub const ALL: [Comparison; 5] = [
        Comparison::Eq,
        Comparison::Ge,
        Comparison::Le,
        Comparison::Gt,
        Comparison::Lt,
    ];

    /// Operator as written inside a token pattern
    pub fn operator(&self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
        }
    }

    pub fn from_operator(operator: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.operator() == operator)
    }

    fn name(&self) -> &'static str {
        match self {
            Comparison::Eq => "EQQ",
            Comparison::Ge => "GEQ",
            Comparison::Le => "LEQ",
            Comparison::Gt => "GTH",
            Comparison::Lt => "LTH",
        }
    }
}

/// Grammar symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Root,
    Pattern,
    Token,
    Feature,
    /// Quantifier / negation operator (`OP`)
    Operator,
    /// Extended pattern syntax container (`XPS`)
    ExtendedPattern,
    Membership(Membership),
    Comparison(Comparison),
    /// Custom attribute branch, rendered under the `_` key
    Underscore,
    /// Custom attribute container (`EF`)
    ExtendedFeature,
    Attribute(TokenAttribute),
    Custom(String),
}

/// How a symbol's chosen alternative is rendered into the derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// Raw substitution of the chosen symbols
    Structural,
    /// Wrapped into a constraint map; the wildcard gives an empty map
    Braced,
    /// Nested map under the `_` key
    Underscore,
    /// `"IN": [..]` / `"NOT_IN": [..]`
    Membership,
    /// `"==": 3` and friends
    Comparison,
    /// `"NAME": "value"`, or `"NAME": <symbol>` for symbol references
    Terminal,
}

impl Symbol {
    pub fn class(&self) -> SymbolClass {
        match self {
            Symbol::Root | Symbol::Pattern | Symbol::Feature | Symbol::ExtendedFeature => {
                SymbolClass::Structural
            }
            Symbol::Token | Symbol::ExtendedPattern => SymbolClass::Braced,
            Symbol::Underscore => SymbolClass::Underscore,
            Symbol::Membership(_) => SymbolClass::Membership,
            Symbol::Comparison(_) => SymbolClass::Comparison,
            Symbol::Operator | Symbol::Attribute(_) | Symbol::Custom(_) => SymbolClass::Terminal,
        }
    }

    /// Key used when the symbol renders as a map entry
    pub fn key(&self) -> String {
        match self {
            Symbol::Root => "S".to_string(),
            Symbol::Pattern => "P".to_string(),
            Symbol::Token => "T".to_string(),
            Symbol::Feature => "F".to_string(),
            Symbol::Operator => "OP".to_string(),
            Symbol::ExtendedPattern => "XPS".to_string(),
            Symbol::Membership(membership) => membership.key().to_string(),
            Symbol::Comparison(comparison) => comparison.operator().to_string(),
            Symbol::Underscore => "_".to_string(),
            Symbol::ExtendedFeature => "EF".to_string(),
            Symbol::Attribute(attribute) => attribute.name().to_string(),
            Symbol::Custom(name) => name.clone(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Comparison(comparison) => write!(f, "<{}>", comparison.name()),
            Symbol::Underscore => write!(f, "<UNDERSCORE>"),
            other => write!(f, "<{}>", other.key()),
        }
    }
}

/// One alternative of a grammar rule
#[derive(Debug, Clone, PartialEq)]
pub enum Production {
    /// Sequence of further symbols
    Symbols(Vec<Symbol>),
    Value(FeatureValue),
    /// List terminal, used by the membership operators
    Values(Vec<FeatureValue>),
    /// Token wildcard: matches any token
    Wildcard,
}

impl Production {
    pub fn symbol(symbol: Symbol) -> Self {
        Production::Symbols(vec![symbol])
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Production::Symbols(symbols) => {
                let joined: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", joined.join(","))
            }
            Production::Value(value) => write!(f, "{}", value),
            Production::Values(values) => {
                let json: Vec<serde_json::Value> = values.iter().map(|v| v.to_json()).collect();
                write!(f, "{}", serde_json::Value::Array(json))
            }
            Production::Wildcard => write!(f, "{{}}"),
        }
    }
}
