pub mod connectors;
pub mod feature_source;
pub mod token;

pub use connectors::TextConnector;
pub use feature_source::{CustomAttributes, FeatureSource, SimpleFeatureSource, StandardExtensions};
pub use token::{Doc, Token, TokenAttribute, TokenFlags};
