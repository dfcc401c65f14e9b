pub mod symbols;
pub mod grammar;
pub mod grammar_builder;
pub mod genome;
pub mod codon_consumer;
pub mod decoder;
pub mod individual;
pub mod operators;
pub mod population;
pub mod progress;

pub use genome::Genome;
pub use symbols::{Comparison, Membership, Production, Symbol};
pub use grammar::Grammar;
pub use grammar_builder::{symbol_stacker, GrammarBuilder};
pub use decoder::Decoder;
pub use individual::{EvolutionContext, Individual};
pub use operators::{Recombination, Replacement, Selection};
pub use population::Population;
pub use progress::{LogProgressCallback, ProgressCallback, SilentProgressCallback};
