use super::codon_consumer::CodonConsumer;
use super::genome::Genome;
use super::grammar::Grammar;
use super::symbols::{Production, Symbol, SymbolClass};
use crate::error::{PatternError, Result};
use crate::types::{Phenotype, TokenPattern};
use serde_json::Value;

type NodeId = usize;

#[derive(Debug, Clone)]
enum EntryValue {
    Literal(Value),
    Node(NodeId),
}

#[derive(Debug, Clone)]
enum Expansion {
    /// Children spliced in place of the node
    Sequence(Vec<NodeId>),
    /// Children collected into a token constraint map
    Braced(Vec<NodeId>),
    /// Children collected into a map under the `_` key
    Underscore(Vec<NodeId>),
    /// One key/value pair of the enclosing map
    Entry { key: String, value: EntryValue },
}

impl Expansion {
    fn children(&self) -> &[NodeId] {
        match self {
            Expansion::Sequence(children)
            | Expansion::Braced(children)
            | Expansion::Underscore(children) => children,
            Expansion::Entry {
                value: EntryValue::Node(child),
                ..
            } => std::slice::from_ref(child),
            Expansion::Entry { .. } => &[],
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    symbol: Symbol,
    expansion: Option<Expansion>,
}

/// Derivation tree; pending nodes are those without an expansion
#[derive(Debug, Default)]
struct Derivation {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Derivation {
    fn new(start: &[Symbol]) -> Self {
        let mut derivation = Self::default();
        derivation.roots = derivation.add_nodes(start);
        derivation
    }

    fn add_nodes(&mut self, symbols: &[Symbol]) -> Vec<NodeId> {
        symbols
            .iter()
            .map(|symbol| {
                self.nodes.push(Node {
                    symbol: symbol.clone(),
                    expansion: None,
                });
                self.nodes.len() - 1
            })
            .collect()
    }

    /// Leftmost pending occurrence of `symbol`
    fn find_pending(&self, symbol: &Symbol) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match &node.expansion {
                None if node.symbol == *symbol => return Some(id),
                None => {}
                Some(expansion) => stack.extend(expansion.children().iter().rev()),
            }
        }

        None
    }

    fn expand(&mut self, id: NodeId, production: &Production) -> Result<()> {
        let symbol = self.nodes[id].symbol.clone();

        let expansion = match (symbol.class(), production) {
            (SymbolClass::Structural, Production::Symbols(symbols)) => {
                Expansion::Sequence(self.add_nodes(symbols))
            }
            (SymbolClass::Braced, Production::Symbols(symbols)) => {
                Expansion::Braced(self.add_nodes(symbols))
            }
            (SymbolClass::Braced, Production::Wildcard) => Expansion::Braced(Vec::new()),
            (SymbolClass::Underscore, Production::Symbols(symbols)) => {
                Expansion::Underscore(self.add_nodes(symbols))
            }
            (SymbolClass::Membership, Production::Values(values)) => Expansion::Entry {
                key: symbol.key(),
                value: EntryValue::Literal(Value::Array(
                    values.iter().map(|v| v.to_json()).collect(),
                )),
            },
            (SymbolClass::Membership, Production::Value(value))
            | (SymbolClass::Comparison, Production::Value(value)) => Expansion::Entry {
                key: symbol.key(),
                value: EntryValue::Literal(value.to_json()),
            },
            (SymbolClass::Terminal, Production::Value(value)) => Expansion::Entry {
                key: symbol.key(),
                value: EntryValue::Literal(Value::String(value.to_string())),
            },
            (SymbolClass::Terminal, Production::Symbols(symbols)) if symbols.len() == 1 => {
                let child = self.add_nodes(symbols)[0];
                Expansion::Entry {
                    key: symbol.key(),
                    value: EntryValue::Node(child),
                }
            }
            (_, production) => {
                return Err(PatternError::Grammar(format!(
                    "Symbol {} cannot expand to '{}'",
                    symbol, production
                )))
            }
        };

        self.nodes[id].expansion = Some(expansion);
        Ok(())
    }

    /// Node ids with every structural sequence spliced in place
    fn flatten(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut flat = Vec::new();
        for &id in ids {
            match &self.nodes[id].expansion {
                Some(Expansion::Sequence(children)) => flat.extend(self.flatten(children)),
                _ => flat.push(id),
            }
        }
        flat
    }

    fn into_phenotype(self) -> Result<Phenotype> {
        self.flatten(&self.roots)
            .into_iter()
            .map(|id| match &self.nodes[id].expansion {
                Some(Expansion::Braced(children)) => self.collect_map(children),
                _ => Err(self.malformed(id, "a token pattern")),
            })
            .collect()
    }

    fn collect_map(&self, children: &[NodeId]) -> Result<TokenPattern> {
        let mut map = TokenPattern::new();

        for id in self.flatten(children) {
            match &self.nodes[id].expansion {
                Some(Expansion::Entry { key, value }) => {
                    let value = match value {
                        EntryValue::Literal(literal) => literal.clone(),
                        EntryValue::Node(child) => match &self.nodes[*child].expansion {
                            Some(Expansion::Braced(nested)) => Value::Object(self.collect_map(nested)?),
                            _ => return Err(self.malformed(*child, "a nested constraint map")),
                        },
                    };
                    map.insert(key.clone(), value);
                }
                Some(Expansion::Underscore(nested)) => {
                    map.insert("_".to_string(), Value::Object(self.collect_map(nested)?));
                }
                _ => return Err(self.malformed(id, "a constraint")),
            }
        }

        Ok(map)
    }

    fn malformed(&self, id: NodeId, expected: &str) -> PatternError {
        let node = &self.nodes[id];
        match node.expansion {
            None => PatternError::MalformedDerivation(format!(
                "Symbol {} was never expanded",
                node.symbol
            )),
            Some(_) => PatternError::MalformedDerivation(format!(
                "Expected {} but found {}",
                expected, node.symbol
            )),
        }
    }
}

/// Maps genotypes to phenotypes through a grammar
pub struct Decoder<'a> {
    grammar: &'a Grammar,
    codon_length: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(grammar: &'a Grammar, codon_length: usize) -> Self {
        Self {
            grammar,
            codon_length,
        }
    }

    /// Transcribe the genome and translate its codons.
    /// Returns the codons together with the decoded phenotype.
    pub fn decode(&self, genome: &Genome) -> Result<(Vec<u64>, Phenotype)> {
        let codons = genome.transcribe(self.codon_length)?;
        let phenotype = self.translate(&codons)?;
        Ok((codons, phenotype))
    }

    /// Expand the derivation until a full pass over the grammar changes nothing.
    ///
    /// Each pass walks the rules in grammar order and spends one codon per
    /// rule; the codon picks the alternative used for the leftmost pending
    /// occurrence of that rule's symbol, or is wasted if there is none.
    pub fn translate(&self, codons: &[u64]) -> Result<Phenotype> {
        let mut consumer = CodonConsumer::new(codons)?;
        let mut derivation = Derivation::new(self.grammar.start()?);

        loop {
            let mut changed = false;

            for (symbol, productions) in self.grammar.iter() {
                let choice = consumer.choose(productions.len());

                if let Some(id) = derivation.find_pending(symbol) {
                    let production = productions.get(choice).ok_or_else(|| {
                        PatternError::Grammar(format!("Symbol {} has no alternatives", symbol))
                    })?;
                    derivation.expand(id, production)?;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        log::trace!(
            "Decoded {} codons with {} wraps",
            codons.len(),
            consumer.wraps()
        );

        derivation.into_phenotype()
    }
}
