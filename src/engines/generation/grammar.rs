use super::symbols::{Production, Symbol};
use crate::error::{PatternError, Result};
use std::collections::HashSet;
use std::fmt;

/// Ordered BNF rule set.
///
/// Rule order is significant: the decoder walks the rules in insertion order
/// and spends one codon on each of them per pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grammar {
    rules: Vec<(Symbol, Vec<Production>)>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, replacing the alternatives of an existing one in place
    pub fn insert(&mut self, symbol: Symbol, productions: Vec<Production>) {
        match self.rules.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, existing)) => *existing = productions,
            None => self.rules.push((symbol, productions)),
        }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&[Production]> {
        self.rules
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, productions)| productions.as_slice())
    }

    pub fn get_mut(&mut self, symbol: &Symbol) -> Option<&mut Vec<Production>> {
        self.rules
            .iter_mut()
            .find(|(s, _)| s == symbol)
            .map(|(_, productions)| productions)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.get(symbol).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &[Production])> {
        self.rules.iter().map(|(s, p)| (s, p.as_slice()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.rules.iter().map(|(s, _)| s)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The root rule must have exactly one alternative made of symbols
    pub fn start(&self) -> Result<&[Symbol]> {
        match self.get(&Symbol::Root) {
            Some([Production::Symbols(symbols)]) => Ok(symbols),
            Some(_) => Err(PatternError::Grammar(
                "Root rule must have exactly one symbolic alternative".to_string(),
            )),
            None => Err(PatternError::Grammar("Grammar has no root rule".to_string())),
        }
    }

    /// Every symbol reachable from the root needs a rule with at least one alternative
    pub fn validate(&self) -> Result<()> {
        let mut pending = self.start()?.to_vec();
        let mut seen: HashSet<Symbol> = HashSet::new();

        while let Some(symbol) = pending.pop() {
            if !seen.insert(symbol.clone()) {
                continue;
            }

            let productions = self.get(&symbol).ok_or_else(|| {
                PatternError::Grammar(format!("Symbol {} is referenced but never defined", symbol))
            })?;

            if productions.is_empty() {
                return Err(PatternError::Grammar(format!(
                    "Symbol {} has no alternatives",
                    symbol
                )));
            }

            for production in productions {
                if let Production::Symbols(symbols) = production {
                    pending.extend(symbols.iter().cloned());
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, productions) in &self.rules {
            let alternatives: Vec<String> = productions.iter().map(|p| p.to_string()).collect();
            writeln!(f, "{} ::= {}", symbol, alternatives.join(" | "))?;
        }
        Ok(())
    }
}
