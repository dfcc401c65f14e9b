use crate::error::{PatternError, Result};

/// Deterministically consumes codons, wrapping around once exhausted
#[derive(Debug)]
pub struct CodonConsumer<'a> {
    codons: &'a [u64],
    position: usize,
    wraps: usize,
}

impl<'a> CodonConsumer<'a> {
    pub fn new(codons: &'a [u64]) -> Result<Self> {
        if codons.is_empty() {
            return Err(PatternError::InvalidGenome(
                "Cannot decode an empty codon sequence".to_string(),
            ));
        }

        Ok(Self {
            codons,
            position: 0,
            wraps: 0,
        })
    }

    /// Consume next codon
    pub fn consume(&mut self) -> u64 {
        if self.position >= self.codons.len() {
            // Wrap around if codons exhausted
            self.position = 0;
            self.wraps += 1;
        }

        let codon = self.codons[self.position];
        self.position += 1;
        codon
    }

    /// Consume codon and map to choice index
    pub fn choose(&mut self, num_choices: usize) -> usize {
        let codon = self.consume();
        if num_choices == 0 {
            return 0;
        }
        (codon % num_choices as u64) as usize
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// How many times the sequence has been restarted
    pub fn wraps(&self) -> usize {
        self.wraps
    }
}
