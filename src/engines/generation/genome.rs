use crate::error::{PatternError, Result};
use rand::Rng;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Binary genotype of an individual.
///
/// The bit string is what the variation operators work on: crossover splices
/// two genomes at a cut point and mutation flips single bits. Before decoding,
/// the bits are transcribed into integer codons and each codon picks one
/// alternative of a grammar rule.
///
/// ```
/// use patterngen::engines::generation::Genome;
///
/// let genome: Genome = "11111111".parse().unwrap();
/// assert_eq!(genome.transcribe(8).unwrap(), vec![127, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genome {
    bits: Vec<bool>,
}

impl Genome {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Uniformly random genome of `length` bits
    pub fn random<R: Rng>(length: usize, rng: &mut R) -> Self {
        Self {
            bits: (0..length).map(|_| rng.gen::<bool>()).collect(),
        }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Split into consecutive slices of `codon_length - 1` bits (the last one
    /// may be shorter) and read each slice as a big-endian unsigned integer.
    pub fn transcribe(&self, codon_length: usize) -> Result<Vec<u64>> {
        if !(2..=65).contains(&codon_length) {
            return Err(PatternError::InvalidGenome(format!(
                "Cannot transcribe with codon length {}",
                codon_length
            )));
        }

        Ok(self
            .bits
            .chunks(codon_length - 1)
            .map(|slice| slice.iter().fold(0u64, |acc, bit| (acc << 1) | u64::from(*bit)))
            .collect())
    }

    /// Copy with every bit independently flipped with probability `probability`
    pub fn mutate<R: Rng>(&self, probability: f64, rng: &mut R) -> Self {
        Self {
            bits: self
                .bits
                .iter()
                .map(|bit| if rng.gen::<f64>() < probability { !bit } else { *bit })
                .collect(),
        }
    }

    /// Head of `self` up to `cut`, followed by the tail of `other` from `cut` on
    pub fn splice(&self, other: &Genome, cut: usize) -> Self {
        let cut = cut.min(self.len()).min(other.len());
        let mut bits = Vec::with_capacity(other.len());
        bits.extend_from_slice(&self.bits[..cut]);
        bits.extend_from_slice(&other.bits[cut..]);
        Self { bits }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Genome {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(PatternError::InvalidGenome(format!(
                    "Unexpected character '{}' in genome",
                    other
                ))),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Self::from_bits)
    }
}

impl Serialize for Genome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
