use super::alphabet::is_canonical_residue;
use super::protein::ProteinSequence;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MutationError {
    #[error("Malformed mutation code '{0}', expected a code such as 'A12C'")]
    Malformed(String),
    #[error("Position {position} is out of range for a sequence of length {length}")]
    PositionOutOfRange { position: usize, length: usize },
    #[error("Target residue '{0}' is not a canonical amino acid")]
    InvalidTarget(char),
    #[error(
        "Wild-type residue '{declared}' at position {position} is inconsistent with '{actual}'"
    )]
    WildTypeMismatch {
        position: usize,
        declared: char,
        actual: char,
    },
    #[error("Invalid mutation range {start}..={end} for a sequence of length {length}")]
    InvalidRange {
        start: usize,
        end: usize,
        length: usize,
    },
}

/// A single point substitution in `A12C` notation (wild type, 1-based position, mutant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mutation {
    pub wild_type: char,
    pub position: usize,
    pub mutant: char,
}

impl Mutation {
    pub fn new(wild_type: char, position: usize, mutant: char) -> Self {
        Self {
            wild_type,
            position,
            mutant,
        }
    }
}

impl FromStr for Mutation {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let malformed = || MutationError::Malformed(code.to_string());

        let mut chars = code.chars();
        let wild_type = chars.next().ok_or_else(malformed)?;
        let mutant = chars.next_back().ok_or_else(malformed)?;
        let position: usize = chars.as_str().parse().map_err(|_| malformed())?;

        if position == 0 || !wild_type.is_ascii_alphabetic() || !mutant.is_ascii_alphabetic() {
            return Err(malformed());
        }

        Ok(Self::new(
            wild_type.to_ascii_uppercase(),
            position,
            mutant.to_ascii_uppercase(),
        ))
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.wild_type, self.position, self.mutant)
    }
}

/// An ordered chain of point mutations, written colon-separated (`A12C:D15E`).
///
/// Later mutations may revisit a position; in that case their wild type must
/// match the previous mutation's target rather than the original sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MutationSet(Vec<Mutation>);

impl MutationSet {
    pub fn new(mutations: Vec<Mutation>) -> Self {
        Self(mutations)
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new set with `mutation` appended after the existing chain.
    pub fn then(&self, mutation: Mutation) -> Self {
        let mut mutations = self.0.clone();
        mutations.push(mutation);
        Self(mutations)
    }

    /// Validates every mutation in the chain against `sequence`.
    pub fn check(&self, sequence: &ProteinSequence) -> Result<(), MutationError> {
        let length = sequence.len();

        for (idx, mutation) in self.0.iter().enumerate() {
            if mutation.position == 0 || mutation.position > length {
                return Err(MutationError::PositionOutOfRange {
                    position: mutation.position,
                    length,
                });
            }
            if !is_canonical_residue(mutation.mutant) {
                return Err(MutationError::InvalidTarget(mutation.mutant));
            }

            let actual = self.0[..idx]
                .iter()
                .rev()
                .find(|previous| previous.position == mutation.position)
                .map(|previous| previous.mutant)
                .or_else(|| sequence.residue_at(mutation.position))
                .ok_or(MutationError::PositionOutOfRange {
                    position: mutation.position,
                    length,
                })?;

            if actual != mutation.wild_type {
                return Err(MutationError::WildTypeMismatch {
                    position: mutation.position,
                    declared: mutation.wild_type,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Applies the chain to `sequence` after validating it.
    pub fn apply(&self, sequence: &ProteinSequence) -> Result<ProteinSequence, MutationError> {
        self.check(sequence)?;
        Ok(self.0.iter().fold(sequence.clone(), |seq, mutation| {
            seq.with_substitution(mutation.position, mutation.mutant)
        }))
    }
}

impl From<Mutation> for MutationSet {
    fn from(mutation: Mutation) -> Self {
        Self(vec![mutation])
    }
}

impl FromStr for MutationSet {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(MutationError::Malformed(code.to_string()));
        }
        code.split(':')
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for MutationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, mutation) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(":")?;
            }
            write!(f, "{}", mutation)?;
        }
        Ok(())
    }
}
