use super::alphabet::is_canonical_residue;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Protein sequence is empty")]
    Empty,
    #[error("Invalid residue '{residue}' at position {position}")]
    InvalidResidue { residue: char, position: usize },
}

/// A validated protein sequence over the canonical amino-acid vocabulary.
///
/// Residues are stored upper-cased. Positions exposed by this type are
/// 1-based, matching conventional mutation notation (`A12C`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProteinSequence(String);

impl ProteinSequence {
    /// Parses a raw sequence string, ignoring surrounding and embedded whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for blank input and
    /// [`SequenceError::InvalidResidue`] for the first non-canonical residue.
    pub fn parse(raw: &str) -> Result<Self, SequenceError> {
        let residues: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if residues.is_empty() {
            return Err(SequenceError::Empty);
        }

        if let Some((idx, residue)) = residues
            .chars()
            .enumerate()
            .find(|(_, c)| !is_canonical_residue(*c))
        {
            return Err(SequenceError::InvalidResidue {
                residue,
                position: idx + 1,
            });
        }

        Ok(Self(residues))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Residue at a 1-based position.
    pub fn residue_at(&self, position: usize) -> Option<char> {
        if position == 0 {
            return None;
        }
        self.0.as_bytes().get(position - 1).map(|&b| b as char)
    }

    pub fn residues(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    // Callers guarantee `position` is in range and `residue` is canonical.
    pub(crate) fn with_substitution(&self, position: usize, residue: char) -> Self {
        let mut residues = self.0.clone().into_bytes();
        residues[position - 1] = residue as u8;
        Self(String::from_utf8_lossy(&residues).into_owned())
    }

    // Callers guarantee `suffix` only holds canonical residues.
    pub(crate) fn with_suffix(&self, suffix: &str) -> Self {
        let mut residues = String::with_capacity(self.0.len() + suffix.len());
        residues.push_str(&self.0);
        residues.push_str(suffix);
        Self(residues)
    }
}

impl FromStr for ProteinSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProteinSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProteinSequence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let seq = ProteinSequence::parse(" mk\ntay \n").unwrap();
        assert_eq!(seq.as_str(), "MKTAY");
        assert_eq!(seq.len(), 5);
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(ProteinSequence::parse("  \n"), Err(SequenceError::Empty));
    }

    #[test]
    fn parse_reports_first_invalid_residue_with_one_based_position() {
        assert_eq!(
            ProteinSequence::parse("MKXB"),
            Err(SequenceError::InvalidResidue {
                residue: 'X',
                position: 3
            })
        );
    }

    #[test]
    fn residue_at_uses_one_based_positions() {
        let seq: ProteinSequence = "MKT".parse().unwrap();
        assert_eq!(seq.residue_at(0), None);
        assert_eq!(seq.residue_at(1), Some('M'));
        assert_eq!(seq.residue_at(3), Some('T'));
        assert_eq!(seq.residue_at(4), None);
    }

    #[test]
    fn with_substitution_replaces_a_single_residue() {
        let seq: ProteinSequence = "MKT".parse().unwrap();
        let mutated = seq.with_substitution(2, 'A');
        assert_eq!(mutated.as_str(), "MAT");
        assert_eq!(seq.as_str(), "MKT");
    }

    #[test]
    fn with_suffix_appends_residues() {
        let seq: ProteinSequence = "MK".parse().unwrap();
        assert_eq!(seq.with_suffix("TA").as_str(), "MKTA");
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let seq: ProteinSequence = "ACDE".parse().unwrap();
        assert_eq!(seq.to_string().parse::<ProteinSequence>().unwrap(), seq);
    }
}
