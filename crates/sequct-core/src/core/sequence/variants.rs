use super::alphabet::{AA_VOCAB, AA_VOCAB_SIZE, residues};
use super::mutation::{Mutation, MutationError};
use super::protein::ProteinSequence;
use std::ops::RangeInclusive;

/// Longest extension a design may request; 20P4 is 116,280 suffixes per expansion.
pub const MAX_EXTENSION_LENGTH: usize = 4;

/// A 1-based, inclusive window of positions eligible for mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationRange {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl MutationRange {
    pub fn new(start: Option<usize>, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Resolves the window against a sequence length; open bounds default to
    /// the first and last residue.
    pub fn resolve(&self, length: usize) -> Result<RangeInclusive<usize>, MutationError> {
        let start = self.start.unwrap_or(1);
        let end = self.end.unwrap_or(length);
        if start == 0 || start > end || end > length {
            return Err(MutationError::InvalidRange { start, end, length });
        }
        Ok(start..=end)
    }
}

/// All 19 substitutions at a single 1-based position, in vocabulary order.
pub fn substitutions_at(
    sequence: &ProteinSequence,
    position: usize,
) -> Result<Vec<(Mutation, ProteinSequence)>, MutationError> {
    let wild_type = sequence
        .residue_at(position)
        .ok_or(MutationError::PositionOutOfRange {
            position,
            length: sequence.len(),
        })?;

    Ok(residues()
        .filter(|&aa| aa != wild_type)
        .map(|aa| {
            (
                Mutation::new(wild_type, position, aa),
                sequence.with_substitution(position, aa),
            )
        })
        .collect())
}

/// Every single point mutant of `sequence` inside `range`, position-major.
pub fn single_mutants(
    sequence: &ProteinSequence,
    range: MutationRange,
) -> Result<Vec<(Mutation, ProteinSequence)>, MutationError> {
    let positions = range.resolve(sequence.len())?;
    let mut mutants = Vec::with_capacity(positions.clone().count() * (AA_VOCAB_SIZE - 1));
    for position in positions {
        mutants.extend(substitutions_at(sequence, position)?);
    }
    Ok(mutants)
}

/// Ordered arrangements of `length` distinct residues drawn from the vocabulary,
/// in lexicographic vocabulary order.
pub fn extensions(length: usize) -> Vec<String> {
    if length > AA_VOCAB_SIZE {
        return Vec::new();
    }
    let vocab: Vec<char> = AA_VOCAB.chars().collect();
    let mut out = Vec::new();
    let mut used = [false; AA_VOCAB_SIZE];
    let mut current = String::with_capacity(length);
    collect_permutations(&vocab, length, &mut used, &mut current, &mut out);
    out
}

fn collect_permutations(
    vocab: &[char],
    length: usize,
    used: &mut [bool; AA_VOCAB_SIZE],
    current: &mut String,
    out: &mut Vec<String>,
) {
    if current.len() == length {
        out.push(current.clone());
        return;
    }
    for (idx, &aa) in vocab.iter().enumerate() {
        if used[idx] {
            continue;
        }
        used[idx] = true;
        current.push(aa);
        collect_permutations(vocab, length, used, current, out);
        current.pop();
        used[idx] = false;
    }
}

/// Every extension of `sequence` by `length` residues, paired with the appended suffix.
pub fn extend_sequence(
    sequence: &ProteinSequence,
    length: usize,
) -> Vec<(String, ProteinSequence)> {
    extensions(length)
        .into_iter()
        .map(|suffix| {
            let extended = sequence.with_suffix(&suffix);
            (suffix, extended)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> ProteinSequence {
        ProteinSequence::parse(s).unwrap()
    }

    #[test]
    fn resolve_defaults_to_the_whole_sequence() {
        assert_eq!(MutationRange::default().resolve(5).unwrap(), 1..=5);
        assert_eq!(MutationRange::new(Some(2), None).resolve(5).unwrap(), 2..=5);
    }

    #[test]
    fn resolve_rejects_inverted_or_out_of_bounds_ranges() {
        assert!(MutationRange::new(Some(0), None).resolve(5).is_err());
        assert!(MutationRange::new(Some(4), Some(2)).resolve(5).is_err());
        assert!(MutationRange::new(None, Some(6)).resolve(5).is_err());
    }

    #[test]
    fn substitutions_at_excludes_the_wild_type_residue() {
        let mutants = substitutions_at(&seq("MKT"), 2).unwrap();
        assert_eq!(mutants.len(), 19);
        assert!(mutants.iter().all(|(m, _)| m.wild_type == 'K' && m.mutant != 'K'));
        let (first, first_seq) = &mutants[0];
        assert_eq!(first.to_string(), "K2A");
        assert_eq!(first_seq.as_str(), "MAT");
    }

    #[test]
    fn single_mutants_covers_each_position_in_range() {
        let mutants = single_mutants(&seq("MKTA"), MutationRange::new(Some(2), Some(3))).unwrap();
        assert_eq!(mutants.len(), 2 * 19);
        assert!(mutants.iter().all(|(m, _)| (2..=3).contains(&m.position)));
    }

    #[test]
    fn extensions_are_permutations_without_repetition() {
        assert_eq!(extensions(0), vec![String::new()]);
        assert_eq!(extensions(1).len(), 20);

        let pairs = extensions(2);
        assert_eq!(pairs.len(), 20 * 19);
        assert_eq!(pairs[0], "AC");
        assert!(pairs.iter().all(|p| p.chars().nth(0) != p.chars().nth(1)));
        assert!(extensions(21).is_empty());
    }

    #[test]
    fn extend_sequence_appends_each_suffix() {
        let extended = extend_sequence(&seq("MK"), 1);
        assert_eq!(extended.len(), 20);
        assert_eq!(extended[0].0, "A");
        assert_eq!(extended[0].1.as_str(), "MKA");
        assert_eq!(extended[19].1.as_str(), "MKY");
    }
}
