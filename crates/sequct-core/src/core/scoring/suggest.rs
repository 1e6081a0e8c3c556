use super::profile::ProfileModel;
use crate::core::sequence::mutation::{Mutation, MutationError};
use crate::core::sequence::protein::ProteinSequence;
use crate::core::sequence::variants::{MutationRange, single_mutants};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MutationSuggestion {
    pub mutation: Mutation,
    pub fitness: f64,
    /// Fitness change relative to the wild-type sequence.
    pub gain: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionSuggestion {
    pub position: usize,
    /// Mean gain over the beneficial mutants at this position.
    pub mean_gain: f64,
    pub beneficial_mutants: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestions {
    pub wild_type_fitness: f64,
    pub mutants: Vec<MutationSuggestion>,
    pub positions: Vec<PositionSuggestion>,
}

/// Ranks the single mutants of `sequence` by predicted fitness gain.
///
/// Positions are ranked by the mean gain of their beneficial mutants; positions
/// without a single beneficial mutant are left out.
pub fn suggest_mutations(
    sequence: &ProteinSequence,
    model: &ProfileModel,
    top_n: usize,
    range: MutationRange,
) -> Result<Suggestions, MutationError> {
    let wild_type_fitness = model.score(sequence);

    let mut mutants: Vec<MutationSuggestion> = single_mutants(sequence, range)?
        .into_iter()
        .map(|(mutation, mutated)| {
            let fitness = model.score(&mutated);
            MutationSuggestion {
                mutation,
                fitness,
                gain: fitness - wild_type_fitness,
            }
        })
        .collect();

    let mut per_position: BTreeMap<usize, (f64, usize)> = BTreeMap::new();
    for suggestion in mutants.iter().filter(|s| s.gain > 0.0) {
        let entry = per_position
            .entry(suggestion.mutation.position)
            .or_insert((0.0, 0));
        entry.0 += suggestion.gain;
        entry.1 += 1;
    }

    let mut positions: Vec<PositionSuggestion> = per_position
        .into_iter()
        .map(|(position, (total, count))| PositionSuggestion {
            position,
            mean_gain: total / count as f64,
            beneficial_mutants: count,
        })
        .collect();

    mutants.sort_by(|a, b| b.gain.partial_cmp(&a.gain).unwrap_or(Ordering::Equal));
    mutants.truncate(top_n);
    positions.sort_by(|a, b| {
        b.mean_gain
            .partial_cmp(&a.mean_gain)
            .unwrap_or(Ordering::Equal)
    });
    positions.truncate(top_n);

    Ok(Suggestions {
        wild_type_fitness,
        mutants,
        positions,
    })
}
