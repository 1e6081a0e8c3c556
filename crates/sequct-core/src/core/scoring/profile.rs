use crate::core::sequence::alphabet::{AA_VOCAB_SIZE, residue_index};
use crate::core::sequence::protein::ProteinSequence;
use serde::Deserialize;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Upper bound on profile positions; longer than any known protein chain.
pub const MAX_PROFILE_POSITIONS: usize = 100_000;

#[derive(Debug, Deserialize, Clone)]
struct ProfileRecord {
    position: usize,
    residue: String,
    score: f64,
}

#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Unknown residue '{residue}' at profile position {position}")]
    UnknownResidue { residue: String, position: usize },
    #[error("Profile positions are 1-based, found position 0")]
    ZeroPosition,
    #[error("Profile position {position} exceeds the maximum of {max}")]
    PositionTooLarge { position: usize, max: usize },
    #[error("Non-finite score for residue '{residue}' at profile position {position}")]
    NonFiniteScore { residue: char, position: usize },
    #[error("Profile '{0}' contains no entries")]
    Empty(String),
}

/// A position-specific log-odds fitness model.
///
/// Each position holds one score per canonical residue. A sequence's fitness is
/// the mean of its per-position scores; positions beyond the profile contribute
/// zero, so longer designs are judged on the profiled prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileModel {
    weights: Vec<[f64; AA_VOCAB_SIZE]>,
}

impl ProfileModel {
    pub fn new(weights: Vec<[f64; AA_VOCAB_SIZE]>) -> Self {
        Self { weights }
    }

    /// Loads a profile from a CSV file with a `position,residue,score` header.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileLoadError`] if the file cannot be read or parsed, or if a
    /// row references an unknown residue, a position outside
    /// `1..=MAX_PROFILE_POSITIONS`, or a non-finite score.
    pub fn load(path: &Path) -> Result<Self, ProfileLoadError> {
        let label = path.to_string_lossy().to_string();
        let reader = csv::Reader::from_path(path).map_err(|e| ProfileLoadError::Csv {
            path: label.clone(),
            source: e,
        })?;
        Self::from_csv(reader, &label)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, ProfileLoadError> {
        Self::from_csv(csv::Reader::from_reader(reader), "<reader>")
    }

    fn from_csv<R: io::Read>(
        mut reader: csv::Reader<R>,
        label: &str,
    ) -> Result<Self, ProfileLoadError> {
        let mut weights: Vec<[f64; AA_VOCAB_SIZE]> = Vec::new();

        for result in reader.deserialize::<ProfileRecord>() {
            let record = result.map_err(|e| ProfileLoadError::Csv {
                path: label.to_string(),
                source: e,
            })?;

            if record.position == 0 {
                return Err(ProfileLoadError::ZeroPosition);
            }
            if record.position > MAX_PROFILE_POSITIONS {
                return Err(ProfileLoadError::PositionTooLarge {
                    position: record.position,
                    max: MAX_PROFILE_POSITIONS,
                });
            }

            let mut chars = record.residue.trim().chars();
            let residue = match (chars.next(), chars.next()) {
                (Some(c), None) => c.to_ascii_uppercase(),
                _ => {
                    return Err(ProfileLoadError::UnknownResidue {
                        residue: record.residue,
                        position: record.position,
                    });
                }
            };
            let column =
                residue_index(residue).ok_or_else(|| ProfileLoadError::UnknownResidue {
                    residue: record.residue.clone(),
                    position: record.position,
                })?;

            if !record.score.is_finite() {
                return Err(ProfileLoadError::NonFiniteScore {
                    residue,
                    position: record.position,
                });
            }

            if weights.len() < record.position {
                weights.resize(record.position, [0.0; AA_VOCAB_SIZE]);
            }
            weights[record.position - 1][column] = record.score;
        }

        if weights.is_empty() {
            return Err(ProfileLoadError::Empty(label.to_string()));
        }
        Ok(Self { weights })
    }

    /// Number of profiled positions.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Score of `residue` at a 1-based `position`; zero outside the profile.
    #[inline]
    pub fn score_residue(&self, position: usize, residue: char) -> f64 {
        if position == 0 {
            return 0.0;
        }
        match (self.weights.get(position - 1), residue_index(residue)) {
            (Some(row), Some(column)) => row[column],
            _ => 0.0,
        }
    }

    /// Sum of per-position scores, the quantity cached between evaluations.
    pub fn raw_score(&self, sequence: &ProteinSequence) -> f64 {
        sequence
            .residues()
            .enumerate()
            .map(|(idx, residue)| self.score_residue(idx + 1, residue))
            .sum()
    }

    /// Mean per-residue score.
    pub fn score(&self, sequence: &ProteinSequence) -> f64 {
        Self::fitness_from_raw(self.raw_score(sequence), sequence.len())
    }

    #[inline]
    pub fn fitness_from_raw(raw_score: f64, length: usize) -> f64 {
        if length == 0 {
            0.0
        } else {
            raw_score / length as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "position,residue,score\n1,M,2.0\n1,A,-1.0\n2,K,1.5\n3,t,0.5\n";

    fn seq(s: &str) -> ProteinSequence {
        ProteinSequence::parse(s).unwrap()
    }

    #[test]
    fn from_reader_builds_profile_with_missing_cells_as_zero() {
        let model = ProfileModel::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(model.len(), 3);
        assert_eq!(model.score_residue(1, 'M'), 2.0);
        assert_eq!(model.score_residue(1, 'A'), -1.0);
        assert_eq!(model.score_residue(1, 'C'), 0.0);
        assert_eq!(model.score_residue(3, 'T'), 0.5);
    }

    #[test]
    fn score_is_mean_of_per_position_terms() {
        let model = ProfileModel::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(model.raw_score(&seq("MKT")), 4.0);
        assert!((model.score(&seq("MKT")) - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn positions_beyond_the_profile_score_zero() {
        let model = ProfileModel::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(model.score_residue(0, 'M'), 0.0);
        assert_eq!(model.score_residue(4, 'M'), 0.0);
        assert_eq!(model.raw_score(&seq("MKTWW")), 4.0);
        assert!((model.score(&seq("MKTWW")) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn load_reads_profile_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        let model = ProfileModel::load(&path).unwrap();
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let result = ProfileModel::load(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(ProfileLoadError::Csv { .. })));
    }

    #[test]
    fn from_reader_rejects_unknown_residues() {
        let csv = "position,residue,score\n1,X,1.0\n";
        assert!(matches!(
            ProfileModel::from_reader(csv.as_bytes()),
            Err(ProfileLoadError::UnknownResidue { position: 1, .. })
        ));
    }

    #[test]
    fn from_reader_rejects_zero_position_and_empty_profiles() {
        let zero = "position,residue,score\n0,A,1.0\n";
        assert!(matches!(
            ProfileModel::from_reader(zero.as_bytes()),
            Err(ProfileLoadError::ZeroPosition)
        ));

        let empty = "position,residue,score\n";
        assert!(matches!(
            ProfileModel::from_reader(empty.as_bytes()),
            Err(ProfileLoadError::Empty(_))
        ));
    }

    #[test]
    fn from_reader_rejects_positions_past_the_bound() {
        let huge = "position,residue,score\n1000000000000,A,1.0\n";
        assert!(matches!(
            ProfileModel::from_reader(huge.as_bytes()),
            Err(ProfileLoadError::PositionTooLarge {
                position: 1_000_000_000_000,
                max: MAX_PROFILE_POSITIONS
            })
        ));

        let edge = format!("position,residue,score\n{},A,1.0\n", MAX_PROFILE_POSITIONS);
        let model = ProfileModel::from_reader(edge.as_bytes()).unwrap();
        assert_eq!(model.len(), MAX_PROFILE_POSITIONS);
    }

    #[test]
    fn from_reader_rejects_non_finite_scores() {
        let csv = "position,residue,score\n2,A,NaN\n";
        assert!(matches!(
            ProfileModel::from_reader(csv.as_bytes()),
            Err(ProfileLoadError::NonFiniteScore {
                residue: 'A',
                position: 2
            })
        ));
    }
}
