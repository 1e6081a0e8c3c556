use super::profile::ProfileModel;
use crate::core::sequence::protein::ProteinSequence;
use std::collections::HashMap;

/// Memo of raw profile scores keyed by sequence.
///
/// Threaded through successive oracle evaluations (and across design rounds)
/// so a child's score can be derived from its parent's cached sum instead of
/// rescoring the whole sequence.
#[derive(Debug, Default, Clone)]
pub struct ScoreCache {
    raw_scores: HashMap<ProteinSequence, f64>,
    hits: u64,
    misses: u64,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sequence: &ProteinSequence) -> Option<f64> {
        self.raw_scores.get(sequence).copied()
    }

    pub fn insert(&mut self, sequence: ProteinSequence, raw_score: f64) {
        self.raw_scores.insert(sequence, raw_score);
    }

    /// Returns the cached raw score of `sequence`, computing and storing it on a miss.
    pub fn raw_score(&mut self, sequence: &ProteinSequence, model: &ProfileModel) -> f64 {
        if let Some(raw) = self.raw_scores.get(sequence) {
            self.hits += 1;
            return *raw;
        }
        self.misses += 1;
        let raw = model.raw_score(sequence);
        self.raw_scores.insert(sequence.clone(), raw);
        raw
    }

    pub fn len(&self) -> usize {
        self.raw_scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_scores.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
