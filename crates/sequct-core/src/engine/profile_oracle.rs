use super::config::{DEFAULT_PRIOR_TEMPERATURE, DEFAULT_SEED, DesignConfig, MoveSet};
use super::oracle::{Candidate, Evaluation, Oracle};
use crate::core::scoring::cache::ScoreCache;
use crate::core::scoring::filter::CandidateFilter;
use crate::core::scoring::priors::softmax_priors;
use crate::core::scoring::profile::ProfileModel;
use crate::core::sequence::mutation::{Mutation, MutationError};
use crate::core::sequence::protein::ProteinSequence;
use crate::core::sequence::variants::{extend_sequence, single_mutants};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use thiserror::Error;
use tracing::{instrument, trace};

/// A transition between two designed sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DesignMove {
    /// Residues appended to the C terminus.
    Extend(String),
    Substitute(Mutation),
}

impl fmt::Display for DesignMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignMove::Extend(suffix) => write!(f, "+{}", suffix),
            DesignMove::Substitute(mutation) => write!(f, "{}", mutation),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileOracleError {
    #[error("Cannot enumerate candidate mutations: {0}")]
    Mutation(#[from] MutationError),
}

/// Oracle that scores sequences with a [`ProfileModel`].
///
/// The value of a state is its fitness (mean per-residue profile score). Child
/// scores are derived from the parent's cached raw score, so each expansion
/// touches only the residues that changed. The [`ScoreCache`] continuation keeps
/// those raw scores across evaluations and across searches.
pub struct ProfileOracle<'m> {
    model: &'m ProfileModel,
    move_set: MoveSet,
    filter: CandidateFilter,
    prior_temperature: f64,
    rng: StdRng,
}

impl<'m> ProfileOracle<'m> {
    pub fn new(model: &'m ProfileModel, move_set: MoveSet) -> Self {
        Self {
            model,
            move_set,
            filter: CandidateFilter::All,
            prior_temperature: DEFAULT_PRIOR_TEMPERATURE,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        }
    }

    pub fn from_config(model: &'m ProfileModel, config: &DesignConfig) -> Self {
        Self::new(model, config.move_set)
            .with_filter(config.candidate_filter)
            .with_prior_temperature(config.prior_temperature)
            .with_seed(config.seed)
    }

    pub fn with_filter(mut self, filter: CandidateFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_prior_temperature(mut self, temperature: f64) -> Self {
        self.prior_temperature = temperature;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn proposals(
        &self,
        state: &ProteinSequence,
        parent_raw: f64,
        cache: &ScoreCache,
    ) -> Result<Vec<(DesignMove, ProteinSequence, f64)>, MutationError> {
        let proposals = match self.move_set {
            MoveSet::Extend { length } => {
                let offset = state.len();
                extend_sequence(state, length)
                    .into_iter()
                    .map(|(suffix, extended)| {
                        let raw = cache.get(&extended).unwrap_or_else(|| {
                            parent_raw
                                + suffix
                                    .chars()
                                    .enumerate()
                                    .map(|(i, aa)| self.model.score_residue(offset + i + 1, aa))
                                    .sum::<f64>()
                        });
                        (DesignMove::Extend(suffix), extended, raw)
                    })
                    .collect()
            }
            MoveSet::Substitute { range } => single_mutants(state, range)?
                .into_iter()
                .map(|(mutation, mutated)| {
                    let raw = cache.get(&mutated).unwrap_or_else(|| {
                        parent_raw
                            - self.model.score_residue(mutation.position, mutation.wild_type)
                            + self.model.score_residue(mutation.position, mutation.mutant)
                    });
                    (DesignMove::Substitute(mutation), mutated, raw)
                })
                .collect(),
        };
        Ok(proposals)
    }
}

impl Oracle for ProfileOracle<'_> {
    type State = ProteinSequence;
    type Move = DesignMove;
    type Continuation = ScoreCache;
    type Error = ProfileOracleError;

    #[instrument(level = "trace", skip_all, fields(length = state.len()))]
    fn evaluate(
        &mut self,
        state: &ProteinSequence,
        continuation: ScoreCache,
    ) -> Result<Evaluation<DesignMove, ProteinSequence, ScoreCache>, ProfileOracleError> {
        let mut cache = continuation;
        let parent_raw = cache.raw_score(state, self.model);
        let value = ProfileModel::fitness_from_raw(parent_raw, state.len());

        let proposals = self.proposals(state, parent_raw, &cache)?;
        let fitness: Vec<f64> = proposals
            .iter()
            .map(|(_, seq, raw)| ProfileModel::fitness_from_raw(*raw, seq.len()))
            .collect();

        let kept = self.filter.select(&fitness, &mut self.rng);
        let kept_fitness: Vec<f64> = kept.iter().map(|&i| fitness[i]).collect();
        let priors = softmax_priors(&kept_fitness, self.prior_temperature);

        let mut proposals: Vec<Option<(DesignMove, ProteinSequence, f64)>> =
            proposals.into_iter().map(Some).collect();
        let mut candidates = Vec::with_capacity(kept.len());
        for (&index, prior) in kept.iter().zip(priors) {
            if let Some((mv, seq, raw)) = proposals[index].take() {
                cache.insert(seq.clone(), raw);
                candidates.push(Candidate::new(mv, prior, seq));
            }
        }

        trace!(
            value,
            proposed = fitness.len(),
            kept = candidates.len(),
            cached = cache.len(),
            "Evaluated sequence."
        );

        Ok(Evaluation {
            candidates,
            value,
            continuation: cache,
        })
    }
}
