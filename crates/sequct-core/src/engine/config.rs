use crate::core::scoring::filter::CandidateFilter;
use crate::core::sequence::variants::{MAX_EXTENSION_LENGTH, MutationRange};
use thiserror::Error;

/// Weight of the exploration term; 1.0 reproduces the unweighted UCT bonus.
pub const DEFAULT_EXPLORATION_WEIGHT: f64 = 1.0;
pub const DEFAULT_PRIOR_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_SEED: u64 = 0;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub iteration_budget: usize,
    pub exploration_weight: f64,
}

impl SearchConfig {
    pub fn new(iteration_budget: usize) -> Self {
        Self {
            iteration_budget,
            exploration_weight: DEFAULT_EXPLORATION_WEIGHT,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iteration_budget == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "iteration_budget",
                reason: "must be a positive number of iterations".to_string(),
            });
        }
        if !self.exploration_weight.is_finite() || self.exploration_weight < 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "exploration_weight",
                reason: format!(
                    "must be a finite, non-negative number (got {})",
                    self.exploration_weight
                ),
            });
        }
        Ok(())
    }
}

/// How the reference oracle proposes successor sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveSet {
    /// Append `length` distinct residues to the sequence.
    Extend { length: usize },
    /// Substitute one residue inside `range`.
    Substitute { range: MutationRange },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    pub search: SearchConfig,
    pub rounds: usize,
    pub move_set: MoveSet,
    pub candidate_filter: CandidateFilter,
    pub prior_temperature: f64,
    pub seed: u64,
}

impl DesignConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        if self.rounds == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "rounds",
                reason: "at least one design round is required".to_string(),
            });
        }
        if let MoveSet::Extend { length } = self.move_set {
            if length == 0 {
                return Err(ConfigError::InvalidValue {
                    parameter: "extension_length",
                    reason: "extensions must append at least one residue".to_string(),
                });
            }
            if length > MAX_EXTENSION_LENGTH {
                return Err(ConfigError::InvalidValue {
                    parameter: "extension_length",
                    reason: format!(
                        "at most {} residues can be appended per step (got {})",
                        MAX_EXTENSION_LENGTH, length
                    ),
                });
            }
        }
        match self.candidate_filter {
            CandidateFilter::Top { limit: 0 }
            | CandidateFilter::Sample { limit: 0 }
            | CandidateFilter::Stratified { limit: 0 } => {
                return Err(ConfigError::InvalidValue {
                    parameter: "candidate_filter",
                    reason: "candidate limit must be positive".to_string(),
                });
            }
            _ => {}
        }
        if !self.prior_temperature.is_finite() || self.prior_temperature <= 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "prior_temperature",
                reason: format!(
                    "must be a finite, positive number (got {})",
                    self.prior_temperature
                ),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    iteration_budget: Option<usize>,
    exploration_weight: Option<f64>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iteration_budget(mut self, iterations: usize) -> Self {
        self.iteration_budget = Some(iterations);
        self
    }
    pub fn exploration_weight(mut self, weight: f64) -> Self {
        self.exploration_weight = Some(weight);
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let config = SearchConfig {
            iteration_budget: self
                .iteration_budget
                .ok_or(ConfigError::MissingParameter("iteration_budget"))?,
            exploration_weight: self
                .exploration_weight
                .unwrap_or(DEFAULT_EXPLORATION_WEIGHT),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Default)]
pub struct DesignConfigBuilder {
    iteration_budget: Option<usize>,
    exploration_weight: Option<f64>,
    rounds: Option<usize>,
    move_set: Option<MoveSet>,
    candidate_filter: Option<CandidateFilter>,
    prior_temperature: Option<f64>,
    seed: Option<u64>,
}

impl DesignConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iteration_budget(mut self, iterations: usize) -> Self {
        self.iteration_budget = Some(iterations);
        self
    }
    pub fn exploration_weight(mut self, weight: f64) -> Self {
        self.exploration_weight = Some(weight);
        self
    }
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = Some(rounds);
        self
    }
    pub fn move_set(mut self, move_set: MoveSet) -> Self {
        self.move_set = Some(move_set);
        self
    }
    pub fn candidate_filter(mut self, filter: CandidateFilter) -> Self {
        self.candidate_filter = Some(filter);
        self
    }
    pub fn prior_temperature(mut self, temperature: f64) -> Self {
        self.prior_temperature = Some(temperature);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DesignConfig, ConfigError> {
        let mut search = SearchConfigBuilder::new();
        if let Some(iterations) = self.iteration_budget {
            search = search.iteration_budget(iterations);
        }
        if let Some(weight) = self.exploration_weight {
            search = search.exploration_weight(weight);
        }

        let config = DesignConfig {
            search: search.build()?,
            rounds: self.rounds.ok_or(ConfigError::MissingParameter("rounds"))?,
            move_set: self
                .move_set
                .ok_or(ConfigError::MissingParameter("move_set"))?,
            candidate_filter: self.candidate_filter.unwrap_or_default(),
            prior_temperature: self
                .prior_temperature
                .unwrap_or(DEFAULT_PRIOR_TEMPERATURE),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
        };
        config.validate()?;
        Ok(config)
    }
}
