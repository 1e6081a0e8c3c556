use crate::core::scoring::cache::ScoreCache;
use crate::core::scoring::profile::ProfileModel;
use crate::core::sequence::mutation::MutationSet;
use crate::core::sequence::protein::ProteinSequence;
use crate::engine::cancellation::CancellationToken;
use crate::engine::config::DesignConfig;
use crate::engine::error::EngineError;
use crate::engine::profile_oracle::{DesignMove, ProfileOracle};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::search::UctEngine;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    /// 1-based round number.
    pub round: usize,
    pub chosen_move: DesignMove,
    pub sequence: ProteinSequence,
    /// Substitutions accumulated since the initial sequence, in the order chosen.
    pub mutations: MutationSet,
    pub fitness: f64,
    /// Visits of the chosen root child when its search finished.
    pub visits: u64,
    pub tree_size: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignResult {
    pub initial: ProteinSequence,
    pub initial_fitness: f64,
    pub rounds: Vec<RoundResult>,
    pub cache_entries: usize,
    pub cache_hit_rate: f64,
}

impl DesignResult {
    /// The last chosen sequence, or the initial one if no round completed.
    pub fn final_sequence(&self) -> &ProteinSequence {
        self.rounds
            .last()
            .map(|round| &round.sequence)
            .unwrap_or(&self.initial)
    }

    /// The substitution chain leading from the initial to the final sequence.
    pub fn final_mutations(&self) -> MutationSet {
        self.rounds
            .last()
            .map(|round| round.mutations.clone())
            .unwrap_or_default()
    }

    pub fn final_fitness(&self) -> f64 {
        self.rounds
            .last()
            .map(|round| round.fitness)
            .unwrap_or(self.initial_fitness)
    }
}

/// Runs `config.rounds` successive searches, each rooted at the previous round's choice.
#[instrument(
    skip_all,
    name = "design_workflow",
    fields(initial = %initial, rounds = config.rounds)
)]
pub fn run(
    initial: &ProteinSequence,
    model: &ProfileModel,
    config: &DesignConfig,
    reporter: &ProgressReporter,
) -> Result<DesignResult, EngineError> {
    run_with_cancellation(initial, model, config, reporter, None)
}

/// Same as [`run`], stopping with [`EngineError::Cancelled`] once `token` fires.
pub fn run_with_cancellation(
    initial: &ProteinSequence,
    model: &ProfileModel,
    config: &DesignConfig,
    reporter: &ProgressReporter,
    token: Option<CancellationToken>,
) -> Result<DesignResult, EngineError> {
    config.validate()?;
    info!(
        length = initial.len(),
        profile_positions = model.len(),
        "Starting sequence design."
    );

    let mut oracle = ProfileOracle::from_config(model, config);
    let mut engine = UctEngine::new(config.search).with_reporter(reporter);
    if let Some(token) = token {
        engine = engine.with_cancellation(token);
    }

    let mut cache = ScoreCache::new();
    let initial_fitness =
        ProfileModel::fitness_from_raw(cache.raw_score(initial, model), initial.len());
    let mut current = initial.clone();
    let mut mutations = MutationSet::default();
    let mut rounds = Vec::with_capacity(config.rounds);

    for round in 1..=config.rounds {
        reporter.report(Progress::PhaseStart {
            name: "Design Round",
        });
        reporter.report(Progress::Message(format!(
            "Round {}/{} from {}",
            round, config.rounds, current
        )));

        let outcome = engine.run(&mut oracle, current, cache)?;
        cache = outcome.continuation;

        let sequence = outcome.best_state;
        let fitness = cache
            .get(&sequence)
            .map(|raw| ProfileModel::fitness_from_raw(raw, sequence.len()))
            .unwrap_or_else(|| model.score(&sequence));

        debug!(
            round,
            chosen = %outcome.best_move,
            sequence = %sequence,
            fitness,
            visits = outcome.best_visits,
            nodes = outcome.stats.node_count,
            "Design round complete."
        );

        if let DesignMove::Substitute(mutation) = &outcome.best_move {
            mutations = mutations.then(*mutation);
        }

        rounds.push(RoundResult {
            round,
            chosen_move: outcome.best_move,
            sequence: sequence.clone(),
            mutations: mutations.clone(),
            fitness,
            visits: outcome.best_visits,
            tree_size: outcome.stats.node_count,
            max_depth: outcome.stats.max_depth,
        });
        current = sequence;

        reporter.report(Progress::PhaseFinish);
    }

    let result = DesignResult {
        initial: initial.clone(),
        initial_fitness,
        rounds,
        cache_entries: cache.len(),
        cache_hit_rate: cache.hit_rate(),
    };

    info!(
        final_sequence = %result.final_sequence(),
        final_fitness = result.final_fitness(),
        "Sequence design complete."
    );
    Ok(result)
}
