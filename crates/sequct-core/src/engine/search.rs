use super::cancellation::CancellationToken;
use super::config::SearchConfig;
use super::error::EngineError;
use super::ids::NodeId;
use super::oracle::{Evaluation, Oracle};
use super::progress::{Progress, ProgressReporter};
use super::tree::SearchTree;
use tracing::{debug, instrument, trace};

/// Visit statistics of one child of the root at the end of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct RootChildStats<M> {
    pub mv: M,
    pub prior: f64,
    pub visit_count: u64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats<M> {
    pub iterations: usize,
    pub node_count: usize,
    pub max_depth: usize,
    /// Root children in insertion order.
    pub root_children: Vec<RootChildStats<M>>,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome<S, M, C> {
    pub best_state: S,
    pub best_move: M,
    pub best_visits: u64,
    pub continuation: C,
    pub stats: SearchStats<M>,
}

/// Single-threaded UCT driver.
///
/// Each iteration selects a leaf by following the best `Q + U` child from the
/// root, asks the oracle for the leaf's successors and value, attaches the
/// successors, and backs the value up towards (but not into) the root.
pub struct UctEngine<'a> {
    config: SearchConfig,
    reporter: Option<&'a ProgressReporter<'a>>,
    cancellation: Option<CancellationToken>,
}

impl<'a> UctEngine<'a> {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            reporter: None,
            cancellation: None,
        }
    }

    pub fn with_reporter(mut self, reporter: &'a ProgressReporter<'a>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn report(&self, event: Progress) {
        if let Some(reporter) = self.reporter {
            reporter.report(event);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Runs the configured number of iterations from `initial_state`.
    ///
    /// The configuration is validated before the oracle is called for the first
    /// time. The returned state belongs to the most visited child of the root.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidConfiguration`] for an invalid configuration or
    ///   malformed oracle output.
    /// - [`EngineError::DeadEndReached`] when selection meets an expanded node with
    ///   no children, or when the root ends up childless.
    /// - [`EngineError::OracleFailure`] when the oracle fails.
    /// - [`EngineError::Cancelled`] when the cancellation token fires.
    #[instrument(skip_all, name = "uct_search", fields(budget = self.config.iteration_budget))]
    pub fn run<O: Oracle>(
        &self,
        oracle: &mut O,
        initial_state: O::State,
        continuation: O::Continuation,
    ) -> Result<SearchOutcome<O::State, O::Move, O::Continuation>, EngineError> {
        self.config.validate()?;
        let budget = self.config.iteration_budget;

        let mut tree: SearchTree<O::State, O::Move> = SearchTree::new(initial_state);

        self.report(Progress::TaskStart {
            total_steps: budget as u64,
        });
        let iterated = self.iterate(oracle, &mut tree, continuation);
        self.report(Progress::TaskFinish);
        let continuation = iterated?;

        let root = tree.root();
        let best = tree.most_visited_child(root)?;
        let stats = collect_stats(&tree, budget)?;
        let best_index = root_child_ids(&tree)?
            .iter()
            .position(|id| *id == best)
            .ok_or_else(|| {
                EngineError::Internal("Best child is not under the root".to_string())
            })?;
        let best_move = stats.root_children[best_index].mv.clone();
        let best_visits = stats.root_children[best_index].visit_count;

        debug!(
            nodes = stats.node_count,
            max_depth = stats.max_depth,
            best_move = ?best_move,
            best_visits,
            "Search finished."
        );

        let best_state = tree
            .into_state(best)
            .ok_or_else(|| EngineError::Internal("Best child vanished".to_string()))?;

        Ok(SearchOutcome {
            best_state,
            best_move,
            best_visits,
            continuation,
            stats,
        })
    }

    /// Runs the select, evaluate, expand and backup loop for the whole budget,
    /// returning the oracle's final continuation.
    fn iterate<O: Oracle>(
        &self,
        oracle: &mut O,
        tree: &mut SearchTree<O::State, O::Move>,
        mut continuation: O::Continuation,
    ) -> Result<O::Continuation, EngineError> {
        let budget = self.config.iteration_budget;
        let weight = self.config.exploration_weight;

        for iteration in 0..budget {
            if self.is_cancelled() {
                debug!(completed = iteration, "Search cancelled.");
                return Err(EngineError::Cancelled {
                    completed: iteration,
                    budget,
                });
            }

            let leaf = tree.select_leaf(weight)?;
            let leaf_state = tree
                .node(leaf)
                .map(|node| node.state())
                .ok_or_else(|| EngineError::Internal("Selected leaf vanished".to_string()))?;

            let Evaluation {
                candidates,
                value,
                continuation: next,
            } = oracle
                .evaluate(leaf_state, continuation)
                .map_err(EngineError::oracle)?;
            continuation = next;

            if !value.is_finite() {
                return Err(EngineError::InvalidConfiguration(format!(
                    "Oracle returned non-finite value estimate {}",
                    value
                )));
            }

            let added = tree.expand(leaf, candidates)?;
            let updated = tree.backup(leaf, value)?;
            trace!(
                iteration,
                depth = tree.depth(leaf),
                children = added,
                backed_up = updated,
                value,
                "Iteration complete."
            );

            self.report(Progress::TaskIncrement);
        }
        Ok(continuation)
    }
}

fn root_child_ids<S, M>(tree: &SearchTree<S, M>) -> Result<Vec<NodeId>, EngineError>
where
    M: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    let root = tree
        .node(tree.root())
        .ok_or_else(|| EngineError::Internal("Root vanished".to_string()))?;
    Ok(root.children().iter().map(|(_, id)| *id).collect())
}

fn collect_stats<S, M>(
    tree: &SearchTree<S, M>,
    iterations: usize,
) -> Result<SearchStats<M>, EngineError>
where
    M: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    let root = tree
        .node(tree.root())
        .ok_or_else(|| EngineError::Internal("Root vanished".to_string()))?;

    let mut root_children = Vec::with_capacity(root.children().len());
    for (mv, id) in root.children() {
        let child = tree
            .node(*id)
            .ok_or_else(|| EngineError::Internal(format!("Child {:?} vanished", id)))?;
        root_children.push(RootChildStats {
            mv: mv.clone(),
            prior: child.prior(),
            visit_count: child.visit_count(),
            total_value: child.total_value(),
        });
    }

    Ok(SearchStats {
        iterations,
        node_count: tree.len(),
        max_depth: tree.max_depth(),
        root_children,
    })
}

/// Runs a UCT search with the default exploration weight.
///
/// Returns the state of the most visited root child together with the final
/// continuation produced by the oracle.
pub fn search<O: Oracle>(
    initial_state: O::State,
    iteration_budget: usize,
    oracle: &mut O,
    continuation: O::Continuation,
) -> Result<(O::State, O::Continuation), EngineError> {
    let engine = UctEngine::new(SearchConfig::new(iteration_budget));
    let outcome = engine.run(oracle, initial_state, continuation)?;
    Ok((outcome.best_state, outcome.continuation))
}
