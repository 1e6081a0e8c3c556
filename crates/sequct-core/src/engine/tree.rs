use super::error::EngineError;
use super::ids::NodeId;
use super::node::SearchNode;
use super::oracle::Candidate;
use slotmap::SlotMap;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::trace;

/// Arena-backed search tree.
///
/// The slot map is the single owner of every node; nodes refer to each other
/// only through [`NodeId`] keys. Nodes are never removed while a search is
/// running, so keys handed out by the tree stay valid for its whole lifetime.
#[derive(Debug, Clone)]
pub struct SearchTree<S, M> {
    nodes: SlotMap<NodeId, SearchNode<S, M>>,
    root: NodeId,
}

impl<S, M> SearchTree<S, M>
where
    M: Clone + Eq + Hash + Debug,
{
    pub fn new(root_state: S) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SearchNode::new_root(root_state));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&SearchNode<S, M>> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn get(&self, id: NodeId) -> Result<&SearchNode<S, M>, EngineError> {
        self.nodes
            .get(id)
            .ok_or_else(|| EngineError::Internal(format!("Node {:?} is not in the tree", id)))
    }

    /// Exploitation estimate of `id`.
    pub fn q(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(id).map(SearchNode::q)
    }

    /// Exploration bonus of `id`; `None` for the root, which has no parent.
    pub fn u(&self, id: NodeId, exploration_weight: f64) -> Option<f64> {
        let node = self.nodes.get(id)?;
        let parent = self.nodes.get(node.parent?)?;
        Some(node.u(parent.visit_count, exploration_weight))
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes.get(parent).and_then(|n| n.parent);
        }
        depth
    }

    pub fn max_depth(&self) -> usize {
        self.nodes
            .keys()
            .map(|id| self.depth(id))
            .max()
            .unwrap_or(0)
    }

    /// The child of `id` maximizing `Q + U`.
    ///
    /// Children are scanned in insertion order and only a strictly greater score
    /// replaces the incumbent, so ties resolve to the earliest-inserted child.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DeadEndReached`] if `id` has no children.
    pub fn best_child(&self, id: NodeId, exploration_weight: f64) -> Result<NodeId, EngineError> {
        let node = self.get(id)?;
        let parent_visits = node.visit_count;

        let mut best: Option<(NodeId, f64)> = None;
        for (_, child_id) in &node.children {
            let child = self.get(*child_id)?;
            let score = child.q() + child.u(parent_visits, exploration_weight);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((*child_id, score)),
            }
        }

        best.map(|(child_id, _)| child_id)
            .ok_or_else(|| EngineError::DeadEndReached {
                depth: self.depth(id),
            })
    }

    /// Descends from the root through expanded nodes and returns the first
    /// unexpanded node reached.
    pub fn select_leaf(&self, exploration_weight: f64) -> Result<NodeId, EngineError> {
        let mut current = self.root;
        while self.get(current)?.expanded {
            current = self.best_child(current, exploration_weight)?;
            trace!(node = ?current, "Descended to child.");
        }
        Ok(current)
    }

    /// Attaches one child per candidate under `id`, in order, and marks it expanded.
    ///
    /// The batch is validated before the tree is touched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] for a duplicate move or a
    /// non-finite prior, and [`EngineError::Internal`] if `id` is unknown or
    /// already expanded.
    pub fn expand(
        &mut self,
        id: NodeId,
        candidates: Vec<Candidate<M, S>>,
    ) -> Result<usize, EngineError> {
        if self.get(id)?.expanded {
            return Err(EngineError::Internal(format!(
                "Node {:?} has already been expanded",
                id
            )));
        }

        let mut seen = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            if !seen.insert(&candidate.mv) {
                return Err(EngineError::InvalidConfiguration(format!(
                    "Oracle proposed move {:?} more than once in one expansion",
                    candidate.mv
                )));
            }
            if !candidate.prior.is_finite() {
                return Err(EngineError::InvalidConfiguration(format!(
                    "Oracle proposed move {:?} with non-finite prior {}",
                    candidate.mv, candidate.prior
                )));
            }
        }
        drop(seen);

        let count = candidates.len();
        let mut children = Vec::with_capacity(count);
        for Candidate { mv, prior, state } in candidates {
            let child_id = self.nodes.insert(SearchNode::new_child(state, prior, id));
            children.push((mv, child_id));
        }

        let node = &mut self.nodes[id];
        node.expanded = true;
        node.children = children;
        Ok(count)
    }

    /// Adds `value` to every node from `id` up to, but excluding, the root.
    ///
    /// Returns the number of nodes updated.
    pub fn backup(&mut self, id: NodeId, value: f64) -> Result<usize, EngineError> {
        let mut updated = 0;
        let mut current = id;
        loop {
            let node = self.nodes.get_mut(current).ok_or_else(|| {
                EngineError::Internal(format!("Backup chain broken at node {:?}", current))
            })?;
            match node.parent {
                Some(parent) => {
                    node.record(value);
                    updated += 1;
                    current = parent;
                }
                None => break,
            }
        }
        Ok(updated)
    }

    /// The child of `id` with the most visits; ties resolve to the earliest-inserted child.
    pub fn most_visited_child(&self, id: NodeId) -> Result<NodeId, EngineError> {
        let node = self.get(id)?;
        let mut best: Option<(NodeId, u64)> = None;
        for (_, child_id) in &node.children {
            let visits = self.get(*child_id)?.visit_count;
            match best {
                Some((_, best_visits)) if visits <= best_visits => {}
                _ => best = Some((*child_id, visits)),
            }
        }
        best.map(|(child_id, _)| child_id)
            .ok_or_else(|| EngineError::DeadEndReached {
                depth: self.depth(id),
            })
    }

    /// Consumes the tree and returns the state stored at `id`.
    pub fn into_state(mut self, id: NodeId) -> Option<S> {
        self.nodes.remove(id).map(|node| node.state)
    }
}
