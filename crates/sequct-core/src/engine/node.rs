use super::ids::NodeId;

/// A vertex of the search tree.
///
/// Nodes only hold statistics and lookup data; every structural change goes
/// through [`SearchTree`](super::tree::SearchTree), which owns all nodes.
/// `parent` is a plain key into that arena and never implies ownership.
#[derive(Debug, Clone)]
pub struct SearchNode<S, M> {
    pub(crate) state: S,
    pub(crate) prior: f64,
    pub(crate) total_value: f64,
    pub(crate) visit_count: u64,
    pub(crate) expanded: bool,
    pub(crate) children: Vec<(M, NodeId)>,
    pub(crate) parent: Option<NodeId>,
}

impl<S, M> SearchNode<S, M> {
    pub(crate) fn new_root(state: S) -> Self {
        Self::new(state, 0.0, None)
    }

    pub(crate) fn new_child(state: S, prior: f64, parent: NodeId) -> Self {
        Self::new(state, prior, Some(parent))
    }

    fn new(state: S, prior: f64, parent: Option<NodeId>) -> Self {
        Self {
            state,
            prior,
            total_value: 0.0,
            visit_count: 0,
            expanded: false,
            children: Vec::new(),
            parent,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn prior(&self) -> f64 {
        self.prior
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn visit_count(&self) -> u64 {
        self.visit_count
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Expanded without children: selection can never pass through this node.
    pub fn is_dead_end(&self) -> bool {
        self.expanded && self.children.is_empty()
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[(M, NodeId)] {
        &self.children
    }

    pub fn child(&self, mv: &M) -> Option<NodeId>
    where
        M: PartialEq,
    {
        self.children
            .iter()
            .find(|(child_mv, _)| child_mv == mv)
            .map(|(_, id)| *id)
    }

    /// Exploitation estimate, damped by one phantom visit so unvisited nodes score zero.
    #[inline]
    pub fn q(&self) -> f64 {
        self.total_value / (1.0 + self.visit_count as f64)
    }

    /// Exploration bonus given the parent's visit count.
    #[inline]
    pub fn u(&self, parent_visits: u64, exploration_weight: f64) -> f64 {
        exploration_weight * (parent_visits as f64).sqrt() * self.prior
            / (1.0 + self.visit_count as f64)
    }

    #[inline]
    pub(crate) fn record(&mut self, value: f64) {
        self.visit_count += 1;
        self.total_value += value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_node_id(n: u64) -> NodeId {
        NodeId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_root_starts_unvisited_and_unexpanded() {
        let root: SearchNode<&str, char> = SearchNode::new_root("MK");
        assert_eq!(*root.state(), "MK");
        assert_eq!(root.prior(), 0.0);
        assert_eq!(root.visit_count(), 0);
        assert_eq!(root.total_value(), 0.0);
        assert!(root.is_root());
        assert!(!root.is_expanded());
        assert!(!root.is_dead_end());
        assert!(root.children().is_empty());
    }

    #[test]
    fn q_divides_total_value_by_visits_plus_one() {
        let mut node: SearchNode<(), char> = SearchNode::new_child((), 0.5, dummy_node_id(1));
        assert_eq!(node.q(), 0.0);

        node.record(3.0);
        assert_eq!(node.q(), 1.5);

        node.record(-6.0);
        assert_eq!(node.total_value(), -3.0);
        assert_eq!(node.q(), -1.0);
    }

    #[test]
    fn u_scales_prior_by_parent_visits_and_own_visits() {
        let mut node: SearchNode<(), char> = SearchNode::new_child((), 0.5, dummy_node_id(1));
        assert_eq!(node.u(0, 1.0), 0.0);
        assert_eq!(node.u(4, 1.0), 1.0);
        assert_eq!(node.u(4, 2.0), 2.0);

        node.record(1.0);
        assert_eq!(node.u(4, 1.0), 0.5);
    }

    #[test]
    fn statistics_are_stable_between_updates() {
        let mut node: SearchNode<(), char> = SearchNode::new_child((), 0.3, dummy_node_id(1));
        node.record(2.5);
        let (q1, u1) = (node.q(), node.u(9, 1.0));
        let (q2, u2) = (node.q(), node.u(9, 1.0));
        assert_eq!(q1, q2);
        assert_eq!(u1, u2);
    }

    #[test]
    fn child_looks_up_by_move() {
        let mut node: SearchNode<(), char> = SearchNode::new_root(());
        node.expanded = true;
        node.children.push(('A', dummy_node_id(1)));
        node.children.push(('C', dummy_node_id(2)));

        assert_eq!(node.child(&'C'), Some(dummy_node_id(2)));
        assert_eq!(node.child(&'D'), None);
    }

    #[test]
    fn expanded_node_without_children_is_a_dead_end() {
        let mut node: SearchNode<(), char> = SearchNode::new_root(());
        node.expanded = true;
        assert!(node.is_dead_end());
    }
}
