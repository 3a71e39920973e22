//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references for efficiency,
//! cache-friendliness, and serializability.

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::core::{Action, PlayerId, PlayerMap};

/// Arena-based MCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
    root: NodeId,
}

impl MCTSTree {
    /// A tree whose root is a decision of `searcher`.
    pub fn new(searcher: PlayerId) -> Self {
        Self::with_capacity(searcher, 1024)
    }

    pub fn with_capacity(searcher: PlayerId, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.min(1 << 16));
        nodes.push(MCTSNode::root(searcher));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0 as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach a child for `mv` under `parent`.
    pub fn add_child(&mut self, parent: NodeId, mv: Action, mover: PlayerId) -> NodeId {
        let depth = self.get(parent).depth.saturating_add(1);
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(MCTSNode::new(Some(mv), parent, mover, depth));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Moves from `legal` that `node` has no child for yet.
    #[must_use]
    pub fn untried(&self, node: NodeId, legal: &[Action]) -> Vec<Action> {
        let node = self.get(node);
        legal
            .iter()
            .copied()
            .filter(|mv| !node.children.iter().any(|c| self.get(*c).mv == Some(*mv)))
            .collect()
    }

    /// Children of `node` whose move is in `legal`.
    #[must_use]
    pub fn available_children(&self, node: NodeId, legal: &[Action]) -> Vec<NodeId> {
        self.get(node)
            .children
            .iter()
            .copied()
            .filter(|c| self.get(*c).mv.is_some_and(|mv| legal.contains(&mv)))
            .collect()
    }

    /// Credit one playout to `leaf` and every ancestor.
    pub fn backpropagate(&mut self, leaf: NodeId, rewards: &PlayerMap<f64>) {
        let mut current = leaf;
        while !current.is_none() {
            let node = self.get_mut(current);
            let result = rewards[node.player_just_moved];
            node.update(result);
            current = node.parent;
        }
    }

    /// Root child with the most visits; the first one wins ties.
    #[must_use]
    pub fn most_visited_child(&self) -> Option<&MCTSNode> {
        self.get(self.root)
            .children
            .iter()
            .map(|c| self.get(*c))
            .fold(None, |best: Option<&MCTSNode>, node| match best {
                Some(b) if b.visits >= node.visits => Some(b),
                _ => Some(node),
            })
    }

    /// Visit counts of the root's children.
    #[must_use]
    pub fn root_visits(&self) -> Vec<(Action, u32)> {
        self.get(self.root)
            .children
            .iter()
            .map(|c| self.get(*c))
            .filter_map(|n| n.mv.map(|mv| (mv, n.visits)))
            .collect()
    }

    pub fn reset(&mut self, searcher: PlayerId) {
        self.nodes.clear();
        self.nodes.push(MCTSNode::root(searcher));
        self.root = NodeId::new(0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let leaf_count = self.nodes.iter().filter(|n| n.children.is_empty()).count();
        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            leaf_count,
        }
    }
}

/// Shape of a tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub leaf_count: usize,
}

impl TreeStats {
    /// Average children per internal node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let internal = self.node_count - self.leaf_count;
        if internal == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / internal as f64
        }
    }
}
