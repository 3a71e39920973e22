//! MCTS node structure.
//!
//! Uses arena-based allocation with index references (NodeId) for efficiency
//! and serializability.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, PlayerId};

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node of the information-set tree.
///
/// A node stands for "`mv` was just played by `player_just_moved`" across
/// every determinization that reached it, so its children are keyed by
/// action rather than by concrete state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    /// Move that led here (None for the root).
    pub mv: Option<Action>,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    pub children: SmallVec<[NodeId; 8]>,

    /// Sum of results from `player_just_moved`'s point of view.
    pub wins: f64,

    pub visits: u32,

    pub player_just_moved: PlayerId,

    /// Depth in tree (root = 0).
    pub depth: u16,
}

impl MCTSNode {
    pub fn new(mv: Option<Action>, parent: NodeId, player_just_moved: PlayerId, depth: u16) -> Self {
        Self {
            mv,
            parent,
            children: SmallVec::new(),
            wins: 0.0,
            visits: 0,
            player_just_moved,
            depth,
        }
    }

    /// Root of a search for `searcher`: the previous mover was the opponent.
    pub fn root(searcher: PlayerId) -> Self {
        Self::new(None, NodeId::NONE, searcher.opponent(), 0)
    }

    /// Add one playout result.
    pub fn update(&mut self, result: f64) {
        self.visits += 1;
        self.wins += result;
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.raw(), 5);
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");
        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_root_belongs_to_opponent() {
        let node = MCTSNode::root(PlayerId::new(1));
        assert_eq!(node.player_just_moved, PlayerId::new(0));
        assert!(node.parent.is_none());
        assert!(node.mv.is_none());
        assert_eq!(node.depth, 0);
    }

    #[test]
    fn test_update_and_mean() {
        let mut node = MCTSNode::new(Some(Action::Pass), NodeId::new(0), PlayerId::new(0), 1);
        assert_eq!(node.mean(), 0.0);
        node.update(1.0);
        node.update(0.0);
        node.update(1.0);
        node.update(1.0);
        assert_eq!(node.visits, 4);
        assert_eq!(node.mean(), 0.75);
    }

    #[test]
    fn test_serialization() {
        let mut node = MCTSNode::new(Some(Action::Attack(2)), NodeId::new(0), PlayerId::new(1), 1);
        node.children.push(NodeId::new(3));
        node.visits = 100;

        let json = serde_json::to_string(&node).unwrap();
        let deserialized: MCTSNode = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.mv, Some(Action::Attack(2)));
        assert_eq!(deserialized.visits, 100);
        assert_eq!(deserialized.children.len(), 1);
    }
}
