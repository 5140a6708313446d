use sim_board::{Player, Segment};

use super::WrappedScore;

#[derive(Debug, Clone, Copy, PartialEq)]
/// This is returned from an iteration of the minimax algorithm
pub enum MinMaxReturn {
    /// A node where a move was chosen
    Node {
        /// The chosen move
        best_move: Segment,
        /// The score of the chosen move
        score: WrappedScore,
        /// Whether this node was a maximizing node or not
        is_maximizing: bool,
        /// Which player was moving at this node
        moving_player: Player,
        /// Whether the remaining moves were skipped by an alpha-beta cutoff
        alpha_beta_cutoff: bool,
    },
    /// Represents a leaf node in the game tree
    /// This happens when we reach a terminal state (lost/tie)
    /// or when we reach the maximum depth
    Leaf {
        #[allow(missing_docs)]
        score: WrappedScore,
    },
}

impl MinMaxReturn {
    /// Returns the score for this node
    pub fn score(&self) -> &WrappedScore {
        match self {
            MinMaxReturn::Node { score, .. } => score,
            MinMaxReturn::Leaf { score } => score,
        }
    }

    /// Player two's utility at this node, in `0.0..=1.0`
    pub fn utility(&self) -> f64 {
        self.score().utility()
    }

    /// The chosen move, or `None` for a leaf
    pub fn best_move(&self) -> Option<Segment> {
        match self {
            MinMaxReturn::Node { best_move, .. } => Some(*best_move),
            MinMaxReturn::Leaf { .. } => None,
        }
    }

    /// The chosen move and its utility, as a pair
    pub fn into_pair(self) -> (Option<Segment>, f64) {
        (self.best_move(), self.utility())
    }
}
