#![deny(missing_debug_implementations, missing_docs)]
//! This crate implements the minimax algorithm, with alpha-beta pruning, for the game of Sim.
//!
//! The search works directly on a [sim_board::Board], drawing and undoing moves in place as it
//! walks the tree instead of copying the board at every node. Once the depth limit is reached it
//! falls back to a scoring function, by default the [alpha_beta::TrialDrawHeuristic].
//!
//! Scores are always from the point of view of [sim_board::Player::Two], which is the side the
//! computer plays. A score of `1.0` is a certain win for player two and `0.0` a certain loss.

pub mod alpha_beta;
pub use alpha_beta::{MinMaxReturn, MinimaxSolver, SolverOptions};
