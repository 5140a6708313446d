//! Minimax with alpha-beta pruning over a [sim_board::Board]
//!
//! Sim is a two player game so a single search covers it: player two maximizes its utility and
//! player one minimizes it. Which player moves at a node comes from the board history, not from
//! the maximizing flag, so the search can also be started on positions where player one is to
//! move.
//!
//! The search never copies the board. Each candidate move is drawn with
//! [sim_board::Board::draw_scoped], searched, and undone when the guard drops. Once the depth
//! limit (or an optional node/time budget) is reached the remaining position is handed to a
//! [Scorable], by default the [TrialDrawHeuristic].
//!
//! ```rust
//! use sim_board::{Board, Player};
//! use sim_minimax::alpha_beta::{MinimaxSolver, MoveOrdering, SolverOptions};
//!
//! let mut board = Board::new(6);
//! board.draw(2, 4, Player::One).unwrap();
//!
//! let solver = MinimaxSolver::new(SolverOptions {
//!     move_ordering: MoveOrdering::Ascending,
//!     ..Default::default()
//! });
//!
//! let (chosen, utility) = solver.best_move(&mut board, 1).into_pair();
//!
//! // Nothing is threatened yet, so every reply looks like a coin flip
//! assert_eq!(utility, 0.5);
//! assert!(board.draw(chosen.unwrap().low(), chosen.unwrap().high(), Player::Two).is_ok());
//! ```

mod score;
pub use score::{Scorable, TrialDrawHeuristic, TrialDrawTally, WrappedScore};

mod minimax_return;
pub use minimax_return::MinMaxReturn;

mod move_ordering;
pub use move_ordering::MoveOrdering;

mod eval;
pub use eval::{MinimaxSolver, SolverOptions};
