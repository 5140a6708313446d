#![warn(missing_docs, missing_debug_implementations)]
//! Game state for Sim, the two player line drawing game played on `N` points.
//!
//! Players take turns drawing a [Segment] between two points. Whoever completes a triangle made
//! up entirely of their own segments loses. If every segment gets drawn without that happening the
//! game is a tie (impossible with six or more points, but reachable on smaller boards).
//!
//! The [Board] is built for backtracking search: every [Board::draw] is recorded in a history so
//! that [Board::undo] can restore the previous state exactly. [Board::draw_scoped] wraps that pair
//! in a [DrawGuard] which undoes the move when it goes out of scope.
//!
//! ```rust
//! use sim_board::{Board, Outcome, Player};
//!
//! let mut board = Board::new(3);
//! board.draw(0, 1, Player::One).unwrap();
//! board.draw(0, 2, Player::One).unwrap();
//! assert_eq!(board.outcome(), Outcome::Ongoing);
//!
//! board.draw(1, 2, Player::One).unwrap();
//! assert_eq!(board.outcome(), Outcome::LostBy(Player::One));
//! ```

mod board;
pub use board::{Board, DrawnMove, DEFAULT_POINTS};

mod error;
pub use error::IllegalMove;

mod guard;
pub use guard::DrawGuard;

mod player;
pub use player::{Outcome, Player};

mod segment;
pub use segment::{Point, Segment};
