//! Games of Sim against the minimax opponent, one per client session
//!
//! [GameSession] holds the board and settings for a single game and runs a full turn: the human's
//! move as player one followed by the computer's reply as player two. [SessionRegistry] owns
//! every live session, keyed by an opaque [SessionId].

pub use sim_board::{Board, IllegalMove, Outcome, Player, Segment};
pub use sim_minimax::alpha_beta::{MinimaxSolver, SolverOptions};

mod session;
pub use session::{GameConfig, GameSession, SessionError, TurnOutcome};

mod registry;
pub use registry::{SessionId, SessionRegistry, SharedSession};
