use derive_more::{Display, Error, From};
use itertools::Itertools;
use sim_board::{Board, IllegalMove, Outcome, Player, Point, Segment, DEFAULT_POINTS};
use sim_minimax::alpha_beta::{MinimaxSolver, SolverOptions};
use tracing::{debug, info, warn};

use crate::SessionId;

/// How a game is set up when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of points on the board
    pub points: usize,
    /// Depth the computer searches to before falling back to the heuristic
    pub difficulty: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            difficulty: 3,
        }
    }
}

/// What happened during a single [GameSession::play_turn]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnOutcome {
    /// The human completed a triangle of their own, the computer never got to move
    PlayerLost,
    /// The computer's reply completed one of its triangles
    AiLost {
        /// The losing reply
        ai_move: Segment,
    },
    /// Every segment is drawn and nobody has a triangle
    ///
    /// `ai_move` is `None` when the human drew the last segment
    Tie {
        /// The computer's reply, if it got one
        ai_move: Option<Segment>,
    },
    /// The game goes on
    Continue {
        /// The computer's reply
        ai_move: Segment,
        /// The value the search assigned to that reply, in `[0, 1]`
        utility: f64,
    },
}

#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// No live session has this id
    #[display("no game is running for session {id}")]
    UnknownSession { id: SessionId },
    /// The game already finished, start a new one
    #[display("the game is over ({outcome})")]
    GameOver { outcome: Outcome },
    /// The human's move couldn't be read as `x,y`
    #[display("couldn't read a move from {input:?}, expected \"x,y\"")]
    MalformedMove { input: String },
    /// The human's move was rejected by the board
    #[display("illegal move: {_0}")]
    #[from]
    IllegalMove(IllegalMove),
}

/// A single game between a human (player one) and the minimax solver (player two)
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    config: GameConfig,
    solver: MinimaxSolver,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        let solver = MinimaxSolver::new(SolverOptions::default()).named("sim-ai");

        Self::with_solver(config, solver)
    }

    pub fn with_solver(config: GameConfig, solver: MinimaxSolver) -> Self {
        info!(points = config.points, difficulty = config.difficulty, "new game");

        Self {
            board: Board::new(config.points),
            config,
            solver,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    /// Every segment still free to draw, in ascending order
    pub fn available_moves(&self) -> Vec<Segment> {
        self.board.available_moves().iter().copied().collect_vec()
    }

    /// Parse `"x,y"` and play it with [GameSession::play_turn]
    pub fn respond(&mut self, input: &str) -> Result<TurnOutcome, SessionError> {
        let (x, y) = parse_move(input).ok_or_else(|| SessionError::MalformedMove {
            input: input.to_owned(),
        })?;

        self.play_turn(x, y)
    }

    /// Draw the human's move, then if the game is still going search for and draw the reply
    ///
    /// An illegal human move is reported without touching the board
    pub fn play_turn(&mut self, x: Point, y: Point) -> Result<TurnOutcome, SessionError> {
        let outcome = self.board.outcome();
        if outcome.is_over() {
            warn!(x, y, %outcome, "move sent after the game ended");
            return Err(SessionError::GameOver { outcome });
        }

        self.board.draw(x, y, Player::One)?;
        debug!(x, y, "human drew");

        match self.board.outcome() {
            Outcome::LostBy(_) => {
                info!(x, y, "human completed a triangle");
                return Ok(TurnOutcome::PlayerLost);
            }
            Outcome::Tie => {
                info!("human drew the last segment, tie");
                return Ok(TurnOutcome::Tie { ai_move: None });
            }
            Outcome::Ongoing => {}
        }

        let (ai_move, utility) = self
            .solver
            .best_move(&mut self.board, self.config.difficulty)
            .into_pair();
        let ai_move = ai_move.expect("an ongoing game always has a move left");
        let (ax, ay) = ai_move.endpoints();
        self.board
            .draw(ax, ay, Player::Two)
            .expect("the solver only picks available segments");
        debug!(%ai_move, utility, "computer drew");

        Ok(match self.board.outcome() {
            Outcome::LostBy(_) => {
                info!(%ai_move, "computer completed a triangle");
                TurnOutcome::AiLost { ai_move }
            }
            Outcome::Tie => {
                info!(%ai_move, "computer drew the last segment, tie");
                TurnOutcome::Tie {
                    ai_move: Some(ai_move),
                }
            }
            Outcome::Ongoing => TurnOutcome::Continue { ai_move, utility },
        })
    }
}

fn parse_move(input: &str) -> Option<(Point, Point)> {
    let (x, y) = input.split_once(',')?;

    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

#[cfg(test)]
mod test {
    use super::*;

    fn session(points: usize, difficulty: usize) -> GameSession {
        GameSession::new(GameConfig { points, difficulty })
    }

    fn setup(session: &mut GameSession, moves: &[(Point, Point)]) {
        for &(x, y) in moves {
            let player = session.board.player_to_move();
            session.board.draw(x, y, player).unwrap();
        }
    }

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();

        assert_eq!(config.points, 6);
        assert_eq!(config.difficulty, 3);
    }

    #[test]
    fn test_new_session_lists_every_segment() {
        let session = session(6, 3);

        assert_eq!(session.available_moves().len(), 15);
        assert_eq!(session.available_moves()[0], Segment::new(0, 1).unwrap());
        assert_eq!(session.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("0,1"), Some((0, 1)));
        assert_eq!(parse_move(" 4 , 2 "), Some((4, 2)));
        assert_eq!(parse_move("3,3"), Some((3, 3)));
        assert_eq!(parse_move("3"), None);
        assert_eq!(parse_move("a,b"), None);
        assert_eq!(parse_move("-1,2"), None);
        assert_eq!(parse_move("1,2,3"), None);
    }

    #[test]
    fn test_malformed_move_is_rejected() {
        let mut session = session(6, 1);

        let err = session.respond("hello").unwrap_err();

        assert!(matches!(err, SessionError::MalformedMove { input } if input == "hello"));
        assert!(session.board().history().is_empty());
    }

    #[test]
    fn test_illegal_moves_leave_the_board_alone() {
        let mut session = session(6, 1);

        assert!(matches!(
            session.respond("2,2"),
            Err(SessionError::IllegalMove(IllegalMove::SamePoint { point: 2 }))
        ));
        assert!(matches!(
            session.play_turn(0, 9),
            Err(SessionError::IllegalMove(IllegalMove::OutOfRange {
                point: 9,
                points: 6
            }))
        ));
        assert!(session.board().history().is_empty());

        session.respond("0,1").unwrap();
        assert_eq!(session.board().history().len(), 2);

        assert!(matches!(
            session.respond("1,0"),
            Err(SessionError::IllegalMove(IllegalMove::AlreadyDrawn {
                owner: Player::One,
                ..
            }))
        ));
        assert_eq!(session.board().history().len(), 2);
    }

    #[test]
    fn test_turn_draws_both_moves() {
        let mut session = session(6, 1);

        let outcome = session.respond("0,1").unwrap();

        let ai_move = match outcome {
            TurnOutcome::Continue { ai_move, utility } => {
                assert!((0.0..=1.0).contains(&utility));
                ai_move
            }
            other => panic!("expected the game to continue, got {other:?}"),
        };

        let history = session.board().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].player, Player::One);
        assert_eq!(history[0].segment(), Segment::new(0, 1).unwrap());
        assert_eq!(history[1].player, Player::Two);
        assert_eq!(history[1].segment(), ai_move);
        assert_eq!(session.available_moves().len(), 13);
        assert!(!session.available_moves().contains(&ai_move));
    }

    #[test]
    fn test_player_loses() {
        let mut session = session(6, 2);
        setup(&mut session, &[(0, 1), (3, 4), (0, 2), (3, 5)]);

        assert_eq!(session.respond("1,2").unwrap(), TurnOutcome::PlayerLost);
        assert_eq!(session.board().history().len(), 5);
        assert_eq!(session.outcome(), Outcome::LostBy(Player::One));

        assert!(matches!(
            session.respond("4,5"),
            Err(SessionError::GameOver {
                outcome: Outcome::LostBy(Player::One)
            })
        ));
    }

    #[test]
    fn test_ai_loses_when_every_reply_loses() {
        let mut session = session(4, 3);
        setup(&mut session, &[(0, 3), (0, 1), (1, 3), (0, 2)]);

        assert_eq!(
            session.respond("2,3").unwrap(),
            TurnOutcome::AiLost {
                ai_move: Segment::new(1, 2).unwrap()
            }
        );
        assert_eq!(session.outcome(), Outcome::LostBy(Player::Two));
    }

    #[test]
    fn test_tie_when_human_draws_last_segment() {
        let mut session = session(3, 1);
        setup(&mut session, &[(0, 1), (0, 2)]);

        assert_eq!(
            session.respond("1,2").unwrap(),
            TurnOutcome::Tie { ai_move: None }
        );
        assert_eq!(session.outcome(), Outcome::Tie);
    }

    #[test]
    fn test_tie_when_ai_draws_last_segment() {
        let mut session = session(4, 2);
        setup(&mut session, &[(0, 1), (1, 2), (0, 2), (0, 3)]);

        assert_eq!(
            session.respond("1,3").unwrap(),
            TurnOutcome::Tie {
                ai_move: Segment::new(2, 3)
            }
        );

        assert!(matches!(
            session.respond("0,1"),
            Err(SessionError::GameOver {
                outcome: Outcome::Tie
            })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = SessionError::from(IllegalMove::SamePoint { point: 3 });
        assert_eq!(
            err.to_string(),
            "illegal move: can't draw a line from point 3 to itself"
        );

        let err = SessionError::GameOver {
            outcome: Outcome::LostBy(Player::Two),
        };
        assert_eq!(err.to_string(), "the game is over (player 2 lost)");
    }
}
