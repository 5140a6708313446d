use sim_board::{Board, Outcome, Player, Segment};

#[derive(Debug, Clone, Copy, PartialEq)]
/// The score of a node in the search tree
///
/// This takes into account the score provided by the score function, but wraps it with a Score
/// based on the game state. Terminal positions have fixed utilities, everything else carries the
/// estimate from the scoring function.
pub enum WrappedScore {
    /// Player two completed a triangle
    Lose,
    /// The board filled up with nobody losing
    Tie,
    /// A non terminal position, scored by the scoring function
    Scored(f64),
    /// Player one completed a triangle
    Win,
}

impl WrappedScore {
    /// The score for a finished game, or `None` if the game is still going
    pub fn from_outcome(outcome: Outcome) -> Option<Self> {
        match outcome {
            Outcome::Ongoing => None,
            Outcome::Tie => Some(WrappedScore::Tie),
            Outcome::LostBy(Player::Two) => Some(WrappedScore::Lose),
            Outcome::LostBy(Player::One) => Some(WrappedScore::Win),
        }
    }

    /// Player two's expected result, between `0.0` and `1.0`
    pub fn utility(&self) -> f64 {
        match self {
            WrappedScore::Lose => 0.0,
            WrappedScore::Tie => 0.5,
            WrappedScore::Scored(value) => *value,
            WrappedScore::Win => 1.0,
        }
    }

    /// Whether this score came from a finished game
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WrappedScore::Scored(_))
    }
}

/// This trait is used to control something that can return a score from a game board
///
/// Scores must be in `0.0..=1.0`, read as player two's chance of winning. The board is handed
/// over mutably so scorers can try moves out, but it has to be returned exactly as it was given.
pub trait Scorable {
    /// Score the given board
    fn score(&self, board: &mut Board) -> f64;
}

impl<FnLike: Fn(&mut Board) -> f64> Scorable for FnLike {
    fn score(&self, board: &mut Board) -> f64 {
        (self)(board)
    }
}

/// Scores a position by how dangerous the remaining segments are for each player
///
/// Every available segment is drawn once for each player. A segment that would complete a
/// triangle for player one counts as a win for player two, and the other way around. The score
/// is player two's share of those wins, or a coin flip when no segment is dangerous for anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialDrawHeuristic;

impl Scorable for TrialDrawHeuristic {
    fn score(&self, board: &mut Board) -> f64 {
        TrialDrawTally::count(board).utility()
    }
}

/// The raw counts behind [TrialDrawHeuristic]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialDrawTally {
    /// Segments that would complete a triangle for player two
    pub wins_1: usize,
    /// Segments that would complete a triangle for player one
    pub wins_2: usize,
}

impl TrialDrawTally {
    /// Try every available segment for both players and count the immediate losses
    pub fn count(board: &mut Board) -> Self {
        let moves: Vec<Segment> = board.available_moves().iter().copied().collect();
        let mut tally = Self::default();

        for segment in moves {
            if loses_immediately(board, segment, Player::One) {
                tally.wins_2 += 1;
            }
            if loses_immediately(board, segment, Player::Two) {
                tally.wins_1 += 1;
            }
        }

        tally
    }

    /// `wins_2 / (wins_1 + wins_2)`, or `0.5` when both are zero
    pub fn utility(&self) -> f64 {
        let total = self.wins_1 + self.wins_2;

        if total == 0 {
            0.5
        } else {
            self.wins_2 as f64 / total as f64
        }
    }
}

/// Would `player` lose by drawing `segment` right now?
pub(crate) fn loses_immediately(board: &mut Board, segment: Segment, player: Player) -> bool {
    let guard = board
        .draw_scoped(segment, player)
        .expect("Only available segments are tried");

    guard.outcome() == Outcome::LostBy(player)
}
