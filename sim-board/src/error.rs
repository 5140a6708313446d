use derive_more::{Display, Error};

use crate::{Player, Point, Segment};

/// Why a [crate::Board::draw] was rejected
///
/// A rejected draw never changes the board
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    /// One of the endpoints isn't on the board
    #[display("point {point} is not on a board of {points} points")]
    OutOfRange {
        /// The offending point
        point: Point,
        /// How many points the board has
        points: usize,
    },
    /// Both endpoints are the same point
    #[display("can't draw a line from point {point} to itself")]
    SamePoint {
        /// The repeated point
        point: Point,
    },
    /// The segment was drawn earlier in the game
    #[display("segment {segment} was already drawn by {owner}")]
    AlreadyDrawn {
        /// The segment that was requested
        segment: Segment,
        /// Who drew it
        owner: Player,
    },
}
