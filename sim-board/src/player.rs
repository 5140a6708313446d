use derive_more::Display;

/// One of the two players
///
/// Player one always opens the game. When playing against the computer, the computer is
/// [Player::Two].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    /// Moves first
    #[display("player 1")]
    One,
    /// Moves second
    #[display("player 2")]
    Two,
}

impl Player {
    /// The other player
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// `1` or `2`
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

/// The state of a game, judged from the most recent move
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Nobody has lost and there are still segments to draw
    #[display("ongoing")]
    Ongoing,
    /// Every segment was drawn without anyone completing a triangle
    #[display("tie")]
    Tie,
    /// The given player completed a triangle of their own segments
    #[display("{_0} lost")]
    LostBy(Player),
}

impl Outcome {
    /// Whether the game is over
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    /// The winner, if somebody lost
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::LostBy(loser) => Some(loser.opponent()),
            Outcome::Ongoing | Outcome::Tie => None,
        }
    }
}
