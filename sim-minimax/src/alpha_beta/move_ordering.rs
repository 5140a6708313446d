use rand::{seq::SliceRandom, Rng};
use sim_board::{Board, Segment};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// The order in which the search tries the available segments
///
/// When two moves score the same the one tried *later* is kept, so the ordering decides which of
/// several equally good moves gets played.
pub enum MoveOrdering {
    /// Ascending by normalized segment. The search is fully reproducible with this ordering.
    #[default]
    Ascending,
    /// A fresh random permutation at every node
    Shuffled,
}

impl MoveOrdering {
    /// List the available segments of `board` in this order
    pub fn order_moves<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Vec<Segment> {
        let mut moves: Vec<Segment> = board.available_moves().iter().copied().collect();

        if let MoveOrdering::Shuffled = self {
            moves.shuffle(rng);
        }

        moves
    }
}
