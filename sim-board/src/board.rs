use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{DrawGuard, IllegalMove, Outcome, Player, Point, Segment};

/// The number of points used when nobody asks for something else
pub const DEFAULT_POINTS: usize = 6;

/// A single entry in the [Board] history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawnMove {
    /// The first point, as it was passed to [Board::draw]
    pub x: Point,
    /// The second point, as it was passed to [Board::draw]
    pub y: Point,
    /// Who drew the segment
    pub player: Player,
}

impl DrawnMove {
    /// The normalized segment this move drew
    pub fn segment(&self) -> Segment {
        Segment::new(self.x, self.y).expect("Moves in the history always have distinct endpoints")
    }
}

/// The state of one game of Sim
///
/// The undrawn segments (`available`) and the drawn ones (`ownership`) always partition the full
/// set of segments. `history` holds every drawn segment in the order it was drawn, which is what
/// makes [Board::undo] possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    points: usize,
    available: BTreeSet<Segment>,
    /// `ownership[x][y] == ownership[y][x]` is the player that drew `x`-`y`
    ownership: Vec<BTreeMap<Point, Player>>,
    history: Vec<DrawnMove>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS)
    }
}

impl Board {
    /// A fresh board with `points` points and nothing drawn
    pub fn new(points: usize) -> Self {
        Self {
            points,
            available: Segment::all(points).collect(),
            ownership: vec![BTreeMap::new(); points],
            history: Vec::with_capacity(Self::segment_count(points)),
        }
    }

    /// How many segments a board with `points` points has in total
    pub fn segment_count(points: usize) -> usize {
        points * points.saturating_sub(1) / 2
    }

    /// The number of points on this board
    pub fn points(&self) -> usize {
        self.points
    }

    /// Segments that haven't been drawn yet, in ascending order
    pub fn available_moves(&self) -> &BTreeSet<Segment> {
        &self.available
    }

    /// Every move made so far, oldest first
    pub fn history(&self) -> &[DrawnMove] {
        &self.history
    }

    /// The most recent move, if any
    pub fn last_move(&self) -> Option<&DrawnMove> {
        self.history.last()
    }

    /// Who drew the segment between `x` and `y`, if anyone did
    pub fn owner(&self, x: Point, y: Point) -> Option<Player> {
        self.ownership.get(x)?.get(&y).copied()
    }

    /// Whose turn it is
    ///
    /// Player one opens, and turns strictly alternate, so this only depends on who moved last
    pub fn player_to_move(&self) -> Player {
        match self.history.last() {
            None => Player::One,
            Some(last) => last.player.opponent(),
        }
    }

    /// Draw the segment between `x` and `y` for `player`
    ///
    /// Fails, leaving the board untouched, if either point is off the board, both points are the
    /// same, or the segment has already been drawn.
    pub fn draw(&mut self, x: Point, y: Point, player: Player) -> Result<(), IllegalMove> {
        if let Err(e) = self.check_move(x, y) {
            debug!(x, y, %player, error = %e, "rejected draw");
            return Err(e);
        }

        let segment = Segment::new(x, y).expect("check_move rejects equal endpoints");

        self.ownership[x].insert(y, player);
        self.ownership[y].insert(x, player);
        self.history.push(DrawnMove { x, y, player });

        let was_available = self.available.remove(&segment);
        assert!(
            was_available,
            "Segment {segment} was neither drawn nor available"
        );

        Ok(())
    }

    /// Draw `segment` and get back a guard that undoes it when dropped
    pub fn draw_scoped(
        &mut self,
        segment: Segment,
        player: Player,
    ) -> Result<DrawGuard<'_>, IllegalMove> {
        let (x, y) = segment.endpoints();
        self.draw(x, y, player)?;

        Ok(DrawGuard::new(self))
    }

    fn check_move(&self, x: Point, y: Point) -> Result<(), IllegalMove> {
        for point in [x, y] {
            if point >= self.points {
                return Err(IllegalMove::OutOfRange {
                    point,
                    points: self.points,
                });
            }
        }

        let segment = Segment::new(x, y).ok_or(IllegalMove::SamePoint { point: x })?;

        if let Some(owner) = self.owner(x, y) {
            return Err(IllegalMove::AlreadyDrawn { segment, owner });
        }

        Ok(())
    }

    /// Take back the most recent move, returning it
    ///
    /// # Panics
    ///
    /// Panics if nothing has been drawn. Callers are expected to pair every successful draw with
    /// exactly one undo, so an empty history here means that bookkeeping has gone wrong.
    pub fn undo(&mut self) -> DrawnMove {
        let last = self
            .history
            .pop()
            .expect("undo called on a board with no moves");
        let DrawnMove { x, y, player } = last;

        let forward = self.ownership[x].remove(&y);
        let backward = self.ownership[y].remove(&x);
        assert_eq!(
            (forward, backward),
            (Some(player), Some(player)),
            "Ownership of {x}-{y} was out of sync with the history"
        );

        let was_drawn = self.available.insert(last.segment());
        assert!(was_drawn, "Segment {x}-{y} was both drawn and available");

        last
    }

    /// Did the most recent move end the game?
    ///
    /// Only triangles that include the last segment are considered. Every earlier position was
    /// already checked when its own move was made, so a triangle elsewhere can't exist.
    pub fn outcome(&self) -> Outcome {
        let Some(&DrawnMove { x, y, player }) = self.history.last() else {
            return Outcome::Ongoing;
        };

        let completes_triangle = self.ownership[x].iter().any(|(&j, &owner_jx)| {
            owner_jx == player && self.ownership[j].get(&y) == Some(&player)
        });

        if completes_triangle {
            Outcome::LostBy(player)
        } else if self.available.is_empty() {
            Outcome::Tie
        } else {
            Outcome::Ongoing
        }
    }

    /// Check the structural invariants, panicking if any are broken
    ///
    /// This walks the whole board so it's meant for tests and debugging, not for the search loop
    pub fn assert_consistent(&self) {
        assert_eq!(
            self.available.len() + self.history.len(),
            Self::segment_count(self.points),
            "Drawn and available segments don't add up to every segment"
        );

        for (x, neighbors) in self.ownership.iter().enumerate() {
            for (&y, &player) in neighbors {
                assert_eq!(
                    self.owner(y, x),
                    Some(player),
                    "Ownership of {x}-{y} is not symmetric"
                );
                let segment = Segment::new(x, y).expect("A point can't own a line to itself");
                assert!(
                    !self.available.contains(&segment),
                    "{segment} is both drawn and available"
                );
            }
        }

        for drawn in &self.history {
            assert_eq!(self.owner(drawn.x, drawn.y), Some(drawn.player));
        }
    }
}
