use std::ops::{Deref, DerefMut};

use crate::Board;

/// A move that has been drawn on a [Board] and will be undone when this guard is dropped
///
/// Created by [Board::draw_scoped]. The guard derefs to the board so the position with the move
/// applied can be inspected and searched further. Anything drawn through the guard must also be
/// undone through it (or through a nested guard) before the guard drops, otherwise the wrong
/// move gets taken back.
#[derive(Debug)]
pub struct DrawGuard<'board> {
    board: &'board mut Board,
}

impl<'board> DrawGuard<'board> {
    pub(crate) fn new(board: &'board mut Board) -> Self {
        Self { board }
    }
}

impl Deref for DrawGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for DrawGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for DrawGuard<'_> {
    fn drop(&mut self) {
        self.board.undo();
    }
}
