//! The click-driven game flow: select a piece to see where it can go, click
//! a destination to move it there.

use std::collections::BTreeSet;

use anyhow::bail;
use tracing::debug;

use crate::chess::board::Board;
use crate::chess::core::{Player, Position};
use crate::chess::moves::Move;
use crate::interface::{Canvas, Interaction};

/// Outcome of a single click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Click {
    /// The previous and the current click formed a legal move which was
    /// applied.
    Moved(Move),
    /// The clicked piece's destinations are now the hints.
    Hinted,
    /// An empty square was clicked: the selection and the hints are gone.
    Cleared,
}

/// A board together with the destinations currently shown to the player.
#[derive(Clone, Debug, Default)]
pub struct Game {
    board: Board,
    possible: BTreeSet<Move>,
}

impl Game {
    /// Starts a game where `first_player` makes the first move.
    #[must_use]
    pub fn new(first_player: Player) -> Self {
        Self {
            board: Board::new(first_player),
            possible: BTreeSet::new(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Moves of the most recently clicked piece.
    #[must_use]
    pub const fn possible(&self) -> &BTreeSet<Move> {
        &self.possible
    }

    /// Reacts to the click that has just been registered in `ui`.
    ///
    /// If the previous click selected a square, the two clicks are tried as a
    /// move. When that succeeds the selection is cleared; otherwise the newly
    /// clicked piece's moves become the hints. Clicking an empty square that
    /// does not complete a move drops the selection.
    pub fn on_click(&mut self, ui: &mut impl Interaction) -> Click {
        let (source, dest) = (ui.previous(), ui.selected());
        if source.is_valid() && dest.is_valid() {
            let mut attempt = Move::new(source, dest);
            attempt.complete(&self.board);
            if self.try_move(&attempt) {
                ui.clear_selection();
                return Click::Moved(attempt);
            }
        }
        match self.board.at(dest) {
            Some(piece) if !piece.is_space() => {
                self.possible = piece.generate_moves(&self.board);
                Click::Hinted
            },
            _ => {
                ui.clear_selection();
                self.possible.clear();
                Click::Cleared
            },
        }
    }

    /// Reads a move in the textual encoding, completes it against the board
    /// and plays it. Returns whether the move was legal.
    ///
    /// # Errors
    ///
    /// If the text is malformed.
    pub fn play(&mut self, text: &str) -> anyhow::Result<bool> {
        let mut next_move = Move::read(text);
        if let Some(error) = next_move.error() {
            bail!("malformed move text '{error}'");
        }
        next_move.complete(&self.board);
        Ok(self.try_move(&next_move))
    }

    /// Moves the piece on `position` can make; nothing for empty squares and
    /// positions outside the board.
    #[must_use]
    pub fn hints(&self, position: Position) -> BTreeSet<Move> {
        self.board
            .at(position)
            .map(|piece| piece.generate_moves(&self.board))
            .unwrap_or_default()
    }

    /// Takes back the last move.
    ///
    /// # Errors
    ///
    /// If no moves were played.
    pub fn undo(&mut self) -> anyhow::Result<Move> {
        self.possible.clear();
        self.board.undo()
    }

    /// Sets the pieces up for a new game.
    pub fn reset(&mut self) {
        self.possible.clear();
        self.board.reset();
    }

    /// Renders the board with the current hints.
    pub fn draw(&self, canvas: &mut impl Canvas, ui: &impl Interaction) {
        self.board.display(canvas, ui, &self.possible);
    }

    /// Applies a completed move if the moving piece could generate it. The
    /// promotion target is free to differ from the generated default.
    fn try_move(&mut self, attempt: &Move) -> bool {
        let reachable = self.hints(attempt.source()).iter().any(|candidate| {
            candidate.dest() == attempt.dest() && candidate.flags() == attempt.flags()
        });
        if !reachable {
            debug!(%attempt, "piece can not reach the destination");
            return false;
        }
        let applied = self.board.apply_move(attempt);
        if applied {
            self.possible.clear();
        }
        applied
    }
}
