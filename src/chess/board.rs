//! The authoritative 8×8 grid of pieces, the ply counter and the move history.
//!
//! [`Board::apply_move`] is the only way the game advances: it is atomic
//! (either the whole move is executed or nothing changes) and returns `false`
//! for illegal attempts instead of failing loudly. [`Board::undo`] reverses
//! every kind of move exactly.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Index;

use anyhow::{bail, Context};
use arrayvec::ArrayVec;
use tracing::{debug, error, info};

use crate::chess::core::{PieceKind, Player, Position, Promotion, BOARD_WIDTH};
use crate::chess::moves::{Move, MoveFlags};
use crate::chess::piece::Piece;
use crate::interface::{Canvas, Interaction};

const WIDTH: usize = BOARD_WIDTH as usize;

/// Column of both kings at the start of the game.
const KING_HOME: i8 = 4;
const KINGSIDE_ROOK_HOME: i8 = 7;
const QUEENSIDE_ROOK_HOME: i8 = 0;

#[rustfmt::skip]
const BACK_RANK: [PieceKind; WIDTH] = [
    PieceKind::Rook, PieceKind::Knight, PieceKind::Bishop, PieceKind::Queen,
    PieceKind::King, PieceKind::Bishop, PieceKind::Knight, PieceKind::Rook,
];

/// Last-moved plies overwritten by a move, restored by [`Board::undo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Footprint {
    mover: Option<u32>,
    captured: Option<u32>,
    rook: Option<u32>,
}

/// Board state: exactly one [`Piece`] per cell, the number of plies played so
/// far and the moves that got the game here.
///
/// The player to move is derived from the ply parity: the first player moves
/// on even plies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Piece; WIDTH]; WIDTH],
    ply: u32,
    history: Vec<Move>,
    footprints: Vec<Footprint>,
    first_player: Player,
}

impl Board {
    /// Creates a board in the standard starting position where
    /// `first_player` makes the first move.
    #[must_use]
    pub fn new(first_player: Player) -> Self {
        let mut board = Self {
            first_player,
            ..Self::empty()
        };
        board.reset();
        board
    }

    /// Standard starting position, White to move.
    ///
    /// ```
    /// use tabula::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "r n b q k b n r\n\
    ///      p p p p p p p p\n\
    ///      . . . . . . . .\n\
    ///      . . . . . . . .\n\
    ///      . . . . . . . .\n\
    ///      . . . . . . . .\n\
    ///      P P P P P P P P\n\
    ///      R N B Q K B N R"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self::new(Player::White)
    }

    /// A board with nothing but empty-cell placeholders, to be filled with
    /// [`Board::place`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cells: std::array::from_fn(|row| {
                std::array::from_fn(|col| Piece::space(Position::from_cell(row, col)))
            }),
            ply: 0,
            history: Vec::new(),
            footprints: Vec::new(),
            first_player: Player::White,
        }
    }

    /// Puts all 32 pieces on their starting squares, clears every other cell
    /// and forgets the history.
    pub fn reset(&mut self) {
        let first_player = self.first_player;
        *self = Self {
            first_player,
            ..Self::empty()
        };
        for (col, kind) in (0..).zip(BACK_RANK) {
            for owner in [Player::White, Player::Black] {
                let back_rank = Position::new(owner.back_rank(), col);
                let pawn_rank = Position::new(owner.pawn_row(), col);
                *self.cell_mut(back_rank) = Piece::new(kind, owner, back_rank);
                *self.cell_mut(pawn_rank) = Piece::new(PieceKind::Pawn, owner, pawn_rank);
            }
        }
        info!(first_player = %first_player, "board reset");
    }

    /// Checked access to the piece on `position`.
    #[must_use]
    pub fn at(&self, position: Position) -> Option<&Piece> {
        let (row, col) = position.cell()?;
        Some(&self.cells[row][col])
    }

    /// Number of plies played so far.
    #[must_use]
    pub const fn ply(&self) -> u32 {
        self.ply
    }

    /// Applied moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn first_player(&self) -> Player {
        self.first_player
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        if self.ply % 2 == 0 {
            self.first_player
        } else {
            self.first_player.opponent()
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_white_turn(&self) -> bool {
        self.side_to_move() == Player::White
    }

    /// All 64 cells, row by row from the top.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    /// Replaces whatever stands on `position` with a new, unmoved piece.
    /// Placing [`PieceKind::Space`] clears the cell.
    ///
    /// # Errors
    ///
    /// If `position` is not on the board.
    pub fn place(&mut self, kind: PieceKind, owner: Player, position: Position) -> anyhow::Result<()> {
        if !position.is_valid() {
            bail!("can not place {kind:?} outside the board");
        }
        *self.cell_mut(position) = match kind {
            PieceKind::Space => Piece::space(position),
            _ => Piece::new(kind, owner, position),
        };
        Ok(())
    }

    /// Replaces the piece on `position` with an empty-cell placeholder. Does
    /// nothing for [`Position::INVALID`].
    pub fn remove(&mut self, position: Position) {
        if position.is_valid() {
            *self.cell_mut(position) = Piece::space(position);
        }
    }

    /// Exchanges the contents of two cells, marking both pieces as moved on
    /// the current ply.
    ///
    /// This is a setup helper outside of play: the ply counter and the
    /// history stay as they are, so pieces are stamped with the ply that has
    /// already been played rather than the next one.
    ///
    /// # Errors
    ///
    /// If either position is not on the board.
    pub fn swap(&mut self, first: Position, second: Position) -> anyhow::Result<()> {
        if !first.is_valid() || !second.is_valid() {
            bail!("can not swap {first} and {second}: both have to be on the board");
        }
        self.exchange(first, second);
        let ply = self.ply;
        for position in [first, second] {
            let piece = self.cell_mut(position);
            if !piece.is_space() {
                piece.last_move = Some(ply);
            }
        }
        self.verify()
    }

    /// Executes the move if it is legal for the side to move. Returns `false`
    /// and leaves the board untouched otherwise.
    ///
    /// The move is expected to be [completed](Move::complete): the captured
    /// kind has to match the destination and special moves have to carry
    /// their flags. A pawn reaching the last row without a promotion target
    /// becomes a queen, and the history records it that way.
    pub fn apply_move(&mut self, next_move: &Move) -> bool {
        if let Err(reason) = self.check_move(next_move) {
            debug!(%next_move, %reason, "rejected move");
            return false;
        }
        let backup = self.cells;
        let piece = self[next_move.source];
        let promotion = next_move.promotion.or_else(|| {
            (piece.kind() == PieceKind::Pawn
                && next_move.dest.row() == piece.owner().promotion_row())
            .then_some(Promotion::Queen)
        });
        let played = Move {
            mover: piece.owner(),
            promotion,
            ..next_move.clone()
        };
        let footprint = self.execute(&played);
        if let Err(violation) = self.verified(&format!("applying {played}")) {
            error!(%played, %violation, "board invariant violated, rolling back");
            self.cells = backup;
            return false;
        }
        self.ply += 1;
        self.history.push(played);
        self.footprints.push(footprint);
        debug!(%next_move, ply = self.ply, "applied move");
        true
    }

    /// Takes back the last applied move, restoring every piece it touched
    /// (including captured ones) and their last-moved plies.
    ///
    /// # Errors
    ///
    /// If there is nothing to undo.
    pub fn undo(&mut self) -> anyhow::Result<Move> {
        let (Some(last), Some(footprint)) = (self.history.pop(), self.footprints.pop()) else {
            bail!("there are no moves to undo");
        };
        let backup = self.cells;
        self.reverse(&last, footprint);
        if let Err(violation) = self.verified(&format!("undoing {last}")) {
            error!(%last, %violation, "board invariant violated, rolling back");
            self.cells = backup;
            self.history.push(last);
            self.footprints.push(footprint);
            return Err(violation);
        }
        self.ply -= 1;
        info!(%last, ply = self.ply, "undid move");
        Ok(last)
    }

    /// Draws the board, the interaction highlights and the possible moves
    /// onto the canvas.
    pub fn display(
        &self,
        canvas: &mut impl Canvas,
        ui: &impl Interaction,
        possible: &BTreeSet<Move>,
    ) {
        canvas.draw_board();
        canvas.draw_hover(ui.hover());
        canvas.draw_selected(ui.selected());
        for candidate in possible {
            canvas.draw_possible(candidate.dest());
        }
        for piece in self.pieces() {
            canvas.draw_piece(piece);
        }
    }

    /// Destination of an en passant capture by `pawn`, if the previous ply
    /// was an opponent pawn double step landing right next to it.
    pub(crate) fn en_passant_target(&self, pawn: &Piece) -> Option<Position> {
        if pawn.kind() != PieceKind::Pawn {
            return None;
        }
        let last = self.last_move()?;
        let (from, landed) = (last.source(), last.dest());
        let pushed = self.at(landed)?;
        if pushed.kind() != PieceKind::Pawn || !pushed.is_opponent_of(pawn.owner()) {
            return None;
        }
        if (from.row() - landed.row()).abs() != 2 || from.col() != landed.col() {
            return None;
        }
        if landed.row() != pawn.position().row() || (landed.col() - pawn.position().col()).abs() != 1
        {
            return None;
        }
        landed
            .offset(pawn.owner().forward(), 0)
            .filter(|&target| self[target].is_space())
    }

    /// Which castle, if any, moving `king` to `dest` performs: the king and
    /// the rook of that side have to be unmoved on their home squares with
    /// nothing in between.
    pub(crate) fn castle_side(&self, king: &Piece, dest: Position) -> Option<MoveFlags> {
        let row = king.owner().back_rank();
        if king.kind() != PieceKind::King
            || king.last_move().is_some()
            || king.position() != Position::new(row, KING_HOME)
            || dest.row() != row
        {
            return None;
        }
        let (side, rook_col) = match dest.col() - KING_HOME {
            2 => (MoveFlags::CASTLE_KINGSIDE, KINGSIDE_ROOK_HOME),
            -2 => (MoveFlags::CASTLE_QUEENSIDE, QUEENSIDE_ROOK_HOME),
            _ => return None,
        };
        let rook = &self[Position::new(row, rook_col)];
        if rook.kind() != PieceKind::Rook
            || rook.owner() != king.owner()
            || rook.last_move().is_some()
        {
            return None;
        }
        let between: ArrayVec<Position, 3> = (rook_col.min(KING_HOME) + 1..rook_col.max(KING_HOME))
            .map(|col| Position::new(row, col))
            .collect();
        between
            .iter()
            .all(|&square| self[square].is_space())
            .then_some(side)
    }

    fn check_move(&self, next_move: &Move) -> anyhow::Result<()> {
        if let Some(text) = next_move.error() {
            bail!("malformed move text '{text}'");
        }
        let (source, dest) = (next_move.source(), next_move.dest());
        let piece = self.at(source).context("source is outside the board")?;
        let target = self.at(dest).context("destination is outside the board")?;
        if piece.is_space() {
            bail!("there is no piece on {source}");
        }
        if piece.owner() != self.side_to_move() {
            bail!(
                "expected a piece of {} to move, got {piece} on {source}",
                self.side_to_move()
            );
        }
        if next_move.is_castle() {
            let side = if next_move.is_castle_kingside() {
                MoveFlags::CASTLE_KINGSIDE
            } else {
                MoveFlags::CASTLE_QUEENSIDE
            };
            if self.castle_side(piece, dest) != Some(side) {
                bail!("castling from {source} to {dest} is not possible");
            }
            return Ok(());
        }
        if target.is_friend_of(piece.owner()) {
            bail!("destination {dest} is occupied by own {target}");
        }
        if next_move.is_en_passant() {
            if self.en_passant_target(piece) != Some(dest) {
                bail!("en passant from {source} to {dest} is not possible");
            }
            return Ok(());
        }
        if next_move.promotion().is_some()
            && (piece.kind() != PieceKind::Pawn || dest.row() != piece.owner().promotion_row())
        {
            bail!("{piece} on {source} can not promote on {dest}");
        }
        if next_move.capture() != target.kind() {
            bail!(
                "expected '{}' on {dest}, got '{}'",
                next_move.capture(),
                target.kind()
            );
        }
        Ok(())
    }

    /// Performs an already validated move and returns what is needed to take
    /// it back.
    fn execute(&mut self, next_move: &Move) -> Footprint {
        let stamp = Some(self.ply + 1);
        let (source, dest) = (next_move.source(), next_move.dest());
        let mut footprint = Footprint {
            mover: self[source].last_move(),
            captured: None,
            rook: None,
        };
        if next_move.is_castle() {
            let (rook_from, rook_to) = rook_walk(next_move);
            footprint.rook = self[rook_from].last_move();
            self.relocate(source, dest, stamp);
            self.relocate(rook_from, rook_to, stamp);
        } else if next_move.is_en_passant() {
            let victim = Position::new(source.row(), dest.col());
            footprint.captured = self[victim].last_move();
            self.remove(victim);
            self.relocate(source, dest, stamp);
        } else if let Some(promotion) = next_move.promotion() {
            footprint.captured = self[dest].last_move();
            let owner = self[source].owner();
            self.remove(source);
            *self.cell_mut(dest) = Piece {
                last_move: stamp,
                ..Piece::new(promotion.into(), owner, dest)
            };
        } else if next_move.capture() != PieceKind::Space {
            footprint.captured = self[dest].last_move();
            self.remove(dest);
            self.relocate(source, dest, stamp);
        } else {
            self.relocate(source, dest, stamp);
        }
        footprint
    }

    /// Inverse of [`Board::execute`].
    fn reverse(&mut self, last: &Move, footprint: Footprint) {
        let (source, dest) = (last.source(), last.dest());
        let opponent = last.mover().opponent();
        let restored = |kind: PieceKind, position: Position| match kind {
            PieceKind::Space => Piece::space(position),
            _ => Piece {
                last_move: footprint.captured,
                ..Piece::new(kind, opponent, position)
            },
        };
        if last.is_castle() {
            let (rook_from, rook_to) = rook_walk(last);
            self.relocate(dest, source, footprint.mover);
            self.relocate(rook_to, rook_from, footprint.rook);
        } else if last.is_en_passant() {
            let victim = Position::new(source.row(), dest.col());
            self.relocate(dest, source, footprint.mover);
            *self.cell_mut(victim) = restored(PieceKind::Pawn, victim);
        } else if last.promotion().is_some() {
            *self.cell_mut(source) = Piece {
                last_move: footprint.mover,
                ..Piece::new(PieceKind::Pawn, last.mover(), source)
            };
            *self.cell_mut(dest) = restored(last.capture(), dest);
        } else {
            self.relocate(dest, source, footprint.mover);
            *self.cell_mut(dest) = restored(last.capture(), dest);
        }
    }

    /// Moves the piece on `from` to the (empty) cell `to`; the placeholder
    /// takes its place.
    fn relocate(&mut self, from: Position, to: Position, stamp: Option<u32>) {
        self.exchange(from, to);
        self.cell_mut(to).last_move = stamp;
    }

    fn exchange(&mut self, first: Position, second: Position) {
        let (first_piece, second_piece) = (self[first], self[second]);
        *self.cell_mut(first) = Piece {
            position: first,
            ..second_piece
        };
        *self.cell_mut(second) = Piece {
            position: second,
            ..first_piece
        };
    }

    fn cell_mut(&mut self, position: Position) -> &mut Piece {
        let (row, col) = position
            .cell()
            .unwrap_or_else(|| panic!("position {position} is outside the board"));
        &mut self.cells[row][col]
    }

    /// Checks that every piece knows where it stands.
    fn verify(&self) -> anyhow::Result<()> {
        for (row, pieces) in self.cells.iter().enumerate() {
            for (col, piece) in pieces.iter().enumerate() {
                let expected = Position::from_cell(row, col);
                if piece.position() != expected {
                    bail!(
                        "{piece} on {expected} believes it is on {}",
                        piece.position()
                    );
                }
            }
        }
        Ok(())
    }

    /// [`Board::verify`] that is fatal in debug builds.
    fn verified(&self, operation: &str) -> anyhow::Result<()> {
        let verification = self.verify().with_context(|| format!("while {operation}"));
        debug_assert!(
            verification.is_ok(),
            "board invariant violated: {verification:?}"
        );
        verification
    }
}

/// Rook squares (from, to) of a castling move.
fn rook_walk(castle: &Move) -> (Position, Position) {
    let row = castle.source().row();
    if castle.is_castle_kingside() {
        (
            Position::new(row, KINGSIDE_ROOK_HOME),
            Position::new(row, KING_HOME + 1),
        )
    } else {
        (
            Position::new(row, QUEENSIDE_ROOK_HOME),
            Position::new(row, KING_HOME - 1),
        )
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl Index<Position> for Board {
    type Output = Piece;

    /// # Panics
    ///
    /// For positions outside the board. Use [`Board::at`] for checked access.
    fn index(&self, position: Position) -> &Self::Output {
        self.at(position)
            .unwrap_or_else(|| panic!("position {position} is outside the board"))
    }
}

impl fmt::Display for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, pieces) in self.cells.iter().enumerate() {
            for (col, piece) in pieces.iter().enumerate() {
                write!(f, "{piece}")?;
                if col != WIDTH - 1 {
                    write!(f, "{SQUARE_SEPARATOR}")?;
                }
            }
            if row != WIDTH - 1 {
                write!(f, "{LINE_SEPARATOR}")?;
            }
        }
        Ok(())
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    /// Parses the diagram produced by [`fmt::Display`]: eight rows from the
    /// top, one symbol per square. Whitespace between squares is optional.
    /// Every piece is unmoved and White moves first.
    fn try_from(diagram: &str) -> anyhow::Result<Self> {
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != WIDTH {
            bail!("diagram should have {WIDTH} rows, got {}", rows.len());
        }
        let mut board = Self::empty();
        for (row, line) in (0..).zip(rows) {
            let symbols: Vec<char> = line.split_whitespace().flat_map(str::chars).collect();
            if symbols.len() != WIDTH {
                bail!(
                    "row '{line}' should have {WIDTH} squares, got {}",
                    symbols.len()
                );
            }
            for (col, symbol) in (0..).zip(symbols) {
                if symbol == '.' {
                    continue;
                }
                let owner = if symbol.is_ascii_uppercase() {
                    Player::White
                } else {
                    Player::Black
                };
                let kind = PieceKind::try_from(symbol.to_ascii_lowercase())?;
                board.place(kind, owner, Position::new(row, col))?;
            }
        }
        Ok(board)
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Board;
    use crate::chess::core::{PieceKind, Player, Position};
    use crate::chess::moves::Move;

    fn completed(board: &Board, text: &str) -> Move {
        let mut result = Move::read(text);
        result.complete(board);
        result
    }

    #[test]
    fn empty_board() {
        let board = Board::empty();
        assert!(board.pieces().all(|piece| piece.is_space()));
        assert_eq!(board.pieces().count(), 64);
        assert!(board.verify().is_ok());
    }

    #[test]
    fn side_to_move_follows_ply_parity() {
        let mut board = Board::starting();
        assert_eq!(board.side_to_move(), Player::White);
        assert!(board.is_white_turn());
        assert!(board.apply_move(&completed(&board, "e2e4")));
        assert_eq!(board.side_to_move(), Player::Black);
        assert!(!board.is_white_turn());

        let black_first = Board::new(Player::Black);
        assert_eq!(black_first.side_to_move(), Player::Black);
    }

    #[test]
    fn swap_keeps_positions_in_sync() {
        let mut board = Board::starting();
        let (a, b) = (Position::new(7, 0), Position::new(4, 4));
        board.swap(a, b).unwrap();
        assert_eq!(board[b].kind(), PieceKind::Rook);
        assert_eq!(board[b].position(), b);
        assert_eq!(board[b].last_move(), Some(0));
        assert!(board[a].is_space());
        assert_eq!(board[a].last_move(), None);
        assert!(board.swap(a, Position::INVALID).is_err());
    }

    #[test]
    fn place_and_remove() {
        let mut board = Board::empty();
        let square = Position::new(3, 3);
        board.place(PieceKind::Queen, Player::Black, square).unwrap();
        assert_eq!(board[square].kind(), PieceKind::Queen);
        assert_eq!(board[square].owner(), Player::Black);
        board.remove(square);
        assert!(board[square].is_space());
        board.remove(Position::INVALID);
        assert!(board
            .place(PieceKind::King, Player::White, Position::INVALID)
            .is_err());
    }

    #[test]
    fn rejections_are_explained() {
        let board = Board::starting();
        assert_eq!(
            board
                .check_move(&completed(&board, "e7e5"))
                .unwrap_err()
                .to_string(),
            "expected a piece of w to move, got p on e7"
        );
        assert_eq!(
            board
                .check_move(&completed(&board, "e4e5"))
                .unwrap_err()
                .to_string(),
            "there is no piece on e4"
        );
        assert_eq!(
            board
                .check_move(&completed(&board, "a1a2"))
                .unwrap_err()
                .to_string(),
            "destination a2 is occupied by own P"
        );
        assert_eq!(
            board
                .check_move(&Move::read("b1c3p"))
                .unwrap_err()
                .to_string(),
            "expected 'p' on c3, got ' '"
        );
        assert_eq!(
            board
                .check_move(&Move::read("e2e4z"))
                .unwrap_err()
                .to_string(),
            "malformed move text 'e2e4z'"
        );
    }

    #[test]
    fn diagram() {
        let starting = Board::starting();
        assert_eq!(
            Board::try_from(starting.to_string().as_str()).unwrap(),
            starting
        );
        let compact = Board::try_from(
            "
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            ....K..R
            ",
        )
        .unwrap();
        assert_eq!(compact.pieces().filter(|piece| !piece.is_space()).count(), 3);
        assert_eq!(compact[Position::new(7, 7)].kind(), PieceKind::Rook);
        assert_eq!(
            Board::try_from("k").unwrap_err().to_string(),
            "diagram should have 8 rows, got 1"
        );
        assert!(Board::try_from(
            "
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            ....K..X
            "
        )
        .is_err());
    }

    #[test]
    fn undo_without_history() {
        let mut board = Board::starting();
        assert_eq!(
            board.undo().unwrap_err().to_string(),
            "there are no moves to undo"
        );
    }
}
