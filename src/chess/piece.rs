//! Pieces and their movement patterns.
//!
//! Every cell of the [`Board`] holds exactly one [`Piece`]; empty cells hold a
//! [`PieceKind::Space`] placeholder. Move generation is pseudo-legal: it
//! follows the movement pattern and board occupancy but never checks whether
//! the mover's king is left exposed.

use std::collections::BTreeSet;
use std::fmt::{self, Write};

use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Player, Position, Promotion};
use crate::chess::moves::{Move, MoveFlags};

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
#[rustfmt::skip]
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
    (1, -2), (2, -1), (2, 1), (1, 2),
];
#[rustfmt::skip]
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

/// A piece together with its owner, location and the ply it last moved on.
///
/// The stored position always matches the cell the piece occupies; the
/// [`Board`] keeps it in sync when pieces are relocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub(super) kind: PieceKind,
    pub(super) owner: Player,
    pub(super) position: Position,
    pub(super) last_move: Option<u32>,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[must_use]
    pub const fn new(kind: PieceKind, owner: Player, position: Position) -> Self {
        Self {
            kind,
            owner,
            position,
            last_move: None,
        }
    }

    /// Creates an empty-cell placeholder. Its owner is meaningless and set to
    /// White.
    #[must_use]
    pub const fn space(position: Position) -> Self {
        Self::new(PieceKind::Space, Player::White, position)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The ply number this piece last moved on, `None` if it never moved.
    #[must_use]
    pub const fn last_move(&self) -> Option<u32> {
        self.last_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_space(&self) -> bool {
        self.kind == PieceKind::Space
    }

    /// True for real pieces owned by `player`.
    #[must_use]
    pub fn is_friend_of(&self, player: Player) -> bool {
        !self.is_space() && self.owner == player
    }

    /// True for real pieces owned by the opponent of `player`.
    #[must_use]
    pub fn is_opponent_of(&self, player: Player) -> bool {
        !self.is_space() && self.owner != player
    }

    /// FEN-style symbol: uppercase for White, lowercase for Black and `.` for
    /// empty cells.
    #[must_use]
    pub const fn symbol(&self) -> char {
        match (self.owner, self.kind) {
            (_, PieceKind::Space) => '.',
            (Player::White, kind) => kind.letter().to_ascii_uppercase(),
            (Player::Black, kind) => kind.letter(),
        }
    }

    /// Calculates the pseudo-legal moves of this piece from its current
    /// position. The result is empty for [`PieceKind::Space`].
    ///
    /// Generated moves carry the mover, the kind of the captured piece and
    /// the special-move flags, so they are directly comparable to moves
    /// completed with [`Move::complete`].
    #[must_use]
    pub fn generate_moves(&self, board: &Board) -> BTreeSet<Move> {
        let mut moves = BTreeSet::new();
        match self.kind {
            PieceKind::Space => {},
            PieceKind::Pawn => self.pawn_moves(board, &mut moves),
            PieceKind::Knight => self.step_moves(board, &KNIGHT_JUMPS, &mut moves),
            PieceKind::Bishop => self.sliding_moves(board, &DIAGONAL, &mut moves),
            PieceKind::Rook => self.sliding_moves(board, &ORTHOGONAL, &mut moves),
            PieceKind::Queen => {
                self.sliding_moves(board, &ORTHOGONAL, &mut moves);
                self.sliding_moves(board, &DIAGONAL, &mut moves);
            },
            PieceKind::King => {
                self.step_moves(board, &KING_STEPS, &mut moves);
                self.castling_candidates(board, &mut moves);
            },
        }
        tracing::trace!(piece = %self, from = %self.position, count = moves.len(), "generated moves");
        moves
    }

    fn candidate(&self, board: &Board, to: Position, flags: MoveFlags) -> Move {
        Move::candidate(self, to, board[to].kind(), flags)
    }

    /// Walks each ray until the edge or the first occupied square, which is
    /// included only when it holds an opponent piece.
    fn sliding_moves(&self, board: &Board, directions: &[(i8, i8)], moves: &mut BTreeSet<Move>) {
        for &(d_row, d_col) in directions {
            let mut current = self.position;
            while let Some(next) = current.offset(d_row, d_col) {
                let target = &board[next];
                if target.is_space() {
                    let _ = moves.insert(self.candidate(board, next, MoveFlags::empty()));
                    current = next;
                    continue;
                }
                if target.is_opponent_of(self.owner) {
                    let _ = moves.insert(self.candidate(board, next, MoveFlags::empty()));
                }
                break;
            }
        }
    }

    fn step_moves(&self, board: &Board, offsets: &[(i8, i8)], moves: &mut BTreeSet<Move>) {
        for &(d_row, d_col) in offsets {
            if let Some(to) = self.position.offset(d_row, d_col) {
                if !board[to].is_friend_of(self.owner) {
                    let _ = moves.insert(self.candidate(board, to, MoveFlags::empty()));
                }
            }
        }
    }

    /// Castling candidates only require the squares between the king and the
    /// corner to be empty. Whether the king and the rook are unmoved and in
    /// place is decided by [`Move::complete`].
    fn castling_candidates(&self, board: &Board, moves: &mut BTreeSet<Move>) {
        let path_is_empty = |direction: i8, length: i8| {
            (1..=length).all(|distance| {
                self.position
                    .offset(0, direction * distance)
                    .is_some_and(|square| board[square].is_space())
            })
        };
        if let Some(to) = self.position.offset(0, 2) {
            if path_is_empty(1, 2) {
                let _ = moves.insert(self.candidate(board, to, MoveFlags::CASTLE_KINGSIDE));
            }
        }
        if let Some(to) = self.position.offset(0, -2) {
            if path_is_empty(-1, 3) {
                let _ = moves.insert(self.candidate(board, to, MoveFlags::CASTLE_QUEENSIDE));
            }
        }
    }

    fn pawn_moves(&self, board: &Board, moves: &mut BTreeSet<Move>) {
        let forward = self.owner.forward();
        let mut push = |to: Position, flags: MoveFlags| {
            let mut candidate = self.candidate(board, to, flags);
            if to.row() == self.owner.promotion_row() {
                candidate.promotion = Some(Promotion::Queen);
            }
            let _ = moves.insert(candidate);
        };
        if let Some(single) = self.position.offset(forward, 0) {
            if board[single].is_space() {
                push(single, MoveFlags::empty());
                if self.position.row() == self.owner.pawn_row() {
                    if let Some(double) = single.offset(forward, 0) {
                        if board[double].is_space() {
                            push(double, MoveFlags::empty());
                        }
                    }
                }
            }
        }
        for d_col in [-1, 1] {
            if let Some(to) = self.position.offset(forward, d_col) {
                if board[to].is_opponent_of(self.owner) {
                    push(to, MoveFlags::empty());
                }
            }
        }
        if let Some(to) = board.en_passant_target(self) {
            push(to, MoveFlags::EN_PASSANT);
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Piece;
    use crate::chess::board::Board;
    use crate::chess::core::{PieceKind, Player, Position};

    #[test]
    fn symbols() {
        let square = Position::new(0, 0);
        assert_eq!(Piece::new(PieceKind::King, Player::White, square).to_string(), "K");
        assert_eq!(Piece::new(PieceKind::Knight, Player::Black, square).to_string(), "n");
        assert_eq!(Piece::space(square).to_string(), ".");
    }

    #[test]
    fn space_has_no_moves() {
        let board = Board::starting();
        assert!(board[Position::new(4, 4)].generate_moves(&board).is_empty());
    }

    #[test]
    fn friends_and_opponents() {
        let square = Position::new(3, 3);
        let rook = Piece::new(PieceKind::Rook, Player::Black, square);
        assert!(rook.is_friend_of(Player::Black));
        assert!(rook.is_opponent_of(Player::White));
        let space = Piece::space(square);
        assert!(!space.is_friend_of(Player::White));
        assert!(!space.is_opponent_of(Player::Black));
    }
}
