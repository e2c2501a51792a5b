//! Move representation, inference from board context and the textual move
//! encoding.
//!
//! The encoding is `<source><destination>[flags]` where squares are written
//! as file letter and rank digit (`e2e4`) and the flags are:
//!
//! | Flag | Meaning |
//! | ---- | ------- |
//! | `E` | en passant |
//! | `c` | kingside castle |
//! | `C` | queenside castle |
//! | `Q`, `R`, `B`, `N` | promotion target |
//! | `p`, `n`, `b`, `r`, `q`, `k` | captured piece (omitted for en passant) |
//!
//! Flags can appear in any order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Player, Position, Promotion};
use crate::chess::piece::Piece;

bitflags::bitflags! {
    /// Special-move markers of a [`Move`].
    ///
    /// Castling is technically a king move, so `source` and `destination` of
    /// a castling move correspond to the king; the rook is moved implicitly.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct MoveFlags: u8 {
        /// Pawn capturing an opponent pawn that has just double-stepped past
        /// it.
        const EN_PASSANT = 0b001;
        /// Short castle or O-O.
        const CASTLE_KINGSIDE = 0b010;
        /// Long castle or O-O-O.
        const CASTLE_QUEENSIDE = 0b100;
    }
}

/// A single ply: where a piece goes from and to, and what is special about
/// it.
///
/// A freshly constructed move only knows its squares; [`Move::complete`] fills
/// in the rest from the board it is going to be applied to. Moves read from
/// text carry whatever the text specifies.
///
/// Equality and ordering consider the squares, flags, promotion, captured
/// kind and mover. The parse error is ignored: it is only a record of the
/// text that could not be read.
#[derive(Clone, Debug)]
pub struct Move {
    pub(super) source: Position,
    pub(super) dest: Position,
    pub(super) promotion: Option<Promotion>,
    pub(super) capture: PieceKind,
    pub(super) flags: MoveFlags,
    pub(super) mover: Player,
    pub(super) error: Option<String>,
}

impl Move {
    /// Creates a move with only source and destination known.
    #[must_use]
    pub const fn new(source: Position, dest: Position) -> Self {
        Self {
            source,
            dest,
            promotion: None,
            capture: PieceKind::Space,
            flags: MoveFlags::empty(),
            mover: Player::White,
            error: None,
        }
    }

    /// Creates a pawn move with an explicit promotion target. This is the only
    /// way (apart from text) to request under-promotion.
    #[must_use]
    pub fn with_promotion(source: Position, dest: Position, promotion: Promotion) -> Self {
        let mut result = Self::new(source, dest);
        result.promotion = Some(promotion);
        result
    }

    pub(super) fn candidate(
        piece: &Piece,
        dest: Position,
        capture: PieceKind,
        flags: MoveFlags,
    ) -> Self {
        Self {
            capture,
            flags,
            mover: piece.owner(),
            ..Self::new(piece.position(), dest)
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn source(&self) -> Position {
        self.source
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn dest(&self) -> Position {
        self.dest
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// Kind of the piece removed from the destination; [`PieceKind::Space`]
    /// when nothing is captured there.
    #[must_use]
    pub const fn capture(&self) -> PieceKind {
        self.capture
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    /// Color of the moving piece. Only meaningful after [`Move::complete`] or
    /// for generated moves.
    #[must_use]
    pub const fn mover(&self) -> Player {
        self.mover
    }

    /// Original text of a move that could not be parsed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_castle_kingside(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_KINGSIDE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_castle_queenside(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_QUEENSIDE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_castle(&self) -> bool {
        self.flags
            .intersects(MoveFlags::CASTLE_KINGSIDE | MoveFlags::CASTLE_QUEENSIDE)
    }

    /// Fills in everything that can be inferred from the board: captured kind,
    /// mover, default (queen) promotion, en passant and castling. The board is
    /// only read.
    ///
    /// Moves with squares outside the board are left untouched.
    pub fn complete(&mut self, board: &Board) {
        let (Some(piece), Some(target)) = (board.at(self.source), board.at(self.dest)) else {
            return;
        };
        self.capture = target.kind();
        self.mover = piece.owner();
        match piece.kind() {
            PieceKind::Pawn => {
                if self.dest.row() == self.mover.promotion_row() && self.promotion.is_none() {
                    self.promotion = Some(Promotion::Queen);
                }
                if target.is_space() && board.en_passant_target(piece) == Some(self.dest) {
                    self.flags |= MoveFlags::EN_PASSANT;
                }
            },
            PieceKind::King => {
                if let Some(side) = board.castle_side(piece, self.dest) {
                    self.flags |= side;
                }
            },
            _ => {},
        }
    }

    /// Parses the textual encoding. This never fails: malformed input is
    /// recorded in [`Move::error`] and printed back verbatim by
    /// [`fmt::Display`].
    #[must_use]
    pub fn read(text: &str) -> Self {
        match Self::parse(text) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(text, error = %e, "malformed move text");
                Self {
                    error: Some(text.to_string()),
                    ..Self::new(
                        text.get(0..2).map_or(Position::INVALID, Position::from_text),
                        text.get(2..4).map_or(Position::INVALID, Position::from_text),
                    )
                }
            },
        }
    }

    fn parse(text: &str) -> anyhow::Result<Self> {
        let (Some(source), Some(dest), Some(flags)) = (text.get(0..2), text.get(2..4), text.get(4..))
        else {
            bail!("move should have at least 4 chars, got '{text}'")
        };
        let mut result = Self::new(Position::try_from(source)?, Position::try_from(dest)?);
        for flag in flags.chars() {
            match flag {
                'E' => result.flags |= MoveFlags::EN_PASSANT,
                'c' => result.flags |= MoveFlags::CASTLE_KINGSIDE,
                'C' => result.flags |= MoveFlags::CASTLE_QUEENSIDE,
                'Q' | 'R' | 'B' | 'N' => result.promotion = Some(Promotion::try_from(flag)?),
                'p' | 'n' | 'b' | 'r' | 'q' | 'k' => result.capture = PieceKind::try_from(flag)?,
                _ => bail!("unknown move flag '{flag}' in '{text}'"),
            }
        }
        Ok(result)
    }

    #[allow(clippy::type_complexity)]
    fn key(&self) -> (Position, Position, MoveFlags, Option<Promotion>, PieceKind, Player) {
        (
            self.source,
            self.dest,
            self.flags,
            self.promotion,
            self.capture,
            self.mover,
        )
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Move {}

impl PartialOrd for Move {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Move {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    fn try_from(text: &str) -> anyhow::Result<Self> {
        Self::parse(text)
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> anyhow::Result<Self> {
        Self::parse(text)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return f.write_str(error);
        }
        write!(f, "{}{}", self.source, self.dest)?;
        if self.is_en_passant() {
            f.write_str("E")?;
        }
        if self.is_castle_kingside() {
            f.write_str("c")?;
        }
        if self.is_castle_queenside() {
            f.write_str("C")?;
        }
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        if self.capture != PieceKind::Space && !self.is_en_passant() {
            write!(f, "{}", self.capture)?;
        }
        Ok(())
    }
}
