//! Chess primitives commonly used within [`crate::chess`]: players, piece kinds
//! and board coordinates.

use std::fmt::{self, Write};

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Coordinates of a single cell on the board.
///
/// Rows go from the top (row 0 is rank 8, Black's back rank) to the bottom
/// (row 7 is rank 1, White's back rank); columns go from file `a` (column 0)
/// to file `h` (column 7).
///
/// A position is either on the board or the [`Position::INVALID`] sentinel,
/// which is used to mean "nothing selected". Constructing a position with
/// out-of-range coordinates yields the sentinel.
///
/// ```
/// use tabula::chess::core::Position;
///
/// assert_eq!(Position::new(6, 4).to_string(), "e2");
/// assert_eq!(Position::from_text("a8"), Position::new(0, 0));
/// assert!(!Position::new(8, 0).is_valid());
/// assert!(!Position::from_text("z9").is_valid());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    row: i8,
    col: i8,
}

impl Position {
    /// The sentinel for "no position".
    pub const INVALID: Self = Self { row: -1, col: -1 };

    /// Creates a position from row and column. Out-of-range coordinates
    /// produce [`Position::INVALID`].
    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        if row < 0 || row >= BOARD_WIDTH as i8 || col < 0 || col >= BOARD_WIDTH as i8 {
            return Self::INVALID;
        }
        Self { row, col }
    }

    /// Decodes a two-character square ("e2"). Unlike [`Position::try_from`],
    /// this never fails: malformed input produces [`Position::INVALID`].
    #[must_use]
    pub fn from_text(square: &str) -> Self {
        Self::try_from(square).unwrap_or(Self::INVALID)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub(crate) const fn from_cell(row: usize, col: usize) -> Self {
        Self::new(row as i8, col as i8)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn row(self) -> i8 {
        self.row
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn col(self) -> i8 {
        self.col
    }

    /// Returns false for the sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.row >= 0
            && self.row < BOARD_WIDTH as i8
            && self.col >= 0
            && self.col < BOARD_WIDTH as i8
    }

    /// Linear index of the cell (`row * 8 + col`) or `None` for the sentinel.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn index(self) -> Option<usize> {
        if self.is_valid() {
            Some(self.row as usize * BOARD_WIDTH as usize + self.col as usize)
        } else {
            None
        }
    }

    /// Grid coordinates for indexing the board cells.
    #[allow(clippy::cast_sign_loss)]
    pub(crate) const fn cell(self) -> Option<(usize, usize)> {
        if self.is_valid() {
            Some((self.row as usize, self.col as usize))
        } else {
            None
        }
    }

    /// Returns the neighbour shifted by the given deltas if it is still on the
    /// board.
    #[must_use]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        if !self.is_valid() {
            return None;
        }
        let candidate = Self::new(self.row.checked_add(d_row)?, self.col.checked_add(d_col)?);
        candidate.is_valid().then_some(candidate)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::INVALID
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    #[allow(clippy::cast_possible_wrap)]
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            )
        };
        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let rank = match rank {
            '1'..='8' => rank as u8 - b'1',
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        Ok(Self::new((BOARD_WIDTH - 1 - rank) as i8, col as i8))
    }
}

impl fmt::Display for Position {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell() {
            Some((row, col)) => {
                f.write_char((b'a' + col as u8) as char)?;
                f.write_char((b'8' - row as u8) as char)
            },
            None => f.write_str("--"),
        }
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row delta of a pawn step: White advances toward row 0.
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Row holding the player's non-pawn starting pieces.
    #[must_use]
    pub const fn back_rank(self) -> i8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Row the player's pawns start on (and may double-step from).
    #[must_use]
    pub const fn pawn_row(self) -> i8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Row on which the player's pawns promote.
    #[must_use]
    pub const fn promotion_row(self) -> i8 {
        self.opponent().back_rank()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Kinds of pieces occupying the board cells. [`PieceKind::Space`] is the
/// placeholder for an empty cell: every cell always holds exactly one piece.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    Space,
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase letter used by the move notation; blank for
    /// [`PieceKind::Space`].
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Space => ' ',
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    /// Parses the lowercase captured-piece letter of the move notation.
    fn try_from(letter: char) -> anyhow::Result<Self> {
        match letter {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            _ => bail!("piece kind should be within \"pnbrqk\", got '{letter}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.letter())
    }
}

/// A pawn reaching the farthest rank can be promoted to any of these. Queen is
/// inferred automatically, the others have to be requested explicitly.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(letter: char) -> anyhow::Result<Self> {
        match letter {
            'Q' => Ok(Self::Queen),
            'R' => Ok(Self::Rook),
            'B' => Ok(Self::Bishop),
            'N' => Ok(Self::Knight),
            _ => bail!("promotion should be within \"QRBN\", got '{letter}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(PieceKind::from(*self).letter().to_ascii_uppercase())
    }
}
