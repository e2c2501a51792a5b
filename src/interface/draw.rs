use std::fmt::{self, Write};

use crate::chess::core::{Position, BOARD_WIDTH};
use crate::chess::piece::Piece;

const WIDTH: usize = BOARD_WIDTH as usize;
#[allow(clippy::cast_possible_wrap)]
const RANKS: i8 = BOARD_WIDTH as i8;

/// Rendering surface the board draws itself onto, see
/// [`crate::chess::board::Board::display`].
///
/// Calls arrive in a fixed order: the background first, then the highlights
/// and finally every cell's piece.
pub trait Canvas {
    /// Clears the surface and draws the empty grid.
    fn draw_board(&mut self);
    /// Highlights the square under the pointer.
    fn draw_hover(&mut self, position: Position);
    /// Highlights the clicked square.
    fn draw_selected(&mut self, position: Position);
    /// Marks a destination the selected piece can move to.
    fn draw_possible(&mut self, position: Position);
    /// Draws the piece on its own square (including empty-cell placeholders).
    fn draw_piece(&mut self, piece: &Piece);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    symbol: char,
    possible: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: '.',
            possible: false,
        }
    }
}

/// Plain-text rendering with rank and file labels.
///
/// The selected square is drawn as `[x]`, the hovered one as `<x>` and
/// possible destinations as `*` when empty or `(x)` when a piece would be
/// captured there.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextCanvas {
    cells: [[Cell; WIDTH]; WIDTH],
    hover: Position,
    selected: Position,
}

impl TextCanvas {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        let (row, col) = position.cell()?;
        Some(&mut self.cells[row][col])
    }
}

impl Canvas for TextCanvas {
    fn draw_board(&mut self) {
        *self = Self::default();
    }

    fn draw_hover(&mut self, position: Position) {
        self.hover = position;
    }

    fn draw_selected(&mut self, position: Position) {
        self.selected = position;
    }

    fn draw_possible(&mut self, position: Position) {
        if let Some(cell) = self.cell_mut(position) {
            cell.possible = true;
        }
    }

    fn draw_piece(&mut self, piece: &Piece) {
        if let Some(cell) = self.cell_mut(piece.position()) {
            cell.symbol = piece.symbol();
        }
    }
}

impl fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in (0..).zip(&self.cells) {
            let mut line = (RANKS - row).to_string();
            for (col, cell) in (0..).zip(cells) {
                let position = Position::new(row, col);
                let symbol = cell.symbol;
                line += &if position == self.selected {
                    format!("[{symbol}]")
                } else if position == self.hover {
                    format!("<{symbol}>")
                } else if cell.possible && symbol == '.' {
                    " * ".to_string()
                } else if cell.possible {
                    format!("({symbol})")
                } else {
                    format!(" {symbol} ")
                };
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        f.write_char(' ')?;
        for file in 'a'..='h' {
            write!(f, " {file} ")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::TextCanvas;
    use crate::chess::board::Board;
    use crate::chess::core::Position;
    use crate::interface::Selection;

    #[test]
    fn starting_position() {
        let board = Board::starting();
        let mut canvas = TextCanvas::new();
        board.display(&mut canvas, &Selection::new(), &BTreeSet::new());
        assert_eq!(
            canvas.to_string(),
            "8 r  n  b  q  k  b  n  r\n\
             7 p  p  p  p  p  p  p  p\n\
             6 .  .  .  .  .  .  .  .\n\
             5 .  .  .  .  .  .  .  .\n\
             4 .  .  .  .  .  .  .  .\n\
             3 .  .  .  .  .  .  .  .\n\
             2 P  P  P  P  P  P  P  P\n\
             1 R  N  B  Q  K  B  N  R\n  \
             a  b  c  d  e  f  g  h "
        );
    }

    #[test]
    fn highlights() {
        let board = Board::starting();
        let knight = Position::from_text("g1");
        let mut ui = Selection::new();
        ui.select(knight);
        ui.hover_at(Position::from_text("h3"));
        let mut canvas = TextCanvas::new();
        board.display(&mut canvas, &ui, &board[knight].generate_moves(&board));
        let rendered = canvas.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[5], "3 .  .  .  .  .  *  . <.>");
        assert_eq!(lines[7], "1 R  N  B  Q  K  B [N] R");
    }
}
