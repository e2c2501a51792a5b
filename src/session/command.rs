use crate::chess::core::Position;

/// A single line of the text protocol.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// `click <square>`: select a square as if it was clicked.
    Click(Position),
    /// `hover <square>`: move the pointer.
    Hover(Position),
    /// `move <move>`: play a move in the textual encoding.
    Move(String),
    /// `moves <square>`: list the moves of the piece on the square.
    Moves(Position),
    Undo,
    Reset,
    History,
    /// `d` or `draw`: print the board.
    Draw,
    Quit,
    Unknown(String),
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["click", square] => Self::Click(Position::from_text(square)),
            ["hover", square] => Self::Hover(Position::from_text(square)),
            ["move", text] => Self::Move((*text).to_string()),
            ["moves", square] => Self::Moves(Position::from_text(square)),
            ["undo"] => Self::Undo,
            ["reset"] => Self::Reset,
            ["history"] => Self::History,
            ["d" | "draw"] => Self::Draw,
            ["quit"] => Self::Quit,
            _ => Self::Unknown(input.trim().to_string()),
        }
    }
}
