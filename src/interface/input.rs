use crate::chess::core::Position;

/// Source of user selections: what the pointer is over and which squares
/// were clicked. Every position may be [`Position::INVALID`].
pub trait Interaction {
    /// Square under the pointer.
    fn hover(&self) -> Position;
    /// Most recently clicked square.
    fn selected(&self) -> Position;
    /// Square clicked before [`Interaction::selected`], i.e. the source of
    /// a move attempt.
    fn previous(&self) -> Position;
    /// Forgets both clicked squares.
    fn clear_selection(&mut self);
}

/// Remembers the last two clicks and the hovered square.
///
/// ```
/// use tabula::chess::core::Position;
/// use tabula::interface::{Interaction, Selection};
///
/// let mut selection = Selection::new();
/// selection.select(Position::from_text("e2"));
/// selection.select(Position::from_text("e4"));
/// assert_eq!(selection.previous(), Position::from_text("e2"));
/// assert_eq!(selection.selected(), Position::from_text("e4"));
/// selection.clear_selection();
/// assert!(!selection.selected().is_valid());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    hover: Position,
    selected: Position,
    previous: Position,
}

impl Selection {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the pointer.
    pub fn hover_at(&mut self, position: Position) {
        self.hover = position;
    }

    /// Registers a click: the current selection becomes the previous one.
    pub fn select(&mut self, position: Position) {
        self.previous = self.selected;
        self.selected = position;
    }
}

impl Interaction for Selection {
    fn hover(&self) -> Position {
        self.hover
    }

    fn selected(&self) -> Position {
        self.selected
    }

    fn previous(&self) -> Position {
        self.previous
    }

    fn clear_selection(&mut self) {
        self.selected = Position::INVALID;
        self.previous = Position::INVALID;
    }
}
