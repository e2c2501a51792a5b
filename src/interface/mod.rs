//! Narrow seams between the rules and the outside world: where the board is
//! drawn and where clicks come from.
//!
//! [`crate::chess::board::Board::display`] only talks to a [`Canvas`] and an
//! [`Interaction`], so any front-end (terminal, GUI, network) can be plugged
//! in without the rules knowing about it.

mod draw;
mod input;

pub use draw::{Canvas, TextCanvas};
pub use input::{Interaction, Selection};
