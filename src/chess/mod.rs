//! Implementation of the chess board, its pieces and the rules of moving them.

pub mod board;
pub mod core;
pub mod moves;
pub mod piece;
