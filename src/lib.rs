//! Chess rules mechanics: the board, its pieces and the moves between them.
//! For more information, see the README.
//!
//! The crate owns the 8×8 board state, infers what is special about a move
//! (castling, en passant, promotion, captures), applies and takes back moves
//! atomically and generates pseudo-legal destinations for any piece. It is
//! not a playing engine: there is no search, evaluation or check detection.
//!
//! ```
//! use tabula::chess::board::Board;
//! use tabula::chess::moves::Move;
//!
//! let mut board = Board::starting();
//! let mut next_move = Move::read("e2e4");
//! next_move.complete(&board);
//! assert!(board.apply_move(&next_move));
//! assert_eq!(board.ply(), 1);
//! assert!(!board.is_white_turn());
//! ```

pub mod chess;
pub mod config;
pub mod game;
pub mod interface;
pub mod session;

pub use config::Config;
pub use game::Game;
pub use session::Session;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the version and the build type on startup.
pub fn print_banner() {
    println!("Tabula {}", version());
    println!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
