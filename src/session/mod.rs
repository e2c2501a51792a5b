//! The session connects the game to a line-oriented text protocol: every
//! input line is a command, every command produces output lines.
//!
//! [`Session::run`] is the "main loop" of the binary. It is generic over the
//! I/O so that tests can drive it with in-memory buffers.

use std::io::{BufRead, Write};

use itertools::Itertools;
use tracing::{debug, info};

use crate::chess::core::{Player, Position};
use crate::game::{Click, Game};
use crate::interface::{Interaction, Selection, TextCanvas};
use crate::session::command::Command;

mod command;

/// Owns the game and the selection state and handles commands read from the
/// input, including I/O.
pub struct Session<'a, R: BufRead, W: Write> {
    game: Game,
    ui: Selection,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a new session with the starting position and provided I/O.
    #[must_use]
    pub fn new(first_player: Player, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game: Game::new(first_player),
            ui: Selection::new(),
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes commands until
    /// `quit` is sent or the input ends.
    ///
    /// Malformed commands and illegal moves are reported on the output and
    /// do not stop the session.
    ///
    /// # Errors
    ///
    /// Only I/O failures end the session with an error.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let command = Command::parse(&line);
            debug!(?command, "received command");
            match command {
                Command::Click(square) => self.handle_click(square)?,
                Command::Hover(square) => {
                    self.ui.hover_at(square);
                    writeln!(self.output, "ok")?;
                },
                Command::Move(text) => self.handle_move(&text)?,
                Command::Moves(square) => {
                    let hints = self.game.hints(square);
                    writeln!(self.output, "moves {}", hints.iter().join(" "))?;
                },
                Command::Undo => match self.game.undo() {
                    Ok(undone) => writeln!(self.output, "undone {undone}")?,
                    Err(e) => writeln!(self.output, "error: {e}")?,
                },
                Command::Reset => {
                    self.game.reset();
                    self.ui.clear_selection();
                    writeln!(self.output, "ok")?;
                },
                Command::History => {
                    writeln!(
                        self.output,
                        "history {}",
                        self.game.board().history().iter().join(" ")
                    )?;
                },
                Command::Draw => self.handle_draw()?,
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(self.output, "error: unsupported command '{command}'")?;
                },
            }
            self.output.flush()?;
        }
        info!(ply = self.game.board().ply(), "session finished");
        Ok(())
    }

    fn handle_click(&mut self, square: Position) -> anyhow::Result<()> {
        self.ui.select(square);
        match self.game.on_click(&mut self.ui) {
            Click::Moved(played) => writeln!(self.output, "moved {played}")?,
            Click::Hinted => writeln!(
                self.output,
                "moves {}",
                self.game.possible().iter().join(" ")
            )?,
            Click::Cleared => writeln!(self.output, "cleared")?,
        }
        Ok(())
    }

    fn handle_move(&mut self, text: &str) -> anyhow::Result<()> {
        match self.game.play(text) {
            Ok(true) => writeln!(self.output, "ok")?,
            Ok(false) => writeln!(self.output, "illegal")?,
            Err(e) => writeln!(self.output, "error: {e}")?,
        }
        Ok(())
    }

    /// Prints the board together with the current selection and hints, then
    /// whose turn it is.
    fn handle_draw(&mut self) -> anyhow::Result<()> {
        let mut canvas = TextCanvas::new();
        self.game.draw(&mut canvas, &self.ui);
        writeln!(self.output, "{canvas}")?;
        writeln!(
            self.output,
            "{} to move, ply {}",
            self.game.board().side_to_move(),
            self.game.board().ply()
        )?;
        Ok(())
    }
}
