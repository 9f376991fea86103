use serde::{Deserialize, Serialize};

pub use error::*;
pub use minesweeper::*;
pub use snake::*;
pub use stats::*;
pub use tictactoe::*;
pub use types::*;

mod error;
mod minesweeper;
mod snake;
mod stats;
mod tictactoe;
mod types;

/// The games offered by the arcade menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Snake,
    Minesweeper,
    TicTacToe,
}

impl GameKind {
    /// Name used as the key in the persisted high score table.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Snake => "Snake Game",
            Self::Minesweeper => "Minesweeper",
            Self::TicTacToe => "Tic Tac Toe",
        }
    }
}

impl core::fmt::Display for GameKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
