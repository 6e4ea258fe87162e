#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![doc = include_str!("../README.md")]

/// Two-player index type.
pub mod player;

/// Game model contracts: `Move`, `State`, `Game`, and the terminal `Outcome`.
pub mod game;

/// Pseudorandom number generation
pub mod rng;

/// Reference game implementations used to exercise the search engine.
pub mod games;

/// Re-exports the `smallvec` crate
pub use smallvec;

/// Re-exports the `rand` crate
pub use rand;

/// Re-exports the `thiserror` crate
pub use thiserror;

pub mod prelude {
    pub use crate::game::{Game, Move, Outcome, State};
    pub use crate::games::nim::{NimError, NimGame, NimMove, NimState};
    pub use crate::games::tictactoe::{TicTacToe, TicTacToeError, TicTacToeMove, TicTacToeState};
    pub use crate::player::PlayerId;
    pub use crate::rng::RngState;
}

#[cfg(test)]
mod tests;
