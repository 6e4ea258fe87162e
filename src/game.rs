use std::fmt::Debug;

use crate::player::PlayerId;

/// The result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Win(PlayerId),
    Draw,
}

impl Outcome {
    #[inline]
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            Outcome::Win(player) => Some(player),
            Outcome::Draw => None,
        }
    }
}

/// An action value: the acting player plus the action's parameters.
///
/// Compared by value, so that search can map a resulting state back to
/// the move that produced it.
pub trait Move: Copy + Clone + Debug + PartialEq + Eq + Send + Sync {
    fn player(&self) -> PlayerId;
}

/// An immutable position of a sequential, perfect-information,
/// two-player zero-sum game.
///
/// Turn alternation is encoded by remembering who moved *last*:
/// [`State::player`] is a pure derived value and cannot drift out of
/// sync with the move history.
pub trait State: Clone + Debug + PartialEq + Send + Sync {
    type Move: Move;
    type Moves: IntoIterator<Item = Self::Move>;
    type Error: std::error::Error + Send + Sync + 'static;

    /// The player who made the move leading into this state.
    ///
    /// The start state reports the opener's opponent, so that the opener
    /// is the first player to move.
    fn last_mover(&self) -> PlayerId;

    /// Whose turn it is. Meaningless on a terminal state; do not call there.
    #[inline]
    fn player(&self) -> PlayerId {
        self.last_mover().opposite()
    }

    fn is_terminal(&self) -> bool;

    /// The winning player, if any. `None` both on a draw and on a state
    /// still in progress; check [`State::is_terminal`] to tell them apart.
    fn winner(&self) -> Option<PlayerId>;

    /// The terminal outcome, or `None` while the game is in progress.
    #[inline]
    fn outcome(&self) -> Option<Outcome> {
        if !self.is_terminal() {
            return None;
        }
        Some(self.winner().map(Outcome::Win).unwrap_or(Outcome::Draw))
    }

    /// All legal moves for `player`.
    ///
    /// Errors when `player` is not the player to move: asking for the
    /// previous mover's moves signals a turn-alternation bug in the
    /// caller and must not silently return wrong moves.
    fn moves(&self, player: PlayerId) -> Result<Self::Moves, Self::Error>;

    /// Applies a legal move and returns the resulting state, with the
    /// mover recorded. Errors on an illegal move.
    fn next(&self, mv: Self::Move) -> Result<Self, Self::Error>;
}

/// Factory for a game's initial position.
///
/// One instance is shared read-only by every state and search node it
/// produces.
pub trait Game: Clone + Debug + Send + Sync {
    type State: State;

    /// The player who moves first. Constant for a game instance.
    fn opener(&self) -> PlayerId;

    /// The initial position; `start().player() == opener()`.
    fn start(&self) -> Self::State;
}
