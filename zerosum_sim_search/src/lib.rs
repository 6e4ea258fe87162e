#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
//! Monte Carlo tree search over the game model of the `zerosum_sim` crate.

/// The search engine: tree, statistics, and the four-phase iteration.
pub mod mcts;

/// Rollout move selection for the simulation phase.
pub mod playout;

/// A search failure: either the game rules rejected a transition the
/// search attempted, or the tree is in no shape to answer.
#[derive(Debug, thiserror::Error)]
pub enum SearchError<E: std::error::Error> {
    #[error("game rule violation during search: {0}")]
    Game(#[from] E),
    #[error("best_move: root has no children")]
    NoChildren,
    #[error("best_move: no legal move matches the most-visited child")]
    NoMatchingMove,
}
