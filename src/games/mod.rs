/// Nim: piles of tokens, remove any positive count from one pile per
/// turn, the player who takes the last token wins.
pub mod nim;

/// 3×3 tic-tac-toe.
pub mod tictactoe;
