use zerosum_sim::{
    game::State,
    player::PlayerId,
    rand::Rng,
    rng::RngState,
    smallvec::SmallVec,
};

/// Chooses the move played at each step of a simulated game.
pub trait RolloutPolicy<S: State>: Send + Sync {
    /// Picks one of `state`'s legal moves for `player`.
    ///
    /// Never called on a terminal state.
    fn choose_move(
        &self,
        state: &S,
        player: PlayerId,
        rng: &mut RngState,
    ) -> Result<S::Move, S::Error>;
}

/// Picks uniformly at random among the legal moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRandom;

impl<S: State> RolloutPolicy<S> for UniformRandom {
    fn choose_move(
        &self,
        state: &S,
        player: PlayerId,
        rng: &mut RngState,
    ) -> Result<S::Move, S::Error> {
        let moves: SmallVec<[S::Move; 16]> = state.moves(player)?.into_iter().collect();
        debug_assert!(!moves.is_empty(), "choose_move: non-terminal state has no legal moves");
        Ok(moves[rng.gen_range(0..moves.len())])
    }
}
