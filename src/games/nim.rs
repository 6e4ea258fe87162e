use std::fmt::Display;

use smallvec::SmallVec;

use crate::{
    game::{Game, Move, State},
    player::PlayerId,
};

pub type Piles = SmallVec<[u32; 8]>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NimError {
    #[error("consecutive moves by the same player: {0}")]
    ConsecutiveMoves(PlayerId),
    #[error("invalid removal: {take} from pile {pile}")]
    InvalidRemoval { pile: usize, take: u32 },
}

/// The overall Nim game: initial pile sizes plus the opening player.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NimGame {
    piles: Piles,
}

impl NimGame {
    pub fn new(piles: impl IntoIterator<Item = u32>) -> Self {
        Self {
            piles: piles.into_iter().collect(),
        }
    }
}

impl Game for NimGame {
    type State = NimState;

    fn opener(&self) -> PlayerId {
        PlayerId::PlayerFirst
    }

    fn start(&self) -> NimState {
        NimState {
            piles: self.piles.clone(),
            last_mover: self.opener().opposite(),
        }
    }
}

/// Remove `take` tokens from pile `pile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NimMove {
    pub player: PlayerId,
    pub pile: usize,
    pub take: u32,
}

impl Move for NimMove {
    fn player(&self) -> PlayerId {
        self.player
    }
}

impl Display for NimMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: remove {} from pile {}", self.player, self.take, self.pile)
    }
}

/// A Nim position: the pile sizes plus who moved last.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NimState {
    piles: Piles,
    last_mover: PlayerId,
}

impl NimState {
    pub fn piles(&self) -> &[u32] {
        &self.piles
    }

    /// XOR over all pile sizes; zero exactly in the lost positions of
    /// normal-play Nim.
    pub fn nim_sum(&self) -> u32 {
        self.piles.iter().fold(0, |acc, &p| acc ^ p)
    }
}

impl State for NimState {
    type Move = NimMove;
    type Moves = SmallVec<[NimMove; 16]>;
    type Error = NimError;

    fn last_mover(&self) -> PlayerId {
        self.last_mover
    }

    fn is_terminal(&self) -> bool {
        self.piles.iter().all(|&p| p == 0)
    }

    fn winner(&self) -> Option<PlayerId> {
        // Whoever took the last token.
        self.is_terminal().then_some(self.last_mover)
    }

    fn moves(&self, player: PlayerId) -> Result<Self::Moves, NimError> {
        if player == self.last_mover {
            return Err(NimError::ConsecutiveMoves(player));
        }
        let mut result = SmallVec::new();
        for (pile, &size) in self.piles.iter().enumerate() {
            for take in 1..=size {
                result.push(NimMove { player, pile, take });
            }
        }
        Ok(result)
    }

    fn next(&self, mv: NimMove) -> Result<Self, NimError> {
        if mv.player == self.last_mover {
            return Err(NimError::ConsecutiveMoves(mv.player));
        }
        let NimMove { pile, take, .. } = mv;
        let Some(&size) = self.piles.get(pile) else {
            return Err(NimError::InvalidRemoval { pile, take });
        };
        if take < 1 || take > size {
            return Err(NimError::InvalidRemoval { pile, take });
        }
        let mut piles = self.piles.clone();
        piles[pile] -= take;
        Ok(Self {
            piles,
            last_mover: mv.player,
        })
    }
}
