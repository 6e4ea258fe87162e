use std::{
    fmt::Display,
    ops::{Add, AddAssign},
};

use zerosum_sim::{game::Outcome, player::PlayerId};

/// Win/playout counters of a single search node.
///
/// Wins are kept on a 0/1/2 scale: a loss adds 0, a draw adds 1 and a
/// win adds 2, so that `ratio` stays comparable across nodes with and
/// without drawn playouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub wins: u32,
    pub playouts: u32,
}

impl Tally {
    pub const ZERO: Self = Self { wins: 0, playouts: 0 };

    #[inline]
    pub fn new(wins: u32, playouts: u32) -> Self {
        Self { wins, playouts }
    }

    /// Exploitation term of UCT. `NaN` before the first playout.
    #[inline]
    pub fn ratio(self) -> f32 {
        (self.wins as f32) / (self.playouts as f32)
    }

    #[inline]
    pub fn record_playout(&mut self) {
        self.playouts += 1;
    }

    /// Credits `outcome` from the point of view of `mover`, the player
    /// whose move produced this node.
    #[inline]
    pub fn record_outcome(&mut self, outcome: Outcome, mover: PlayerId) {
        self.wins += match outcome {
            Outcome::Draw => 1,
            Outcome::Win(winner) if winner == mover => 2,
            Outcome::Win(_) => 0,
        };
    }
}

impl Add for Tally {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            wins: self.wins + other.wins,
            playouts: self.playouts + other.playouts,
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl From<(u32, u32)> for Tally {
    fn from((wins, playouts): (u32, u32)) -> Self {
        Self { wins, playouts }
    }
}

impl Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.wins, self.playouts)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn arb_tally() -> impl Strategy<Value = Tally> {
        (0u32..1000).prop_flat_map(|playouts| {
            (0..=2 * playouts.max(1), Just(playouts)).prop_map(Tally::from)
        })
    }

    #[test]
    fn outcomes_credit_the_mover() {
        let mover = PlayerId::PlayerFirst;
        let mut tally = Tally::ZERO;
        tally.record_playout();
        tally.record_outcome(Outcome::Win(mover), mover);
        assert_eq!(tally, Tally::new(2, 1));
        tally.record_playout();
        tally.record_outcome(Outcome::Win(mover.opposite()), mover);
        assert_eq!(tally, Tally::new(2, 2));
        tally.record_playout();
        tally.record_outcome(Outcome::Draw, mover);
        assert_eq!(tally, Tally::new(3, 3));
    }

    proptest! {
        #[test]
        fn add_is_commutative_and_associative(
            a in arb_tally(), b in arb_tally(), c in arb_tally()
        ) {
            prop_assert_eq!(a + b, b + a);
            prop_assert_eq!((a + b) + c, a + (b + c));
        }

        #[test]
        fn ratio_stays_on_the_win_scale(t in arb_tally()) {
            prop_assume!(t.playouts > 0);
            if t.wins <= 2 * t.playouts {
                let r = t.ratio();
                prop_assert!((0.0..=2.0).contains(&r));
            }
        }
    }
}
