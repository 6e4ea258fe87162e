use rand::prelude::*;

/// Seedable RNG shared by every rollout of a search.
///
/// A single instance is threaded through all simulations so that a
/// seeded search is reproducible end to end, and sibling rollouts draw
/// from one entropy stream instead of separate unseeded sources.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct RngState(pub SmallRng);

impl RngState {
    #[inline]
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }
}

impl RngCore for RngState {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}
