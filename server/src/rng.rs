//! Deterministic random source for the particle pass.
//!
//! A 32-bit linear congruential generator whose whole state is one word owned
//! by the caller. Every draw site derives a fresh seed from stable inputs
//! (particle index, frame counter, event slot), so workers never share a
//! generator and a fixed input sequence always reproduces the same run.

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed used when a particle is first placed.
    pub fn for_init(index: u32) -> Self {
        Self::new(index.wrapping_mul(2_654_435_761) ^ 0x1234_5678)
    }

    /// Seed used when a particle comes back after its cooldown.
    pub fn for_respawn(index: u32, frame: u32) -> Self {
        Self::new(index.wrapping_mul(9781).wrapping_add(frame.wrapping_mul(6271)))
    }

    /// Seed used to sample the cooldown after a lethal hit from projectile `slot`.
    pub fn for_kill(index: u32, frame: u32, slot: u32) -> Self {
        Self::new(
            index
                .wrapping_mul(928_371)
                .wrapping_add(frame.wrapping_mul(689_287))
                .wrapping_add(slot.wrapping_mul(131)),
        )
    }

    /// Seed used for barrier jitter.
    pub fn for_jitter(index: u32, frame: u32) -> Self {
        Self::new(index ^ frame.wrapping_mul(0x9e37_79b9))
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    fn advance(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Uniform float in `[0, 1)` built from the upper 24 bits of the next state.
    pub fn next01(&mut self) -> f32 {
        (self.advance() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next01() * (hi - lo)
    }

    /// Fair coin from the top bit; the low bits of an LCG cycle too quickly.
    pub fn coin(&mut self) -> bool {
        self.advance() >> 31 == 1
    }

    /// Uniform integer in `0..4` from the top two bits.
    pub fn quadrant(&mut self) -> u32 {
        self.advance() >> 30
    }
}
