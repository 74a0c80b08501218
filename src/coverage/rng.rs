use rand::{Error, RngCore, SeedableRng};

/// 32-bit linear congruential generator (Numerical Recipes constants).
///
/// Golden outputs depend on this exact stream, so the search draws from it
/// directly instead of through `rand`'s distribution machinery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg32 {
    state: u32,
}

impl Lcg32 {
    pub const MULTIPLIER: u32 = 1_664_525;
    pub const INCREMENT: u32 = 1_013_904_223;

    /// Seeds with the low 32 bits of `seed`; a zero seed becomes 1
    pub fn new(seed: u64) -> Self {
        let state = seed as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn step(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }
}

impl RngCore for Lcg32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.step());
        let low = u64::from(self.step());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from(u32::from_le_bytes(seed)))
    }

    // Plain truncation so `seed_from_u64(n)` and `Lcg32::new(n)` agree
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Uniform draw in [0, 1) from one 32-bit output
pub fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.next_u32()) / 4_294_967_296.0
}

/// Uniform index into a non-empty collection of `len` items
pub fn pick_index<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0, "pick_index on empty collection");
    ((unit(rng) * len as f64) as usize).min(len.saturating_sub(1))
}
