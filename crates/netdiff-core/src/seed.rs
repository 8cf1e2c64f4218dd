use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Deterministic per-run random stream.
///
/// Every experiment draws its graph, resistance field and initial state from
/// its own stream, so a run is reproducible from `(global_seed, run_id)`
/// regardless of the order runs are executed in.
pub struct SeedStream {
    rng: ChaCha20Rng,
}

impl SeedStream {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn for_run(global_seed: u64, run_id: u64) -> Self {
        Self::new(Self::mix(global_seed, run_id))
    }

    /// Combine seeds deterministically
    pub fn mix(global_seed: u64, run_id: u64) -> u64 {
        global_seed.wrapping_add(run_id.wrapping_mul(0x9e3779b97f4a7c15))
    }

    pub fn rng(&mut self) -> &mut ChaCha20Rng {
        &mut self.rng
    }

    pub fn into_rng(self) -> ChaCha20Rng {
        self.rng
    }
}
