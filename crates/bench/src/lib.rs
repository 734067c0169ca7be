use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const QUICK_SAMPLE_SIZE: usize = 20;
const QUICK_WARM_UP_MS: u64 = 150;
const QUICK_MEASURE_MS: u64 = 300;
const LONG_SAMPLE_SIZE: usize = 10;
const LONG_WARM_UP_MS: u64 = 600;
const LONG_MEASURE_MS: u64 = 1200;
const RNG_SEED: u64 = 0xB1AC_C0DE;

pub fn configure_quick_group<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(QUICK_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(QUICK_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(QUICK_MEASURE_MS));
}

pub fn configure_long_group<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LONG_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LONG_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LONG_MEASURE_MS));
}

pub fn bench_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// `n` distinct keys spread over the whole `u64` range, in an order
/// unrelated to the key order.
pub fn random_keys<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<u64> {
    // Multiplying by a large odd constant is a bijection on u64, so the
    // keys stay distinct without any dedup pass.
    let mut keys: Vec<u64> = (0..n as u64)
        .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .collect();
    keys.shuffle(rng);
    keys
}
