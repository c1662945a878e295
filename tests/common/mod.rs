#![allow(dead_code)]

use core::num::NonZeroUsize;
use fjk::{
    config::{ExecutionMode, ExecutorConfig},
    executor::Executor,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn parallel(workers: usize) -> Executor {
    init_logging();
    let workers = NonZeroUsize::new(workers).unwrap();
    Executor::new(ExecutorConfig::default().with_workers(workers)).unwrap()
}

pub fn serial() -> Executor {
    init_logging();
    Executor::new(ExecutorConfig::default().with_mode(ExecutionMode::Serial)).unwrap()
}

/// Both execution modes, serial first.
pub fn executors() -> [Executor; 2] {
    [serial(), parallel(4)]
}

/// Deterministic pseudo-random sequence (64-bit LCG).
pub fn lcg(seed: u64, len: usize, modulo: u64) -> Vec<u64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) % modulo
        })
        .collect()
}
