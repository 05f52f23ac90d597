//! Shared helpers for the integration tests.
#![allow(dead_code)]

pub mod measures;

use conjecture_find::{insert_rvf, uniform_distribution, xor, Distribution, Settings};

pub const TOLERANCE: f64 = 1e-4;

/// Two independent fair bits and their XOR.
pub fn xor_distribution() -> Distribution {
    let inputs = uniform_distribution(2, 2).expect("valid alphabet");
    insert_rvf(&inputs, xor(0, 1), 2).expect("xor stays within the alphabet")
}

pub fn seeded(seed: u64) -> Settings {
    Settings::default().with_seed(seed)
}
