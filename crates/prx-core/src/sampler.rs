//! `Sampler` implementations.

use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::traits::Sampler;

const TOKEN_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TOKEN_LEN: usize = 8;

/// A `Sampler` backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandSampler<R = StdRng> {
    rng: R,
}

impl RandSampler<StdRng> {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> Sampler for RandSampler<R> {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn token(&mut self) -> String {
        (0..TOKEN_LEN)
            .map(|_| TOKEN_ALPHABET[self.rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
            .collect()
    }
}

/// Replays a fixed sequence of index choices.
///
/// Each `index(len)` call pops the next scripted value and reduces it modulo
/// `len`; once the script runs out every call returns `0`. `unit()` always
/// returns the configured constant and tokens count upward, so output is
/// fully deterministic.
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    indices: VecDeque<usize>,
    unit: f64,
    issued: u64,
}

impl ScriptedSampler {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            unit: 0.5,
            issued: 0,
        }
    }

    /// Set the value every `unit()` call returns. Clamped into `[0.0, 1.0)`.
    pub fn with_unit(mut self, unit: f64) -> Self {
        self.unit = unit.clamp(0.0, 1.0 - f64::EPSILON);
        self
    }

    /// Number of scripted index values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.indices.len()
    }
}

impl Sampler for ScriptedSampler {
    fn index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % len.max(1)
    }

    fn unit(&mut self) -> f64 {
        self.unit
    }

    fn token(&mut self) -> String {
        self.issued += 1;
        format!("{:0width$}", self.issued, width = TOKEN_LEN)
    }
}
