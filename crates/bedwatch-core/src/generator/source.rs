// ── Random source abstraction ──
//
// Every random draw in the generator goes through `RandomSource`, so a
// run is reproducible from a seed and tests can script exact values.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Largest value a unit sample may take (the interval is half-open).
const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

/// A source of uniform samples in `[0, 1)`.
///
/// Only [`unit`](Self::unit) is required; the remaining helpers are
/// derived from it so that scripted sources stay exact.
pub trait RandomSource: Send {
    /// Uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform index in `0..len`, computed as `floor(unit * len)`.
    ///
    /// Returns 0 for `len == 0`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss, clippy::as_conversions)]
    fn index(&mut self, len: usize) -> usize {
        let i = (self.unit() * len as f64) as usize;
        i.min(len.saturating_sub(1))
    }

    /// Uniform integer in `0..n`, computed as `floor(unit * n)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    fn int_below(&mut self, n: u32) -> u32 {
        let i = (self.unit() * f64::from(n)) as u32;
        i.min(n.saturating_sub(1))
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Fill `dest` with random bytes.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = (self.unit() * 256.0) as u8;
        }
    }

    /// Pick one element of a fixed, non-empty vocabulary.
    fn pick<'a, T, const N: usize>(&mut self, items: &'a [T; N]) -> &'a T
    where
        Self: Sized,
    {
        const { assert!(N > 0, "cannot pick from an empty vocabulary") };
        &items[self.index(N)]
    }
}

impl RandomSource for Box<dyn RandomSource> {
    fn unit(&mut self) -> f64 {
        (**self).unit()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        (**self).fill_bytes(dest);
    }
}

// ── EntropySource ────────────────────────────────────────────────

/// [`RandomSource`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct EntropySource<R = StdRng> {
    rng: R,
}

impl EntropySource<StdRng> {
    /// Seed from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: RngCore> EntropySource<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + Send> RandomSource for EntropySource<R> {
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest);
    }
}

// ── ScriptedSource ───────────────────────────────────────────────

/// Replays a fixed sequence of unit samples, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`. An empty script always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, MAX_UNIT))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
