use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

/// Source of the random choices a worker makes (file size, pause length).
pub trait Sampler: Send {
    /// Returns a value in `[range.start, range.end)`; an empty range yields `range.start`.
    fn pick(&mut self, range: Range<u64>) -> u64;
}

#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn pick(&mut self, range: Range<u64>) -> u64 {
        if range.is_empty() {
            return range.start;
        }
        self.rng.random_range(range)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are offset from the range start and wrapped into the range, so `0` always maps to
/// `range.start`.
#[derive(Debug, Clone)]
pub struct SequenceSampler {
    values: Vec<u64>,
    next: usize,
}

impl SequenceSampler {
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }
}

impl Sampler for SequenceSampler {
    fn pick(&mut self, range: Range<u64>) -> u64 {
        if range.is_empty() || self.values.is_empty() {
            return range.start;
        }

        let v = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);

        let span = range.end - range.start;
        range.start + (v % span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_sampler_stays_in_range() {
        let mut s = RandomSampler::seeded(7);
        for _ in 0..1000 {
            let v = s.pick(5..100);
            assert!((5..100).contains(&v));
        }
    }

    #[test]
    fn seeded_samplers_repeat() {
        let mut a = RandomSampler::seeded(42);
        let mut b = RandomSampler::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.pick(0..1_000_000), b.pick(0..1_000_000));
        }
    }

    #[test]
    fn empty_range_yields_start() {
        let mut r = RandomSampler::from_entropy();
        assert_eq!(r.pick(3..3), 3);

        let mut s = SequenceSampler::new([9]);
        assert_eq!(s.pick(4..4), 4);
    }

    #[test]
    fn sequence_sampler_cycles_and_wraps() {
        let mut s = SequenceSampler::new([0, 1, 12]);
        assert_eq!(s.pick(10..20), 10);
        assert_eq!(s.pick(10..20), 11);
        assert_eq!(s.pick(10..20), 12);
        assert_eq!(s.pick(10..20), 10);
    }

    #[test]
    fn empty_sequence_yields_start() {
        let mut s = SequenceSampler::new(Vec::new());
        assert_eq!(s.pick(200..1200), 200);
    }
}
