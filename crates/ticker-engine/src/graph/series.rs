use std::collections::VecDeque;

/// Closed vertical band `[min, max]` that samples are clamped into.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SampleBand {
    pub min: f32,
    pub max: f32,
}

impl SampleBand {
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn range(self) -> f32 {
        self.max - self.min
    }

    #[inline]
    pub fn midpoint(self) -> f32 {
        self.min + self.range() / 2.0
    }

    #[inline]
    pub fn clamp(self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    /// Position of `v` inside the band, `0.0` at `min` and `1.0` at `max`.
    #[inline]
    pub fn fraction(self, v: f32) -> f32 {
        (v - self.min) / self.range()
    }
}

/// Sliding window of samples, oldest first.
///
/// Invariants:
/// - `len() <= capacity()`; pushing past capacity evicts the oldest sample
/// - every stored value lies inside `band()`
/// - the window is never empty (it is seeded at construction)
#[derive(Debug, Clone)]
pub struct SampleSeries {
    samples: VecDeque<f32>,
    capacity: usize,
    band: SampleBand,
}

/// Upper bound on the up-front allocation; larger windows grow on demand.
const PREALLOCATE_LIMIT: usize = 4096;

impl SampleSeries {
    /// Creates a window holding a single `initial` sample (clamped into `band`).
    ///
    /// A zero `capacity` is raised to one.
    pub fn new(capacity: usize, band: SampleBand, initial: f32) -> Self {
        debug_assert!(band.min <= band.max, "inverted sample band");
        let capacity = capacity.max(1);
        let prealloc = capacity.saturating_add(1).min(PREALLOCATE_LIMIT);
        let mut samples = VecDeque::with_capacity(prealloc);
        samples.push_back(band.clamp(initial));
        Self { samples, capacity, band }
    }

    /// Appends a sample, clamped into the band, and returns the stored value.
    pub fn push(&mut self, value: f32) -> f32 {
        let value = self.band.clamp(value);
        self.samples.push_back(value);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        value
    }

    /// Most recent sample.
    #[inline]
    pub fn latest(&self) -> f32 {
        self.samples.back().copied().unwrap_or(self.band.midpoint())
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn band(&self) -> SampleBand {
        self.band
    }
}
