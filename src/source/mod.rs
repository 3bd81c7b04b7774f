//! Sample sources for the aggregation pipeline.
//!
//! A source yields one [`Sample`] per tick in arrival order. The simulated
//! source stands in for a real sensor feed; [`VecSource`] replays a prepared
//! sequence.

pub mod simulated;
pub mod types;

pub use simulated::{SimulatedSource, SimulationConfig};
pub use types::{Metric, Sample};

/// Something that produces samples in arrival order.
pub trait SampleSource {
    /// Next sample, or `None` once the feed is exhausted.
    fn next_sample(&mut self) -> Option<Sample>;

    /// Number of samples still to come, if known.
    fn remaining(&self) -> Option<usize> {
        None
    }

    /// Adapt this source into an iterator.
    fn iter(&mut self) -> SourceIter<'_, Self>
    where
        Self: Sized,
    {
        SourceIter { source: self }
    }
}

/// Iterator over a borrowed [`SampleSource`].
pub struct SourceIter<'a, S> {
    source: &'a mut S,
}

impl<S: SampleSource> Iterator for SourceIter<'_, S> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.source.next_sample()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.source.remaining() {
            Some(n) => (n, Some(n)),
            None => (0, None),
        }
    }
}

/// Replays a fixed list of samples.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    samples: std::vec::IntoIter<Sample>,
}

impl VecSource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into_iter(),
        }
    }
}

impl SampleSource for VecSource {
    fn next_sample(&mut self) -> Option<Sample> {
        self.samples.next()
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.samples.len())
    }
}
