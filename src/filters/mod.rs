pub mod biquad;
pub mod moving_average;
pub mod spec;

use crate::error::Result;
use biquad::{BandPassFilter, BandStopFilter, HighPassFilter, LowPassFilter};
use moving_average::MovingAverage;
use spec::{FilterKind, FilterSpec};

use serde::{Deserialize, Serialize};

pub trait SampleFilter: Send {
    fn process_sample(&mut self, sample: f64) -> f64;
    fn reset(&mut self);
    /// Number of past samples currently influencing the output.
    fn history_len(&self) -> usize;
}

/// Which streaming algorithm backs the configured modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterAlgorithm {
    /// Mean of the last `window` raw samples, whatever the `FilterSpec` kind.
    #[default]
    MovingAverage,
    /// Butterworth/notch biquads chosen by the `FilterSpec` kind.
    Biquad,
}

pub enum FilterEngine {
    MovingAverage(MovingAverage),
    HighPass(HighPassFilter),
    LowPass(LowPassFilter),
    BandPass(BandPassFilter),
    BandStop(BandStopFilter),
}

impl FilterEngine {
    pub fn build(spec: &FilterSpec, algorithm: FilterAlgorithm, window: usize) -> Result<Self> {
        spec.validate()?;

        let engine = match algorithm {
            FilterAlgorithm::MovingAverage => FilterEngine::MovingAverage(MovingAverage::new(window)),
            FilterAlgorithm::Biquad => match spec.kind {
                FilterKind::HighPass => FilterEngine::HighPass(HighPassFilter::new(spec)?),
                FilterKind::LowPass => FilterEngine::LowPass(LowPassFilter::new(spec)?),
                FilterKind::BandPass => FilterEngine::BandPass(BandPassFilter::new(spec)?),
                FilterKind::BandStop => FilterEngine::BandStop(BandStopFilter::new(spec)?),
            },
        };
        Ok(engine)
    }

    fn inner(&self) -> &dyn SampleFilter {
        match self {
            FilterEngine::MovingAverage(f) => f,
            FilterEngine::HighPass(f) => f,
            FilterEngine::LowPass(f) => f,
            FilterEngine::BandPass(f) => f,
            FilterEngine::BandStop(f) => f,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SampleFilter {
        match self {
            FilterEngine::MovingAverage(f) => f,
            FilterEngine::HighPass(f) => f,
            FilterEngine::LowPass(f) => f,
            FilterEngine::BandPass(f) => f,
            FilterEngine::BandStop(f) => f,
        }
    }
}

impl SampleFilter for FilterEngine {
    fn process_sample(&mut self, sample: f64) -> f64 {
        self.inner_mut().process_sample(sample)
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }

    fn history_len(&self) -> usize {
        self.inner().history_len()
    }
}
