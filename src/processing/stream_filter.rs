use crate::error::{FilterError, Result};
use crate::filters::moving_average::DEFAULT_WINDOW;
use crate::filters::spec::{FilterMode, FilterSpec, DEFAULT_SAMPLE_RATE};
use crate::filters::{FilterAlgorithm, FilterEngine, SampleFilter};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What a configured filter does with NaN or infinite input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// Fail the call with [`FilterError::NonFiniteSample`].
    #[default]
    Reject,
    /// Return the sample unchanged.
    Propagate,
    /// Repeat the previous output, or 0.0 if there is none yet.
    Hold,
}

impl FromStr for NonFinitePolicy {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(NonFinitePolicy::Reject),
            "propagate" => Ok(NonFinitePolicy::Propagate),
            "hold" => Ok(NonFinitePolicy::Hold),
            _ => Err(FilterError::InvalidInput(format!(
                "unknown non-finite policy '{}' (expected reject, propagate or hold)",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub sample_rate: f64,
    pub algorithm: FilterAlgorithm,
    pub window: usize,
    pub non_finite: NonFinitePolicy,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            algorithm: FilterAlgorithm::default(),
            window: DEFAULT_WINDOW,
            non_finite: NonFinitePolicy::default(),
        }
    }
}

// STREAM FILTER COMPONENT -----------------------------------------------------

/// Per-channel streaming filter. Starts in [`FilterMode::None`].
///
/// Non-finite samples never enter the history, whatever the policy, so a
/// single bad reading cannot poison later outputs. In mode `None` every
/// input, finite or not, is returned unchanged.
pub struct StreamFilter {
    options: FilterOptions,
    mode: FilterMode,
    spec: Option<FilterSpec>,
    engine: Option<FilterEngine>,
    last_output: Option<f64>,
}

impl StreamFilter {
    pub fn new(sample_rate: f64) -> Self {
        Self::with_options(FilterOptions {
            sample_rate,
            ..FilterOptions::default()
        })
    }

    pub fn with_options(options: FilterOptions) -> Self {
        Self {
            options,
            mode: FilterMode::None,
            spec: None,
            engine: None,
            last_output: None,
        }
    }

    /// Switches to `mode` and starts from an empty history, even when
    /// `mode` is already active. On error the current mode is kept.
    pub fn set_mode(&mut self, mode: FilterMode) -> Result<()> {
        let spec = mode.spec(self.options.sample_rate);
        let engine = match &spec {
            Some(spec) => Some(FilterEngine::build(
                spec,
                self.options.algorithm,
                self.options.window,
            )?),
            None => None,
        };

        log::debug!(
            "filter mode {} -> {} ({:?}, fs = {} Hz)",
            self.mode,
            mode,
            self.options.algorithm,
            self.options.sample_rate
        );

        self.mode = mode;
        self.spec = spec;
        self.engine = engine;
        self.last_output = None;
        Ok(())
    }

    pub fn set_mode_str(&mut self, mode: &str) -> Result<()> {
        self.set_mode(mode.parse()?)
    }

    pub fn process(&mut self, sample: f64) -> Result<f64> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(sample);
        };

        if !sample.is_finite() {
            return match self.options.non_finite {
                NonFinitePolicy::Reject => {
                    log::warn!("rejecting non-finite sample {} in mode {}", sample, self.mode);
                    Err(FilterError::NonFiniteSample(sample))
                }
                NonFinitePolicy::Propagate => Ok(sample),
                NonFinitePolicy::Hold => Ok(self.last_output.unwrap_or(0.0)),
            };
        }

        let output = engine.process_sample(sample);
        log::trace!("{} sample: {}, filtered_sample: {}", self.mode, sample, output);
        self.last_output = Some(output);
        Ok(output)
    }

    pub fn process_slice(&mut self, samples: &[f64]) -> Result<Vec<f64>> {
        samples.iter().map(|&sample| self.process(sample)).collect()
    }

    /// Clears history but keeps the mode. No-op in mode `None`.
    pub fn reset(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.reset();
            log::debug!("filter reset in mode {}", self.mode);
        }
        self.last_output = None;
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn spec(&self) -> Option<&FilterSpec> {
        self.spec.as_ref()
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn sample_rate(&self) -> f64 {
        self.options.sample_rate
    }

    pub fn history_len(&self) -> usize {
        self.engine.as_ref().map_or(0, |engine| engine.history_len())
    }
}

impl Default for StreamFilter {
    fn default() -> Self {
        Self::with_options(FilterOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(mode: FilterMode) -> StreamFilter {
        let mut filter = StreamFilter::default();
        filter.set_mode(mode).unwrap();
        filter
    }

    #[test]
    fn none_is_identity_without_history() {
        let mut filter = StreamFilter::default();
        for x in [0.0, -3.5, 1e12, f64::INFINITY] {
            assert_eq!(filter.process(x).unwrap(), x);
        }
        assert!(filter.process(f64::NAN).unwrap().is_nan());
        assert_eq!(filter.history_len(), 0);
        assert!(filter.spec().is_none());
    }

    #[test]
    fn ecg_running_means() {
        let mut filter = configured(FilterMode::Ecg);
        let outputs = filter.process_slice(&[1.0, 3.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(outputs, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn mode_switch_isolates_history() {
        let mut filter = configured(FilterMode::Eeg);
        filter.process_slice(&[100.0, 200.0, 300.0]).unwrap();
        filter.set_mode(FilterMode::Emg).unwrap();
        assert_eq!(filter.history_len(), 0);
        assert_eq!(filter.process(4.0).unwrap(), 4.0);
    }

    #[test]
    fn same_mode_switch_still_resets() {
        let mut filter = configured(FilterMode::Eog);
        filter.process_slice(&[10.0, 20.0]).unwrap();
        filter.set_mode(FilterMode::Eog).unwrap();
        assert_eq!(filter.history_len(), 0);
        assert_eq!(filter.process(2.0).unwrap(), 2.0);
    }

    #[test]
    fn reset_keeps_mode() {
        let mut filter = configured(FilterMode::Notch50);
        filter.process_slice(&[8.0, 8.0, 2.0]).unwrap();
        filter.reset();
        assert_eq!(filter.mode(), FilterMode::Notch50);
        assert_eq!(filter.process(6.0).unwrap(), 6.0);

        let mut unconfigured = StreamFilter::default();
        unconfigured.reset();
        assert_eq!(unconfigured.mode(), FilterMode::None);
    }

    #[test]
    fn history_is_bounded_by_window() {
        let mut filter = configured(FilterMode::Eeg);
        for n in 1..=50 {
            filter.process(n as f64).unwrap();
            assert_eq!(filter.history_len(), n.min(DEFAULT_WINDOW));
        }
    }

    #[test]
    fn unknown_mode_string_fails() {
        let mut filter = configured(FilterMode::Eeg);
        filter.process(5.0).unwrap();
        let err = filter.set_mode_str("alpha").unwrap_err();
        assert!(matches!(err, FilterError::InvalidMode(_)));
        assert_eq!(filter.mode(), FilterMode::Eeg);
        assert_eq!(filter.history_len(), 1);
    }

    #[test]
    fn non_finite_policies() {
        let mut filter = configured(FilterMode::Eeg);
        filter.process(2.0).unwrap();
        assert!(matches!(
            filter.process(f64::NAN),
            Err(FilterError::NonFiniteSample(_))
        ));
        assert_eq!(filter.history_len(), 1);

        let mut filter = StreamFilter::with_options(FilterOptions {
            non_finite: NonFinitePolicy::Hold,
            ..FilterOptions::default()
        });
        filter.set_mode(FilterMode::Eeg).unwrap();
        assert_eq!(filter.process(f64::INFINITY).unwrap(), 0.0);
        filter.process(4.0).unwrap();
        assert_eq!(filter.process(f64::NAN).unwrap(), 4.0);
        assert_eq!(filter.history_len(), 1);

        let mut filter = StreamFilter::with_options(FilterOptions {
            non_finite: NonFinitePolicy::Propagate,
            ..FilterOptions::default()
        });
        filter.set_mode(FilterMode::Eeg).unwrap();
        assert_eq!(filter.process(f64::NEG_INFINITY).unwrap(), f64::NEG_INFINITY);
        assert_eq!(filter.history_len(), 0);
    }

    #[test]
    fn biquad_emg_builds_at_default_rate() {
        let mut filter = StreamFilter::with_options(FilterOptions {
            algorithm: FilterAlgorithm::Biquad,
            ..FilterOptions::default()
        });
        for mode in FilterMode::ALL {
            filter.set_mode(mode).unwrap();
            assert!(filter.process(1.0).unwrap().is_finite());
        }
    }

    #[test]
    fn non_finite_policy_from_name() {
        assert_eq!("hold".parse::<NonFinitePolicy>().unwrap(), NonFinitePolicy::Hold);
        assert_eq!(" Propagate ".parse::<NonFinitePolicy>().unwrap(), NonFinitePolicy::Propagate);
        assert_eq!("REJECT".parse::<NonFinitePolicy>().unwrap(), NonFinitePolicy::Reject);
        assert!(matches!(
            "ignore".parse::<NonFinitePolicy>(),
            Err(FilterError::InvalidInput(_))
        ));
    }
}
