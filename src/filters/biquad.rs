use super::spec::FilterSpec;
use super::SampleFilter;
use crate::error::{FilterError, Result};

use std::f64::consts::{PI, SQRT_2};

// Butterworth Q for a single second-order section, maximally flat passband.
const BUTTERWORTH_Q: f64 = SQRT_2 / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    LowPass,
    HighPass,
    Notch,
}

/// Direct form I second-order section. Coefficients are normalised by `a0`
/// at construction so the per-sample update is five multiply-adds.
#[derive(Debug, Clone)]
pub struct SecondOrderFilter {
    b: [f64; 3],
    a: [f64; 2],
    x: [f64; 2],
    y: [f64; 2],
    seen: usize,
}

impl SecondOrderFilter {
    pub fn new(section: SectionType, f0: f64, fs: f64, q: f64) -> Result<Self> {
        if !(f0 > 0.0 && f0 < fs / 2.0) {
            return Err(FilterError::InvalidFilterSpec(format!(
                "{:?} frequency {} Hz must lie in (0, {}) for fs = {} Hz",
                section,
                f0,
                fs / 2.0,
                fs
            )));
        }
        if !(q > 0.0 && q.is_finite()) {
            return Err(FilterError::InvalidFilterSpec(format!(
                "Q must be positive, got {}",
                q
            )));
        }

        let omega = 2.0 * PI * f0 / fs;
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);

        let (b0, b1, b2) = match section {
            SectionType::LowPass => (
                (1.0 - cos_omega) / 2.0,
                1.0 - cos_omega,
                (1.0 - cos_omega) / 2.0,
            ),
            SectionType::HighPass => (
                (1.0 + cos_omega) / 2.0,
                -(1.0 + cos_omega),
                (1.0 + cos_omega) / 2.0,
            ),
            SectionType::Notch => (1.0, -2.0 * cos_omega, 1.0),
        };
        let (a0, a1, a2) = (1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha);

        Ok(SecondOrderFilter {
            b: [b0 / a0, b1 / a0, b2 / a0],
            a: [a1 / a0, a2 / a0],
            x: [0.0, 0.0],
            y: [0.0, 0.0],
            seen: 0,
        })
    }

    pub fn butterworth(section: SectionType, f0: f64, fs: f64) -> Result<Self> {
        Self::new(section, f0, fs, BUTTERWORTH_Q)
    }
}

impl SampleFilter for SecondOrderFilter {
    fn process_sample(&mut self, input: f64) -> f64 {
        let output = self.b[0] * input + self.b[1] * self.x[0] + self.b[2] * self.x[1]
            - self.a[0] * self.y[0]
            - self.a[1] * self.y[1];

        self.x[1] = self.x[0];
        self.x[0] = input;
        self.y[1] = self.y[0];
        self.y[0] = output;
        self.seen = (self.seen + 1).min(2);

        output
    }

    fn reset(&mut self) {
        self.x = [0.0, 0.0];
        self.y = [0.0, 0.0];
        self.seen = 0;
    }

    fn history_len(&self) -> usize {
        self.seen
    }
}

pub struct HighPassFilter {
    section: SecondOrderFilter,
}

impl HighPassFilter {
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        let section =
            SecondOrderFilter::butterworth(SectionType::HighPass, spec.cutoff_low, spec.sample_rate)?;
        Ok(Self { section })
    }
}

impl SampleFilter for HighPassFilter {
    fn process_sample(&mut self, sample: f64) -> f64 {
        self.section.process_sample(sample)
    }

    fn reset(&mut self) {
        self.section.reset();
    }

    fn history_len(&self) -> usize {
        self.section.history_len()
    }
}

pub struct LowPassFilter {
    section: SecondOrderFilter,
}

impl LowPassFilter {
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        let section =
            SecondOrderFilter::butterworth(SectionType::LowPass, spec.cutoff_high, spec.sample_rate)?;
        Ok(Self { section })
    }
}

impl SampleFilter for LowPassFilter {
    fn process_sample(&mut self, sample: f64) -> f64 {
        self.section.process_sample(sample)
    }

    fn reset(&mut self) {
        self.section.reset();
    }

    fn history_len(&self) -> usize {
        self.section.history_len()
    }
}

/// High-pass at `cutoff_low` followed by low-pass at `cutoff_high`.
///
/// When `cutoff_high` sits at or above Nyquist the low-pass stage is left
/// out, since there is no content above Nyquist for it to remove. EMG and
/// ECG at the default 250 Hz rate hit this case.
pub struct BandPassFilter {
    high_pass: SecondOrderFilter,
    low_pass: Option<SecondOrderFilter>,
}

impl BandPassFilter {
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        let high_pass =
            SecondOrderFilter::butterworth(SectionType::HighPass, spec.cutoff_low, spec.sample_rate)?;
        let low_pass = if spec.cutoff_high < spec.nyquist() {
            Some(SecondOrderFilter::butterworth(
                SectionType::LowPass,
                spec.cutoff_high,
                spec.sample_rate,
            )?)
        } else {
            log::debug!(
                "bandpass upper edge {} Hz is at or above Nyquist ({} Hz), skipping low-pass stage",
                spec.cutoff_high,
                spec.nyquist()
            );
            None
        };

        Ok(Self {
            high_pass,
            low_pass,
        })
    }

    pub fn stage_count(&self) -> usize {
        1 + self.low_pass.is_some() as usize
    }
}

impl SampleFilter for BandPassFilter {
    fn process_sample(&mut self, sample: f64) -> f64 {
        // Apply high-pass filter first
        let high_pass_output = self.high_pass.process_sample(sample);
        match self.low_pass.as_mut() {
            Some(low_pass) => low_pass.process_sample(high_pass_output),
            None => high_pass_output,
        }
    }

    fn reset(&mut self) {
        self.high_pass.reset();
        if let Some(low_pass) = self.low_pass.as_mut() {
            low_pass.reset();
        }
    }

    fn history_len(&self) -> usize {
        let low = self.low_pass.as_ref().map_or(0, |stage| stage.history_len());
        self.high_pass.history_len().max(low)
    }
}

/// Notch centred between the two cutoffs, bandwidth equal to their distance.
pub struct BandStopFilter {
    notch: SecondOrderFilter,
}

impl BandStopFilter {
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        let center = (spec.cutoff_low + spec.cutoff_high) / 2.0;
        let bandwidth = spec.cutoff_high - spec.cutoff_low;
        let notch =
            SecondOrderFilter::new(SectionType::Notch, center, spec.sample_rate, center / bandwidth)?;
        Ok(Self { notch })
    }
}

impl SampleFilter for BandStopFilter {
    fn process_sample(&mut self, sample: f64) -> f64 {
        self.notch.process_sample(sample)
    }

    fn reset(&mut self) {
        self.notch.reset();
    }

    fn history_len(&self) -> usize {
        self.notch.history_len()
    }
}
