use crate::error::{FilterError, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SAMPLE_RATE: f64 = 250.0;

/// Biosignal classes and utility modes a filter can be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Emg,
    Ecg,
    Eog,
    Eeg,
    Notch50,
    Notch60,
    None,
}

impl FilterMode {
    pub const ALL: [FilterMode; 7] = [
        FilterMode::Emg,
        FilterMode::Ecg,
        FilterMode::Eog,
        FilterMode::Eeg,
        FilterMode::Notch50,
        FilterMode::Notch60,
        FilterMode::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Emg => "emg",
            FilterMode::Ecg => "ecg",
            FilterMode::Eog => "eog",
            FilterMode::Eeg => "eeg",
            FilterMode::Notch50 => "notch50",
            FilterMode::Notch60 => "notch60",
            FilterMode::None => "none",
        }
    }

    /// Filter spec for this mode at the given sample rate. `None` has no spec.
    pub fn spec(&self, sample_rate: f64) -> Option<FilterSpec> {
        let (kind, cutoff_low, cutoff_high) = match self {
            FilterMode::Emg => (FilterKind::BandPass, 20.0, 450.0),
            FilterMode::Ecg => (FilterKind::BandPass, 0.5, 150.0),
            FilterMode::Eog => (FilterKind::BandPass, 0.1, 35.0),
            FilterMode::Eeg => (FilterKind::BandPass, 0.5, 100.0),
            FilterMode::Notch50 => (FilterKind::BandStop, 48.0, 52.0),
            FilterMode::Notch60 => (FilterKind::BandStop, 58.0, 62.0),
            FilterMode::None => return None,
        };

        Some(FilterSpec {
            kind,
            cutoff_low,
            cutoff_high,
            sample_rate,
        })
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        FilterMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| FilterError::InvalidMode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    HighPass,
    LowPass,
    BandPass,
    BandStop,
}

/// Immutable filter configuration derived from a [`FilterMode`].
///
/// Cutoffs are in Hz. `cutoff_low` is the only edge a high-pass uses and
/// `cutoff_high` the only edge a low-pass uses; band filters use both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub cutoff_low: f64,
    pub cutoff_high: f64,
    pub sample_rate: f64,
}

impl FilterSpec {
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(FilterError::InvalidFilterSpec(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if !self.cutoff_low.is_finite() || !self.cutoff_high.is_finite() {
            return Err(FilterError::InvalidFilterSpec(format!(
                "cutoffs must be finite, got {} and {}",
                self.cutoff_low, self.cutoff_high
            )));
        }
        if self.cutoff_low < 0.0 || self.cutoff_high < 0.0 {
            return Err(FilterError::InvalidFilterSpec(format!(
                "cutoffs must not be negative, got {} and {}",
                self.cutoff_low, self.cutoff_high
            )));
        }
        if matches!(self.kind, FilterKind::BandPass | FilterKind::BandStop)
            && self.cutoff_low >= self.cutoff_high
        {
            return Err(FilterError::InvalidFilterSpec(format!(
                "{:?} needs cutoff_low < cutoff_high, got {} >= {}",
                self.kind, self.cutoff_low, self.cutoff_high
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_declared_mode() {
        for mode in FilterMode::ALL {
            assert_eq!(mode.as_str().parse::<FilterMode>().unwrap(), mode);
        }
        assert_eq!(" EEG ".parse::<FilterMode>().unwrap(), FilterMode::Eeg);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "notch55".parse::<FilterMode>().unwrap_err();
        assert!(matches!(err, FilterError::InvalidMode(ref s) if s == "notch55"));
    }

    #[test]
    fn mapping_table_matches_modes() {
        let emg = FilterMode::Emg.spec(250.0).unwrap();
        assert_eq!(emg.kind, FilterKind::BandPass);
        assert_eq!((emg.cutoff_low, emg.cutoff_high), (20.0, 450.0));

        let notch = FilterMode::Notch60.spec(500.0).unwrap();
        assert_eq!(notch.kind, FilterKind::BandStop);
        assert_eq!((notch.cutoff_low, notch.cutoff_high), (58.0, 62.0));
        assert_eq!(notch.sample_rate, 500.0);

        assert!(FilterMode::None.spec(250.0).is_none());
    }

    #[test]
    fn all_builtin_specs_validate() {
        for mode in FilterMode::ALL {
            if let Some(spec) = mode.spec(DEFAULT_SAMPLE_RATE) {
                spec.validate().unwrap();
            }
        }
    }

    #[test]
    fn degenerate_band_is_rejected() {
        let spec = FilterSpec {
            kind: FilterKind::BandStop,
            cutoff_low: 52.0,
            cutoff_high: 48.0,
            sample_rate: 250.0,
        };
        assert!(matches!(
            spec.validate(),
            Err(FilterError::InvalidFilterSpec(_))
        ));

        let spec = FilterSpec {
            sample_rate: 0.0,
            ..FilterMode::Eeg.spec(250.0).unwrap()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let yaml = serde_yaml::to_string(&FilterMode::Notch50).unwrap();
        assert_eq!(yaml.trim(), "notch50");
    }
}
