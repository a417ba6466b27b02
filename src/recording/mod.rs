pub mod export;
pub mod session;
pub mod store;

use crate::error::{FilterError, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One filtered sample per channel, stamped in unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp: i64,
    pub channels: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    pub name: String,
    pub data: Vec<Frame>,
    /// Seconds, derived from the frame count and sample rate.
    pub duration: f64,
    pub channels: usize,
    pub sample_rate: f64,
    pub created_at: DateTime<Utc>,
}

impl Recording {
    pub fn new(id: String, name: &str, data: Vec<Frame>, channels: usize, sample_rate: f64) -> Self {
        let duration = data.len() as f64 / sample_rate;
        Self {
            id,
            name: name.to_string(),
            data,
            duration,
            channels,
            sample_rate,
            created_at: Utc::now(),
        }
    }
}

/// Sink for filtered recordings, addressed by id.
pub trait RecordingStore {
    /// Persists a recording and returns its new id.
    fn save(&mut self, data: Vec<Frame>, name: &str, channels: usize, sample_rate: f64) -> Result<String>;
    fn get(&self, id: &str) -> Result<Option<Recording>>;
    /// All recordings, oldest first.
    fn list(&self) -> Result<Vec<Recording>>;
    fn delete(&mut self, id: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

pub(crate) fn validate_save(channels: usize, sample_rate: f64) -> Result<()> {
    if channels == 0 {
        return Err(FilterError::Config("recording needs at least one channel".to_string()));
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(FilterError::Config(format!(
            "recording sample rate must be positive, got {}",
            sample_rate
        )));
    }
    Ok(())
}

/// Writes `Timestamp,Ch1..ChN` followed by one row per frame.
///
/// Frames are written as they are; a frame with more or fewer values than
/// `channels` produces a longer or shorter row.
///
/// Every row, the last one included, ends with `\n`. Exports from tools that
/// join rows with `\n` have no trailing newline, so a byte-for-byte
/// comparison against those differs by the final line break only.
pub fn write_csv<W: Write>(writer: W, data: &[Frame], channels: usize) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    let mut headers = vec!["Timestamp".to_string()];
    headers.extend((1..=channels).map(|i| format!("Ch{}", i)));
    wtr.write_record(&headers)?;

    for frame in data {
        let mut row = Vec::with_capacity(frame.channels.len() + 1);
        row.push(frame.timestamp.to_string());
        row.extend(frame.channels.iter().map(|value| value.to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv(data: &[Frame], channels: usize) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, data, channels)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_header_and_rows() {
        let data = vec![
            Frame {
                timestamp: 1000,
                channels: vec![1.5, -2.0],
            },
            Frame {
                timestamp: 1004,
                channels: vec![0.25, 3.0],
            },
        ];
        let csv = to_csv(&data, 2).unwrap();
        assert_eq!(csv, "Timestamp,Ch1,Ch2\n1000,1.5,-2\n1004,0.25,3\n");
    }

    #[test]
    fn csv_with_no_frames_is_header_only() {
        assert_eq!(to_csv(&[], 3).unwrap(), "Timestamp,Ch1,Ch2,Ch3\n");
    }

    #[test]
    fn csv_keeps_ragged_rows() {
        let data = vec![Frame {
            timestamp: 7,
            channels: vec![1.0],
        }];
        assert_eq!(to_csv(&data, 2).unwrap(), "Timestamp,Ch1,Ch2\n7,1\n");
    }

    #[test]
    fn duration_follows_sample_rate() {
        let data = vec![
            Frame {
                timestamp: 0,
                channels: vec![0.0],
            };
            500
        ];
        let recording = Recording::new("rec_1".to_string(), "test", data, 1, 250.0);
        assert_eq!(recording.duration, 2.0);
    }
}
