use crate::config::Config;
use crate::error::Result;
use crate::processing::channel_bank::ChannelFilterBank;
use crate::recording::session::RecordingSession;
use crate::recording::store::FileRecordingStore;

use chrono::Utc;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

// -----------------------------------------------------------------------------
// SIGNAL PARAMETERS
// -----------------------------------------------------------------------------

const BASELINE_AMPLITUDE: f64 = 70.0;
const ALPHA_FREQ: f64 = 10.0;
const ALPHA_AMPLITUDE: f64 = 20.0;
const DRIFT_FREQ: f64 = 0.5;
const DRIFT_AMPLITUDE: f64 = 10.0;
const POWERLINE_FREQ: f64 = 50.0;
const POWERLINE_AMPLITUDE: f64 = 15.0;
const NOISE_AMPLITUDE: f64 = 5.0;

const BURST_CHANCE: f64 = 0.002;
const BURST_FREQ: f64 = 80.0;
const BURST_AMPLITUDE: f64 = 40.0;
const BURST_SAMPLES: usize = 50;

/// Synthetic multi-channel biopotential source: baseline offset, slow drift,
/// an alpha rhythm, powerline hum, noise and occasional high-frequency bursts.
pub struct SignalSimulator {
    rng: StdRng,
    sample_rate: f64,
    channels: usize,
    index: u64,
    burst_remaining: Vec<usize>,
}

impl SignalSimulator {
    pub fn new(sample_rate: f64, channels: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            sample_rate,
            channels,
            index: 0,
            burst_remaining: vec![0; channels],
        }
    }

    pub fn next_frame(&mut self) -> Vec<f64> {
        let time = self.index as f64 / self.sample_rate;
        self.index += 1;

        (0..self.channels)
            .map(|channel| {
                let phase = channel as f64 * PI / 4.0;
                let mut value = BASELINE_AMPLITUDE
                    + DRIFT_AMPLITUDE * (2.0 * PI * DRIFT_FREQ * time).sin()
                    + ALPHA_AMPLITUDE * (2.0 * PI * ALPHA_FREQ * time + phase).sin()
                    + POWERLINE_AMPLITUDE * (2.0 * PI * POWERLINE_FREQ * time).sin()
                    + self.rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);

                if self.burst_remaining[channel] == 0 && self.rng.gen_bool(BURST_CHANCE) {
                    self.burst_remaining[channel] = BURST_SAMPLES;
                }
                if self.burst_remaining[channel] > 0 {
                    self.burst_remaining[channel] -= 1;
                    value += BURST_AMPLITUDE * (2.0 * PI * BURST_FREQ * time).sin();
                }
                value
            })
            .collect()
    }
}

fn bar(value: f64) -> String {
    // To ensure |repeat| doesn't overflow
    let max_len = 100;
    let len = (value.max(0.0) as usize).min(max_len);
    "|".repeat(len)
}

/// Generates `seconds` of synthetic signal, filters it with the configured
/// mode, and saves it as a recording. Returns the new recording id.
pub fn run(config: &Config, seconds: f64, name: &str, seed: Option<u64>, display: bool) -> Result<String> {
    let processor = &config.processor;
    let mut bank = ChannelFilterBank::new(processor.channels, processor.filter_options());
    bank.set_mode(processor.mode)?;

    let mut simulator = SignalSimulator::new(processor.sample_rate, processor.channels, seed);
    let mut session = RecordingSession::new(bank, processor.sample_rate);

    let total = (seconds * processor.sample_rate).round().max(0.0) as usize;
    let start = Utc::now().timestamp_millis();
    log::info!(
        "simulating {} samples x {} channels at {} Hz, mode {}",
        total,
        processor.channels,
        processor.sample_rate,
        processor.mode
    );

    for i in 0..total {
        let raw = simulator.next_frame();
        let timestamp = start + (i as f64 * 1000.0 / processor.sample_rate).round() as i64;
        let filtered = session.push(timestamp, &raw)?;

        if display && !raw.is_empty() {
            println!("{}{}", bar(raw[0]).white(), bar(filtered[0]).red());
        }
    }

    let mut store = FileRecordingStore::open(&config.recording.directory)?;
    session.save(&mut store, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_simulator_is_reproducible() {
        let mut a = SignalSimulator::new(250.0, 3, Some(7));
        let mut b = SignalSimulator::new(250.0, 3, Some(7));
        for _ in 0..100 {
            assert_eq!(a.next_frame(), b.next_frame());
        }
    }

    #[test]
    fn frames_stay_near_baseline() {
        let mut simulator = SignalSimulator::new(250.0, 2, Some(1));
        let bound = DRIFT_AMPLITUDE + ALPHA_AMPLITUDE + POWERLINE_AMPLITUDE + NOISE_AMPLITUDE + BURST_AMPLITUDE;
        for _ in 0..2500 {
            let frame = simulator.next_frame();
            assert_eq!(frame.len(), 2);
            for value in frame {
                assert!((value - BASELINE_AMPLITUDE).abs() <= bound);
            }
        }
    }

    #[test]
    fn simulation_saves_recording() {
        use crate::filters::spec::FilterMode;
        use crate::recording::RecordingStore;

        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.processor.channels = 2;
        config.processor.mode = FilterMode::Notch50;
        config.recording.directory = dir.path().to_path_buf();

        let id = run(&config, 1.0, "sim", Some(3), false).unwrap();
        let store = FileRecordingStore::open(dir.path()).unwrap();
        let recording = store.get(&id).unwrap().unwrap();
        assert_eq!(recording.data.len(), 250);
        assert_eq!(recording.channels, 2);
        assert_eq!(recording.duration, 1.0);
    }
}
