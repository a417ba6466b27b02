use crate::config::ProcessorConfig;
use crate::error::{FilterError, Result};
use crate::processing::channel_bank::ChannelFilterBank;
use crate::recording::{write_csv, Frame};

use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;
use std::time::Instant;

/// Samples read from a delimited text file, one column per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    pub timestamps: Vec<i64>,
    pub columns: Vec<Vec<f64>>,
}

impl SampleTable {
    pub fn channels(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Reads a CSV with a header row. A first column named `Timestamp` supplies
/// the timestamps; otherwise every column is a channel and timestamps are
/// derived from the row index and `sample_rate`.
pub fn read_samples<R: Read>(reader: R, sample_rate: f64) -> Result<SampleTable> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let has_timestamps = headers
        .get(0)
        .map_or(false, |h| h.trim().eq_ignore_ascii_case("timestamp"));
    let channels = headers.len() - has_timestamps as usize;
    if channels == 0 {
        return Err(FilterError::InvalidInput("no channel columns in header".to_string()));
    }

    let mut table = SampleTable {
        timestamps: Vec::new(),
        columns: vec![Vec::new(); channels],
    };

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let line = row + 2;
        let mut fields = record.iter();

        let timestamp = if has_timestamps {
            let field = fields.next().unwrap_or_default();
            field.trim().parse::<i64>().map_err(|e| {
                FilterError::InvalidInput(format!("line {}: bad timestamp {:?}: {}", line, field, e))
            })?
        } else {
            (row as f64 * 1000.0 / sample_rate).round() as i64
        };
        table.timestamps.push(timestamp);

        for column in table.columns.iter_mut() {
            let field = fields.next().unwrap_or_default();
            let value = field.trim().parse::<f64>().map_err(|e| {
                FilterError::InvalidInput(format!("line {}: bad sample {:?}: {}", line, field, e))
            })?;
            column.push(value);
        }
    }

    Ok(table)
}

pub fn filter_table(table: SampleTable, config: &ProcessorConfig) -> Result<Vec<Frame>> {
    let mut bank = ChannelFilterBank::new(table.channels(), config.filter_options());
    bank.set_mode(config.mode)?;

    let filtered = bank.process_batch(table.columns)?;
    let frames = table
        .timestamps
        .into_iter()
        .enumerate()
        .map(|(i, timestamp)| Frame {
            timestamp,
            channels: filtered.iter().map(|column| column[i]).collect(),
        })
        .collect();
    Ok(frames)
}

/// Filters every channel of `input` and writes the result to `output` in the
/// recording export layout. Returns the number of rows written.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(config: &ProcessorConfig, input: P, output: Q) -> Result<usize> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(FilterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("data file not found: {}", input.display()),
        )));
    }

    let start_time = Instant::now();
    let table = read_samples(File::open(input)?, config.sample_rate)?;
    let channels = table.channels();
    log::info!(
        "read {} rows x {} channels from {}",
        table.len(),
        channels,
        input.display()
    );

    let frames = filter_table(table, config)?;
    write_csv(BufWriter::new(File::create(output.as_ref())?), &frames, channels)?;

    log::info!(
        "filtered {} rows in mode {} in {:?}, wrote {}",
        frames.len(),
        config.mode,
        start_time.elapsed(),
        output.as_ref().display()
    );
    Ok(frames.len())
}
