use super::stream_filter::{FilterOptions, StreamFilter};
use crate::error::{FilterError, Result};
use crate::filters::spec::FilterMode;

use rayon::prelude::*;

/// One independent [`StreamFilter`] per channel. No state is shared between
/// channels, so any interleaving of calls gives the same per-channel output.
pub struct ChannelFilterBank {
    filters: Vec<StreamFilter>,
}

impl ChannelFilterBank {
    pub fn new(channels: usize, options: FilterOptions) -> Self {
        Self {
            filters: (0..channels)
                .map(|_| StreamFilter::with_options(options))
                .collect(),
        }
    }

    pub fn channels(&self) -> usize {
        self.filters.len()
    }

    pub fn set_mode(&mut self, mode: FilterMode) -> Result<()> {
        for filter in &mut self.filters {
            filter.set_mode(mode)?;
        }
        Ok(())
    }

    pub fn set_channel_mode(&mut self, channel: usize, mode: FilterMode) -> Result<()> {
        self.filters
            .get_mut(channel)
            .ok_or(FilterError::InvalidChannel(channel))?
            .set_mode(mode)
    }

    pub fn reset(&mut self) {
        self.filters.iter_mut().for_each(StreamFilter::reset);
    }

    pub fn channel(&self, channel: usize) -> Option<&StreamFilter> {
        self.filters.get(channel)
    }

    /// Filters one sample per channel.
    pub fn process_frame(&mut self, frame: &[f64]) -> Result<Vec<f64>> {
        self.check_width(frame.len())?;
        self.filters
            .iter_mut()
            .zip(frame)
            .map(|(filter, &sample)| filter.process(sample))
            .collect()
    }

    /// Filters whole columns, one per channel, in parallel.
    pub fn process_batch(&mut self, columns: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>> {
        self.check_width(columns.len())?;
        self.filters
            .par_iter_mut()
            .zip(columns.into_par_iter())
            .map(|(filter, column)| filter.process_slice(&column))
            .collect()
    }

    fn check_width(&self, actual: usize) -> Result<()> {
        if actual != self.channels() {
            return Err(FilterError::ChannelMismatch {
                expected: self.channels(),
                actual,
            });
        }
        Ok(())
    }
}
