use super::{Frame, RecordingStore};
use crate::error::Result;
use crate::processing::channel_bank::ChannelFilterBank;

/// Filters incoming frames through a channel bank and buffers the output
/// until it is handed to a store.
pub struct RecordingSession {
    bank: ChannelFilterBank,
    sample_rate: f64,
    frames: Vec<Frame>,
}

impl RecordingSession {
    pub fn new(bank: ChannelFilterBank, sample_rate: f64) -> Self {
        Self {
            bank,
            sample_rate,
            frames: Vec::new(),
        }
    }

    /// Filters one raw frame, keeps it, and returns the filtered values for display.
    pub fn push(&mut self, timestamp: i64, raw: &[f64]) -> Result<&[f64]> {
        let channels = self.bank.process_frame(raw)?;
        self.frames.push(Frame {
            timestamp,
            channels,
        });
        let newest = self.frames.len() - 1;
        Ok(&self.frames[newest].channels)
    }

    pub fn bank_mut(&mut self) -> &mut ChannelFilterBank {
        &mut self.bank
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drops buffered frames and filter history, keeping the modes.
    pub fn discard(&mut self) {
        self.frames.clear();
        self.bank.reset();
    }

    pub fn save(&mut self, store: &mut dyn RecordingStore, name: &str) -> Result<String> {
        let frames = std::mem::take(&mut self.frames);
        store.save(frames, name, self.bank.channels(), self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::spec::FilterMode;
    use crate::processing::stream_filter::FilterOptions;
    use crate::recording::store::MemoryRecordingStore;

    #[test]
    fn buffers_filtered_frames_and_saves() {
        let mut bank = ChannelFilterBank::new(2, FilterOptions::default());
        bank.set_mode(FilterMode::Eeg).unwrap();
        let mut session = RecordingSession::new(bank, 250.0);

        assert_eq!(session.push(0, &[2.0, 10.0]).unwrap(), &[2.0, 10.0]);
        assert_eq!(session.push(4, &[4.0, 20.0]).unwrap(), &[3.0, 15.0]);
        assert_eq!(session.len(), 2);

        let mut store = MemoryRecordingStore::new();
        let id = session.save(&mut store, "eyes closed").unwrap();
        assert!(session.is_empty());

        let recording = store.get(&id).unwrap().unwrap();
        assert_eq!(recording.channels, 2);
        assert_eq!(recording.data[1].channels, vec![3.0, 15.0]);
        assert_eq!(recording.data[1].timestamp, 4);
    }

    #[test]
    fn bad_frame_is_not_buffered() {
        let bank = ChannelFilterBank::new(2, FilterOptions::default());
        let mut session = RecordingSession::new(bank, 250.0);
        assert!(session.push(0, &[1.0]).is_err());
        assert!(session.is_empty());
    }

    #[test]
    fn discard_resets_history() {
        let mut bank = ChannelFilterBank::new(1, FilterOptions::default());
        bank.set_mode(FilterMode::Eog).unwrap();
        let mut session = RecordingSession::new(bank, 250.0);
        session.push(0, &[100.0]).unwrap();
        session.discard();
        assert!(session.is_empty());
        assert_eq!(session.push(1, &[1.0]).unwrap(), &[1.0]);
    }
}
