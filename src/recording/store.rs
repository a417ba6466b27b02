use super::{validate_save, Frame, Recording, RecordingStore};
use crate::error::{FilterError, Result};

use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "yaml";

fn next_id(exists: impl Fn(&str) -> bool) -> String {
    let base = format!("rec_{}", Utc::now().timestamp_millis());
    if !exists(&base) {
        return base;
    }
    let mut suffix = 1;
    loop {
        let id = format!("{}_{}", base, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

// FILE STORE -------------------------------------------------------------------

/// Recordings kept as one YAML document each under a directory.
///
/// The handle is opened explicitly and owned by the caller; dropping it is
/// the only "close" needed.
pub struct FileRecordingStore {
    root: PathBuf,
}

impl FileRecordingStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        log::debug!("opened recording store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Ids double as file names, so anything that could leave the directory
    // is treated as unknown.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return None;
        }
        Some(self.root.join(format!("{}.{}", id, EXTENSION)))
    }

    fn read(path: &Path) -> Result<Recording> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    fn recording_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == EXTENSION) {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

impl RecordingStore for FileRecordingStore {
    fn save(&mut self, data: Vec<Frame>, name: &str, channels: usize, sample_rate: f64) -> Result<String> {
        validate_save(channels, sample_rate)?;

        let id = next_id(|candidate| {
            self.path_for(candidate)
                .map_or(false, |path| path.exists())
        });
        let recording = Recording::new(id.clone(), name, data, channels, sample_rate);
        let path = self
            .path_for(&id)
            .ok_or_else(|| FilterError::Config(format!("unusable recording id {}", id)))?;

        fs::write(&path, serde_yaml::to_string(&recording)?)?;
        log::info!(
            "saved recording {} ({} frames, {:.2} s) to {}",
            id,
            recording.data.len(),
            recording.duration,
            path.display()
        );
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Option<Recording>> {
        match self.path_for(id) {
            Some(path) if path.exists() => Ok(Some(Self::read(&path)?)),
            _ => Ok(None),
        }
    }

    fn list(&self) -> Result<Vec<Recording>> {
        let mut recordings = self
            .recording_paths()?
            .iter()
            .map(|path| Self::read(path))
            .collect::<Result<Vec<_>>>()?;
        recordings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(recordings)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        match self.path_for(id) {
            Some(path) if path.exists() => {
                fs::remove_file(path)?;
                log::info!("deleted recording {}", id);
                Ok(())
            }
            _ => Err(FilterError::RecordingNotFound(id.to_string())),
        }
    }

    fn clear(&mut self) -> Result<()> {
        let paths = self.recording_paths()?;
        for path in &paths {
            fs::remove_file(path)?;
        }
        log::info!("cleared {} recordings", paths.len());
        Ok(())
    }
}

// MEMORY STORE -----------------------------------------------------------------

#[derive(Default)]
pub struct MemoryRecordingStore {
    recordings: BTreeMap<String, Recording>,
}

impl MemoryRecordingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordingStore for MemoryRecordingStore {
    fn save(&mut self, data: Vec<Frame>, name: &str, channels: usize, sample_rate: f64) -> Result<String> {
        validate_save(channels, sample_rate)?;
        let id = next_id(|candidate| self.recordings.contains_key(candidate));
        let recording = Recording::new(id.clone(), name, data, channels, sample_rate);
        self.recordings.insert(id.clone(), recording);
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Option<Recording>> {
        Ok(self.recordings.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Recording>> {
        let mut recordings: Vec<Recording> = self.recordings.values().cloned().collect();
        recordings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(recordings)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.recordings
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| FilterError::RecordingNotFound(id.to_string()))
    }

    fn clear(&mut self) -> Result<()> {
        self.recordings.clear();
        Ok(())
    }
}
