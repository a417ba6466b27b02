use super::{write_csv, Recording, RecordingStore};
use crate::error::{FilterError, Result};

use chrono::Utc;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// File name used inside the archive: the recording name with anything that
/// is not safe in a path replaced, falling back to the id.
fn entry_name(recording: &Recording, taken: &mut HashSet<String>) -> String {
    let stem: String = recording
        .name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() { recording.id.as_str() } else { stem };

    let mut name = format!("{}.csv", stem);
    if taken.contains(&name) {
        name = format!("{}_{}.csv", stem, recording.id);
    }
    taken.insert(name.clone());
    name
}

/// Writes one CSV entry per recording into a ZIP archive.
pub fn write_archive<W: Write + Seek>(writer: W, recordings: &[Recording]) -> Result<Vec<String>> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut taken = HashSet::new();
    let mut entries = Vec::with_capacity(recordings.len());
    for recording in recordings {
        let name = entry_name(recording, &mut taken);
        zip.start_file(name.as_str(), options)?;
        write_csv(&mut zip, &recording.data, recording.channels)?;
        entries.push(name);
    }

    zip.finish()?;
    Ok(entries)
}

/// Bundles every stored recording into `eeg-recordings-<millis>.zip` under
/// `directory` and returns the archive path.
///
/// An empty store is an error and no archive is created.
pub fn export_all<P: AsRef<Path>>(store: &dyn RecordingStore, directory: P) -> Result<PathBuf> {
    let recordings = store.list()?;
    if recordings.is_empty() {
        return Err(FilterError::InvalidInput("no recordings to export".to_string()));
    }

    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;
    let path = directory.join(format!("eeg-recordings-{}.zip", Utc::now().timestamp_millis()));

    let entries = write_archive(BufWriter::new(File::create(&path)?), &recordings)?;
    log::info!("exported {} recordings to {}", entries.len(), path.display());
    Ok(path)
}
