use biopotential_filter::config::{save_config, Config, ProcessorConfig};
use biopotential_filter::local::process_file;
use biopotential_filter::recording::export::export_all;
use biopotential_filter::recording::session::RecordingSession;
use biopotential_filter::recording::store::FileRecordingStore;
use biopotential_filter::recording::{to_csv, RecordingStore};
use biopotential_filter::{ChannelFilterBank, FilterError, FilterMode};

use std::fs::{self, File};
use std::io::Read;

#[test]
fn filters_a_csv_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.csv");
    let output = dir.path().join("filtered.csv");
    fs::write(&input, "Timestamp,Ch1,Ch2\n0,1,10\n4,3,10\n8,5,40\n12,7,20\n").unwrap();

    let config = ProcessorConfig {
        mode: FilterMode::Ecg,
        channels: 2,
        ..ProcessorConfig::default()
    };
    assert_eq!(process_file::run(&config, &input, &output).unwrap(), 4);

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, "Timestamp,Ch1,Ch2\n0,1,10\n4,2,10\n8,3,20\n12,4,20\n");
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = process_file::run(
        &ProcessorConfig::default(),
        dir.path().join("nope.csv"),
        dir.path().join("out.csv"),
    );
    assert!(matches!(result, Err(FilterError::Io(_))));
}

#[test]
fn session_to_store_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordingStore::open(dir.path()).unwrap();

    let mut bank = ChannelFilterBank::new(3, Default::default());
    bank.set_mode(FilterMode::Eeg).unwrap();
    let mut session = RecordingSession::new(bank, 250.0);
    session.push(1000, &[3.0, 6.0, 9.0]).unwrap();
    session.push(1004, &[5.0, 6.0, 1.0]).unwrap();
    let id = session.save(&mut store, "two frames").unwrap();

    let recording = store.get(&id).unwrap().unwrap();
    assert_eq!(recording.duration, 2.0 / 250.0);
    assert_eq!(
        to_csv(&recording.data, recording.channels).unwrap(),
        "Timestamp,Ch1,Ch2,Ch3\n1000,3,6,9\n1004,4,6,5\n"
    );

    store.delete(&id).unwrap();
    assert!(store.list().unwrap().is_empty());
    assert!(matches!(
        store.delete(&id),
        Err(FilterError::RecordingNotFound(_))
    ));
}

#[test]
fn config_file_drives_processing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = Config::default();
    config.processor.mode = FilterMode::Notch50;
    config.processor.window = 2;
    config.processor.channels = 1;
    save_config(&config, &path).unwrap();

    let loaded = biopotential_filter::config::load_config(&path).unwrap();
    let input = dir.path().join("raw.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "Ch1\n2\n4\n8\n").unwrap();
    process_file::run(&loaded.processor, &input, &output).unwrap();

    // window of two: 2, (2+4)/2, (4+8)/2
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Timestamp,Ch1\n0,2\n4,3\n8,6\n"
    );
}

#[test]
fn export_all_bundles_stored_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordingStore::open(dir.path().join("recordings")).unwrap();
    assert!(matches!(
        export_all(&store, dir.path()),
        Err(FilterError::InvalidInput(_))
    ));

    let mut session = RecordingSession::new(ChannelFilterBank::new(2, Default::default()), 250.0);
    session.push(0, &[1.0, 2.0]).unwrap();
    session.save(&mut store, "baseline").unwrap();

    let path = export_all(&store, dir.path().join("out")).unwrap();
    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    let mut csv = String::new();
    archive
        .by_name("baseline.csv")
        .unwrap()
        .read_to_string(&mut csv)
        .unwrap();
    assert_eq!(csv, "Timestamp,Ch1,Ch2\n0,1,2\n");
}
