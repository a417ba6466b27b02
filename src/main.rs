use biopotential_filter::config::{load_config, Config};
use biopotential_filter::error::Result;
use biopotential_filter::filters::spec::FilterMode;
use biopotential_filter::local::{process_file, simulate};
use biopotential_filter::recording::export::export_all;
use biopotential_filter::recording::store::FileRecordingStore;
use biopotential_filter::recording::{write_csv, RecordingStore};
use biopotential_filter::utils;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "biofilter",
    version,
    about = "Real-time filtering and recording of EEG/EMG/ECG/EOG samples"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// YAML configuration file; defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Filter mode, overrides the configuration (emg, ecg, eog, eeg, notch50, notch60, none)
    #[arg(short, long, global = true)]
    mode: Option<FilterMode>,

    /// Log mode switches and store operations
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Filter every channel of a CSV file
    Filter(FilterArgs),
    /// Generate a synthetic signal, filter it and store it as a recording
    Simulate(SimulateArgs),
    /// Manage stored recordings
    #[command(subcommand)]
    Recordings(RecordingsCommand),
    /// Show the filter spec of every mode at the configured sample rate
    Modes,
}

#[derive(Args)]
struct FilterArgs {
    /// Input CSV, header row required
    input: PathBuf,
    /// Output CSV
    #[arg(short, long, default_value = "output.csv")]
    output: PathBuf,
}

#[derive(Args)]
struct SimulateArgs {
    /// Length of the simulated recording in seconds
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f64,
    /// Recording name
    #[arg(short, long, default_value = "simulated")]
    name: String,
    /// Seed for a reproducible signal
    #[arg(long)]
    seed: Option<u64>,
    /// Print raw and filtered channel 1 as bars
    #[arg(long)]
    display: bool,
}

#[derive(Subcommand)]
enum RecordingsCommand {
    /// List stored recordings
    List,
    /// Export a recording as CSV (stdout when no output is given)
    Export {
        id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Bundle every recording as CSV into one ZIP archive
    ExportAll {
        /// Directory the archive is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Delete one recording
    Delete { id: String },
    /// Delete every recording
    Clear,
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(mode) = cli.mode {
        config.processor.mode = mode;
    }
    config.validate()?;

    utils::log::init(cli.verbose, config.processor.enable_debug_logging);

    match cli.command {
        Command::Filter(args) => {
            let rows = process_file::run(&config.processor, &args.input, &args.output)?;
            println!(
                "{} {} rows -> {}",
                "Filtered".green(),
                rows,
                args.output.display()
            );
        }
        Command::Simulate(args) => {
            let id = simulate::run(&config, args.seconds, &args.name, args.seed, args.display)?;
            println!("{} recording {}", "Saved".green(), id.bold());
        }
        Command::Recordings(command) => {
            let mut store = FileRecordingStore::open(&config.recording.directory)?;
            recordings(&mut store, command)?;
        }
        Command::Modes => {
            for mode in FilterMode::ALL {
                match mode.spec(config.processor.sample_rate) {
                    Some(spec) => println!(
                        "{:<8} {:<9} {:>6} - {:<6} Hz",
                        mode.as_str().bold(),
                        format!("{:?}", spec.kind).to_lowercase(),
                        spec.cutoff_low,
                        spec.cutoff_high
                    ),
                    None => println!("{:<8} {}", mode.as_str().bold(), "pass-through".dimmed()),
                }
            }
        }
    }
    Ok(())
}

fn recordings(store: &mut dyn RecordingStore, command: RecordingsCommand) -> Result<()> {
    match command {
        RecordingsCommand::List => {
            for recording in store.list()? {
                println!(
                    "{}  {:<20} {:>8.2} s  {} ch @ {} Hz  {}",
                    recording.id.bold(),
                    recording.name,
                    recording.duration,
                    recording.channels,
                    recording.sample_rate,
                    recording.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        RecordingsCommand::Export { id, output } => {
            let recording = store
                .get(&id)?
                .ok_or(biopotential_filter::FilterError::RecordingNotFound(id))?;
            match output {
                Some(path) => {
                    write_csv(BufWriter::new(File::create(&path)?), &recording.data, recording.channels)?;
                    println!("{} {} -> {}", "Exported".green(), recording.id, path.display());
                }
                None => write_csv(io::stdout().lock(), &recording.data, recording.channels)?,
            }
        }
        RecordingsCommand::ExportAll { output } => {
            let path = export_all(store, &output)?;
            println!("{} {}", "Exported".green(), path.display());
        }
        RecordingsCommand::Delete { id } => {
            store.delete(&id)?;
            println!("{} {}", "Deleted".yellow(), id);
        }
        RecordingsCommand::Clear => {
            store.clear()?;
            println!("{}", "Cleared all recordings".yellow());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
