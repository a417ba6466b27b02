use colored::Colorize;
use log::{Level, LevelFilter};
use std::io::Write;

fn level_label(level: Level) -> colored::ColoredString {
    let label = format!("{:<5}", level);
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.dimmed(),
    }
}

/// Installs the global logger: timestamped, coloured level labels.
///
/// `RUST_LOG` still overrides the default level. Per-sample tracing is only
/// emitted when `debug_samples` is set.
pub fn init(verbose: bool, debug_samples: bool) {
    let default_level = if debug_samples {
        LevelFilter::Trace
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                level_label(record.level()),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
