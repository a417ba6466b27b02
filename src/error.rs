use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid filter mode: {0}")]
    InvalidMode(String),

    #[error("Invalid filter spec: {0}")]
    InvalidFilterSpec(String),

    #[error("Non-finite sample rejected: {0}")]
    NonFiniteSample(f64),

    #[error("Expected {expected} channels, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Invalid channel index: {0}")]
    InvalidChannel(usize),

    #[error("Recording not found: {0}")]
    RecordingNotFound(String),

    #[error("Invalid input data: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, FilterError>;
