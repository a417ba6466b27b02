pub mod bindings;
pub mod config;
pub mod error;
pub mod filters;
pub mod local;
pub mod processing;
pub mod recording;
pub mod utils;

pub use error::{FilterError, Result};
pub use filters::spec::{FilterKind, FilterMode, FilterSpec};
pub use filters::FilterAlgorithm;
pub use processing::channel_bank::ChannelFilterBank;
pub use processing::stream_filter::{FilterOptions, NonFinitePolicy, StreamFilter};
