pub mod channel_bank;
pub mod stream_filter;
