// Upstream client and domain types for the Waktu Solat MCP server

pub mod client;
pub mod error;
pub mod retry;
pub mod schedule;
pub mod types;

pub use client::SolatClient;
pub use error::ApiError;
pub use types::*;
