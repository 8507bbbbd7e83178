// MCP (Model Context Protocol) server exposing Malaysian prayer-time tools

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
