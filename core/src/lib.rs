// Relay Core Library

pub mod client;
pub mod model;
pub mod pipeline;
pub mod sampling;
pub mod server;
pub mod tools;
pub mod transport;

pub use client::{PlaceholderHandler, SamplingHandler, ToolClient};
pub use server::ToolServer;
