//! Relays lines read from stdin to every configured output format.

pub mod connection;
pub mod filter;
pub mod orchestrator;

pub use connection::{ConnectionInfo, StdinConnection};
pub use orchestrator::Relay;
