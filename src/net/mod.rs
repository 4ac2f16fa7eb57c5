//! Control-channel transport.
//!
//! # Data Flow
//! ```text
//! check pipeline
//!     → stats_socket.rs (connect with timeout, map errors)
//!     → connection.rs (write command, half-close, read to EOF)
//!     → raw response text
//! ```
//!
//! # Design Decisions
//! - Checks depend on the `StatsSource` trait, not on the socket itself
//! - The connection guard closes the socket on every path

pub mod connection;
pub mod stats_socket;

pub use stats_socket::{StatsSocket, StatsSource};
