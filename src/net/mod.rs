//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept with retry on transient errors)
//!     → connection.rs (connection ID, idle deadline)
//!     → Hand off to HTTP layer
//! ```

pub mod connection;
pub mod listener;
