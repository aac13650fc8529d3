//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Transient accept error
//!     → backoff.rs (exponential delay with jitter)
//!     → retry accept
//! ```

pub mod backoff;
