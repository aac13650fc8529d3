//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce tracing events
//!     → logging.rs Dispatch
//!         → INFO sink  (stdout, timestamp + level)
//!         → ERROR sink (stdout, timestamp + level + file:line)
//! ```

pub mod logging;
