//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (app):
//!     Parse config → Build loggers → Apply options → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Signal received → Stop accepting → Return from serve
//! ```
//!
//! # Design Decisions
//! - Fail fast: bind errors are fatal
//! - In-flight connections are not drained

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
