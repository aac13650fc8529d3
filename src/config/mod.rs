//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line flags (--port, --env, --api)
//!     → loader.rs (clap parse, exit with usage on error)
//! environment (STRIPE_KEY, STRIPE_SECRET)
//!     → schema.rs Secrets (empty when unset)
//!     → Config (immutable snapshot, owned by the Application)
//! ```
//!
//! # Design Decisions
//! - No semantic validation: unknown environment tags and empty secrets are accepted
//! - Secrets are never read from the command line and never printed

pub mod loader;
pub mod schema;

pub use loader::Cli;
pub use schema::{Config, Secrets, ServerTimeouts, DEFAULT_TIMEOUT};
