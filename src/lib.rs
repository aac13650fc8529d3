//! Web application bootstrap.
//!
//! # Architecture Overview
//!
//! ```text
//!     flags + environment ──▶ config ──▶ app::Application::new(options)
//!                                              │
//!                                              ▼
//!     Client ──▶ net::listener ──▶ http::server (hyper, timeouts) ──▶ routes hook
//!
//!     Cross-cutting: observability (INFO/ERROR sinks), lifecycle (shutdown),
//!                    resilience (accept backoff)
//! ```

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;

pub use app::{AppOption, Application};
pub use config::Config;
pub use http::ServeError;
pub use lifecycle::Shutdown;
