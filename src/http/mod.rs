//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper HTTP/1.1, header read timeout)
//!     → timeout layers (request body read, response write)
//!     → routes hook (routes.rs by default)
//!     → Send to client
//! ```

pub mod routes;
pub mod server;

pub use server::ServeError;
