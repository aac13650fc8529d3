//! Application construction.
//!
//! # Data Flow
//! ```text
//! Config::load()                       (flags + environment)
//!     → logging::stdout()              (INFO and ERROR sinks)
//!     → empty template cache
//!     → ServerTimeouts::default()      (5s each)
//!     → options, applied in order      (last write wins)
//!     → Application                    (frozen, handed to serve)
//! ```
//!
//! # Design Decisions
//! - Defaults are named constants, not literals at the call site
//! - Every construction builds fresh state; nothing is shared between instances
//! - The application is read-only once serving begins

pub mod options;

use std::collections::HashMap;
use std::fmt;

use axum::Router;
use tracing::Dispatch;

use crate::config::{Config, ServerTimeouts};
use crate::http::routes::default_routes;
use crate::observability::logging;

pub use options::{
    set_header_timeout, set_idle_timeout, set_logger, set_read_timeout, set_routes,
    set_write_timeout, AppOption,
};

/// Application version reported at startup and by `/status`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Template name to template source. Nothing populates it yet.
pub type TemplateCache = HashMap<String, String>;

/// Produces the request dispatcher for an application.
pub type Routes = fn(&Application) -> Router;

/// The web application: configuration, loggers and transport settings.
pub struct Application {
    config: Config,
    log: Dispatch,
    template_cache: TemplateCache,
    version: &'static str,
    timeouts: ServerTimeouts,
    routes: Routes,
}

impl Application {
    /// Build an application from the process command line and environment.
    ///
    /// Exits with a usage message if the flags cannot be parsed.
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = AppOption>,
    {
        Self::with_config(Config::load(), options)
    }

    /// Build an application around an already loaded configuration.
    pub fn with_config<I>(config: Config, options: I) -> Self
    where
        I: IntoIterator<Item = AppOption>,
    {
        let mut app = Self {
            config,
            log: logging::stdout(),
            template_cache: TemplateCache::new(),
            version: VERSION,
            timeouts: ServerTimeouts::default(),
            routes: default_routes,
        };

        for option in options {
            option(&mut app);
        }

        app
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Log dispatcher holding the INFO and ERROR sinks.
    pub fn log(&self) -> &Dispatch {
        &self.log
    }

    pub fn template_cache(&self) -> &TemplateCache {
        &self.template_cache
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn timeouts(&self) -> &ServerTimeouts {
        &self.timeouts
    }

    /// Run the routes hook.
    pub fn routes(&self) -> Router {
        (self.routes)(self)
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("config", &self.config)
            .field("template_cache", &self.template_cache)
            .field("version", &self.version)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}
