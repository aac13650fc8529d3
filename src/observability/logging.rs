//! Structured logging.
//!
//! # Responsibilities
//! - Build the INFO and ERROR sinks
//! - Apply the `RUST_LOG` filter on top of the always-on application events
//! - Provide an in-memory writer for capturing output
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Error events carry the source file and line of the log call
//! - Info events from this crate and the `web` binary, and every error event,
//!   pass regardless of `RUST_LOG`; the filter only adds events from other targets
//! - The result is a `Dispatch` owned by the application, not a global, so
//!   several applications can coexist in one process

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{Dispatch, Level};
use tracing_subscriber::{
    filter::{filter_fn, FilterExt, LevelFilter, Targets},
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    EnvFilter, Layer,
};

/// Filter applied when `RUST_LOG` is not set or cannot be parsed.
pub const DEFAULT_FILTER: &str = "web=info,webapp=info,tower_http=info";

/// Log dispatcher writing both sinks to standard output.
pub fn stdout() -> Dispatch {
    dispatch(std::io::stdout, true)
}

/// Build a log dispatcher writing both sinks to `writer`, filtered by `RUST_LOG`.
pub fn dispatch<W>(writer: W, ansi: bool) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Clone + Send + Sync + 'static,
{
    dispatch_with_filter(writer, ansi, std::env::var("RUST_LOG").ok().as_deref())
}

/// Build a log dispatcher with explicit filter directives instead of `RUST_LOG`.
pub fn dispatch_with_filter<W>(writer: W, ansi: bool, directives: Option<&str>) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Clone + Send + Sync + 'static,
{
    let extra = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let info = fmt::layer()
        .with_writer(writer.clone())
        .with_ansi(ansi)
        .with_target(false)
        .with_filter(
            application_targets()
                .or(extra)
                .and(filter_fn(|meta| *meta.level() != Level::ERROR)),
        );

    let error = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(LevelFilter::ERROR);

    let subscriber = tracing_subscriber::registry().with(info).with(error);

    Dispatch::new(subscriber)
}

fn application_targets() -> Targets {
    Targets::new()
        .with_target("web", Level::INFO)
        .with_target("webapp", Level::INFO)
}

/// Shared in-memory log destination.
///
/// Clones write to the same buffer, so one handle can be given to
/// [`dispatch`] and another kept to read the output back.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'w> MakeWriter<'w> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'w self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_and_error_sinks() {
        let out = LogBuffer::default();
        let log = dispatch_with_filter(out.clone(), false, None);

        tracing::dispatcher::with_default(&log, || {
            tracing::info!("server ready");
            tracing::error!("bind failed");
        });

        let text = out.contents();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "{text}");

        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("server ready"));
        assert!(!lines[0].contains("logging.rs"));

        assert!(lines[1].contains("ERROR"));
        assert!(lines[1].contains("bind failed"));
        assert!(lines[1].contains("logging.rs:"));
    }

    #[test]
    fn error_logged_once() {
        let out = LogBuffer::default();
        let log = dispatch_with_filter(out.clone(), false, None);

        tracing::dispatcher::with_default(&log, || tracing::error!("only once"));

        assert_eq!(out.contents().matches("only once").count(), 1);
    }

    #[test]
    fn filter_cannot_silence_application_lines() {
        let out = LogBuffer::default();
        let log = dispatch_with_filter(out.clone(), false, Some("off"));

        tracing::dispatcher::with_default(&log, || {
            tracing::info!("server ready");
            tracing::info!(target: "web", "binary line");
            tracing::info!(target: "hyper", "dependency noise");
            tracing::error!(target: "hyper", "dependency failure");
            tracing::debug!("too verbose");
        });

        let text = out.contents();
        assert!(text.contains("server ready"), "{text}");
        assert!(text.contains("binary line"), "{text}");
        assert!(text.contains("dependency failure"), "{text}");
        assert!(!text.contains("dependency noise"), "{text}");
        assert!(!text.contains("too verbose"), "{text}");
    }

    #[test]
    fn filter_adds_other_targets() {
        let out = LogBuffer::default();
        let log = dispatch_with_filter(out.clone(), false, Some("hyper=debug"));

        tracing::dispatcher::with_default(&log, || {
            tracing::debug!(target: "hyper", "parsed head");
            tracing::info!("server ready");
        });

        let text = out.contents();
        assert!(text.contains("parsed head"), "{text}");
        assert!(text.contains("server ready"), "{text}");
    }

    #[test]
    fn buffer_clones_share_output() {
        use std::io::Write;

        let buffer = LogBuffer::default();
        let mut writer = buffer.make_writer();
        writer.write_all(b"line\n").unwrap();
        assert_eq!(buffer.contents(), "line\n");
    }
}
