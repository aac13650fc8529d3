//! Construction options.
//!
//! Each option mutates one field of a partially built [`Application`].
//! Options run in the order given; when two touch the same field the later
//! one wins.

use std::time::Duration;

use tracing::Dispatch;

use crate::app::{Application, Routes};

/// A single construction step applied on top of the defaults.
pub type AppOption = Box<dyn FnOnce(&mut Application) + Send>;

/// Limit how long a keep-alive connection may stay silent.
pub fn set_idle_timeout(timeout: Duration) -> AppOption {
    Box::new(move |app: &mut Application| app.timeouts.idle = timeout)
}

/// Limit how long reading the request body may take.
pub fn set_read_timeout(timeout: Duration) -> AppOption {
    Box::new(move |app: &mut Application| app.timeouts.read = timeout)
}

/// Limit how long reading the request head may take.
pub fn set_header_timeout(timeout: Duration) -> AppOption {
    Box::new(move |app: &mut Application| app.timeouts.read_header = timeout)
}

/// Limit how long producing the response may take.
pub fn set_write_timeout(timeout: Duration) -> AppOption {
    Box::new(move |app: &mut Application| app.timeouts.write = timeout)
}

/// Replace the routes hook.
pub fn set_routes(routes: Routes) -> AppOption {
    Box::new(move |app: &mut Application| app.routes = routes)
}

/// Replace the log dispatcher.
pub fn set_logger(log: Dispatch) -> AppOption {
    Box::new(move |app: &mut Application| app.log = log)
}
