//! HTTP server setup and the accept loop.
//!
//! # Responsibilities
//! - Build the request dispatcher from the routes hook
//! - Wire the four transport timeouts into the connection stack
//! - Bind to the configured port and accept connections
//! - Serve each connection on its own task
//!
//! # Design Decisions
//! - Returns only on bind failure, fatal accept failure, or shutdown signal
//! - No draining: in-flight connections outlive the accept loop
//! - The application's log dispatcher is attached to every task it spawns

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use axum::{http::StatusCode, Router};
use hyper::{
    body::Incoming,
    server::conn::http1,
    service::{service_fn, Service as _},
    Request,
};
use hyper_util::{
    rt::{TokioIo, TokioTimer},
    service::TowerToHyperService,
};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tower_http::{
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};
use tracing::{instrument::WithSubscriber, Instrument};

use crate::app::Application;
use crate::config::ServerTimeouts;
use crate::net::connection::{ConnectionId, IdleTimeoutStream, InFlight};
use crate::net::listener;

/// Error returned when the server stops without a shutdown signal.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Failed to bind the listening socket.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Accepting a connection failed with a non-transient error.
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),
}

impl Application {
    /// Bind to the configured port and serve until the process exits.
    ///
    /// Only returns on error.
    pub async fn serve(self) -> Result<(), ServeError> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Bind to the configured port and serve until `signal` resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send,
    {
        let log = self.log().clone();
        async move {
            let port = self.config().port;
            self.log_startup(port);

            let listener = listener::bind(port)
                .await
                .map_err(|source| ServeError::Bind {
                    addr: listener::all_interfaces(port),
                    source,
                })?;

            self.accept_loop(listener, signal).await
        }
        .with_subscriber(log)
        .await
    }

    /// Serve on an already bound listener until `signal` resolves.
    ///
    /// The startup line reports the listener's port, not the configured one.
    pub async fn serve_listener<F>(self, listener: TcpListener, signal: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send,
    {
        let log = self.log().clone();
        async move {
            let port = listener
                .local_addr()
                .map(|addr| addr.port())
                .unwrap_or(self.config().port);
            self.log_startup(port);
            self.accept_loop(listener, signal).await
        }
        .with_subscriber(log)
        .await
    }

    /// Routes hook wrapped in the read and write timeout layers.
    pub fn router(&self) -> Router {
        let timeouts = self.timeouts();
        let mut router = self.routes();

        if let Some(write) = timeouts.write_limit() {
            router = router.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                write,
            ));
        }
        if let Some(read) = timeouts.read_limit() {
            router = router.layer(RequestBodyTimeoutLayer::new(read));
        }

        router.layer(TraceLayer::new_for_http())
    }

    fn log_startup(&self, port: u16) {
        tracing::info!(
            version = self.version(),
            "Starting HTTP server in {} mode on port: {}",
            self.config().env,
            port
        );
    }

    async fn accept_loop<F>(self, listener: TcpListener, signal: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send,
    {
        let router = self.router();
        let timeouts = *self.timeouts();
        let log = self.log().clone();

        if let Ok(addr) = listener.local_addr() {
            tracing::debug!(address = %addr, "Accepting connections");
        }

        tokio::pin!(signal);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener::accept(&listener) => accepted.map_err(ServeError::Accept)?,
                _ = &mut signal => {
                    tracing::info!("HTTP server stopped");
                    return Ok(());
                }
            };

            let id = ConnectionId::new();
            let span = tracing::debug_span!("connection", id = %id, peer = %peer);
            tokio::spawn(
                serve_connection(stream, router.clone(), timeouts)
                    .instrument(span)
                    .with_subscriber(log.clone()),
            );
        }
    }
}

/// Drive one HTTP/1.1 connection to completion.
///
/// Each request holds an in-flight guard until its response is ready, so the
/// idle limit only applies between requests.
async fn serve_connection(stream: TcpStream, router: Router, timeouts: ServerTimeouts) {
    let in_flight = InFlight::default();
    let io = TokioIo::new(IdleTimeoutStream::new(
        stream,
        timeouts.idle_limit(),
        in_flight.clone(),
    ));

    let router = TowerToHyperService::new(router);
    let service = service_fn(move |req: Request<Incoming>| {
        let guard = in_flight.enter();
        let response = router.call(req);
        async move {
            let response = response.await;
            drop(guard);
            response
        }
    });

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read_header_limit())
        .keep_alive(true);

    if let Err(e) = builder.serve_connection(io, service).await {
        tracing::debug!(error = %e, "Connection closed with error");
    }
}
