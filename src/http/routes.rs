//! Default routes hook.
//!
//! Serves `GET /status` so a running instance can be checked. Every other
//! path falls through to axum's 404.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::app::Application;

/// Body of `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub status: &'static str,
    pub environment: String,
    pub version: &'static str,
}

/// Routes used when no `set_routes` option is given.
pub fn default_routes(app: &Application) -> Router {
    let status = Status {
        status: "available",
        environment: app.config().env.clone(),
        version: app.version(),
    };

    Router::new()
        .route("/status", get(get_status))
        .with_state(status)
}

async fn get_status(State(status): State<Status>) -> Json<Status> {
    Json(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn production() -> Application {
        let config = Config {
            env: "production".into(),
            ..Config::default()
        };
        Application::with_config(config, [])
    }

    #[tokio::test]
    async fn status_reflects_application() {
        let response = production()
            .routes()
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "available");
        assert_eq!(json["environment"], "production");
        assert_eq!(json["version"], crate::app::VERSION);
    }

    #[tokio::test]
    async fn unknown_path_not_found() {
        let response = production()
            .routes()
            .oneshot(Request::get("/checkout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
