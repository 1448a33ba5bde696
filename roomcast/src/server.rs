//! HTTP/WebSocket shell around the relay core.
//!
//! Routes:
//! - `GET /ws?name=<name>` — WebSocket upgrade into the relay loop
//! - `GET /health` — fixed "ok" liveness response
//! - anything else — static chat UI from the configured directory
//!
//! The single default room is constructed with the server and injected
//! into every handler through axum state; there is no global.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::services::ServeDir;

use crate::relay::relay_client;
use crate::room::Room;

/// Default listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: String,
    /// Directory of static files served at the root
    pub static_dir: PathBuf,
    /// Name of the single room
    pub room_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            static_dir: PathBuf::from("static"),
            room_name: "Default".to_string(),
        }
    }
}

impl ServerConfig {
    /// Build a config from the environment: listen port from `PORT`,
    /// falling back to 8080 when unset or unparseable.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            bind_addr: format!("0.0.0.0:{port}"),
            ..Self::default()
        }
    }
}

/// Shared state accessible from axum handlers.
#[derive(Clone)]
struct AppState {
    room: Arc<Room>,
}

/// The relay server: one room plus the HTTP surface around it.
pub struct RelayServer {
    config: ServerConfig,
    room: Arc<Room>,
}

impl RelayServer {
    /// Create a server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let room = Arc::new(Room::new(config.room_name.clone()));
        Self { config, room }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }

    /// The room all connections join.
    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    /// Get the configured bind address.
    pub fn bind_addr(&self) -> &str {
        &self.config.bind_addr
    }

    /// Build the router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            room: self.room.clone(),
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/ws", get(ws_handler))
            .fallback_service(ServeDir::new(&self.config.static_dir))
            .with_state(state)
    }

    /// Bind and serve until the process exits.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr).await?;
        log::info!("Listening on {}", self.config.bind_addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Query parameters for the upgrade request.
///
/// `name` is client-chosen and not validated; a missing parameter joins
/// as the empty string.
#[derive(Debug, Deserialize)]
struct JoinParams {
    #[serde(default)]
    name: String,
}

/// GET /ws — upgrade and hand the socket to the relay loop.
async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<JoinParams>,
    State(state): State<AppState>,
) -> Response {
    let name = params.name;
    ws.on_failed_upgrade(|e| log::warn!("websocket upgrade failed: {e}"))
        .on_upgrade(move |socket| relay_client(state.room, name, socket))
}

/// GET /health — liveness probe.
async fn health_handler() -> &'static str {
    "ok"
}
