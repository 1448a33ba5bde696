//! # roomcast — minimal real-time broadcast room
//!
//! Clients connect over WebSocket and every text message from one
//! client is relayed to all connected clients, tagged with the
//! sender's name.
//!
//! ## Architecture
//!
//! ```text
//! Client A ──┐                    ┌──► outbox A ──► socket A
//!            ├── /ws upgrade ──►  Room ─► outbox B ──► socket B
//! Client B ──┘   (relay task      └──► outbox C ──► socket C
//!                 per client)
//! ```
//!
//! ## Modules
//!
//! - [`room`] — registry of live connections + broadcast fan-out
//! - [`relay`] — per-connection join/read/leave lifecycle
//! - [`server`] — HTTP shell: `/ws`, `/health`, static UI

pub mod relay;
pub mod room;
pub mod server;

// Re-exports for convenience
pub use relay::relay_client;
pub use room::{ClientHandle, Room, RoomStats};
pub use server::{RelayServer, ServerConfig, DEFAULT_PORT};
