//! Per-connection relay loop.
//!
//! Each accepted WebSocket gets one task running [`relay_client`]:
//!
//! ```text
//! upgrade ── announce join ── register ──► read loop ──► cleanup
//!                                           │   ▲          (leave +
//!                                           ▼   │           announce)
//!                                        broadcast
//! ```
//!
//! The only suspension point in steady state is the next-frame read.
//! Outbound delivery runs on a separate writer task fed by the client's
//! outbox, so broadcasts from other tasks never wait on this socket.

use std::sync::Arc;

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};

use crate::room::{ClientHandle, Room};

/// Drive one client's connection until its read fails or closes.
///
/// Joins the room under `name`, relays every inbound text frame to the
/// room tagged with the sender's name, and on any exit removes the
/// registry entry and announces the departure. Cleanup runs on every
/// exit path once the join has happened; the departing client's own
/// entry is removed before the "has left" announcement, so it never
/// receives its own notice.
pub async fn relay_client<S, E>(room: Arc<Room>, name: String, socket: S)
where
    S: Stream<Item = Result<Message, E>> + Sink<Message> + Send + 'static,
    <S as Sink<Message>>::Error: std::fmt::Display + Send,
    E: std::fmt::Display,
{
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Announce before registering so the joiner does not see its own
    // announcement.
    room.broadcast_text(&format!("{name} has joined the room.")).await;

    let (handle, mut outbox) = ClientHandle::channel();
    room.join(name.clone(), handle).await;
    log::info!("{name} joined room {}", room.name());

    // Writer task: pump the outbox into the socket sink. Ends when the
    // outbox closes (entry removed from the registry) or a write fails.
    let writer_name = name.clone();
    tokio::spawn(async move {
        while let Some(frame) = outbox.recv().await {
            if let Err(e) = ws_sender.send(frame).await {
                log::warn!("write to {writer_name} failed: {e}");
                break;
            }
        }
    });

    // Read loop: any read failure, close frame, or stream end is an
    // unconditional termination signal. Non-text frames are ignored.
    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                room.broadcast_text(&format!("{name} {}", text.as_str())).await;
            }
            Ok(Message::Close(_)) => {
                log::debug!("{name} sent close frame");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("read from {name} failed: {e}");
                break;
            }
        }
    }

    // Cleanup: remove first, then announce, so the departing client's
    // write path is already torn down when the notice goes out.
    room.leave(&name).await;
    room.broadcast_text(&format!("{name} has left the room.")).await;
    log::info!("{name} left room {}", room.name());
}
