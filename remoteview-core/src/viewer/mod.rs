//! The message display client.
//!
//! A [`Viewer`] owns exactly one connection and one display surface. It
//! connects once, renders every text payload as a new paragraph in arrival
//! order and stops when the connection ends. There is no retry and no
//! failure is ever rendered.

mod state;

pub use state::{ConnectionState, ViewerExit};

use crate::display::{DisplaySurface, Paragraph};
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

/// The fixed address the viewer connects to.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8082";

/// What is left once a viewer's connection has ended.
#[derive(Debug)]
pub struct Session<S> {
    pub surface: S,
    pub exit: ViewerExit,
    pub received: usize,
}

pub struct Viewer<S> {
    endpoint: String,
    surface: S,
    state: ConnectionState,
    received: usize,
}

impl<S: DisplaySurface> Viewer<S> {
    /// A viewer for [`DEFAULT_ENDPOINT`].
    pub fn new(surface: S) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, surface)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, surface: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            surface,
            state: ConnectionState::Disconnected,
            received: 0,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Connect and display messages until the connection ends.
    ///
    /// Consumes the viewer: a finished viewer is never reconnected.
    pub async fn run(mut self) -> Session<S> {
        let exit = self.drive().await;

        tracing::debug!(
            endpoint = %self.endpoint,
            exit = ?exit,
            received = self.received,
            "viewer connection ended"
        );

        Session {
            surface: self.surface,
            exit,
            received: self.received,
        }
    }

    async fn drive(&mut self) -> ViewerExit {
        let mut socket = match connect_async(self.endpoint.as_str()).await {
            Ok((socket, _)) => socket,
            Err(e) => {
                tracing::debug!(endpoint = %self.endpoint, error = %e, "viewer could not connect");
                return ViewerExit::Unreachable;
            }
        };

        self.on_open();

        let mut close_seen = false;
        while let Some(frame) = socket.next().await {
            match frame {
                Ok(Message::Text(text)) => self.on_message(text.as_str()),
                Ok(Message::Close(_)) => close_seen = true,
                // Binary frames carry no text payload; ping/pong is answered
                // by the protocol layer.
                Ok(_) => {}
                Err(WsError::ConnectionClosed) => return ViewerExit::Closed,
                Err(e) => {
                    tracing::debug!(endpoint = %self.endpoint, error = %e, "viewer connection failed");
                    return ViewerExit::Dropped;
                }
            }
        }

        if close_seen {
            ViewerExit::Closed
        } else {
            ViewerExit::Dropped
        }
    }

    fn on_open(&mut self) {
        self.state = self.state.connect();
        tracing::debug!(endpoint = %self.endpoint, "viewer connected");
    }

    fn on_message(&mut self, payload: &str) {
        self.received += 1;
        self.surface.append(Paragraph::new(payload));
    }
}
