use crate::master::LineReceiver;
use futures_util::{Sink, SinkExt, StreamExt};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

#[derive(Debug, PartialEq, Eq)]
pub(super) enum SessionEnd {
    /// The viewer left (or never completed the handshake).
    ViewerGone,

    /// No more lines will arrive; the viewer was sent a close frame.
    LinesClosed,
}

/// Lines owed to the current viewer.
///
/// The front `written - confirmed` lines of the backlog were sent but not
/// yet acknowledged; the rest were not sent at all. Each batch of lines is
/// followed by a ping carrying the running `written` count, and the pong
/// echoing it confirms every line up to that count.
struct Outbox<'a> {
    backlog: &'a mut VecDeque<String>,
    written: u64,
    confirmed: u64,
}

impl<'a> Outbox<'a> {
    fn new(backlog: &'a mut VecDeque<String>) -> Self {
        Self {
            backlog,
            written: 0,
            confirmed: 0,
        }
    }

    fn in_flight(&self) -> usize {
        (self.written - self.confirmed) as usize
    }

    /// Send every line not yet written, then a ping marking the batch.
    async fn flush<S>(&mut self, sink: &mut S) -> Result<(), WsError>
    where
        S: Sink<Message, Error = WsError> + Unpin,
    {
        let fresh: Vec<String> = self.backlog.iter().skip(self.in_flight()).cloned().collect();
        if fresh.is_empty() {
            return Ok(());
        }

        for line in fresh {
            sink.feed(Message::Text(line.into())).await?;
            self.written += 1;
        }
        sink.send(Message::Ping(self.written.to_be_bytes().to_vec().into()))
            .await
    }

    /// Drop lines acknowledged by a pong. Pongs that do not carry a marker
    /// this session sent are ignored.
    fn confirm(&mut self, payload: &[u8]) {
        let Ok(marker) = <[u8; 8]>::try_from(payload).map(u64::from_be_bytes) else {
            return;
        };
        if marker <= self.confirmed || marker > self.written {
            return;
        }

        for _ in self.confirmed..marker {
            self.backlog.pop_front();
        }
        self.confirmed = marker;
    }
}

/// Send lines to one viewer until it leaves or the lines run out.
///
/// A line leaves `backlog` only once the viewer acknowledged it, so a viewer
/// that vanishes mid-session costs nothing: every unacknowledged line is
/// replayed to the next viewer.
pub(super) async fn serve_viewer(
    stream: TcpStream,
    peer: SocketAddr,
    handshake_timeout: Duration,
    lines: &mut LineReceiver,
    backlog: &mut VecDeque<String>,
) -> SessionEnd {
    let ws = match tokio::time::timeout(handshake_timeout, accept_async(stream)).await {
        Ok(Ok(ws)) => ws,
        Ok(Err(e)) => {
            tracing::warn!(%peer, error = %e, "viewer handshake failed");
            return SessionEnd::ViewerGone;
        }
        Err(_) => {
            tracing::warn!(%peer, timeout = ?handshake_timeout, "viewer handshake timed out");
            return SessionEnd::ViewerGone;
        }
    };
    let (mut sink, mut incoming) = ws.split();
    let mut outbox = Outbox::new(backlog);

    if let Err(e) = outbox.flush(&mut sink).await {
        tracing::debug!(%peer, error = %e, "viewer left during backlog replay");
        return SessionEnd::ViewerGone;
    }

    loop {
        tokio::select! {
            biased;

            frame = incoming.next() => match frame {
                Some(Ok(Message::Pong(payload))) => outbox.confirm(&payload),
                Some(Ok(Message::Close(_))) | None => return SessionEnd::ViewerGone,
                Some(Err(e)) => {
                    tracing::debug!(%peer, error = %e, "viewer connection failed");
                    return SessionEnd::ViewerGone;
                }
                // The viewer never sends anything meaningful.
                Some(Ok(_)) => {}
            },
            line = lines.recv() => {
                let Some(line) = line else {
                    let _ = sink.close().await;
                    return SessionEnd::LinesClosed;
                };

                outbox.backlog.push_back(line);
                while let Ok(line) = lines.try_recv() {
                    outbox.backlog.push_back(line);
                }

                if let Err(e) = outbox.flush(&mut sink).await {
                    tracing::debug!(
                        %peer,
                        error = %e,
                        unacknowledged = outbox.backlog.len(),
                        "viewer left before lines were delivered"
                    );
                    return SessionEnd::ViewerGone;
                }
            }
        }
    }
}
