use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

/// Start a one-shot WebSocket server that sends `payloads` as text
/// messages to the first client, then closes.
///
/// Returns the `ws://` endpoint to connect to.
pub async fn start_ws_source(payloads: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ws source");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake failed");

        for payload in payloads {
            ws.send(Message::Text(payload.into())).await.unwrap();
        }
        ws.close(None).await.unwrap();

        // Keep reading so the close handshake completes.
        while ws.next().await.is_some() {}
    });

    format!("ws://{addr}")
}
