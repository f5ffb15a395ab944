use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

use crate::event::MatchEvent;

use super::messages::WebSocketMessage;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Handler for incoming WebSocket messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle an incoming message from the client; a returned message is sent
    /// back to this client only
    async fn handle_message(
        &self,
        player_id: &str,
        match_id: &str,
        message: String,
    ) -> Option<WebSocketMessage>;
}

#[derive(Debug)]
pub enum SocketError {
    ConnectionClosed,
    SendFailed(String),
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // Binary, ping and pong frames carry nothing for us
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// A client attached to one match
///
/// Forwards every event on the match channel to the socket and hands inbound text
/// to the message handler until either side goes away.
pub struct Connection {
    pub player_id: String,
    pub match_id: String,
    socket: Box<dyn SocketWrapper>,
    events: broadcast::Receiver<MatchEvent>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        player_id: String,
        match_id: String,
        socket: Box<dyn SocketWrapper>,
        events: broadcast::Receiver<MatchEvent>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            player_id,
            match_id,
            socket,
            events,
            message_handler,
        }
    }

    /// Run the connection - handles both sending and receiving until disconnect
    pub async fn run(mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                event = self.events.recv() => {
                    match event {
                        Ok(event) => {
                            self.send(&WebSocketMessage::from_event(&event)).await?;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(
                                match_id = %self.match_id,
                                player_id = %self.player_id,
                                skipped = skipped,
                                "Connection lagged, events dropped"
                            );
                        }
                        Err(RecvError::Closed) => break,
                    }
                }

                msg = self.socket.receive_message() => {
                    match msg? {
                        Some(message) => {
                            let reply = self
                                .message_handler
                                .handle_message(&self.player_id, &self.match_id, message)
                                .await;
                            if let Some(reply) = reply {
                                self.send(&reply).await?;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        let _ = self.socket.close().await;
        Ok(())
    }

    async fn send(&mut self, message: &WebSocketMessage) -> Result<(), SocketError> {
        let text = serde_json::to_string(message)
            .map_err(|e| SocketError::SendFailed(e.to_string()))?;
        self.socket.send_message(text).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::event::EventBus;
    use crate::game::{GameMode, Match};
    use crate::websockets::messages::MessageType;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// In-memory socket: the test pushes client frames in and reads server frames out
    pub struct FakeSocket {
        inbound: mpsc::UnboundedReceiver<String>,
        outbound: mpsc::UnboundedSender<String>,
    }

    pub fn fake_socket() -> (
        FakeSocket,
        mpsc::UnboundedSender<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (client_tx, inbound) = mpsc::unbounded_channel();
        let (outbound, client_rx) = mpsc::unbounded_channel();
        (FakeSocket { inbound, outbound }, client_tx, client_rx)
    }

    #[async_trait]
    impl SocketWrapper for FakeSocket {
        async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
            self.outbound
                .send(message)
                .map_err(|_| SocketError::ConnectionClosed)
        }

        async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
            Ok(self.inbound.recv().await)
        }

        async fn close(&mut self) -> Result<(), SocketError> {
            Ok(())
        }
    }

    struct EchoErrorHandler;

    #[async_trait]
    impl MessageHandler for EchoErrorHandler {
        async fn handle_message(
            &self,
            _player_id: &str,
            _match_id: &str,
            message: String,
        ) -> Option<WebSocketMessage> {
            Some(WebSocketMessage::error(message))
        }
    }

    async fn next_frame(rx: &mut mpsc::UnboundedReceiver<String>) -> WebSocketMessage {
        let text = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("frame within timeout")
            .expect("socket open");
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_connection_forwards_events_and_replies() {
        let bus = EventBus::default();
        let (socket, client_tx, mut client_rx) = fake_socket();
        let connection = Connection::new(
            "p1".to_string(),
            "m1".to_string(),
            Box::new(socket),
            bus.subscribe_to_match("m1").await,
            Arc::new(EchoErrorHandler),
        );
        let task = tokio::spawn(connection.run());

        bus.emit_to_match("m1", MatchEvent::state(&Match::new(GameMode::Pvp)))
            .await;
        assert_eq!(next_frame(&mut client_rx).await.message_type, MessageType::State);

        // Events on other matches never reach this socket
        bus.emit_to_match("m2", MatchEvent::state(&Match::new(GameMode::Pvp)))
            .await;

        client_tx.send("hello".to_string()).unwrap();
        let reply = next_frame(&mut client_rx).await;
        assert_eq!(reply.message_type, MessageType::Error);
        assert_eq!(reply.payload["message"], "hello");

        drop(client_tx);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("connection ends when the client leaves")
            .unwrap()
            .unwrap();
    }
}
