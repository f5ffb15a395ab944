// Public API
pub use handler::{websocket_handler, WebsocketReceiveHandler};
pub use messages::{MessageType, WebSocketMessage};
pub use socket::{Connection, MessageHandler, SocketWrapper};

// Internal modules
mod handler;
mod messages;
mod socket;
