mod connection;
mod protocol;
mod room;

pub use connection::ConnectionId;
pub use protocol::{ClientMessage, Resolution, ServerMessage};
pub use room::RoomKey;
