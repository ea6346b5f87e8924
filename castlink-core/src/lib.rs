pub mod model;

pub use model::{ClientMessage, ConnectionId, Resolution, RoomKey, ServerMessage};
