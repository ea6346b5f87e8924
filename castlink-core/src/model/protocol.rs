use crate::model::connection::ConnectionId;
use crate::model::room::RoomKey;
use serde::{Deserialize, Serialize};

/// Display size advertised by the host, last write wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Messages a client sends to the service. Wire format is an adjacently
/// tagged JSON envelope: `{"op": "<event>", "d": <payload>}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Register the caller as host of the given room key.
    CreateRoom(RoomKey),

    /// Attach the caller as a viewer of an existing room.
    JoinRoom(RoomKey),

    /// Relay an opaque negotiation blob to another connection. The service
    /// never looks inside `signal`.
    Signal {
        to: ConnectionId,
        signal: serde_json::Value,
    },

    /// Store the host's display size on the room and fan it out to viewers.
    UpdateResolution {
        #[serde(rename = "roomId")]
        room_id: RoomKey,
        resolution: Resolution,
    },
}

/// Messages the service sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First message on every connection: the identity the server assigned.
    Welcome(ConnectionId),

    /// Sent to a room's host when a viewer attaches.
    ViewerJoined(ConnectionId),

    /// Relayed negotiation blob, stamped with the sender's identity.
    Signal {
        from: ConnectionId,
        signal: serde_json::Value,
    },

    /// The host's display size changed.
    ResolutionUpdated(Resolution),

    /// Sent to a room's host when a viewer's connection closed.
    ViewerDisconnected(ConnectionId),

    /// The room's host is gone and the room no longer exists.
    HostDisconnected,

    /// Request-scoped failure, e.g. joining a room that does not exist.
    Error(String),
}
