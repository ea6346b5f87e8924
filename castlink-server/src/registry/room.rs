use castlink_core::{ConnectionId, Resolution};

/// One active room: a host plus the viewers that joined it, in join order.
/// Duplicate viewer entries are allowed (a connection may join twice).
#[derive(Debug)]
pub struct Room {
    pub host: ConnectionId,
    pub resolution: Option<Resolution>,
    pub viewers: Vec<ConnectionId>,
}

impl Room {
    pub fn new(host: ConnectionId) -> Self {
        Self {
            host,
            resolution: None,
            viewers: Vec::new(),
        }
    }

    /// Everyone attached to the room: the host followed by the viewers.
    pub fn members(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        std::iter::once(self.host).chain(self.viewers.iter().copied())
    }
}
