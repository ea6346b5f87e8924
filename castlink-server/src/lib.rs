mod registry;
mod signaling;

pub use registry::*;
pub use signaling::*;
