//! Real-time transport: per-client websocket actors, the connection hub
//! used for broadcast fan-out, and the JSON wire protocol.

pub mod hub;
pub mod protocol;
pub mod session;
