use serde::Serialize;

/// Peer connection state machine.
///
/// Tracks the lifecycle of a connection to a peer:
/// DISCONNECTED -> CONNECTING -> CONNECTED -> DISCONNECTING -> DISCONNECTED
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No active connection to this peer.
    Disconnected,
    /// Transport connection in progress.
    Connecting,
    /// Handshake done, can exchange eth messages.
    Connected,
    /// Graceful shutdown in progress.
    Disconnecting,
}
