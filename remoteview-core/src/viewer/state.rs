/// Lifecycle of the viewer's single connection.
///
/// The only transition is `Disconnected -> Connected`; a connected viewer
/// never goes back, even after its connection has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn connect(self) -> Self {
        ConnectionState::Connected
    }

    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

/// Why a viewer stopped. Only ever logged, never displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerExit {
    /// The endpoint could not be reached; nothing was displayed.
    Unreachable,

    /// The peer closed the connection.
    Closed,

    /// The connection broke without a close handshake.
    Dropped,
}
