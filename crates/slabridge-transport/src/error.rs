/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial port.
    #[cfg(feature = "serial")]
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Failed to enumerate serial ports.
    #[cfg(feature = "serial")]
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// A write or disconnect was attempted without an open link.
    #[error("transport not connected")]
    NotConnected,

    /// The link accepted zero bytes; the device is gone.
    #[error("connection closed (write returned 0 bytes)")]
    ConnectionClosed,

    /// An I/O error occurred on the link.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
