use std::sync::Arc;

use crate::error::Result;

/// Callback invoked with each chunk of bytes received from the controller.
///
/// Runs on the transport's read path, never under the transmit lock.
pub type DataHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// A byte link to the printer controller.
///
/// Implementations only move bytes. Framing, translation and write
/// serialization live in the layers above.
pub trait Transport: Send {
    /// Open the link. Calling `connect` on an open link is a no-op.
    fn connect(&mut self) -> Result<()>;

    /// Close the link and stop the inbound read path.
    ///
    /// Must not wait for a data handler that is still running: handlers may
    /// block on locks held by whoever calls `disconnect`.
    fn disconnect(&mut self) -> Result<()>;

    /// Write `bytes` to the link, returning how many were transmitted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;

    /// Whether the link is currently open.
    fn is_connected(&self) -> bool;

    /// Register the inbound-data callback. Replaces any previous handler.
    fn set_data_handler(&mut self, handler: DataHandler);
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        (**self).write(bytes)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn set_data_handler(&mut self, handler: DataHandler) {
        (**self).set_data_handler(handler)
    }
}
