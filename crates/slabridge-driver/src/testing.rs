//! In-memory transport for driver and poller tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use slabridge_frame::{Frame, FRAME_LEN};
use slabridge_transport::{DataHandler, Result, Transport, TransportError};

/// Records every written byte on a shared wire.
#[derive(Default)]
pub(crate) struct MockTransport {
    pub wire: Arc<Mutex<Vec<u8>>>,
    pub write_calls: Arc<AtomicUsize>,
    pub fail_connect: bool,
    pub fail_disconnect: bool,
    pub fail_write: bool,
    /// Write one byte at a time with this pause in between.
    pub byte_delay: Option<Duration>,
    /// Inbound side; clone it to deliver bytes without the transmit lock.
    pub inbound: Inbound,
    pub(crate) connected: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The controller's end of the mock link.
#[derive(Clone, Default)]
pub(crate) struct Inbound(Arc<Mutex<Option<DataHandler>>>);

impl Inbound {
    /// Pretend the controller sent `bytes`.
    pub fn emit(&self, bytes: &[u8]) {
        let handler = self.0.lock().expect("handler lock").clone();
        if let Some(handler) = handler {
            handler(bytes);
        }
    }
}

impl Transport for MockTransport {
    fn connect(&mut self) -> Result<()> {
        if self.fail_connect {
            return Err(TransportError::Io(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            )));
        }
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if self.fail_disconnect {
            return Err(TransportError::Io(std::io::Error::other("stuck port")));
        }
        self.connected = false;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_write {
            return Err(TransportError::ConnectionClosed);
        }
        match self.byte_delay {
            None => self
                .wire
                .lock()
                .expect("wire lock")
                .extend_from_slice(bytes),
            Some(delay) => {
                for byte in bytes {
                    self.wire.lock().expect("wire lock").push(*byte);
                    std::thread::sleep(delay);
                }
            }
        }
        Ok(bytes.len())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn set_data_handler(&mut self, handler: DataHandler) {
        *self.inbound.0.lock().expect("handler lock") = Some(handler);
    }
}

/// Split wire bytes into 8-byte frames.
pub(crate) fn frames(wire: &[u8]) -> Vec<Frame> {
    assert_eq!(wire.len() % FRAME_LEN, 0, "wire holds a partial frame");
    wire.chunks_exact(FRAME_LEN)
        .map(|chunk| Frame::try_from(chunk).expect("chunk is frame sized"))
        .collect()
}
