use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::io::write_all_retrying;
use crate::traits::{DataHandler, Transport};

/// Default link speed for the controller.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

const READ_CHUNK_SIZE: usize = 256;

/// Serial port settings.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// OS port name, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port_name: String,
    /// Baud rate. Default: 115200.
    pub baud_rate: u32,
    /// Read timeout; bounds how long the reader thread takes to notice a disconnect.
    pub timeout: Duration,
}

impl SerialConfig {
    /// Settings for `port_name` with default speed and timeout.
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Self::default()
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(100),
        }
    }
}

/// Handler slot shared with the reader thread, looked up once per chunk.
type HandlerSlot = Arc<Mutex<Option<DataHandler>>>;

/// Serial-port transport.
///
/// `connect` opens the port and starts a reader thread on a cloned handle.
/// The reader forwards inbound bytes to whichever [`DataHandler`] is
/// registered when they arrive, so a handler set after `connect` still
/// sees them. The reader never touches the write half.
///
/// `disconnect` closes the write half and tells the reader to stop, but
/// does not wait for it: a handler may still be running, and it may be
/// blocked on a lock the caller of `disconnect` holds. The reader exits
/// after its current chunk; drop joins it.
pub struct SerialTransport {
    config: SerialConfig,
    port: Option<Box<dyn SerialPort>>,
    handler: HandlerSlot,
    reader: Option<ReaderThread>,
}

struct ReaderThread {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl ReaderThread {
    fn signal(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl SerialTransport {
    /// Create a closed transport for the given settings.
    pub fn new(config: SerialConfig) -> Self {
        Self {
            config,
            port: None,
            handler: Arc::new(Mutex::new(None)),
            reader: None,
        }
    }

    /// Current serial settings.
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Take ownership of an open port: clone its read half for the reader
    /// thread and keep the original for writes.
    fn attach(&mut self, port: Box<dyn SerialPort>) -> Result<()> {
        let read_half = port.try_clone().map_err(|source| TransportError::Open {
            port: self.config.port_name.clone(),
            source,
        })?;
        if let Some(previous) = self.reader.take() {
            // Already signalled by `disconnect`; it exits on its own.
            previous.signal();
        }
        self.spawn_reader(read_half)?;
        self.port = Some(port);
        Ok(())
    }

    fn spawn_reader<R: Read + Send + 'static>(&mut self, mut port: R) -> Result<()> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let slot = Arc::clone(&self.handler);
        let port_name = self.config.port_name.clone();

        let handle = std::thread::Builder::new()
            .name("slabridge-serial-rx".to_string())
            .spawn(move || {
                let mut chunk = [0u8; READ_CHUNK_SIZE];
                while flag.load(Ordering::SeqCst) {
                    match port.read(&mut chunk) {
                        Ok(0) => continue,
                        Ok(n) => {
                            debug!(port = %port_name, bytes = n, "data received");
                            let handler = slot
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .clone();
                            if let Some(handler) = handler {
                                handler(&chunk[..n]);
                            }
                        }
                        Err(err) if is_idle(err.kind()) => continue,
                        Err(err) => {
                            warn!(
                                port = %port_name,
                                error = %err,
                                "serial read failed, reader stopping"
                            );
                            break;
                        }
                    }
                }
            })?;

        self.reader = Some(ReaderThread { running, handle });
        Ok(())
    }

    /// Signal the reader (if any) and wait for it to exit.
    fn join_reader(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.signal();
            if reader.handle.join().is_err() {
                warn!(port = %self.config.port_name, "serial reader thread panicked");
            }
        }
    }
}

impl Transport for SerialTransport {
    fn connect(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }

        let port = serialport::new(&self.config.port_name, self.config.baud_rate)
            .timeout(self.config.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: self.config.port_name.clone(),
                source,
            })?;
        self.attach(port)?;
        info!(port = %self.config.port_name, baud = self.config.baud_rate, "serial port opened");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        let port = self.port.take().ok_or(TransportError::NotConnected)?;
        if let Some(reader) = &self.reader {
            reader.signal();
        }
        drop(port);
        info!(port = %self.config.port_name, "serial port closed");
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(TransportError::NotConnected)?;
        write_all_retrying(port, bytes)
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn set_data_handler(&mut self, handler: DataHandler) {
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        self.join_reader();
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("config", &self.config)
            .field("connected", &self.port.is_some())
            .finish()
    }
}

/// Read outcomes that just mean no data arrived this round.
fn is_idle(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}

/// Names of the serial ports visible to this system.
pub fn available_ports() -> Result<Vec<String>> {
    serialport::available_ports()
        .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
        .map_err(TransportError::Enumerate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(cfg.port_name, "/dev/ttyUSB0");
        assert_eq!(cfg.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(cfg.timeout, Duration::from_millis(100));
    }

    #[test]
    fn write_before_connect_is_rejected() {
        let mut transport = SerialTransport::new(SerialConfig::new("/dev/slabridge-missing"));
        assert!(!transport.is_connected());
        let err = transport.write(b"@").unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
    }

    #[test]
    fn disconnect_before_connect_is_rejected() {
        let mut transport = SerialTransport::new(SerialConfig::new("/dev/slabridge-missing"));
        assert!(matches!(
            transport.disconnect(),
            Err(TransportError::NotConnected)
        ));
    }

    #[test]
    fn connect_to_missing_port_fails() {
        let mut transport = SerialTransport::new(SerialConfig::new("/dev/slabridge-missing"));
        let err = transport.connect().unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
        assert!(!transport.is_connected());
    }

    #[cfg(unix)]
    mod pty {
        use std::io::Write;
        use std::sync::{mpsc, Arc, Mutex};
        use std::time::Duration;

        use serialport::TTYPort;

        use crate::serial::{SerialConfig, SerialTransport};
        use crate::traits::Transport;

        const WAIT: Duration = Duration::from_secs(5);

        /// A transport attached to the slave side of a pseudo-terminal,
        /// plus the master side acting as the controller.
        fn attached() -> (SerialTransport, TTYPort) {
            let (controller, device) = TTYPort::pair().expect("pty pair");
            let mut transport = SerialTransport::new(SerialConfig::new("pty"));
            transport.attach(Box::new(device)).expect("attach pty");
            (transport, controller)
        }

        #[test]
        fn handler_registered_after_connect_receives_data() {
            let (mut transport, mut controller) = attached();
            assert!(transport.is_connected());

            let (tx, rx) = mpsc::channel();
            transport.set_data_handler(Arc::new(move |bytes: &[u8]| {
                let _ = tx.send(bytes.to_vec());
            }));

            controller.write_all(b"@SR\x00\x00\x00\x00\x93").unwrap();

            let mut received = Vec::new();
            while received.len() < 8 {
                received.extend(rx.recv_timeout(WAIT).expect("inbound bytes"));
            }
            assert_eq!(received, b"@SR\x00\x00\x00\x00\x93");
            transport.disconnect().unwrap();
        }

        #[test]
        fn replacing_handler_takes_effect_for_next_chunk() {
            let (mut transport, mut controller) = attached();

            let (first_tx, first_rx) = mpsc::channel();
            transport.set_data_handler(Arc::new(move |bytes: &[u8]| {
                let _ = first_tx.send(bytes.to_vec());
            }));
            controller.write_all(b"A").unwrap();
            assert_eq!(first_rx.recv_timeout(WAIT).unwrap(), b"A");

            let (second_tx, second_rx) = mpsc::channel();
            transport.set_data_handler(Arc::new(move |bytes: &[u8]| {
                let _ = second_tx.send(bytes.to_vec());
            }));
            controller.write_all(b"B").unwrap();
            assert_eq!(second_rx.recv_timeout(WAIT).unwrap(), b"B");
            assert!(first_rx.try_recv().is_err());
        }

        #[test]
        fn disconnect_does_not_wait_for_busy_handler() {
            let (mut transport, mut controller) = attached();

            // Stands in for the driver's transmit lock.
            let gate = Arc::new(Mutex::new(()));
            let handler_gate = Arc::clone(&gate);
            let (entered_tx, entered_rx) = mpsc::channel();
            transport.set_data_handler(Arc::new(move |_: &[u8]| {
                let _ = entered_tx.send(());
                let _guard = handler_gate.lock().unwrap();
            }));

            let held = gate.lock().unwrap();
            controller.write_all(b"@").unwrap();
            entered_rx.recv_timeout(WAIT).expect("handler entered");

            let (done_tx, done_rx) = mpsc::channel();
            let closer = std::thread::spawn(move || {
                let result = transport.disconnect();
                let _ = done_tx.send(result.is_ok());
                transport
            });
            assert_eq!(done_rx.recv_timeout(WAIT), Ok(true));

            drop(held);
            let transport = closer.join().unwrap();
            assert!(!transport.is_connected());
        }
    }
}
