use std::sync::{Arc, Mutex, MutexGuard};

use slabridge_gcode::{TranslateError, Translator};
use slabridge_transport::Transport;
use tracing::{debug, error, info, warn};

use crate::config::DriverConfig;
use crate::error::{DriverError, Result};
use crate::poller::{lock, StatusPoller};

/// Drives one SLA controller over a [`Transport`].
///
/// The driver is `Sync`: the build manager can call [`Driver::write`] from
/// any thread while the status poller runs on its own. Both go through one
/// transmit lock, held across translate-and-write.
pub struct Driver<T: Transport + 'static> {
    transport: Arc<Mutex<T>>,
    translator: Translator,
    config: DriverConfig,
    poller: Mutex<Option<StatusPoller>>,
}

impl<T: Transport + 'static> Driver<T> {
    /// Create a driver with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, DriverConfig::default())
    }

    /// Create a driver with explicit configuration.
    pub fn with_config(transport: T, config: DriverConfig) -> Self {
        Self {
            transport: Arc::new(Mutex::new(transport)),
            translator: Translator::new(config.translator),
            config,
            poller: Mutex::new(None),
        }
    }

    /// Current driver configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Whether the build manager can send the next line right away.
    ///
    /// Fixed at construction from [`DriverConfig::always_ready`]; the
    /// controller sends no per-command acknowledgement to wait for.
    pub fn always_ready(&self) -> bool {
        self.config.always_ready
    }

    /// Open the link and start status polling.
    ///
    /// Returns `false` (after logging) if the transport fails to connect; the
    /// poller is not started in that case. Also `false` if the poller thread
    /// cannot be spawned, with the link left open for [`Driver::disconnect`].
    pub fn connect(&self) -> bool {
        let result = lock(&self.transport).connect();
        if let Err(err) = result {
            warn!(error = %err, "connect failed");
            return false;
        }
        if let Err(err) = self.start_polling() {
            error!(error = %err, "status poller failed to start");
            return false;
        }
        info!(poll_interval = ?self.config.poll_interval, "controller connected");
        true
    }

    /// Stop status polling and close the link.
    ///
    /// Polling stops even when the transport fails to disconnect; that
    /// failure is logged and reported as `false`.
    pub fn disconnect(&self) -> bool {
        self.stop_polling();
        let result = lock(&self.transport).disconnect();
        match result {
            Ok(()) => {
                info!("controller disconnected");
                true
            }
            Err(err) => {
                warn!(error = %err, "disconnect failed");
                false
            }
        }
    }

    /// Whether the status poller is running.
    pub fn is_polling(&self) -> bool {
        lock(&self.poller).is_some()
    }

    /// Register a callback for bytes received from the controller.
    ///
    /// May be called before or after [`Driver::connect`]. The callback runs on
    /// the transport's read path without the transmit lock, so it may itself
    /// call [`Driver::write`].
    pub fn on_data_received<F>(&self, handler: F)
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        lock(&self.transport).set_data_handler(Arc::new(move |bytes: &[u8]| {
            debug!(bytes = bytes.len(), "controller data received");
            handler(bytes);
        }));
    }

    /// Translate one G-code line and transmit the result.
    ///
    /// Returns the number of bytes put on the wire: 8 for a standard frame,
    /// the decoded length for a passthrough, and 0 when nothing was sent.
    /// Errors are logged here and never propagate; use
    /// [`Driver::try_write`] to see them.
    pub fn write(&self, line: &str) -> usize {
        match self.try_write(line) {
            Ok(written) => written,
            Err(DriverError::Translate(err @ TranslateError::UnsupportedCode { .. })) => {
                warn!(line, error = %err, "unsupported code, nothing sent");
                0
            }
            Err(DriverError::Translate(err)) => {
                warn!(line, error = %err, "parse error, nothing sent");
                0
            }
            Err(DriverError::Transport(err)) => {
                warn!(line, error = %err, "transmit failed");
                0
            }
        }
    }

    /// Like [`Driver::write`], but hands back the error instead of logging it.
    pub fn try_write(&self, line: &str) -> Result<usize> {
        let mut transport = lock(&self.transport);
        let Some(packet) = self.translator.translate(line)? else {
            return Ok(0);
        };
        let written = transport.write(packet.as_bytes())?;
        debug!(command = packet.name(), bytes = written, "frame sent");
        Ok(written)
    }

    /// Lock the transport directly. Holding the guard blocks command writes
    /// and poll ticks.
    pub fn transport(&self) -> MutexGuard<'_, T> {
        lock(&self.transport)
    }

    fn start_polling(&self) -> std::io::Result<()> {
        let mut poller = lock(&self.poller);
        if poller.is_none() {
            *poller = Some(StatusPoller::start(
                Arc::clone(&self.transport),
                self.config.poll_interval,
            )?);
        }
        Ok(())
    }

    fn stop_polling(&self) {
        let poller = lock(&self.poller).take();
        if let Some(poller) = poller {
            poller.stop();
        }
    }
}

impl<T: Transport + 'static> Drop for Driver<T> {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

impl<T: Transport + 'static> std::fmt::Debug for Driver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("polling", &self.is_polling())
            .finish()
    }
}
