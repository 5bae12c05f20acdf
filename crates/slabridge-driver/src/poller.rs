use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use slabridge_gcode::status_request;
use slabridge_transport::{Transport, TransportError};
use tracing::{trace, warn};

/// Lock the transmit path, recovering the transport if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Periodically sends a status-request frame through the shared transport.
///
/// Each tick takes the transmit lock, so a poll never lands in the middle of
/// another frame. A failed tick is logged and the next one still fires.
/// Stopping (or dropping) the poller ends the schedule without waiting out
/// the current interval; a write already in progress completes first.
pub struct StatusPoller {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl StatusPoller {
    /// Start polling `transport` every `interval`. The first request goes
    /// out one interval after start.
    ///
    /// Fails only if the worker thread cannot be spawned.
    pub fn start<T: Transport + 'static>(
        transport: Arc<Mutex<T>>,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let handle = std::thread::Builder::new()
            .name("slabridge-poll".to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        match tick(&transport) {
                            Ok(written) => trace!(bytes = written, "status requested"),
                            Err(err) => warn!(error = %err, "status poll failed"),
                        }
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
            ticks,
        })
    }

    /// Number of ticks fired so far, failed ones included.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Stop polling and wait for the worker to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender wakes the worker immediately.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("status poller thread panicked");
            }
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for StatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("ticks", &self.ticks())
            .field("running", &self.handle.is_some())
            .finish()
    }
}

fn tick<T: Transport>(transport: &Mutex<T>) -> Result<usize, TransportError> {
    let frame = status_request();
    lock(transport).write(frame.as_bytes())
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::testing::{frames, MockTransport};

    fn wait_for_ticks(poller: &StatusPoller, count: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while poller.ticks() < count {
            assert!(Instant::now() < deadline, "poller stalled at {} ticks", poller.ticks());
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn sends_status_requests() {
        let mock = MockTransport::new();
        let wire = Arc::clone(&mock.wire);
        let transport = Arc::new(Mutex::new(mock));

        let poller = StatusPoller::start(transport, Duration::from_millis(5)).unwrap();
        wait_for_ticks(&poller, 3);
        poller.stop();

        let sent = frames(&wire.lock().unwrap());
        assert!(sent.len() >= 3);
        for frame in sent {
            assert_eq!(frame.name(), "STATUS");
            assert!(frame.verify());
        }
    }

    #[test]
    fn keeps_ticking_after_failures() {
        let mock = MockTransport {
            fail_write: true,
            ..MockTransport::new()
        };
        let calls = Arc::clone(&mock.write_calls);
        let transport = Arc::new(Mutex::new(mock));

        let poller = StatusPoller::start(transport, Duration::from_millis(5)).unwrap();
        wait_for_ticks(&poller, 3);
        poller.stop();

        assert!(calls.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn stop_does_not_wait_for_interval() {
        let transport = Arc::new(Mutex::new(MockTransport::new()));
        let poller = StatusPoller::start(Arc::clone(&transport), Duration::from_secs(30)).unwrap();

        let started = Instant::now();
        poller.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(transport.lock().unwrap().write_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_ticks_after_stop() {
        let mock = MockTransport::new();
        let calls = Arc::clone(&mock.write_calls);
        let transport = Arc::new(Mutex::new(mock));
        let poller = StatusPoller::start(transport, Duration::from_millis(2)).unwrap();
        wait_for_ticks(&poller, 2);
        drop(poller);

        let after_stop = calls.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn recovers_poisoned_lock() {
        let transport = Arc::new(Mutex::new(MockTransport::new()));
        let poisoner = Arc::clone(&transport);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the transmit lock");
        })
        .join();
        assert!(transport.is_poisoned());

        let poller = StatusPoller::start(Arc::clone(&transport), Duration::from_millis(2)).unwrap();
        wait_for_ticks(&poller, 2);
        poller.stop();

        let wire = lock(&transport).wire.lock().unwrap().clone();
        assert!(!frames(&wire).is_empty());
    }
}
