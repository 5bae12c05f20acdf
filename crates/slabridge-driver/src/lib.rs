//! Printer driver for the SLA controller.
//!
//! This is the layer the build manager talks to. Feed it G-code lines with
//! [`Driver::write`]; it translates each line and transmits the resulting
//! frame while holding the single transmit lock. Once connected, a
//! [`StatusPoller`] asks the controller for its status on a fixed interval
//! through that same lock, so poll frames and command frames never
//! interleave on the wire.

pub mod config;
pub mod driver;
pub mod error;
pub mod poller;

pub use config::{DriverConfig, DEFAULT_POLL_INTERVAL};
pub use driver::Driver;
pub use error::{DriverError, Result};
pub use poller::StatusPoller;

#[cfg(test)]
mod testing;
