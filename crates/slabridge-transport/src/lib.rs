//! Byte transport abstraction for the printer controller link.
//!
//! This is the lowest layer of slabridge. The driver only ever talks to a
//! [`Transport`]: open/close the link, write raw bytes, and receive inbound
//! bytes through a [`DataHandler`] callback.
//!
//! - [`SerialTransport`] talks to a real controller over a serial port
//!   (behind the `serial` feature, on by default).

pub mod error;
pub mod io;
pub mod traits;

#[cfg(feature = "serial")]
pub mod serial;

pub use error::{Result, TransportError};
pub use io::write_all_retrying;
pub use traits::{DataHandler, Transport};

#[cfg(feature = "serial")]
pub use serial::{available_ports, SerialConfig, SerialTransport, DEFAULT_BAUD_RATE};
