//! G-code to binary frame bridge for SLA printer controllers.
//!
//! slabridge turns the G-code stream of a build manager into the 8-byte
//! command frames an SLA controller understands, and keeps asking the
//! controller for its status while connected.
//!
//! # Crate Structure
//!
//! - [`transport`] - Byte link to the controller (serial port behind `serial`)
//! - [`frame`] - 8-byte frames, checksum, passthrough hex
//! - [`gcode`] - Line parsing, unit conversion, translation
//! - [`driver`] - Serialized transmission and status polling
//!
//! # Features
//!
//! - `serial` (default): the serial-port transport
//! - `cli`: the `slabridge` binary and its dependencies

/// Re-export transport types.
pub mod transport {
    pub use slabridge_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use slabridge_frame::*;
}

/// Re-export translation types.
pub mod gcode {
    pub use slabridge_gcode::*;
}

/// Re-export driver types.
pub mod driver {
    pub use slabridge_driver::*;
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "serial")]
    #[test]
    fn serial_driver_builds_from_facade() {
        use crate::driver::Driver;
        use crate::transport::{SerialConfig, SerialTransport, Transport};

        let driver = Driver::new(SerialTransport::new(SerialConfig::new("/dev/slabridge-missing")));
        assert!(!driver.transport().is_connected());
        assert!(!driver.connect());
        assert!(!driver.is_polling());
    }
}
