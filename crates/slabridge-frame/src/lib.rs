//! Fixed-length binary command frames for the SLA controller protocol.
//!
//! Every command is exactly 8 bytes:
//! - a start marker `'@'`
//! - a category byte and a sub-command byte
//! - four command-specific argument bytes
//! - an additive checksum (sum of the first 7 bytes, mod 256)
//!
//! Raw passthrough packets skip all of this and go out verbatim.

pub mod codec;
pub mod command;
pub mod error;
pub mod hex;

pub use codec::{apply_checksum, checksum, new_frame, Frame, FrameBuilder, Packet, FRAME_LEN, START};
pub use command::{
    command_name, CATEGORY_SYSTEM, CATEGORY_Z, SUB_HOME, SUB_PRINT, SUB_STANDBY, SUB_STATUS,
};
pub use error::{FrameError, Result};
pub use hex::{decode_hex, encode_hex};
