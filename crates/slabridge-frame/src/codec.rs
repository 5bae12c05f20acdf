use bytes::Bytes;

use crate::command::command_name;
use crate::error::{FrameError, Result};

/// Every standard frame is exactly this many bytes.
pub const FRAME_LEN: usize = 8;

/// Start marker: `'@'` (0x40).
pub const START: u8 = b'@';

const CATEGORY_INDEX: usize = 1;
const SUB_INDEX: usize = 2;
const ARGS_START: usize = 3;
const ARGS_LEN: usize = 4;
const CHECKSUM_INDEX: usize = 7;

/// A blank frame template: start marker, everything else zero.
pub fn new_frame() -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = START;
    frame
}

/// Additive checksum of bytes 0-6, truncated to a byte.
///
/// Byte 7 is ignored, so this is stable on already-finalized frames.
pub fn checksum(frame: &[u8; FRAME_LEN]) -> u8 {
    frame[..CHECKSUM_INDEX]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Store the checksum of bytes 0-6 in byte 7.
pub fn apply_checksum(frame: &mut [u8; FRAME_LEN]) {
    frame[CHECKSUM_INDEX] = checksum(frame);
}

/// A finalized 8-byte command frame.
///
/// Only [`FrameBuilder::finish`] produces one, so the checksum always holds.
///
/// Wire format:
/// ```text
/// ┌───────┬──────────┬─────────┬──────────────────┬──────────┐
/// │ Start │ Category │ Sub     │ Args (4B)        │ Checksum │
/// │ '@'   │ (1B)     │ (1B)    │ command-specific │ sum mod  │
/// │       │          │         │                  │ 256      │
/// └───────┴──────────┴─────────┴──────────────────┴──────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Category byte (byte 1).
    pub fn category(&self) -> u8 {
        self.0[CATEGORY_INDEX]
    }

    /// Sub-command byte (byte 2).
    pub fn sub(&self) -> u8 {
        self.0[SUB_INDEX]
    }

    /// Argument bytes (bytes 3-6).
    pub fn args(&self) -> &[u8] {
        &self.0[ARGS_START..ARGS_START + ARGS_LEN]
    }

    /// Stored checksum byte (byte 7).
    pub fn checksum(&self) -> u8 {
        self.0[CHECKSUM_INDEX]
    }

    /// True when the stored checksum matches bytes 0-6.
    pub fn verify(&self) -> bool {
        self.0[0] == START && checksum(&self.0) == self.checksum()
    }

    /// The frame as wire bytes.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Human-readable command name, e.g. `HOME`.
    pub fn name(&self) -> &'static str {
        command_name(self.category(), self.sub())
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = FrameError;

    /// Wrap received wire bytes. The checksum is kept as-is; use
    /// [`Frame::verify`] to check it.
    fn try_from(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; FRAME_LEN] = bytes
            .try_into()
            .map_err(|_| FrameError::WrongLength(bytes.len()))?;
        Ok(Self(raw))
    }
}

/// Fills a frame template field by field.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    raw: [u8; FRAME_LEN],
}

impl FrameBuilder {
    /// Start from a blank template.
    pub fn new() -> Self {
        Self { raw: new_frame() }
    }

    /// Set the category byte.
    pub fn category(mut self, category: u8) -> Self {
        self.raw[CATEGORY_INDEX] = category;
        self
    }

    /// Set the sub-command byte.
    pub fn sub(mut self, sub: u8) -> Self {
        self.raw[SUB_INDEX] = sub;
        self
    }

    /// Set argument byte `index` (0-3, wire bytes 3-6).
    pub fn arg(mut self, index: usize, value: u8) -> Result<Self> {
        if index >= ARGS_LEN {
            return Err(FrameError::ArgumentIndex(index));
        }
        self.raw[ARGS_START + index] = value;
        Ok(self)
    }

    /// Checksum the template and freeze it.
    pub fn finish(mut self) -> Frame {
        apply_checksum(&mut self.raw);
        Frame(self.raw)
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What actually goes on the wire for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// A checksummed standard frame.
    Frame(Frame),
    /// Pre-encoded bytes sent verbatim, checksum untouched.
    Raw(Bytes),
}

impl Packet {
    /// Wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Packet::Frame(frame) => frame.as_bytes(),
            Packet::Raw(bytes) => bytes.as_ref(),
        }
    }

    /// Wire length.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True for a zero-length raw packet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable command name (`RAW` for passthrough).
    pub fn name(&self) -> &'static str {
        match self {
            Packet::Frame(frame) => frame.name(),
            Packet::Raw(_) => "RAW",
        }
    }
}

impl From<Frame> for Packet {
    fn from(frame: Frame) -> Self {
        Packet::Frame(frame)
    }
}
