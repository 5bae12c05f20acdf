use slabridge_frame::{
    decode_hex, Frame, FrameBuilder, Packet, CATEGORY_SYSTEM, CATEGORY_Z, SUB_HOME, SUB_PRINT,
    SUB_STANDBY, SUB_STATUS,
};
use tracing::trace;

use crate::error::{Result, TranslateError};
use crate::parser::{CommandLetter, ParsedLine};
use crate::units::to_device_steps;

/// Offset argument sent with M600 unless configured otherwise.
pub const DEFAULT_PRINT_OFFSET: u8 = 10;

/// Passthrough hex starts at this character of the normalized line (after `"M602 "`).
pub const PASSTHROUGH_OFFSET: usize = 5;

/// Translator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Offset byte of the begin-print frame. Default: 10.
    pub print_offset: u8,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            print_offset: DEFAULT_PRINT_OFFSET,
        }
    }
}

/// Maps G/M lines onto controller packets.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate one line.
    ///
    /// `Ok(None)` means there is nothing to send: a blank or comment-only
    /// line, or a line that does not start with `G` or `M`.
    pub fn translate(&self, line: &str) -> Result<Option<Packet>> {
        let Some(parsed) = ParsedLine::parse(line)? else {
            trace!(line, "not a G/M line, ignoring");
            return Ok(None);
        };

        let packet: Packet = match (parsed.letter(), parsed.code()) {
            (CommandLetter::G, 1) => move_z(parsed.param('Z')?).into(),
            (CommandLetter::G, 28) => system(SUB_HOME).into(),
            (CommandLetter::M, 600) => begin_print(self.config.print_offset)?.into(),
            (CommandLetter::M, 601) => system(SUB_STANDBY).into(),
            (CommandLetter::M, 602) => passthrough(parsed.text())?,
            (letter, code) => return Err(TranslateError::UnsupportedCode { letter, code }),
        };
        Ok(Some(packet))
    }
}

/// The status-request frame sent on every poll tick.
pub fn status_request() -> Frame {
    system(SUB_STATUS)
}

fn move_z(distance_mm: f64) -> Frame {
    FrameBuilder::new()
        .category(CATEGORY_Z)
        .sub(to_device_steps(distance_mm))
        .finish()
}

fn system(sub: u8) -> Frame {
    FrameBuilder::new().category(CATEGORY_SYSTEM).sub(sub).finish()
}

fn begin_print(offset: u8) -> Result<Frame> {
    Ok(FrameBuilder::new()
        .category(CATEGORY_SYSTEM)
        .sub(SUB_PRINT)
        .arg(0, offset)?
        .finish())
}

fn passthrough(text: &str) -> Result<Packet> {
    let hex = text.get(PASSTHROUGH_OFFSET..).unwrap_or_default();
    decode_hex(hex)
        .map(Packet::Raw)
        .map_err(TranslateError::Passthrough)
}
