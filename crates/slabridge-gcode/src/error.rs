use slabridge_frame::FrameError;

use crate::parser::CommandLetter;

/// Errors from pulling codes and values out of a line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The text after the command letter is not an integer code.
    #[error("invalid command code {text:?}")]
    InvalidCode { text: String },

    /// The parameter letter is the last character on the line.
    #[error("parameter {letter} has no value")]
    MissingValue { letter: char },

    /// The text after the parameter letter is not a number.
    #[error("parameter {letter} value {text:?} is not a number")]
    InvalidNumber { letter: char, text: String },
}

/// Errors from translating a line into a packet.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    /// Malformed code or parameter.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A G/M code the controller has no command for.
    #[error("unsupported code {letter}{code}")]
    UnsupportedCode { letter: CommandLetter, code: i32 },

    /// Malformed passthrough hex.
    #[error("passthrough decode error: {0}")]
    Passthrough(FrameError),

    /// Frame construction failed.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

impl TranslateError {
    /// True for malformed input (bad numerals or bad passthrough hex), as
    /// opposed to well-formed lines the controller cannot act on.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, TranslateError::Parse(_) | TranslateError::Passthrough(_))
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
