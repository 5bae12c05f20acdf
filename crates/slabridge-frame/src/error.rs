/// Errors that can occur while building or decoding frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Passthrough text is not a whole number of hex byte pairs. `offset` is
    /// the byte position of the offending character in the decoded text.
    #[error("invalid hex at offset {offset}: {reason}")]
    InvalidHex { offset: usize, reason: &'static str },

    /// An argument index outside the payload area (bytes 3-6).
    #[error("argument index {0} out of range (expected 0..4)")]
    ArgumentIndex(usize),

    /// A byte slice that is not exactly one frame long.
    #[error("wrong frame length ({0} bytes, expected 8)")]
    WrongLength(usize),
}

pub type Result<T> = std::result::Result<T, FrameError>;
