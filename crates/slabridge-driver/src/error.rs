/// Errors that can occur in driver operations.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The line could not be translated.
    #[error("translate error: {0}")]
    Translate(#[from] slabridge_gcode::TranslateError),

    /// The transport rejected the operation.
    #[error("transport error: {0}")]
    Transport(#[from] slabridge_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, DriverError>;
