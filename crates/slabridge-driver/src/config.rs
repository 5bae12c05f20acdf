use std::time::Duration;

use slabridge_gcode::TranslatorConfig;

/// Time between status requests while connected.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Driver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Status poll period. Default: 250 ms.
    pub poll_interval: Duration,
    /// Whether the build manager may send the next line without waiting for
    /// an acknowledgement. The controller never acknowledges commands, so
    /// this defaults to `true`.
    pub always_ready: bool,
    /// Line translation settings.
    pub translator: TranslatorConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            always_ready: true,
            translator: TranslatorConfig::default(),
        }
    }
}
