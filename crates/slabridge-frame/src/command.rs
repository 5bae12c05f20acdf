//! Category and sub-command bytes.
//!
//! Categories pick the subsystem, sub-commands pick the action within it.
//! For the Z category the sub-command byte carries the step count instead.

/// Z-axis movement. Byte 2 is the step count.
pub const CATEGORY_Z: u8 = b'Z';

/// System commands (home, print, standby, status).
pub const CATEGORY_SYSTEM: u8 = b'S';

/// Home the build platform.
pub const SUB_HOME: u8 = b'H';

/// Begin a print. Argument 0 carries the print offset.
pub const SUB_PRINT: u8 = b'P';

/// Put the machine in standby.
pub const SUB_STANDBY: u8 = b'S';

/// Request a machine status report.
pub const SUB_STATUS: u8 = b'R';

/// Returns a human-readable name for a category/sub-command pair.
pub fn command_name(category: u8, sub: u8) -> &'static str {
    match (category, sub) {
        (CATEGORY_Z, _) => "MOVE_Z",
        (CATEGORY_SYSTEM, SUB_HOME) => "HOME",
        (CATEGORY_SYSTEM, SUB_PRINT) => "PRINT",
        (CATEGORY_SYSTEM, SUB_STANDBY) => "STANDBY",
        (CATEGORY_SYSTEM, SUB_STATUS) => "STATUS",
        _ => "UNKNOWN",
    }
}
