//! Millimeters to controller steps.

/// Inches per millimeter.
pub const MM_TO_INCH: f64 = 0.0393701;

/// One controller step is half a thousandth of an inch.
pub const INCHES_PER_STEP: f64 = 0.0005;

/// Convert a millimeter displacement into controller steps.
///
/// The step count is rounded half away from zero, then narrowed to a byte by
/// wrapping: anything outside 0-255 steps (about 3.24 mm) silently wraps.
/// Callers keep slice heights in range.
pub fn to_device_steps(distance_mm: f64) -> u8 {
    let steps = (distance_mm * MM_TO_INCH / INCHES_PER_STEP).round();
    steps as i64 as u8
}
