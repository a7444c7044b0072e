//! Canonical decimal rendering for slicer arguments.
//!
//! The slicer parses its positional arguments by index and format, so every
//! coordinate must be rendered the same way on every call: the shortest
//! decimal that round-trips to the same `f64`, without exponent notation and
//! without trailing zeros.

/// Renders `value` in canonical minimal decimal form.
///
/// - `124931.360` -> `"124931.36"`
/// - `485730.400` -> `"485730.4"`
/// - `125000.0` -> `"125000"`
/// - `-0.0` -> `"0"`
///
/// Rust's `Display` for `f64` already emits the shortest round-trip digits and
/// never switches to exponent notation; the only adjustment needed is folding
/// negative zero into `"0"`.
#[must_use]
pub fn canonical_decimal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
