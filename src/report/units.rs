//! Human-readable byte quantities.

const BINARY_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Scale a byte count into the largest unit that keeps it at or above 1
///
/// Returns `(scaled value, unit name, divisor)`. Negative counts are
/// scaled by magnitude and keep their sign.
///
/// # Example
/// ```
/// use time_block::report::format_bytes;
/// let (value, unit, _) = format_bytes(1536.0);
/// assert_eq!(unit, "KiB");
/// assert_eq!(value, 1.5);
/// ```
pub fn format_bytes(n_bytes: f64) -> (f64, &'static str, f64) {
    scale_bytes(n_bytes, 1024.0, &BINARY_UNITS)
}

fn scale_bytes(n_bytes: f64, base: f64, units: &[&'static str; 5]) -> (f64, &'static str, f64) {
    let exponent = if n_bytes == 0.0 || !n_bytes.is_finite() {
        0
    } else {
        let raw = n_bytes.abs().log(base).floor();
        (raw.max(0.0) as usize).min(units.len() - 1)
    };

    let divisor = base.powi(exponent as i32);
    (n_bytes / divisor, units[exponent], divisor)
}
