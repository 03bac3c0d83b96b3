//! Presentation rounding.
//!
//! Ratios, exponents and rates are reported to four decimal places, seconds to two, and
//! scores as integers in `[0, 100]`. All rounding is half away from zero (`f64::round`).
//! Callers compute at full precision and round only when building output values.

/// Round to two decimal places (seconds).
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round to four decimal places (ratios, exponents, rates).
#[inline]
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Round and clamp a score to the integer range `[0, 100]`. Non-finite input scores 0.
#[inline]
pub fn clamp_score(x: f64) -> u32 {
    if !x.is_finite() {
        return 0;
    }
    x.round().clamp(0.0, 100.0) as u32
}
