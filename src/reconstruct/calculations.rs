//! Per-pixel blue-channel math.
//!
//! All functions here are pure and testable without any images.

/// Blue sample under the literal convention.
///
/// Works on raw 0–255 magnitudes: `z = round(sqrt(|1 − (x² + y²)|), 1)`,
/// evaluated in `f64` and narrowed to 8 bits last.
///
/// ```
/// # use normal_remap::reconstruct::literal_blue;
/// // sqrt(|1 - (100² + 50²)|) = 111.799… → 111.8 → 111
/// assert_eq!(literal_blue(100, 50), 111);
/// ```
pub fn literal_blue(x: u8, y: u8) -> u8 {
    let x = f64::from(x);
    let y = f64::from(y);
    let z = (1.0 - (x * x + y * y)).abs().sqrt();
    narrow_to_u8(round_to_tenth(z))
}

/// Blue sample under the usual unit-vector convention.
///
/// Bytes map to `2v/255 − 1`, the missing component comes from the
/// unit-length constraint, and is mapped back to a byte.
pub fn normalized_blue(x: u8, y: u8) -> u8 {
    let nx = to_unit(x);
    let ny = to_unit(y);
    let nz = (1.0 - nx * nx - ny * ny).max(0.0).sqrt();
    ((nz + 1.0) * 127.5).round().clamp(0.0, 255.0) as u8
}

fn to_unit(v: u8) -> f64 {
    f64::from(v) * 2.0 / 255.0 - 1.0
}

/// Round to one decimal place, ties to even.
pub fn round_to_tenth(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}

/// Truncate toward zero, then keep the low 8 bits.
///
/// Values of 256 and above wrap instead of saturating.
pub fn narrow_to_u8(v: f64) -> u8 {
    (v as i64) as u8
}
