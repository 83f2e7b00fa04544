//! Approximate math used on the chaining hot path.

/// Fast approximation of `log2(x)` for `x > 0`.
///
/// Splits the IEEE-754 single into exponent and mantissa and fits the
/// mantissa with a quadratic. The result is within 0.5% of `f32::log2` for
/// `x >= 2` and is exact at powers of two up to the fit error.
#[inline]
pub fn log2_approx(x: f32) -> f32 {
    let bits = x.to_bits();
    let exponent = (((bits >> 23) & 255) as i32 - 128) as f32;
    let mantissa_bits = (bits & !(255u32 << 23)) | (127u32 << 23);
    let m = f32::from_bits(mantissa_bits);
    exponent + (-0.344_848_43 * m + 2.024_665_8) * m - 0.674_877_6
}
