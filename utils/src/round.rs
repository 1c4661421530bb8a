/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(feature = "float")]
type Float = f32;

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(not(feature = "float"))]
type Float = f64;

/// Rounds `v` to `decimals` decimal places, with exact halves rounded
/// away from zero (i.e., `round_away(-0.3475, 3)` is `-0.348`, not the
/// `-0.347` that banker's rounding would produce).
pub fn round_away(v: Float, decimals: u32) -> Float {
    let scale = (10.0 as Float).powi(decimals as i32);
    let scaled = (v.abs() * scale + 0.5).floor() / scale;
    if v < 0.0 {
        -scaled
    } else {
        scaled
    }
}

/* *********** */
/*    TESTS    */
/* *********** */
