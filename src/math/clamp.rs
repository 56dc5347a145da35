/// Replaces an exact zero with `value_floor` so that logarithmic interpolation
/// and relative errors stay defined. Every other value is returned untouched.
#[inline]
pub fn clamp_to_positive_minimum(value: f64, value_floor: f64) -> f64 {
    if value == 0.0 { value_floor } else { value }
}
