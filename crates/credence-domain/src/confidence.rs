//! Unit-interval helpers
//!
//! Every score and confidence in Credence lives in `[0.0, 1.0]`. These helpers
//! are the single place where untrusted floats are forced into that range.

/// Clamp a value into `[0.0, 1.0]`, substituting `default` for `NaN`
///
/// Infinities clamp to the nearest bound. `default` is itself clamped, so the
/// result is always a finite value in the unit interval.
///
/// # Examples
///
/// ```
/// use credence_domain::clamp_unit;
///
/// assert_eq!(clamp_unit(2.0, 0.5), 1.0);
/// assert_eq!(clamp_unit(-0.3, 0.5), 0.0);
/// assert_eq!(clamp_unit(f64::NAN, 0.5), 0.5);
/// ```
pub fn clamp_unit(value: f64, default: f64) -> f64 {
    let value = if value.is_nan() { default } else { value };
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Check that a value is a finite number in `[0.0, 1.0]`
pub fn is_unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: clamping always lands in the unit interval
        #[test]
        fn test_clamp_always_unit(value in proptest::num::f64::ANY, default in proptest::num::f64::ANY) {
            prop_assert!(is_unit(clamp_unit(value, default)));
        }
    }
}
