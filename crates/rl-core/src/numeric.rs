use crate::CoreError;

/// Floating point type used throughout the workspace
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Bound `n` to the interval spanned by `a` and `b`.
///
/// The bounds are normalized first (swapped if given in reverse order), so
/// `clamp(x, 1.0, -1.0)` behaves identically to `clamp(x, -1.0, 1.0)`.
/// A NaN `n` passes through unchanged; this never panics, unlike
/// [`f64::clamp`].
pub fn clamp(n: Real, a: Real, b: Real) -> Real {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if n < lo {
        lo
    } else if n > hi {
        hi
    } else {
        n
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clamp_result_within_normalized_bounds(
            n in -1e12_f64..1e12_f64,
            a in -1e6_f64..1e6_f64,
            b in -1e6_f64..1e6_f64,
        ) {
            let out = clamp(n, a, b);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(out >= lo && out <= hi);
        }

        #[test]
        fn clamp_order_independent(
            n in -1e12_f64..1e12_f64,
            a in -1e6_f64..1e6_f64,
            b in -1e6_f64..1e6_f64,
        ) {
            prop_assert_eq!(clamp(n, a, b), clamp(n, b, a));
        }
    }
}
