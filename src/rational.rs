//! Precision-bounded operations on exact rational scalars.
//!
//! All geometry in this crate is carried out on [`Rat`] values, so repeated
//! transforms never drift. Operations whose result is generally irrational
//! (square roots, trigonometry) take an `oom` parameter: the order of
//! magnitude of acceptable rounding error. An `oom` of `-3` means the result
//! is correct to within `10^-3`. Results are rounded to exactly that grid and
//! never silently upgraded to finer precision than requested.

use crate::Error;
use num_bigint::BigInt;
use num_traits::{Pow, Signed};

/// Exact rational scalar used throughout the crate.
pub type Rat = num_rational::BigRational;

/// Finest supported precision. Requests below this are clamped.
pub const MIN_OOM: i32 = -24;

/// Shorthand for `n / d`.
///
/// # Panics
///
/// If `d` is zero.
pub fn rat(n: i64, d: i64) -> Rat {
    Rat::new(BigInt::from(n), BigInt::from(d))
}

/// Shorthand for the integer `n` as a rational.
pub fn rat_i(n: i64) -> Rat {
    Rat::from_integer(BigInt::from(n))
}

/// `10^oom`, exact for any sign of `oom`.
pub fn pow10(oom: i32) -> Rat {
    Pow::pow(Rat::from_integer(BigInt::from(10)), oom)
}

/// Clamps `oom` to [`MIN_OOM`].
///
/// A request finer than the supported floor is a precision underflow. It is
/// recovered here, not propagated: the computation proceeds at `MIN_OOM` and
/// the clamp is logged so the approximation stays caller-visible.
pub fn clamp_oom(oom: i32) -> i32 {
    if oom < MIN_OOM {
        log::warn!("precision underflow: oom {} clamped to {}", oom, MIN_OOM);
        MIN_OOM
    } else {
        oom
    }
}

/// Rounds `x` to the nearest multiple of `10^oom`, ties away from zero.
pub fn round_oom(x: &Rat, oom: i32) -> Rat {
    let oom = clamp_oom(oom);
    let step = pow10(oom);
    (x / &step).round() * step
}

/// Nearest multiple of `10^oom` to the square root of `x`.
///
/// Computed as an integer square root of the scaled value, so no float is
/// involved. Negative input fails with [`Error::UndefinedGeometricOperation`].
pub fn sqrt_oom(x: &Rat, oom: i32) -> Result<Rat, Error> {
    if x.is_negative() {
        return Err(Error::UndefinedGeometricOperation(
            "square root of a negative value",
        ));
    }
    let oom = clamp_oom(oom);
    let scale = pow10(-oom);
    let target = x * &scale * &scale;
    let lo = target.floor().to_integer().sqrt();
    let hi = &lo + BigInt::from(1);

    // Pick whichever of floor(sqrt) and floor(sqrt)+1 is closer to the true
    // root, compared exactly via the squares.
    let lo_sq = Rat::from_integer(&lo * &lo);
    let hi_sq = Rat::from_integer(&hi * &hi);
    let root = if &target - lo_sq > hi_sq - &target {
        hi
    } else {
        lo
    };

    Ok(Rat::from_integer(root) * pow10(oom))
}

/// Sine of `angle` (radians), quantized to `oom`.
pub fn sin_oom(angle: f64, oom: i32) -> Result<Rat, Error> {
    quantize_float(libm::sin(angle), oom)
}

/// Cosine of `angle` (radians), quantized to `oom`.
pub fn cos_oom(angle: f64, oom: i32) -> Result<Rat, Error> {
    quantize_float(libm::cos(angle), oom)
}

fn quantize_float(v: f64, oom: i32) -> Result<Rat, Error> {
    let exact = Rat::from_float(v).ok_or(Error::UndefinedGeometricOperation(
        "non-finite trigonometric argument",
    ))?;
    Ok(round_oom(&exact, oom))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_snaps_to_grid() {
        let x = rat(1234567, 1000000);
        assert_eq!(round_oom(&x, -3), rat(1235, 1000));
        assert_eq!(round_oom(&x, 0), rat_i(1));
        assert_eq!(round_oom(&x, -6), x);
    }

    #[test]
    fn round_ties_away_from_zero() {
        assert_eq!(round_oom(&rat(5, 10), 0), rat_i(1));
        assert_eq!(round_oom(&rat(-5, 10), 0), rat_i(-1));
    }

    #[test]
    fn sqrt_exact_square() {
        assert_eq!(sqrt_oom(&rat_i(144), -6).unwrap(), rat_i(12));
    }

    #[test]
    fn sqrt_bounded_error() {
        let root = sqrt_oom(&rat_i(2), -6).unwrap();
        let err = (&root * &root - rat_i(2)).abs();
        // |r^2 - 2| <= (sqrt(2) + r) * 10^-6 < 3 * 10^-6
        assert!(err < rat(3, 1000000));
    }

    #[test]
    fn sqrt_negative_fails() {
        assert!(matches!(
            sqrt_oom(&rat_i(-1), -3),
            Err(Error::UndefinedGeometricOperation(_))
        ));
    }

    #[test]
    fn underflow_clamps() {
        assert_eq!(clamp_oom(-100), MIN_OOM);
        assert_eq!(clamp_oom(-3), -3);
    }

    #[test]
    fn quarter_turn_trig_is_exact_after_rounding() {
        let half_pi = core::f64::consts::FRAC_PI_2;
        assert_eq!(sin_oom(half_pi, -6).unwrap(), rat_i(1));
        assert_eq!(cos_oom(half_pi, -6).unwrap(), rat_i(0));
    }
}
