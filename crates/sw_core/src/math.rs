//! Fixed-point math utilities for deterministic simulation.
//!
//! Charge progress is reported as a fraction; it uses fixed-point
//! arithmetic so every client shows the same value on the same frame.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Ratio `part / whole` clamped to `[0, 1]`.
///
/// A zero `whole` counts as complete.
#[must_use]
pub fn ratio(part: u32, whole: u32) -> Fixed {
    if whole == 0 {
        return Fixed::ONE;
    }
    let part = part.min(whole);
    Fixed::from_num(part) / Fixed::from_num(whole)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_half() {
        assert_eq!(ratio(50, 100), Fixed::from_num(0.5));
    }

    #[test]
    fn test_ratio_clamps_and_handles_zero() {
        assert_eq!(ratio(150, 100), Fixed::ONE);
        assert_eq!(ratio(0, 0), Fixed::ONE);
        assert_eq!(ratio(0, 30), Fixed::ZERO);
    }
}
