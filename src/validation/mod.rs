// src/validation/mod.rs

//! Input validation for states and gates.

use crate::core::matrix;
use crate::core::{QpulseError, Result, StateVector, tolerances};
use tracing::warn;

/// `Σ|c_i|² = 1` within `tolerances::NORMALIZATION`.
///
/// Guards every state this crate hands back as normalized: the output of
/// [`normalize`] and the collapsed state of a measurement.
pub fn check_normalization(state: &StateVector) -> Result<()> {
    let deviation = (state.norm_sqr() - 1.0).abs();
    if deviation > tolerances::NORMALIZATION {
        warn!(deviation, "state vector is not normalized");
        return Err(QpulseError::validation(format!(
            "State vector is not normalized: |Σ|c_i|² - 1| = {:.3e}",
            deviation
        )));
    }
    Ok(())
}

/// Rescales a state to unit norm.
///
/// Fails with `QpulseError::Validation` when the norm is below the amplitude
/// tolerance, since such a vector has no physical direction.
pub fn normalize(state: &StateVector) -> Result<StateVector> {
    let norm = state.norm_sqr().sqrt();
    if norm <= tolerances::AMPLITUDE {
        warn!(norm, "rejecting zero state vector");
        return Err(QpulseError::validation("State vector is zero"));
    }
    let normalized = StateVector::new(state.amplitudes().map(|c| c / norm));
    check_normalization(&normalized)?;
    Ok(normalized)
}

/// Hard precondition for decomposition: `M·M† = I` within the unitarity tolerance.
///
/// # Returns
/// * `Ok(())` if the matrix is unitary.
/// * `Err(QpulseError::Validation)` with the largest deviation otherwise.
pub fn check_unitary<const N: usize>(m: &[[num_complex::Complex64; N]; N]) -> Result<()> {
    if matrix::is_unitary(m, tolerances::UNITARITY) {
        return Ok(());
    }
    let deviation = matrix::max_deviation(&matrix::matmul(m, &matrix::dagger(m)), &matrix::identity::<N>());
    warn!(deviation, "rejecting non-unitary matrix");
    Err(QpulseError::validation(format!(
        "Matrix is not unitary: max |M·M† - I| = {:.3e}",
        deviation
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;
    use num_traits::Zero;

    #[test]
    fn normalize_rescales() -> Result<()> {
        let raw = StateVector::new([Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0), Complex64::zero(), Complex64::zero()]);
        assert!(check_normalization(&raw).is_err());
        let state = normalize(&raw)?;
        check_normalization(&state)?;
        assert_abs_diff_eq!(state.amplitude(1).im, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn normalization_tolerance_is_1e_10() -> Result<()> {
        let within = StateVector::new([Complex64::new((1.0 + 5e-11f64).sqrt(), 0.0), Complex64::zero(), Complex64::zero(), Complex64::zero()]);
        check_normalization(&within)?;
        let outside = StateVector::new([Complex64::new((1.0 + 5e-10f64).sqrt(), 0.0), Complex64::zero(), Complex64::zero(), Complex64::zero()]);
        match check_normalization(&outside) {
            Err(QpulseError::Validation { message }) => assert!(message.contains("not normalized")),
            other => panic!("expected validation error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn normalize_rejects_zero_vector() {
        let zero = StateVector::new([Complex64::zero(); 4]);
        assert_eq!(
            normalize(&zero),
            Err(QpulseError::Validation { message: "State vector is zero".to_string() })
        );
    }

    #[test]
    fn check_unitary_reports_deviation() {
        assert!(check_unitary(&matrix::iswap()).is_ok());
        let mut m = matrix::identity::<4>();
        m[3][3] = Complex64::new(0.5, 0.0);
        match check_unitary(&m) {
            Err(QpulseError::Validation { message }) => assert!(message.contains("not unitary")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
