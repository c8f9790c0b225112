// src/simulation/engine.rs

//! Deterministic kernels behind `Simulator`: gate application and
//! measurement collapse for a given uniform sample.

use crate::analysis::{self, StateAnalysis};
use crate::core::matrix::{self, Matrix4};
use crate::core::{QpulseError, Qubit, Result, StateVector, tolerances};
use crate::simulation::MeasurementOutcome;
use crate::validation;
use num_complex::Complex64;
use num_traits::Zero;
use tracing::{debug, warn};

/// `new_state = gate · state`, followed by the separability/Bloch analysis.
///
/// Unitarity of `gate` is not checked here; only decomposition
/// requests enforce it.
pub fn apply_gate(state: &StateVector, gate: &Matrix4) -> StateAnalysis {
    let next = StateVector::new(matrix::apply(gate, state.amplitudes()));
    analysis::analyze(&next)
}

/// Basis indices `(reads 0, reads 1)` for a measurement of `qubit`.
///
/// Qubit 0 is read from the high bit of the basis label, qubit 1 from the low bit.
fn outcome_indices(qubit: Qubit) -> ([usize; 2], [usize; 2]) {
    match qubit {
        Qubit::Q0 => ([0, 1], [2, 3]),
        Qubit::Q1 => ([0, 2], [1, 3]),
    }
}

/// Marginal probabilities `(P(0), P(1))` of `qubit`, normalized to sum to 1.
pub fn marginal_probabilities(state: &StateVector, qubit: Qubit) -> Result<(f64, f64)> {
    let (zeros, ones) = outcome_indices(qubit);
    let p = state.probabilities();
    let p0: f64 = zeros.iter().map(|&k| p[k]).sum();
    let p1: f64 = ones.iter().map(|&k| p[k]).sum();
    let total = p0 + p1;
    if total < tolerances::AMPLITUDE {
        warn!(%qubit, "measurement requested on a zero state vector");
        return Err(QpulseError::validation("State vector is zero"));
    }
    Ok((p0 / total, p1 / total))
}

/// Measures `qubit` using an externally drawn uniform `sample` in `[0, 1)`.
///
/// The outcome is 0 iff `sample < P(0)`. Amplitudes inconsistent with the
/// outcome are zeroed, the survivors renormalized, and the result analyzed.
pub fn measure_with_sample(state: &StateVector, qubit: Qubit, sample: f64) -> Result<MeasurementOutcome> {
    let (prob_0, prob_1) = marginal_probabilities(state, qubit)?;
    let result: u8 = if sample < prob_0 { 0 } else { 1 };

    let (zeros, ones) = outcome_indices(qubit);
    let kept = if result == 0 { zeros } else { ones };
    let mut collapsed = [Complex64::zero(); 4];
    for k in kept {
        collapsed[k] = state.amplitude(k);
    }

    let norm = collapsed.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    if norm <= tolerances::AMPLITUDE {
        return Err(QpulseError::validation("Collapsed state is zero"));
    }
    let collapsed = StateVector::new(collapsed.map(|c| c / norm));
    validation::check_normalization(&collapsed)?;
    debug!(%qubit, result, prob_0, prob_1, "measured qubit");

    Ok(MeasurementOutcome {
        qubit,
        result,
        prob_0,
        prob_1,
        collapsed: analysis::analyze(&collapsed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-12;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    /// Asserts that two states are approximately equal component-wise.
    fn assert_state_approx_equal(actual: &StateVector, expected: &StateVector, context: &str) {
        for k in 0..4 {
            let dist_sq = (actual.amplitude(k) - expected.amplitude(k)).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "State mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                k, actual, expected, context
            );
        }
    }

    #[test]
    fn outcome_follows_sample_threshold() -> Result<()> {
        // (|00> + |10>)/√2 : qubit 0 reads 0 or 1 with equal weight.
        let state = StateVector::new([c(FRAC_1_SQRT_2, 0.0), Complex64::zero(), c(FRAC_1_SQRT_2, 0.0), Complex64::zero()]);

        let low = measure_with_sample(&state, Qubit::Q0, 0.49)?;
        assert_eq!(low.result, 0);
        assert_abs_diff_eq!(low.prob_0, 0.5, epsilon = TEST_TOLERANCE);
        assert_state_approx_equal(low.collapsed_state(), &StateVector::zero(), "reads 0");

        let high = measure_with_sample(&state, Qubit::Q0, 0.51)?;
        assert_eq!(high.result, 1);
        let expected = StateVector::new([Complex64::zero(), Complex64::zero(), c(1.0, 0.0), Complex64::zero()]);
        assert_state_approx_equal(high.collapsed_state(), &expected, "reads 1");
        Ok(())
    }

    #[test]
    fn qubit_one_uses_low_bit_marginals() -> Result<()> {
        let state = StateVector::new([c(0.6, 0.0), c(0.0, 0.8), Complex64::zero(), Complex64::zero()]);
        let (p0, p1) = marginal_probabilities(&state, Qubit::Q1)?;
        assert_abs_diff_eq!(p0, 0.36, epsilon = TEST_TOLERANCE);
        assert_abs_diff_eq!(p1, 0.64, epsilon = TEST_TOLERANCE);

        let outcome = measure_with_sample(&state, Qubit::Q1, 0.9)?;
        assert_eq!(outcome.result, 1);
        let expected = StateVector::new([Complex64::zero(), c(0.0, 1.0), Complex64::zero(), Complex64::zero()]);
        assert_state_approx_equal(outcome.collapsed_state(), &expected, "low bit reads 1");
        assert!(outcome.collapsed.is_separable);
        Ok(())
    }

    #[test]
    fn unnormalized_input_is_renormalized() -> Result<()> {
        let state = StateVector::new([c(2.0, 0.0), Complex64::zero(), Complex64::zero(), c(2.0, 0.0)]);
        let outcome = measure_with_sample(&state, Qubit::Q1, 0.0)?;
        assert_abs_diff_eq!(outcome.prob_0 + outcome.prob_1, 1.0, epsilon = TEST_TOLERANCE);
        assert_abs_diff_eq!(outcome.collapsed_state().norm_sqr(), 1.0, epsilon = TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn zero_state_is_rejected() {
        let zero = StateVector::new([Complex64::zero(); 4]);
        assert!(matches!(
            measure_with_sample(&zero, Qubit::Q0, 0.5),
            Err(QpulseError::Validation { .. })
        ));
    }

    #[test]
    fn apply_gate_skips_unitarity_check() {
        let doubling = matrix::scale(&matrix::identity::<4>(), c(2.0, 0.0));
        let result = apply_gate(&StateVector::zero(), &doubling);
        assert_abs_diff_eq!(result.state.amplitude(0), c(2.0, 0.0), epsilon = TEST_TOLERANCE);
    }
}
