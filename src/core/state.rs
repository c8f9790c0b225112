// src/core/state.rs

use super::constants::tolerances;
use super::error::{QpulseError, Result};
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::fmt;

/// Basis labels in the fixed amplitude order.
pub const BASIS_LABELS: [&str; 4] = ["00", "01", "10", "11"];

/// A two-qubit pure state: four complex amplitudes over the basis
/// `00, 01, 10, 11`, in that order.
///
/// States carry no identity between requests. Every operation consumes one
/// state and produces a fresh one, and the caller is responsible for passing
/// it back in.
#[derive(Debug, Clone, Copy, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: [Complex64; 4],
}

impl StateVector {
    /// Wraps four amplitudes as given, without normalizing.
    pub fn new(amplitudes: [Complex64; 4]) -> Self {
        Self { amplitudes }
    }

    /// Builds a state from a slice, which must hold exactly four amplitudes.
    pub fn from_slice(amplitudes: &[Complex64]) -> Result<Self> {
        let amplitudes: [Complex64; 4] = amplitudes.try_into().map_err(|_| {
            QpulseError::validation(format!(
                "A two-qubit state needs exactly 4 amplitudes, got {}",
                amplitudes.len()
            ))
        })?;
        Ok(Self::new(amplitudes))
    }

    /// The computational basis state `|00>`.
    pub fn zero() -> Self {
        let mut amplitudes = [Complex64::zero(); 4];
        amplitudes[0] = Complex64::one();
        Self { amplitudes }
    }

    /// Tensor product of two single-qubit states, high qubit first:
    /// `(α, β) ⊗ (γ, δ) = (αγ, αδ, βγ, βδ)`.
    ///
    /// Each pair is normalized first; a pair with negligible norm falls back
    /// to `(1, 0)`.
    pub fn from_qubit_pair(high: (Complex64, Complex64), low: (Complex64, Complex64)) -> Self {
        let (alpha, beta) = normalize_pair(high);
        let (gamma, delta) = normalize_pair(low);
        Self::new([alpha * gamma, alpha * delta, beta * gamma, beta * delta])
    }

    /// Read-only access to the amplitudes.
    pub fn amplitudes(&self) -> &[Complex64; 4] {
        &self.amplitudes
    }

    /// Amplitude of one basis state, `index` in `0..4`.
    pub fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes[index]
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Squared magnitude of each amplitude, in basis order.
    pub fn probabilities(&self) -> [f64; 4] {
        self.amplitudes.map(|c| c.norm_sqr())
    }
}

impl Default for StateVector {
    fn default() -> Self {
        Self::zero()
    }
}

fn normalize_pair((a, b): (Complex64, Complex64)) -> (Complex64, Complex64) {
    let norm = (a.norm_sqr() + b.norm_sqr()).sqrt();
    if norm > tolerances::AMPLITUDE {
        (a / norm, b / norm)
    } else {
        (Complex64::one(), Complex64::zero())
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, (c, label)) in self.amplitudes.iter().zip(BASIS_LABELS).enumerate() {
            write!(f, "{}{:.4}|{}>", if i > 0 { ", " } else { "" }, c, label)?;
        }
        write!(f, "]")
    }
}
