// src/analysis/mod.rs

//! Structural analysis of a two-qubit state: separability, the reduced
//! amplitude pair of each qubit, Bloch vectors and relative phases.
//!
//! Entangled states have no meaningful single-qubit phase. For those the
//! analysis reports `is_separable = false`, no Bloch data, and both relative
//! phases as `0.0`. That is a defined outcome, not an error.

use crate::core::{Qubit, StateVector, tolerances};
use num_complex::Complex64;
use num_traits::One;
use serde::{Deserialize, Serialize};

/// A point on (or in) the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BlochVector {
    /// Bloch vector of the single-qubit state `α|0> + β|1>`:
    /// `x = 2·Re(ᾱβ)`, `y = 2·Im(ᾱβ)`, `z = |α|² − |β|²`.
    pub fn from_amplitudes(alpha: Complex64, beta: Complex64) -> Self {
        let overlap = alpha.conj() * beta;
        Self {
            x: 2.0 * overlap.re,
            y: 2.0 * overlap.im,
            z: alpha.norm_sqr() - beta.norm_sqr(),
        }
    }

    /// Euclidean length; 1 for pure states.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// As `[x, y, z]`.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// The reduced amplitude pair `(a0, a1)` of one qubit in a product state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QubitAmplitudes {
    /// Amplitude of the qubit's `|0>` branch.
    pub zero: Complex64,
    /// Amplitude of the qubit's `|1>` branch.
    pub one: Complex64,
}

impl QubitAmplitudes {
    /// Phase of `|1>` relative to `|0>`, or 0 when either branch vanishes.
    pub fn relative_phase(&self) -> f64 {
        if self.zero.norm() > tolerances::AMPLITUDE && self.one.norm() > tolerances::AMPLITUDE {
            (self.one / self.zero).arg()
        } else {
            0.0
        }
    }

    pub fn bloch(&self) -> BlochVector {
        BlochVector::from_amplitudes(self.zero, self.one)
    }
}

/// Per-qubit data available only for product states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparableInfo {
    pub qubit0: QubitAmplitudes,
    pub qubit1: QubitAmplitudes,
    pub bloch_qubit0: BlochVector,
    pub bloch_qubit1: BlochVector,
}

impl SeparableInfo {
    fn of(qubit0: QubitAmplitudes, qubit1: QubitAmplitudes) -> Self {
        Self {
            qubit0,
            qubit1,
            bloch_qubit0: qubit0.bloch(),
            bloch_qubit1: qubit1.bloch(),
        }
    }
}

/// Result of analyzing one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateAnalysis {
    /// The analyzed amplitudes.
    pub state: StateVector,
    /// `|c_k|²` in basis order.
    pub probabilities: [f64; 4],
    /// Whether the state is a tensor product of two single-qubit states.
    pub is_separable: bool,
    /// Present exactly when `is_separable`.
    pub separable: Option<SeparableInfo>,
}

impl StateAnalysis {
    /// Relative phase of `qubit`, 0.0 for entangled states.
    pub fn relative_phase(&self, qubit: Qubit) -> f64 {
        self.separable.map_or(0.0, |info| match qubit {
            Qubit::Q0 => info.qubit0.relative_phase(),
            Qubit::Q1 => info.qubit1.relative_phase(),
        })
    }
}

/// The rank-1 test `|c00·c11 − c01·c10| < tol`.
pub fn is_separable(state: &StateVector) -> bool {
    let [c00, c01, c10, c11] = *state.amplitudes();
    (c00 * c11 - c01 * c10).norm() < tolerances::SEPARABILITY
}

/// Runs the separability test and, for product states, extracts per-qubit data.
pub fn analyze(state: &StateVector) -> StateAnalysis {
    let separable = is_separable(state);
    StateAnalysis {
        state: *state,
        probabilities: state.probabilities(),
        is_separable: separable,
        separable: separable.then(|| {
            let (qubit0, qubit1) = reduced_amplitudes(state);
            SeparableInfo::of(qubit0, qubit1)
        }),
    }
}

/// Reduced amplitudes `(qubit0, qubit1)` of a product state.
///
/// Qubit 1 groups amplitudes by the high bit (`c00,c01` vs `c10,c11`), qubit 0
/// by the low bit (`c00,c10` vs `c01,c11`). Branch magnitudes come from the
/// grouped norms, branch phases from the first non-negligible amplitude.
pub fn reduced_amplitudes(state: &StateVector) -> (QubitAmplitudes, QubitAmplitudes) {
    let [c00, c01, c10, c11] = *state.amplitudes();
    let qubit1 = branch_pair([c00, c01], [c10, c11]);
    let qubit0 = branch_pair([c00, c10], [c01, c11]);
    (qubit0, qubit1)
}

fn branch_pair(zero_branch: [Complex64; 2], one_branch: [Complex64; 2]) -> QubitAmplitudes {
    let zero_mag = branch_norm(zero_branch);
    let one_mag = branch_norm(one_branch);
    let norm = (zero_mag * zero_mag + one_mag * one_mag).sqrt();
    let (zero_mag, one_mag) = if norm > tolerances::AMPLITUDE {
        (zero_mag / norm, one_mag / norm)
    } else {
        (1.0, 0.0)
    };
    QubitAmplitudes {
        zero: branch_phase(zero_branch) * zero_mag,
        one: branch_phase(one_branch) * one_mag,
    }
}

fn branch_norm(branch: [Complex64; 2]) -> f64 {
    branch.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt()
}

/// Unit phase factor of the first amplitude above tolerance, 1 otherwise.
fn branch_phase(branch: [Complex64; 2]) -> Complex64 {
    branch
        .iter()
        .find(|c| c.norm() > tolerances::AMPLITUDE)
        .map(|c| *c / c.norm())
        .unwrap_or_else(Complex64::one)
}
