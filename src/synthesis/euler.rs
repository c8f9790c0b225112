// src/synthesis/euler.rs

//! ZYZ Euler decomposition of single-qubit unitaries.
//!
//! A 2×2 unitary is written as `e^{iφ}·RZ(ϕ)·RY(θ)·RZ(λ)`; the rotations are
//! returned in application order (`RZ(λ)` first) with negligible ones dropped,
//! so the result has 0 to 3 rotations.

use crate::core::{Matrix2, QpulseError, Result, tolerances};
use crate::operations::{EulerDecomposition, Rotation};
use crate::synthesis::EulerDecomposer;
use crate::validation;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Built-in ZYZ decomposer with angle simplification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZyzDecomposer {
    /// Rotations whose wrapped angle is below this are omitted.
    pub atol: f64,
}

impl Default for ZyzDecomposer {
    fn default() -> Self {
        Self { atol: tolerances::ANGLE }
    }
}

impl EulerDecomposer for ZyzDecomposer {
    fn euler_decompose(&self, unitary: &Matrix2) -> Result<EulerDecomposition> {
        validation::check_unitary(unitary)?;
        let [theta, phi, lam, phase] = params_zyz(unitary);
        if ![theta, phi, lam, phase].iter().all(|x| x.is_finite()) {
            return Err(QpulseError::inconsistency("Euler angles are not finite"));
        }
        Ok(simplified_circuit(theta, phi, lam, phase, self.atol))
    }
}

fn det(m: &Matrix2) -> Complex64 {
    m[0][0] * m[1][1] - m[0][1] * m[1][0]
}

/// Wraps an angle into `[-π, π)`, clamping values within `atol` of `π` to `-π`.
fn mod_2pi(angle: f64, atol: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if (wrapped - PI).abs() < atol { -PI } else { wrapped }
}

/// `[θ, ϕ, λ, φ]` such that `U = e^{iφ}·RZ(ϕ)·RY(θ)·RZ(λ)`.
fn params_zyz(m: &Matrix2) -> [f64; 4] {
    let coeff = Complex64::new(1.0, 0.0) / det(m).sqrt();
    let phase = -coeff.arg();
    let theta = 2.0 * (coeff * m[1][0]).norm().atan2((coeff * m[0][0]).norm());
    let phi_plus_lam_half = (coeff * m[1][1]).arg();
    let phi_minus_lam_half = (coeff * m[1][0]).arg();
    [
        theta,
        phi_plus_lam_half + phi_minus_lam_half,
        phi_plus_lam_half - phi_minus_lam_half,
        phase,
    ]
}

/// Builds the rotation sequence for the given angles, folding skipped
/// rotations into the global phase.
fn simplified_circuit(theta: f64, phi: f64, lam: f64, phase: f64, atol: f64) -> EulerDecomposition {
    let (mut theta, mut phi, mut lam) = (theta, phi, lam);
    let mut rotations = Vec::with_capacity(3);
    let mut global_phase = phase - (phi + lam) / 2.0;

    if theta.abs() < atol {
        // Pure phase: both Z rotations merge into one.
        let merged = mod_2pi(lam + phi, atol);
        if merged.abs() > atol {
            rotations.push(Rotation::z(merged));
            global_phase += merged / 2.0;
        }
        return EulerDecomposition { rotations, global_phase };
    }
    if (theta - PI).abs() < atol {
        global_phase += phi;
        lam -= phi;
        phi = 0.0;
    }
    if mod_2pi(lam + PI, atol).abs() < atol || mod_2pi(phi + PI, atol).abs() < atol {
        lam += PI;
        theta = -theta;
        phi += PI;
    }
    lam = mod_2pi(lam, atol);
    if lam.abs() > atol {
        global_phase += lam / 2.0;
        rotations.push(Rotation::z(lam));
    }
    rotations.push(Rotation::y(theta));
    phi = mod_2pi(phi, atol);
    if phi.abs() > atol {
        global_phase += phi / 2.0;
        rotations.push(Rotation::z(phi));
    }
    EulerDecomposition { rotations, global_phase }
}
