// src/core/matrix.rs

//! Small fixed-size complex matrices used for gates on one and two qubits.
//!
//! Matrices are row-major nested arrays, the same layout the request/response
//! shapes use, so no conversion is needed at the boundary.

use super::qubit::Qubit;
use num_complex::Complex64;
use num_traits::{One, Zero};

/// A 2×2 complex matrix (single-qubit operator).
pub type Matrix2 = [[Complex64; 2]; 2];
/// A 4×4 complex matrix (two-qubit operator).
pub type Matrix4 = [[Complex64; 4]; 4];

/// N×N identity.
pub fn identity<const N: usize>() -> [[Complex64; N]; N] {
    let mut m = [[Complex64::zero(); N]; N];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = Complex64::one();
    }
    m
}

/// Matrix product `a · b`.
pub fn matmul<const N: usize>(a: &[[Complex64; N]; N], b: &[[Complex64; N]; N]) -> [[Complex64; N]; N] {
    let mut out = [[Complex64::zero(); N]; N];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..N).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// Conjugate transpose.
pub fn dagger<const N: usize>(m: &[[Complex64; N]; N]) -> [[Complex64; N]; N] {
    let mut out = [[Complex64::zero(); N]; N];
    for (i, row) in m.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            out[j][i] = value.conj();
        }
    }
    out
}

/// Multiplies every entry by `factor`.
pub fn scale<const N: usize>(m: &[[Complex64; N]; N], factor: Complex64) -> [[Complex64; N]; N] {
    let mut out = *m;
    out.iter_mut().flatten().for_each(|c| *c *= factor);
    out
}

/// Elementwise comparison within `tolerance` on both real and imaginary parts.
pub fn approx_eq<const N: usize>(a: &[[Complex64; N]; N], b: &[[Complex64; N]; N], tolerance: f64) -> bool {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .all(|(x, y)| (x.re - y.re).abs() <= tolerance && (x.im - y.im).abs() <= tolerance)
}

/// Largest elementwise modulus of `a - b`.
pub fn max_deviation<const N: usize>(a: &[[Complex64; N]; N], b: &[[Complex64; N]; N]) -> f64 {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// `M·M† = I` elementwise within `tolerance`.
pub fn is_unitary<const N: usize>(m: &[[Complex64; N]; N], tolerance: f64) -> bool {
    approx_eq(&matmul(m, &dagger(m)), &identity::<N>(), tolerance)
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &Matrix2, b: &Matrix2) -> Matrix4 {
    let mut out = [[Complex64::zero(); 4]; 4];
    for i in 0..2 {
        for j in 0..2 {
            for k in 0..2 {
                for l in 0..2 {
                    out[2 * i + k][2 * j + l] = a[i][j] * b[k][l];
                }
            }
        }
    }
    out
}

/// Lifts a single-qubit operator into the two-qubit space:
/// `I ⊗ g` for qubit 0 and `g ⊗ I` for qubit 1.
pub fn embed(qubit: Qubit, gate: &Matrix2) -> Matrix4 {
    let id = identity::<2>();
    match qubit {
        Qubit::Q0 => kron(&id, gate),
        Qubit::Q1 => kron(gate, &id),
    }
}

/// Matrix-vector product `m · v`.
pub fn apply<const N: usize>(m: &[[Complex64; N]; N], v: &[Complex64; N]) -> [Complex64; N] {
    let mut out = [Complex64::zero(); N];
    for (row, slot) in m.iter().zip(out.iter_mut()) {
        *slot = row.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
    }
    out
}

/// The iSwap gate in the `00, 01, 10, 11` basis.
pub fn iswap() -> Matrix4 {
    let o = Complex64::zero();
    let l = Complex64::one();
    let i = Complex64::i();
    [
        [l, o, o, o],
        [o, o, i, o],
        [o, i, o, o],
        [o, o, o, l],
    ]
}
