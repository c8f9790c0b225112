// src/operations/mod.rs

//! The vocabulary exchanged with the external decomposition collaborators:
//! sub-gate steps produced by the two-qubit synthesizer and the elementary
//! rotations produced by the single-qubit Euler decomposer.

use crate::core::matrix::{self, Matrix2, Matrix4};
use crate::core::{GateTag, QpulseError, Qubit};
use num_complex::Complex64;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two-qubit entangling gate used as the hardware-native building block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntanglingPrimitive {
    /// Flux-tuned resonant exchange; the only primitive with an instruction template.
    #[default]
    #[serde(rename = "iSwap")]
    ISwap,
    /// Controlled-Z. Decomposition targets may name it, instruction synthesis rejects it.
    #[serde(rename = "CZ")]
    Cz,
}

impl fmt::Display for EntanglingPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntanglingPrimitive::ISwap => write!(f, "iSwap"),
            EntanglingPrimitive::Cz => write!(f, "CZ"),
        }
    }
}

impl FromStr for EntanglingPrimitive {
    type Err = QpulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iSwap" | "ISWAP" | "iswap" => Ok(EntanglingPrimitive::ISwap),
            "CZ" | "cz" => Ok(EntanglingPrimitive::Cz),
            other => Err(QpulseError::UnsupportedConfiguration {
                message: format!("Unknown entangling primitive '{}'", other),
            }),
        }
    }
}

/// One element of the two-qubit synthesizer's output.
///
/// Produced once per decomposition, consumed once by instruction synthesis.
#[derive(Debug, Clone, PartialEq)]
pub enum SubGateStep {
    /// A 2×2 operator acting on a single qubit.
    Single {
        /// Qubit the operator acts on.
        qubit: Qubit,
        /// The operator itself, not yet embedded.
        matrix: Matrix2,
    },
    /// The full 4×4 entangling operator.
    Entangling {
        /// The entangling operator.
        matrix: Matrix4,
    },
}

impl SubGateStep {
    /// What this step acts on.
    pub fn tag(&self) -> GateTag {
        match self {
            SubGateStep::Single { qubit, .. } => GateTag::Single(*qubit),
            SubGateStep::Entangling { .. } => GateTag::Entangling,
        }
    }

    /// The step's operator in the full two-qubit space.
    pub fn embedded(&self) -> Matrix4 {
        match self {
            SubGateStep::Single { qubit, matrix } => matrix::embed(*qubit, matrix),
            SubGateStep::Entangling { matrix } => *matrix,
        }
    }
}

/// Output of the two-qubit synthesizer: ordered steps and a global phase `θ`
/// such that `e^{iθ} · S_n ··· S_1 = U`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Sub-gates in application order.
    pub steps: Vec<SubGateStep>,
    /// Global phase in radians.
    pub global_phase: f64,
}

/// Axis of an elementary single-qubit rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationAxis {
    /// Diagonal phase rotation, realized virtually.
    Z,
    /// Physical rotation, realized by a resonant drive.
    Y,
}

/// An elementary rotation returned by the Euler decomposer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation axis.
    pub axis: RotationAxis,
    /// Signed angle in radians.
    pub angle: f64,
}

impl Rotation {
    /// `RZ(θ)`.
    pub fn z(angle: f64) -> Self {
        Self { axis: RotationAxis::Z, angle }
    }

    /// `RY(θ)`.
    pub fn y(angle: f64) -> Self {
        Self { axis: RotationAxis::Y, angle }
    }

    /// Whether this rotation is a pure phase (diagonal) rotation.
    pub fn is_z(&self) -> bool {
        self.axis == RotationAxis::Z
    }

    /// The 2×2 matrix of this rotation.
    ///
    /// `RZ(θ) = diag(e^{-iθ/2}, e^{iθ/2})`,
    /// `RY(θ) = [[cos θ/2, -sin θ/2], [sin θ/2, cos θ/2]]`.
    pub fn matrix(&self) -> Matrix2 {
        let half = self.angle / 2.0;
        match self.axis {
            RotationAxis::Z => [
                [Complex64::from_polar(1.0, -half), Complex64::zero()],
                [Complex64::zero(), Complex64::from_polar(1.0, half)],
            ],
            RotationAxis::Y => {
                let (s, c) = half.sin_cos();
                [
                    [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
                    [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
                ]
            }
        }
    }
}

/// Output of the Euler decomposer: at most three rotations in application
/// order plus the global phase `φ` with `e^{iφ} · R_n ··· R_1 = U`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EulerDecomposition {
    /// Rotations in application order.
    pub rotations: Vec<Rotation>,
    /// Global phase in radians.
    pub global_phase: f64,
}

impl EulerDecomposition {
    /// A decomposition with no phase offset.
    pub fn exact(rotations: Vec<Rotation>) -> Self {
        Self { rotations, global_phase: 0.0 }
    }
}
