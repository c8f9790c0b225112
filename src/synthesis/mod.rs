// src/synthesis/mod.rs

//! Instruction synthesis: turns a two-qubit unitary, already broken into
//! sub-gates by an external synthesizer, into an ordered list of physical
//! control instructions for the two-transmon hardware model.
//!
//! The pass is strictly sequential. Virtual Z rotations write each qubit's
//! accumulated phase in `RelevantParameters`, and later Y drives read it, so
//! instructions are emitted in exactly the order the sub-gates occur.

mod euler;
mod instruction;
mod params;

pub use euler::ZyzDecomposer;
pub use instruction::{DrivePulse, InstructionCode, InstructionSet, PhysicalInstruction};
pub use params::RelevantParameters;

use crate::core::matrix::{self, Matrix2, Matrix4};
use crate::core::{QpulseError, Qubit, Result, tolerances};
use crate::operations::{Decomposition, EntanglingPrimitive, EulerDecomposition, Rotation, SubGateStep};
use crate::validation;
use num_complex::Complex64;
use tracing::{debug, info};

/// External two-qubit synthesizer: `U` and an entangling primitive in,
/// ordered sub-gates and a global phase out.
pub trait UnitaryDecomposer {
    /// # Errors
    /// Fails if `unitary` is not unitary or the decomposition does not converge.
    fn decompose_unitary(&self, unitary: &Matrix4, primitive: EntanglingPrimitive) -> Result<Decomposition>;
}

impl<F> UnitaryDecomposer for F
where
    F: Fn(&Matrix4, EntanglingPrimitive) -> Result<Decomposition>,
{
    fn decompose_unitary(&self, unitary: &Matrix4, primitive: EntanglingPrimitive) -> Result<Decomposition> {
        self(unitary, primitive)
    }
}

/// External single-qubit Euler decomposer: at most three Z/Y rotations.
pub trait EulerDecomposer {
    fn euler_decompose(&self, unitary: &Matrix2) -> Result<EulerDecomposition>;
}

impl<F> EulerDecomposer for F
where
    F: Fn(&Matrix2) -> Result<EulerDecomposition>,
{
    fn euler_decompose(&self, unitary: &Matrix2) -> Result<EulerDecomposition> {
        self(unitary)
    }
}

/// Instruction template slot of a single-qubit sub-gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Virtual Z rotation.
    Z,
    /// Physical Y drive.
    Y,
}

/// Maps the shape of an Euler result onto the `Z, Y, Z` template.
///
/// Only the length of the sequence and the axis of its first rotation are
/// consulted:
///
/// | rotations | first is Z | slots     |
/// |-----------|------------|-----------|
/// | 0         | -          | none      |
/// | 1         | yes / no   | Z / Y     |
/// | 2         | yes / no   | Z Y / Y Z |
/// | 3         | -          | Z Y Z     |
///
/// # Errors
/// `QpulseError::InternalInconsistency` for more than three rotations.
pub fn classify_slots(rotations: &[Rotation]) -> Result<&'static [Slot]> {
    let first_is_z = rotations.first().is_some_and(Rotation::is_z);
    match (rotations.len(), first_is_z) {
        (0, _) => Ok(&[]),
        (1, true) => Ok(&[Slot::Z]),
        (1, false) => Ok(&[Slot::Y]),
        (2, true) => Ok(&[Slot::Z, Slot::Y]),
        (2, false) => Ok(&[Slot::Y, Slot::Z]),
        (3, _) => Ok(&[Slot::Z, Slot::Y, Slot::Z]),
        (n, _) => Err(QpulseError::inconsistency(format!(
            "Euler decomposer returned {} rotations, at most 3 are possible",
            n
        ))),
    }
}

/// Rejects entangling primitives without an instruction template.
pub fn ensure_supported(primitive: EntanglingPrimitive) -> Result<()> {
    match primitive {
        EntanglingPrimitive::ISwap => Ok(()),
        other => Err(QpulseError::UnsupportedConfiguration {
            message: format!("{} gate is not implemented yet; only iSwap has a physical realization", other),
        }),
    }
}

/// Walks the sub-gates in order and emits their instructions, updating the
/// virtual phases in `params` as it goes.
///
/// The returned set's global phase is the synthesizer's phase plus the phase
/// of every Euler decomposition, so `InstructionSet::verify` holds against the
/// input unitary.
///
/// # Errors
/// * `UnsupportedConfiguration` for a primitive other than iSwap.
/// * Errors of the Euler decomposer, passed through.
/// * `InternalInconsistency` for an Euler result longer than three rotations.
pub fn synthesize<E>(
    decomposition: &Decomposition,
    primitive: EntanglingPrimitive,
    euler: &E,
    params: &mut RelevantParameters,
) -> Result<InstructionSet>
where
    E: EulerDecomposer + ?Sized,
{
    ensure_supported(primitive)?;
    let mut set = InstructionSet {
        instructions: Vec::with_capacity(decomposition.steps.len() * 3),
        global_phase: decomposition.global_phase,
    };

    for step in &decomposition.steps {
        match step {
            SubGateStep::Entangling { matrix } => {
                debug!("emitting ISWAP");
                set.instructions.push(PhysicalInstruction::iswap(*matrix));
            }
            SubGateStep::Single { qubit, matrix } => {
                let euler_result = euler.euler_decompose(matrix)?;
                emit_single_qubit(*qubit, &euler_result.rotations, params, &mut set.instructions)?;
                set.global_phase += euler_result.global_phase;
            }
        }
    }

    info!(
        instructions = set.len(),
        q0_phase = params.q0_relative_phase,
        q1_phase = params.q1_relative_phase,
        "synthesized instruction set"
    );
    Ok(set)
}

fn emit_single_qubit(
    qubit: Qubit,
    rotations: &[Rotation],
    params: &mut RelevantParameters,
    out: &mut Vec<PhysicalInstruction>,
) -> Result<()> {
    let slots = classify_slots(rotations)?;
    for (slot, rotation) in slots.iter().zip(rotations) {
        let instruction = match slot {
            Slot::Z => {
                let instruction = PhysicalInstruction::virtual_z(qubit, rotation);
                params.add_phase(qubit, rotation.angle);
                instruction
            }
            Slot::Y => PhysicalInstruction::drive_y(qubit, rotation, params)?,
        };
        debug!(%qubit, code = %instruction.code, angle = rotation.angle, "emitting instruction");
        out.push(instruction);
    }
    Ok(())
}

/// Checks `e^{iθ} · S_n ··· S_1 = U` for the synthesizer's output.
///
/// # Errors
/// `QpulseError::InternalInconsistency` on mismatch beyond the unitarity tolerance.
pub fn verify_reconstruction(decomposition: &Decomposition, unitary: &Matrix4) -> Result<()> {
    let product = decomposition
        .steps
        .iter()
        .fold(matrix::identity::<4>(), |acc, step| matrix::matmul(&step.embedded(), &acc));
    let rebuilt = matrix::scale(&product, Complex64::from_polar(1.0, decomposition.global_phase));
    if matrix::approx_eq(&rebuilt, unitary, tolerances::UNITARITY) {
        Ok(())
    } else {
        Err(QpulseError::inconsistency(format!(
            "Decomposition is incorrect: sub-gates deviate from the unitary by {:.3e}",
            matrix::max_deviation(&rebuilt, unitary)
        )))
    }
}

/// The full pipeline for one request: the external synthesizer, the Euler
/// decomposer and the target entangling primitive.
#[derive(Debug, Clone)]
pub struct Synthesizer<D, E = ZyzDecomposer> {
    decomposer: D,
    euler: E,
    primitive: EntanglingPrimitive,
}

impl<D: UnitaryDecomposer> Synthesizer<D, ZyzDecomposer> {
    /// A pipeline targeting iSwap with the built-in ZYZ decomposer.
    pub fn new(decomposer: D) -> Self {
        Self {
            decomposer,
            euler: ZyzDecomposer::default(),
            primitive: EntanglingPrimitive::ISwap,
        }
    }
}

impl<D: UnitaryDecomposer, E: EulerDecomposer> Synthesizer<D, E> {
    /// A pipeline with explicit collaborators.
    pub fn with_collaborators(decomposer: D, euler: E, primitive: EntanglingPrimitive) -> Self {
        Self { decomposer, euler, primitive }
    }

    /// Validates `unitary`, decomposes it, and synthesizes instructions.
    ///
    /// Synthesis never runs on a non-unitary input. Both the synthesizer's
    /// sub-gates and the final instruction sequence are checked against
    /// `unitary`.
    ///
    /// # Errors
    /// * `Validation` for a non-unitary input.
    /// * `UnsupportedConfiguration` for a primitive other than iSwap.
    /// * `InternalInconsistency` if a reconstruction check fails.
    pub fn decompose(&self, unitary: &Matrix4, params: &mut RelevantParameters) -> Result<InstructionSet> {
        validation::check_unitary(unitary)?;
        ensure_supported(self.primitive)?;
        let decomposition = self.decomposer.decompose_unitary(unitary, self.primitive)?;
        verify_reconstruction(&decomposition, unitary)?;
        let set = synthesize(&decomposition, self.primitive, &self.euler, params)?;
        set.verify(unitary)?;
        Ok(set)
    }
}
