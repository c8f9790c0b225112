// src/synthesis/instruction.rs

use crate::core::matrix::{self, Matrix4};
use crate::core::{GateTag, QpulseError, Qubit, Result, tolerances};
use crate::operations::Rotation;
use crate::synthesis::RelevantParameters;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Kind of control instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionCode {
    /// Virtual Z rotation, zero duration.
    #[serde(rename = "RZ")]
    Rz,
    /// Resonant Y drive.
    #[serde(rename = "RY")]
    Ry,
    /// Flux-tuned iSwap exchange.
    #[serde(rename = "ISWAP")]
    ISwap,
}

impl InstructionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionCode::Rz => "RZ",
            InstructionCode::Ry => "RY",
            InstructionCode::ISwap => "ISWAP",
        }
    }
}

impl fmt::Display for InstructionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control parameters of a physical Y drive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrivePulse {
    /// Carrier frequency, Hz: the qubit's drive frequency.
    pub frequency_hz: f64,
    /// Carrier phase, radians: π/2 plus the qubit's accumulated virtual phase.
    pub phase: f64,
    /// Drive amplitude is `k · rabi_frequency_hz` for a hardware constant `k`.
    pub rabi_frequency_hz: f64,
    /// Pulse length, seconds: `angle / rabi_frequency`.
    pub duration_s: f64,
}

/// One calibration-ready control instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalInstruction {
    pub code: InstructionCode,
    /// Short human-readable title.
    pub title: String,
    pub tag: GateTag,
    /// The operation this instruction realizes, embedded in the two-qubit space.
    pub underlying_gate: Matrix4,
    /// Short operational summary.
    pub instruction_string: String,
    /// Long-form physical rationale.
    pub details: String,
    /// Rotation angle in radians; `None` for ISWAP.
    pub angle: Option<f64>,
    /// Drive parameters, present for RY only.
    pub drive: Option<DrivePulse>,
}

fn round3(x: f64) -> f64 {
    (x * 1e3).round() / 1e3
}

impl PhysicalInstruction {
    /// The iSwap exchange carrying the synthesizer's entangling matrix.
    pub(crate) fn iswap(matrix: Matrix4) -> Self {
        Self {
            code: InstructionCode::ISwap,
            title: "iSwap Gate".to_string(),
            tag: GateTag::Entangling,
            underlying_gate: matrix,
            instruction_string: "Tune Qubit 1 to the frequency of Qubit 0 for pi/(4g) seconds, constant g.".to_string(),
            details: "Physical realization of the iSwap gate. A DC flux pulse through the transmon's SQUID \
                loop shifts its transition frequency until both qubits are resonant. In resonance the \
                capacitive exchange interaction swaps excitations and, after pi/(4g) seconds, realizes \
                iSwap. The coupling strength g follows from the interaction Hamiltonian, i.e. from the \
                qubit capacitances and the coupling capacitance."
                .to_string(),
            angle: None,
            drive: None,
        }
    }

    /// A virtual Z rotation. The caller records the phase update.
    pub(crate) fn virtual_z(qubit: Qubit, rotation: &Rotation) -> Self {
        let angle = rotation.angle;
        Self {
            code: InstructionCode::Rz,
            title: format!("Z-axis rotation of ~{} radians on {}", round3(angle), qubit),
            tag: GateTag::Single(qubit),
            underlying_gate: matrix::embed(qubit, &rotation.matrix()),
            instruction_string: "Virtual (bookkeeping) Z-axis phase rotation".to_string(),
            details: format!(
                "Phase rotations need no physical pulse. Shifting the phase reference of {} applies the \
                 Z rotation in zero time; every later drive on this qubit is emitted with a matching \
                 phase offset.",
                qubit
            ),
            angle: Some(angle),
            drive: None,
        }
    }

    /// A physical Y drive reading the qubit's accumulated phase at emission time.
    pub(crate) fn drive_y(qubit: Qubit, rotation: &Rotation, params: &RelevantParameters) -> Result<Self> {
        if params.rabi_frequency.abs() < tolerances::AMPLITUDE || !params.rabi_frequency.is_finite() {
            return Err(QpulseError::validation(format!(
                "Rabi frequency must be non-zero, got {}",
                params.rabi_frequency
            )));
        }
        let angle = rotation.angle;
        let drive = DrivePulse {
            frequency_hz: params.drive_freq(qubit),
            phase: FRAC_PI_2 + params.relative_phase(qubit),
            rabi_frequency_hz: params.rabi_frequency,
            duration_s: angle / params.rabi_frequency,
        };
        Ok(Self {
            code: InstructionCode::Ry,
            title: format!("Y-axis rotation of ~{} radians on {}", round3(angle), qubit),
            tag: GateTag::Single(qubit),
            underlying_gate: matrix::embed(qubit, &rotation.matrix()),
            instruction_string: format!("Apply electromagnetic radiation to qubit {} through its drive capacitor", qubit.index()),
            details: format!(
                "Drive Frequency: {} GHz\n\
                 Phase: PI/2 + Current Relative Phase: {} radians\n\
                 Amplitude: k* {} MHz\n\
                 Time: {} ns\n\n\
                 A drive phase of PI/2 produces a pure Pauli-Y term in the drive Hamiltonian. The phase \
                 also carries the accumulated virtual Z rotations of this qubit. The amplitude is \
                 k*rabi_frequency with k a constant calibrated on the device, and the rotation speed is \
                 set by the Rabi frequency (time = theta/rabi).",
                round3(drive.frequency_hz * 1e-9),
                round3(drive.phase),
                round3(drive.rabi_frequency_hz * 1e-6),
                round3(drive.duration_s * 1e9),
            ),
            angle: Some(angle),
            drive: Some(drive),
        })
    }
}

/// The ordered instructions of one decomposition and the global phase left
/// over after all sub-gates and Euler rotations are accounted for.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstructionSet {
    pub instructions: Vec<PhysicalInstruction>,
    /// Radians. `e^{i·global_phase} · G_n ··· G_1` equals the input unitary.
    pub global_phase: f64,
}

impl InstructionSet {
    /// Product of all underlying gates, left-multiplied in emission order,
    /// times the global phase factor.
    pub fn reconstruct(&self) -> Matrix4 {
        let product = self
            .instructions
            .iter()
            .fold(matrix::identity::<4>(), |acc, instr| matrix::matmul(&instr.underlying_gate, &acc));
        matrix::scale(&product, Complex64::from_polar(1.0, self.global_phase))
    }

    /// Reconstruction check against the input unitary.
    ///
    /// # Errors
    /// `QpulseError::InternalInconsistency` if any entry deviates by more than
    /// the unitarity tolerance.
    pub fn verify(&self, unitary: &Matrix4) -> Result<()> {
        let rebuilt = self.reconstruct();
        if matrix::approx_eq(&rebuilt, unitary, tolerances::UNITARITY) {
            Ok(())
        } else {
            Err(QpulseError::inconsistency(format!(
                "Instruction sequence does not reconstruct the unitary (max deviation {:.3e})",
                matrix::max_deviation(&rebuilt, unitary)
            )))
        }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "InstructionSet[{} instructions, global phase {:.4}]", self.len(), self.global_phase)?;
        for (i, instr) in self.instructions.iter().enumerate() {
            writeln!(f, "  {:>2}: {:<5} {:<10} {}", i, instr.code, instr.tag.to_string(), instr.title)?;
        }
        Ok(())
    }
}
