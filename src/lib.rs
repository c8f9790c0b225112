// src/lib.rs

//! `qpulse` - control-instruction synthesis for a two-transmon processor
//!
//! The crate turns an arbitrary two-qubit unitary into an ordered list of
//! hardware instructions (virtual Z rotations, resonant Y drives and
//! flux-tuned iSwap exchanges) and provides the state-vector tooling around
//! it: separability and Bloch analysis, projective measurement and gate
//! application.
//!
//! The two-qubit synthesizer that breaks a unitary into sub-gates is an
//! external collaborator, plugged in through [`UnitaryDecomposer`].

pub mod core;
pub mod operations;
pub mod validation;
pub mod analysis;
pub mod simulation;
pub mod synthesis;
pub mod config;
pub mod api;

// Re-export the most common types for easier top-level use
pub use crate::core::{GateTag, Matrix2, Matrix4, QpulseError, Qubit, Result, StateVector};
pub use operations::{Decomposition, EntanglingPrimitive, EulerDecomposition, Rotation, RotationAxis, SubGateStep};
pub use analysis::{BlochVector, StateAnalysis, analyze, is_separable};
pub use simulation::{MeasurementOutcome, Simulator};
pub use synthesis::{
    EulerDecomposer, InstructionCode, InstructionSet, PhysicalInstruction, RelevantParameters, Synthesizer,
    UnitaryDecomposer, ZyzDecomposer, synthesize,
};
pub use config::Calibration;
pub use validation::{check_normalization, check_unitary, normalize};

// Example 1: Product state analysis and measurement
// Builds |+> ⊗ |+>, reads its Bloch vectors and measures one qubit.
/// ```
/// use qpulse::{analyze, Qubit, Simulator, StateVector};
/// use num_complex::Complex64;
///
/// let one = Complex64::new(1.0, 0.0);
/// let state = StateVector::from_qubit_pair((one, one), (one, one));
///
/// let analysis = analyze(&state);
/// assert!(analysis.is_separable);
/// let info = analysis.separable.expect("product state");
/// assert!((info.bloch_qubit0.x - 1.0).abs() < 1e-12);
/// assert!((info.bloch_qubit1.x - 1.0).abs() < 1e-12);
///
/// // Seeded generator: the same seed always yields the same outcome.
/// let mut simulator = Simulator::seeded(11);
/// match simulator.measure(&state, Qubit::Q0) {
///     Ok(outcome) => {
///         println!("{}", outcome);
///         assert!((outcome.prob_0 - 0.5).abs() < 1e-12);
///         assert!(outcome.collapsed.is_separable);
///     }
///     Err(e) => panic!("measurement failed: {}", e),
/// }
/// ```
#[doc(hidden)]
const _: () = ();

// Example 2: Instruction synthesis with a stub two-qubit synthesizer
// The stub reports iSwap followed by RY(π/2) on qubit 1; the built-in ZYZ
// decomposer turns the single-qubit step into one physical drive.
/// ```
/// use qpulse::core::matrix;
/// use qpulse::{
///     Decomposition, EntanglingPrimitive, InstructionCode, Matrix4, Qubit, RelevantParameters,
///     Rotation, SubGateStep, Synthesizer,
/// };
/// use std::f64::consts::FRAC_PI_2;
///
/// let ry = Rotation::y(FRAC_PI_2).matrix();
/// let target = matrix::matmul(&matrix::embed(Qubit::Q1, &ry), &matrix::iswap());
///
/// let stub = move |_: &Matrix4, _: EntanglingPrimitive| -> qpulse::Result<Decomposition> {
///     Ok(Decomposition {
///         steps: vec![
///             SubGateStep::Entangling { matrix: matrix::iswap() },
///             SubGateStep::Single { qubit: Qubit::Q1, matrix: ry },
///         ],
///         global_phase: 0.0,
///     })
/// };
///
/// let mut params = RelevantParameters::default();
/// let set = Synthesizer::new(stub).decompose(&target, &mut params).expect("synthesis");
/// println!("{}", set);
///
/// let codes: Vec<_> = set.instructions.iter().map(|i| i.code).collect();
/// assert_eq!(codes, vec![InstructionCode::ISwap, InstructionCode::Ry]);
/// assert!(set.verify(&target).is_ok());
/// ```
#[doc(hidden)]
const _: () = ();
