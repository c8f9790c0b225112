// src/api/mod.rs

//! Transport-agnostic request and response shapes.
//!
//! Complex scalars travel as `{re, im}` objects and matrices as row-major
//! nested arrays. Handlers take a deserialized request and return either a
//! response body or a `QpulseError`; [`respond`] folds both into the JSON
//! envelope (`success: true` plus the body, or an [`ErrorResponse`]).

use crate::analysis::{self, SeparableInfo, StateAnalysis};
use crate::config::Calibration;
use crate::core::{QpulseError, Qubit, Result, StateVector};
use crate::simulation::{MeasurementOutcome, Simulator};
use crate::synthesis::{
    DrivePulse, EulerDecomposer, InstructionCode, PhysicalInstruction, RelevantParameters, Synthesizer,
    UnitaryDecomposer,
};
use crate::validation;
use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// A complex scalar on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplexJson {
    pub re: f64,
    pub im: f64,
}

impl From<Complex64> for ComplexJson {
    fn from(c: Complex64) -> Self {
        Self { re: c.re, im: c.im }
    }
}

impl From<ComplexJson> for Complex64 {
    fn from(c: ComplexJson) -> Self {
        Complex64::new(c.re, c.im)
    }
}

/// Row-major matrix of complex scalars.
pub type MatrixJson = Vec<Vec<ComplexJson>>;

/// External expression parser turning user text into a complex number.
///
/// Implementations report malformed text as `QpulseError::Parse`.
pub trait ComplexParser {
    fn parse_complex(&self, text: &str) -> Result<Complex64>;
}

impl<F> ComplexParser for F
where
    F: Fn(&str) -> Result<Complex64>,
{
    fn parse_complex(&self, text: &str) -> Result<Complex64> {
        self(text)
    }
}

/// Parser for plain numeric literals such as `0.5`, `-2i` or `1+2i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralParser;

impl ComplexParser for LiteralParser {
    fn parse_complex(&self, text: &str) -> Result<Complex64> {
        Complex64::from_str(text.trim()).map_err(|e| QpulseError::Parse {
            message: format!("Cannot parse '{}' as a complex number: {}", text, e),
        })
    }
}

/// Parses one expression; blank text is zero.
fn parse_or_zero<P: ComplexParser + ?Sized>(parser: &P, text: &str) -> Result<Complex64> {
    if text.trim().is_empty() {
        Ok(Complex64::new(0.0, 0.0))
    } else {
        parser.parse_complex(text)
    }
}

fn state_from_json(coefficients: &[ComplexJson]) -> Result<StateVector> {
    if coefficients.is_empty() {
        return Err(QpulseError::validation("No state vector provided"));
    }
    let amplitudes: Vec<Complex64> = coefficients.iter().copied().map(Complex64::from).collect();
    StateVector::from_slice(&amplitudes)
}

fn matrix_from_rows<T, const N: usize>(
    rows: &[Vec<T>],
    mut entry: impl FnMut(&T) -> Result<Complex64>,
) -> Result<[[Complex64; N]; N]> {
    if rows.len() != N || rows.iter().any(|row| row.len() != N) {
        return Err(QpulseError::validation(format!("Gate matrix must be {}x{}", N, N)));
    }
    let mut m = [[Complex64::new(0.0, 0.0); N]; N];
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            m[i][j] = entry(value)?;
        }
    }
    Ok(m)
}

fn matrix_to_json<const N: usize>(m: &[[Complex64; N]; N]) -> MatrixJson {
    m.iter()
        .map(|row| row.iter().copied().map(ComplexJson::from).collect())
        .collect()
}

/// Single-qubit amplitudes of qubit 1, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Qubit1State {
    pub alpha: ComplexJson,
    pub beta: ComplexJson,
}

/// Single-qubit amplitudes of qubit 0, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Qubit0State {
    pub gamma: ComplexJson,
    pub delta: ComplexJson,
}

/// Per-qubit fields reported only for product states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeparableReport {
    pub bloch_qubit1: [f64; 3],
    pub bloch_qubit0: [f64; 3],
    pub qubit1_state: Qubit1State,
    pub qubit0_state: Qubit0State,
}

impl From<&SeparableInfo> for SeparableReport {
    fn from(info: &SeparableInfo) -> Self {
        Self {
            bloch_qubit1: info.bloch_qubit1.to_array(),
            bloch_qubit0: info.bloch_qubit0.to_array(),
            qubit1_state: Qubit1State {
                alpha: info.qubit1.zero.into(),
                beta: info.qubit1.one.into(),
            },
            qubit0_state: Qubit0State {
                gamma: info.qubit0.zero.into(),
                delta: info.qubit0.one.into(),
            },
        }
    }
}

/// The state block shared by the analyze, measure and apply-gate responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub coefficients: Vec<ComplexJson>,
    pub probabilities: [f64; 4],
    pub is_separable: bool,
    /// Zero for entangled states.
    pub q0current_relative_phase: f64,
    /// Zero for entangled states.
    pub q1current_relative_phase: f64,
    #[serde(flatten)]
    pub separable: Option<SeparableReport>,
}

impl From<&StateAnalysis> for StateReport {
    fn from(analysis: &StateAnalysis) -> Self {
        Self {
            coefficients: analysis.state.amplitudes().iter().copied().map(ComplexJson::from).collect(),
            probabilities: analysis.probabilities,
            is_separable: analysis.is_separable,
            q0current_relative_phase: analysis.relative_phase(Qubit::Q0),
            q1current_relative_phase: analysis.relative_phase(Qubit::Q1),
            separable: analysis.separable.as_ref().map(SeparableReport::from),
        }
    }
}

/// How the four expressions of an analyze request are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateInputMode {
    /// `c00, c01, c10, c11` directly.
    #[default]
    Vector,
    /// `α, β` of qubit 1 then `γ, δ` of qubit 0, combined as a tensor product.
    Product,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub expressions: Vec<String>,
    #[serde(default)]
    pub mode: StateInputMode,
}

/// Builds a state from expressions, normalizes it and analyzes it.
///
/// Missing expressions default to `0` in vector mode and to `|0>` per qubit
/// in product mode.
///
/// # Errors
/// * `Parse` from the expression parser.
/// * `Validation` if the resulting vector is zero.
pub fn analyze_state<P>(parser: &P, request: &AnalyzeRequest) -> Result<StateReport>
where
    P: ComplexParser + ?Sized,
{
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    let expr = |i: usize, missing: Complex64| -> Result<Complex64> {
        request.expressions.get(i).map_or(Ok(missing), |text| parse_or_zero(parser, text))
    };
    let state = match request.mode {
        StateInputMode::Vector => StateVector::new([expr(0, zero)?, expr(1, zero)?, expr(2, zero)?, expr(3, zero)?]),
        StateInputMode::Product => {
            StateVector::from_qubit_pair((expr(0, one)?, expr(1, zero)?), (expr(2, one)?, expr(3, zero)?))
        }
    };
    let state = validation::normalize(&state)?;
    Ok(StateReport::from(&analysis::analyze(&state)))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasureRequest {
    #[serde(default)]
    pub qubit_index: u8,
    #[serde(default)]
    pub state_vector: Vec<ComplexJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureResponse {
    pub measurement_result: u8,
    pub prob_0: f64,
    pub prob_1: f64,
    #[serde(flatten)]
    pub state: StateReport,
}

impl From<&MeasurementOutcome> for MeasureResponse {
    fn from(outcome: &MeasurementOutcome) -> Self {
        Self {
            measurement_result: outcome.result,
            prob_0: outcome.prob_0,
            prob_1: outcome.prob_1,
            state: StateReport::from(&outcome.collapsed),
        }
    }
}

/// One projective measurement drawn from `simulator`'s generator.
///
/// # Errors
/// `Validation` for a missing or zero state, a bad qubit index, or a zero
/// collapsed state.
pub fn measure_qubit<R: Rng>(simulator: &mut Simulator<R>, request: &MeasureRequest) -> Result<MeasureResponse> {
    let qubit = Qubit::try_from(request.qubit_index)?;
    let state = state_from_json(&request.state_vector)?;
    let outcome = simulator.measure(&state, qubit)?;
    Ok(MeasureResponse::from(&outcome))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplyGateRequest {
    #[serde(default)]
    pub state_vector: Vec<ComplexJson>,
    #[serde(default)]
    pub gate_matrix: MatrixJson,
}

/// `M·ψ` followed by analysis. The gate is not checked for unitarity.
///
/// # Errors
/// `Validation` for missing fields or wrong shapes.
pub fn apply_gate(request: &ApplyGateRequest) -> Result<StateReport> {
    if request.state_vector.is_empty() || request.gate_matrix.is_empty() {
        return Err(QpulseError::validation("Missing state_vector or gate_matrix"));
    }
    let state = state_from_json(&request.state_vector)?;
    let gate = matrix_from_rows::<_, 4>(&request.gate_matrix, |c| Ok(Complex64::from(*c)))?;
    Ok(StateReport::from(&crate::simulation::engine::apply_gate(&state, &gate)))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecomposeRequest {
    /// 4×4 matrix of expressions.
    pub matrix: Vec<Vec<String>>,
    pub rabi_frequency: Option<f64>,
    pub q0drive_freq: Option<f64>,
    pub q1drive_freq: Option<f64>,
    /// Current state; when separable its relative phases seed the synthesis.
    pub state_vector: Option<Vec<ComplexJson>>,
}

/// Wire form of a `PhysicalInstruction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionJson {
    pub code: InstructionCode,
    pub title: String,
    /// 0 or 1 for a single-qubit instruction, 2 for the entangling primitive.
    pub tag: u8,
    pub instruction_string: String,
    pub details: String,
    pub angle: Option<f64>,
    pub underlying_gate: MatrixJson,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub drive: Option<DrivePulse>,
}

impl From<&PhysicalInstruction> for InstructionJson {
    fn from(instr: &PhysicalInstruction) -> Self {
        Self {
            code: instr.code,
            title: instr.title.clone(),
            tag: instr.tag.into(),
            instruction_string: instr.instruction_string.clone(),
            details: instr.details.clone(),
            angle: instr.angle,
            underlying_gate: matrix_to_json(&instr.underlying_gate),
            drive: instr.drive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecomposeResponse {
    pub message: String,
    pub is_unitary: bool,
    pub instructions: Vec<InstructionJson>,
    pub global_phase: f64,
}

/// Parses the matrix, applies calibration overrides, seeds phases from the
/// optional state and runs the synthesis pipeline.
///
/// # Errors
/// Any error of parsing, calibration validation or `Synthesizer::decompose`.
pub fn decompose<P, D, E>(
    parser: &P,
    synthesizer: &Synthesizer<D, E>,
    defaults: &Calibration,
    request: &DecomposeRequest,
) -> Result<DecomposeResponse>
where
    P: ComplexParser + ?Sized,
    D: UnitaryDecomposer,
    E: EulerDecomposer,
{
    let unitary = matrix_from_rows::<_, 4>(&request.matrix, |text| parse_or_zero(parser, text))?;

    let calibration = Calibration {
        rabi_frequency: request.rabi_frequency.unwrap_or(defaults.rabi_frequency),
        q0_drive_freq: request.q0drive_freq.unwrap_or(defaults.q0_drive_freq),
        q1_drive_freq: request.q1drive_freq.unwrap_or(defaults.q1_drive_freq),
    };
    calibration.validate()?;

    let mut params = RelevantParameters::new(calibration);
    if let Some(coefficients) = &request.state_vector {
        let state = state_from_json(coefficients)?;
        params = params.with_phases_from(&analysis::analyze(&state));
    }

    let set = synthesizer.decompose(&unitary, &mut params)?;
    Ok(DecomposeResponse {
        message: "Matrix is unitary".to_string(),
        is_unitary: true,
        instructions: set.instructions.iter().map(InstructionJson::from).collect(),
        global_phase: set.global_phase,
    })
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub real: f64,
    pub imag: f64,
}

/// Evaluates a single expression.
pub fn evaluate<P: ComplexParser + ?Sized>(parser: &P, request: &EvaluateRequest) -> Result<EvaluateResponse> {
    let value = parse_or_zero(parser, &request.expression)?;
    Ok(EvaluateResponse { real: value.re, imag: value.im })
}

/// Failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl From<&QpulseError> for ErrorResponse {
    fn from(err: &QpulseError) -> Self {
        Self { success: false, error: err.to_string() }
    }
}

/// Folds a handler result into the JSON envelope.
pub fn respond<T: Serialize>(result: Result<T>) -> Value {
    let failure = |err: &QpulseError| {
        warn!(error = %err, "request failed");
        serde_json::to_value(ErrorResponse::from(err)).unwrap_or(Value::Null)
    };
    match result {
        Ok(body) => match serde_json::to_value(&body) {
            Ok(Value::Object(mut map)) => {
                map.insert("success".to_string(), Value::Bool(true));
                Value::Object(map)
            }
            Ok(other) => serde_json::json!({ "success": true, "result": other }),
            Err(e) => failure(&QpulseError::inconsistency(format!("Response serialization failed: {}", e))),
        },
        Err(err) => failure(&err),
    }
}
