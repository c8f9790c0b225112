// src/simulation/results.rs
use crate::analysis::StateAnalysis;
use crate::core::{Qubit, StateVector};
use std::fmt;

/// Outcome of a single projective measurement of one qubit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementOutcome {
    /// The measured qubit.
    pub qubit: Qubit,
    /// Observed value, 0 or 1.
    pub result: u8,
    /// Normalized marginal probability of reading 0 before collapse.
    pub prob_0: f64,
    /// Normalized marginal probability of reading 1 before collapse.
    pub prob_1: f64,
    /// Analysis of the renormalized post-measurement state.
    pub collapsed: StateAnalysis,
}

impl MeasurementOutcome {
    /// The renormalized post-measurement state.
    pub fn collapsed_state(&self) -> &StateVector {
        &self.collapsed.state
    }
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement of {}:", self.qubit)?;
        writeln!(f, "  P(0) = {:.4}, P(1) = {:.4}", self.prob_0, self.prob_1)?;
        writeln!(f, "  Result: {}", self.result)?;
        writeln!(f, "  Collapsed: {}", self.collapsed.state)
    }
}
