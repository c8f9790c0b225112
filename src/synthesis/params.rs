// src/synthesis/params.rs

use crate::analysis::StateAnalysis;
use crate::config::Calibration;
use crate::core::Qubit;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Calibration constants plus the accumulated virtual phase of each qubit.
///
/// One instance lives for exactly one decomposition request. Synthesis
/// threads it through by `&mut`: every virtual Z rotation adds its signed
/// angle to the qubit's phase, and every later Y drive reads the value
/// accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevantParameters {
    /// Rabi frequency in Hz.
    pub rabi_frequency: f64,
    /// Drive frequency of qubit 0 in Hz.
    pub q0_drive_freq: f64,
    /// Drive frequency of qubit 1 in Hz.
    pub q1_drive_freq: f64,
    /// Accumulated virtual phase of qubit 0, radians.
    pub q0_relative_phase: f64,
    /// Accumulated virtual phase of qubit 1, radians.
    pub q1_relative_phase: f64,
}

impl RelevantParameters {
    /// Fresh parameters with both phases at zero.
    pub fn new(calibration: Calibration) -> Self {
        Self {
            rabi_frequency: calibration.rabi_frequency,
            q0_drive_freq: calibration.q0_drive_freq,
            q1_drive_freq: calibration.q1_drive_freq,
            q0_relative_phase: 0.0,
            q1_relative_phase: 0.0,
        }
    }

    /// Seeds both phases from the relative phases of an analyzed state.
    /// Entangled states seed zero.
    pub fn with_phases_from(mut self, analysis: &StateAnalysis) -> Self {
        self.q0_relative_phase = analysis.relative_phase(Qubit::Q0);
        self.q1_relative_phase = analysis.relative_phase(Qubit::Q1);
        self
    }

    pub fn drive_freq(&self, qubit: Qubit) -> f64 {
        match qubit {
            Qubit::Q0 => self.q0_drive_freq,
            Qubit::Q1 => self.q1_drive_freq,
        }
    }

    pub fn relative_phase(&self, qubit: Qubit) -> f64 {
        match qubit {
            Qubit::Q0 => self.q0_relative_phase,
            Qubit::Q1 => self.q1_relative_phase,
        }
    }

    /// Records a virtual Z rotation of `angle` radians on `qubit`.
    pub fn add_phase(&mut self, qubit: Qubit, angle: f64) {
        let phase = match qubit {
            Qubit::Q0 => &mut self.q0_relative_phase,
            Qubit::Q1 => &mut self.q1_relative_phase,
        };
        *phase += angle;
        debug!(%qubit, angle, accumulated = *phase, "virtual phase updated");
    }
}

impl Default for RelevantParameters {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}
