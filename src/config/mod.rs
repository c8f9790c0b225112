// src/config/mod.rs

//! Calibration constants of the two-transmon hardware model.
//!
//! Values can be supplied programmatically, per request, or from TOML text:
//!
//! ```toml
//! rabi_frequency = 25e6
//! q0_drive_freq = 5.3e9
//! q1_drive_freq = 5.0e9
//! ```
//!
//! Missing keys fall back to the hardware defaults.

use crate::core::constants::hardware;
use crate::core::{QpulseError, Result};
use serde::{Deserialize, Serialize};

/// Drive calibration for both qubits. All frequencies are in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Rabi frequency of the resonant drive.
    pub rabi_frequency: f64,
    /// Drive frequency of qubit 0.
    pub q0_drive_freq: f64,
    /// Drive frequency of qubit 1.
    pub q1_drive_freq: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            rabi_frequency: hardware::RABI_FREQUENCY,
            q0_drive_freq: hardware::Q0_DRIVE_FREQ,
            q1_drive_freq: hardware::Q1_DRIVE_FREQ,
        }
    }
}

impl Calibration {
    /// Parses a calibration table from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let calibration: Calibration = toml::from_str(text).map_err(|e| QpulseError::Config {
            message: format!("Invalid calibration file: {}", e),
        })?;
        calibration.validate()?;
        Ok(calibration)
    }

    /// All frequencies must be finite and strictly positive; the Rabi
    /// frequency divides every drive duration.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("rabi_frequency", self.rabi_frequency),
            ("q0_drive_freq", self.q0_drive_freq),
            ("q1_drive_freq", self.q1_drive_freq),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
            Some((name, value)) => Err(QpulseError::Config {
                message: format!("{} must be a positive frequency, got {}", name, value),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() -> Result<()> {
        let calibration = Calibration::from_toml_str("rabi_frequency = 25e6\n")?;
        assert_eq!(calibration.rabi_frequency, 25e6);
        assert_eq!(calibration.q0_drive_freq, hardware::Q0_DRIVE_FREQ);
        assert_eq!(calibration.q1_drive_freq, hardware::Q1_DRIVE_FREQ);
        Ok(())
    }

    #[test]
    fn rejects_non_positive_rabi() {
        assert!(matches!(
            Calibration::from_toml_str("rabi_frequency = 0.0"),
            Err(QpulseError::Config { .. })
        ));
        assert!(matches!(
            Calibration::from_toml_str("rabi_frequency = \"fast\""),
            Err(QpulseError::Config { .. })
        ));
    }
}
