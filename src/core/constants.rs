//! Numerical tolerances and calibration defaults.
//!
//! The tolerances are calibration knobs inherited from the reference tool, not
//! physical constants. They are kept as named values so a deployment can audit
//! them in one place.

/// Tolerances used by the analysis and synthesis passes.
pub mod tolerances {
    /// Threshold on `|c00*c11 - c01*c10|` below which a state is separable.
    pub const SEPARABILITY: f64 = 1e-10;
    /// Elementwise threshold for `M·M† = I` and for the reconstruction check.
    pub const UNITARITY: f64 = 1e-10;
    /// Allowed deviation of `Σ|c_i|²` from 1 for a normalized state.
    pub const NORMALIZATION: f64 = 1e-10;
    /// Magnitudes below this are treated as zero amplitudes.
    pub const AMPLITUDE: f64 = 1e-10;
    /// Rotation angles below this are dropped by the Euler decomposer.
    pub const ANGLE: f64 = 1e-12;
}

/// Hardware defaults for the fixed two-transmon model.
pub mod hardware {
    /// Rabi frequency of the drive, in Hz.
    pub const RABI_FREQUENCY: f64 = 20e6;
    /// Drive frequency of qubit 0, in Hz.
    pub const Q0_DRIVE_FREQ: f64 = 5.3e9;
    /// Drive frequency of qubit 1, in Hz.
    pub const Q1_DRIVE_FREQ: f64 = 5.0e9;
}
