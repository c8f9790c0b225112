// src/core/mod.rs

//! Core data structures and types

pub mod constants;
pub mod error;
pub mod matrix;
pub mod qubit;
pub mod state;

// Re-export public types for convenient access via `qpulse::core::TypeName`
pub use constants::tolerances;
pub use error::{QpulseError, Result};
pub use matrix::{Matrix2, Matrix4};
pub use qubit::{GateTag, Qubit};
pub use state::StateVector;
