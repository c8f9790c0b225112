// src/core/qubit.rs

use super::error::QpulseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two physical transmons of the hardware model.
///
/// Qubit 0 is the low-order tensor factor when sub-gates are embedded
/// (`I ⊗ g`), qubit 1 the high-order one (`g ⊗ I`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Qubit {
    /// Qubit 0
    Q0,
    /// Qubit 1
    Q1,
}

impl Qubit {
    /// Numeric index (0 or 1).
    pub fn index(self) -> u8 {
        match self {
            Qubit::Q0 => 0,
            Qubit::Q1 => 1,
        }
    }
}

impl TryFrom<u8> for Qubit {
    type Error = QpulseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Qubit::Q0),
            1 => Ok(Qubit::Q1),
            other => Err(QpulseError::validation(format!(
                "Invalid qubit index {}: the hardware model has qubits 0 and 1",
                other
            ))),
        }
    }
}

impl From<Qubit> for u8 {
    fn from(q: Qubit) -> u8 {
        q.index()
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qubit {}", self.index())
    }
}

/// What a sub-gate or instruction acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateTag {
    /// A single-qubit operation on the given qubit.
    Single(Qubit),
    /// The two-qubit entangling primitive.
    Entangling,
}

/// Wire index of a tag: the qubit index for single-qubit operations, 2 for
/// the entangling primitive.
impl From<GateTag> for u8 {
    fn from(tag: GateTag) -> u8 {
        match tag {
            GateTag::Single(q) => q.index(),
            GateTag::Entangling => 2,
        }
    }
}

impl fmt::Display for GateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateTag::Single(q) => write!(f, "{}", q),
            GateTag::Entangling => write!(f, "Qubits 0,1"),
        }
    }
}
