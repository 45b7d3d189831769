//! Measure descriptors
//!
//! A measure describes a named stream of numeric observations: its name,
//! units, human-readable description, and value type. Descriptors are
//! registered once with the [`MeasureRegistry`](crate::measure::MeasureRegistry)
//! and are immutable afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type of a measure's observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureType {
    /// 64-bit floating-point observations
    Double,
    /// 64-bit integer observations
    Int64,
}

/// Immutable description of a measurement stream
///
/// # Example
///
/// ```rust
/// use kuba_stats::measure::{MeasureDescriptor, MeasureType};
///
/// let descriptor = MeasureDescriptor::new(
///     "http/request_bytes",
///     "bytes",
///     "Size of HTTP request bodies",
///     MeasureType::Int64,
/// );
/// assert_eq!(descriptor.name(), "http/request_bytes");
/// assert_eq!(descriptor.measure_type(), MeasureType::Int64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureDescriptor {
    name: String,
    units: String,
    description: String,
    measure_type: MeasureType,
}

impl MeasureDescriptor {
    /// Create a new descriptor
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        description: impl Into<String>,
        measure_type: MeasureType,
    ) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            description: description.into(),
            measure_type,
        }
    }

    /// The empty descriptor returned for invalid handles
    pub(crate) fn empty() -> Self {
        Self::new("", "", "", MeasureType::Double)
    }

    /// Registered name of the measure
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units of the recorded values (e.g. "ms", "bytes", "1")
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Value type of the measure
    pub fn measure_type(&self) -> MeasureType {
        self.measure_type
    }
}

impl fmt::Display for MeasureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({:?}): {}",
            self.name, self.units, self.measure_type, self.description
        )
    }
}
