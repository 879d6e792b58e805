//! Violaciones de restricciones
//!
//! Una violación no es un error: es salida de dominio graduada (error / warning).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    TimeWindow,
    CapacityWeight,
    CapacityVolume,
    CapacityPallet,
    WorkHours,
    VehicleType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintViolation {
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_index: Option<usize>,
}

impl ConstraintViolation {
    pub fn error(violation_type: ViolationType, message: impl Into<String>) -> Self {
        Self {
            violation_type,
            severity: Severity::Error,
            message: message.into(),
            stop_index: None,
        }
    }

    pub fn warning(violation_type: ViolationType, message: impl Into<String>) -> Self {
        Self {
            violation_type,
            severity: Severity::Warning,
            message: message.into(),
            stop_index: None,
        }
    }

    pub fn at_stop(mut self, stop_index: usize) -> Self {
        self.stop_index = Some(stop_index);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
