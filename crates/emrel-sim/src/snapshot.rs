//! Reliability snapshots and the tab-separated report format engines emit.
//!
//! ```text
//! C0\tC1\tC2
//! 0.97\t0.95\t0.99
//! ```

use serde::{Deserialize, Serialize};

use emrel_core::errors::MalformedOutputError;

use crate::trace::TemperatureTrace;

/// Per-component reliability at the end of one window, in trace column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct ReliabilitySnapshot {
    components: Vec<String>,
    values: Vec<f64>,
}

/// Unchecked wire shape; deserialization goes through [`ReliabilitySnapshot::new`].
#[derive(Deserialize)]
struct RawSnapshot {
    components: Vec<String>,
    values: Vec<f64>,
}

impl TryFrom<RawSnapshot> for ReliabilitySnapshot {
    type Error = MalformedOutputError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Self::new(raw.components, raw.values)
    }
}

impl ReliabilitySnapshot {
    /// Pair names with values. Lengths must agree.
    pub fn new(components: Vec<String>, values: Vec<f64>) -> Result<Self, MalformedOutputError> {
        if components.len() != values.len() {
            return Err(MalformedOutputError::ColumnCountMismatch {
                columns: components.len(),
                values: values.len(),
            });
        }
        Ok(Self { components, values })
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(name, reliability)` pairs in order.
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.components
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
            .collect()
    }

    pub fn get(&self, component: &str) -> Option<f64> {
        self.components
            .iter()
            .position(|c| c == component)
            .and_then(|i| self.values.get(i).copied())
    }

    /// Smallest reliability in the snapshot. `None` when empty.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Check the snapshot answers for exactly the trace's components, in order,
    /// with every value in [0, 1].
    pub fn validate_against(&self, trace: &TemperatureTrace) -> Result<(), MalformedOutputError> {
        let expected = trace.components();
        if self.components.len() != expected.len() {
            return Err(MalformedOutputError::ComponentCountMismatch {
                expected: expected.len(),
                found: self.components.len(),
            });
        }
        for (index, (found, expected)) in self.components.iter().zip(expected).enumerate() {
            if found != expected {
                return Err(MalformedOutputError::ComponentMismatch {
                    index,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }
        for (component, &value) in self.components.iter().zip(&self.values) {
            if !(0.0..=1.0).contains(&value) {
                return Err(MalformedOutputError::OutOfRange {
                    component: component.clone(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Parse a report: a header line of names and one line of values, both tab-separated.
pub fn parse_report(text: &str) -> Result<ReliabilitySnapshot, MalformedOutputError> {
    let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));

    let header = lines
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or(MalformedOutputError::MissingHeader)?;
    let values_line = lines
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or(MalformedOutputError::MissingValues)?;

    let components: Vec<String> = header.split('\t').map(|n| n.trim().to_string()).collect();
    let fields: Vec<&str> = values_line.split('\t').collect();
    if fields.len() != components.len() {
        return Err(MalformedOutputError::ColumnCountMismatch {
            columns: components.len(),
            values: fields.len(),
        });
    }

    let values = fields
        .iter()
        .zip(&components)
        .map(|(field, component)| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| MalformedOutputError::InvalidValue {
                    component: component.clone(),
                    value: field.to_string(),
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    ReliabilitySnapshot::new(components, values)
}

/// Render a snapshot in the report format. `parse_report` reads it back exactly.
pub fn write_report(snapshot: &ReliabilitySnapshot) -> String {
    let values: Vec<String> = snapshot.values.iter().map(|v| v.to_string()).collect();
    format!("{}\n{}\n", snapshot.components.join("\t"), values.join("\t"))
}
