//! Temperature traces: named component columns, one or more sample rows.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use emrel_core::errors::TraceError;
use emrel_core::units::kelvin_to_celsius;

/// Unit of the values stored in a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Kelvin,
}

/// Component temperatures, either a single steady-state row or one row per sample.
///
/// Column order is preserved and names are unique. Every row has one value per
/// component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrace")]
pub struct TemperatureTrace {
    components: Vec<String>,
    rows: Vec<Vec<f64>>,
    unit: TemperatureUnit,
}

#[derive(Deserialize)]
struct RawTrace {
    components: Vec<String>,
    rows: Vec<Vec<f64>>,
    #[serde(default)]
    unit: TemperatureUnit,
}

impl TryFrom<RawTrace> for TemperatureTrace {
    type Error = TraceError;

    fn try_from(raw: RawTrace) -> Result<Self, Self::Error> {
        Self::new(raw.components, raw.rows, raw.unit)
    }
}

impl TemperatureTrace {
    pub fn new(
        components: Vec<String>,
        rows: Vec<Vec<f64>>,
        unit: TemperatureUnit,
    ) -> Result<Self, TraceError> {
        if components.is_empty() {
            return Err(TraceError::Empty);
        }
        let mut seen = HashSet::with_capacity(components.len());
        for (column, name) in components.iter().enumerate() {
            if name.is_empty() {
                return Err(TraceError::EmptyName { column });
            }
            if !seen.insert(name.as_str()) {
                return Err(TraceError::DuplicateName { name: name.clone() });
            }
        }
        if rows.is_empty() {
            return Err(TraceError::NoRows);
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != components.len() {
                return Err(TraceError::RaggedRow {
                    row,
                    expected: components.len(),
                    found: values.len(),
                });
            }
            if let Some(column) = values.iter().position(|v| !v.is_finite()) {
                return Err(TraceError::InvalidValue {
                    row,
                    column: components[column].clone(),
                    value: values[column].to_string(),
                });
            }
        }
        Ok(Self {
            components,
            rows,
            unit,
        })
    }

    /// One steady-state row.
    pub fn steady_state(
        components: &[(&str, f64)],
        unit: TemperatureUnit,
    ) -> Result<Self, TraceError> {
        Self::new(
            components.iter().map(|(name, _)| name.to_string()).collect(),
            vec![components.iter().map(|(_, t)| *t).collect()],
            unit,
        )
    }

    /// Parse tab-separated text: a header of component names, then value rows.
    /// Blank lines are skipped.
    pub fn parse(text: &str, unit: TemperatureUnit) -> Result<Self, TraceError> {
        let mut lines = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty());

        let header = lines.next().ok_or(TraceError::Empty)?;
        let components: Vec<String> = header.split('\t').map(|n| n.trim().to_string()).collect();

        let mut rows = Vec::new();
        for (row, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != components.len() {
                return Err(TraceError::RaggedRow {
                    row,
                    expected: components.len(),
                    found: fields.len(),
                });
            }
            let values = fields
                .iter()
                .zip(&components)
                .map(|(field, column)| {
                    field
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| TraceError::InvalidValue {
                            row,
                            column: column.clone(),
                            value: field.to_string(),
                        })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            rows.push(values);
        }

        Self::new(components, rows, unit)
    }

    pub fn from_file(path: &Path, unit: TemperatureUnit) -> Result<Self, TraceError> {
        let text = std::fs::read_to_string(path).map_err(|e| TraceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&text, unit)
    }

    /// Serialize back to the tab-separated format accepted by [`parse`](Self::parse).
    pub fn to_tsv(&self) -> String {
        let mut out = self.components.join("\t");
        out.push('\n');
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
        out
    }

    /// A copy with every value expressed in °C.
    pub fn to_celsius(&self) -> TemperatureTrace {
        match self.unit {
            TemperatureUnit::Celsius => self.clone(),
            TemperatureUnit::Kelvin => TemperatureTrace {
                components: self.components.clone(),
                rows: self
                    .rows
                    .iter()
                    .map(|row| row.iter().map(|&k| kelvin_to_celsius(k)).collect())
                    .collect(),
                unit: TemperatureUnit::Celsius,
            },
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn is_steady_state(&self) -> bool {
        self.rows.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steady_state_trace() {
        let trace =
            TemperatureTrace::parse("C0\tC1\n50.5\t61\n", TemperatureUnit::Celsius).unwrap();
        assert_eq!(trace.components(), ["C0", "C1"]);
        assert_eq!(trace.rows(), [vec![50.5, 61.0]]);
        assert!(trace.is_steady_state());
    }

    #[test]
    fn parses_series_with_crlf_and_blank_tail() {
        let text = "A\tB\r\n1\t2\r\n3\t4\r\n\r\n";
        let trace = TemperatureTrace::parse(text, TemperatureUnit::Celsius).unwrap();
        assert_eq!(trace.rows().len(), 2);
        assert!(!trace.is_steady_state());
    }

    #[test]
    fn rejects_bad_traces() {
        let c = TemperatureUnit::Celsius;
        assert_eq!(TemperatureTrace::parse("", c), Err(TraceError::Empty));
        assert_eq!(TemperatureTrace::parse("A\tB\n", c), Err(TraceError::NoRows));
        assert_eq!(
            TemperatureTrace::parse("A\tA\n1\t2\n", c),
            Err(TraceError::DuplicateName { name: "A".into() })
        );
        assert_eq!(
            TemperatureTrace::parse("A\t\n1\t2\n", c),
            Err(TraceError::EmptyName { column: 1 })
        );
        assert!(matches!(
            TemperatureTrace::parse("A\tB\n1\n", c),
            Err(TraceError::RaggedRow { row: 0, expected: 2, found: 1 })
        ));
        assert!(matches!(
            TemperatureTrace::parse("A\tB\n1\thot\n", c),
            Err(TraceError::InvalidValue { .. })
        ));
        assert!(matches!(
            TemperatureTrace::parse("A\n1\nNaN\n", c),
            Err(TraceError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn deserialization_is_validated() {
        let trace: TemperatureTrace =
            serde_json::from_str(r#"{"components":["A"],"rows":[[50.0]]}"#).unwrap();
        assert_eq!(trace.unit(), TemperatureUnit::Celsius);

        let ragged = r#"{"components":["A","B"],"rows":[[1.0]],"unit":"kelvin"}"#;
        let err = serde_json::from_str::<TemperatureTrace>(ragged).unwrap_err();
        assert!(err.to_string().contains("Row 0 has 1 values"), "{err}");
    }

    #[test]
    fn kelvin_converts_to_celsius() {
        let trace = TemperatureTrace::parse("A\n323.15\n", TemperatureUnit::Kelvin).unwrap();
        let c = trace.to_celsius();
        assert_eq!(c.unit(), TemperatureUnit::Celsius);
        assert!((c.rows()[0][0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn tsv_round_trip() {
        let text = "A\tB\n1.25\t2\n3\t4.5\n";
        let trace = TemperatureTrace::parse(text, TemperatureUnit::Celsius).unwrap();
        let again = TemperatureTrace::parse(&trace.to_tsv(), TemperatureUnit::Celsius).unwrap();
        assert_eq!(again, trace);
    }
}
