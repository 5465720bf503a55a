//! Input-to-model feature alignment.

use std::collections::HashMap;

use crate::error::AppError;
use crate::records::PatientRecord;

/// Ordered input columns captured from the model artifact at load time.
///
/// Built once at startup and never mutated afterwards; the name-to-index map
/// replaces any per-request column materialization.
pub struct ExpectedSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl ExpectedSchema {
    pub fn from_columns(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { columns, index }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// Aligns a complete patient record to the model's expected columns.
///
/// Numeric fields pass through under their own names; each categorical field
/// contributes one `<field>_<code>` indicator. Indicator names outside the
/// schema are dropped, schema columns the record cannot produce stay 0, and
/// the result order is the schema order by construction.
pub fn encode(record: &PatientRecord, schema: &ExpectedSchema) -> Result<Vec<f64>, AppError> {
    if schema.is_empty() {
        return Err(AppError::SchemaMismatch);
    }

    let expansion: Vec<(String, f64)> = vec![
        ("age".to_string(), f64::from(record.age)),
        ("sex".to_string(), f64::from(record.sex)),
        ("trestbps".to_string(), f64::from(record.trestbps)),
        ("chol".to_string(), f64::from(record.chol)),
        ("thalach".to_string(), f64::from(record.thalach)),
        ("oldpeak".to_string(), record.oldpeak),
        (format!("cp_{}", record.cp), 1.0),
        (format!("fbs_{}", record.fbs), 1.0),
        (format!("restecg_{}", record.restecg), 1.0),
        (format!("exang_{}", record.exang), 1.0),
        (format!("slope_{}", record.slope), 1.0),
        (format!("ca_{}", record.ca), 1.0),
        (format!("thal_{}", record.thal), 1.0),
    ];

    let mut row = vec![0.0; schema.len()];
    for (name, value) in expansion {
        if let Some(i) = schema.position(&name) {
            row[i] = value;
        }
    }

    Ok(row)
}
