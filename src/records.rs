use polars::prelude::{DataType, Field, Schema};

use crate::error::AppError;

pub struct HeartRecord {}

impl HeartRecord {
    pub const RAW_COLUMNS: [&'static str; 14] = [
        "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
        "slope", "ca", "thal", "target",
    ];

    pub fn raw_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("age", DataType::Int32),
            Field::new("sex", DataType::Int32),
            Field::new("cp", DataType::Int32),
            Field::new("trestbps", DataType::Int32),
            Field::new("chol", DataType::Int32),
            Field::new("fbs", DataType::Int32),
            Field::new("restecg", DataType::Int32),
            Field::new("thalach", DataType::Int32),
            Field::new("exang", DataType::Int32),
            Field::new("oldpeak", DataType::Float64),
            Field::new("slope", DataType::Int32),
            Field::new("ca", DataType::Int32),
            Field::new("thal", DataType::Int32),
            Field::new("target", DataType::Int32),
        ])
    }
}

/// One patient submission with every field filled in. Categorical fields
/// carry the numeric codes mapped by the form, not display labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub age: u32,
    pub sex: i32,
    pub cp: i32,
    pub trestbps: u32,
    pub chol: u32,
    pub fbs: i32,
    pub restecg: i32,
    pub thalach: u32,
    pub exang: i32,
    pub oldpeak: f64,
    pub slope: i32,
    pub ca: i32,
    pub thal: i32,
}

/// The form state as collected: any field the user skipped stays `None`.
#[derive(Debug, Clone, Default)]
pub struct PatientDraft {
    pub age: Option<u32>,
    pub sex: Option<i32>,
    pub cp: Option<i32>,
    pub trestbps: Option<u32>,
    pub chol: Option<u32>,
    pub fbs: Option<i32>,
    pub restecg: Option<i32>,
    pub thalach: Option<u32>,
    pub exang: Option<i32>,
    pub oldpeak: Option<f64>,
    pub slope: Option<i32>,
    pub ca: Option<i32>,
    pub thal: Option<i32>,
}

impl PatientDraft {
    /// The only way to obtain a `PatientRecord`: fails with
    /// `IncompleteInput` when any field is still unset, so incomplete
    /// submissions can never reach the encoder.
    pub fn complete(self) -> Result<PatientRecord, AppError> {
        match (
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ) {
            (
                Some(age),
                Some(sex),
                Some(cp),
                Some(trestbps),
                Some(chol),
                Some(fbs),
                Some(restecg),
                Some(thalach),
                Some(exang),
                Some(oldpeak),
                Some(slope),
                Some(ca),
                Some(thal),
            ) => Ok(PatientRecord {
                age,
                sex,
                cp,
                trestbps,
                chol,
                fbs,
                restecg,
                thalach,
                exang,
                oldpeak,
                slope,
                ca,
                thal,
            }),
            _ => Err(AppError::IncompleteInput),
        }
    }
}
