//! Model artifact loading and the prediction service.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::DecisionTreeClassifier;

use crate::error::AppError;

pub type Tree = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// The serialized artifact: the ordered feature columns the forest was
/// trained on, plus the ensemble itself stored tree by tree so class
/// probabilities can be derived from the vote fraction.
#[derive(Debug, Serialize, Deserialize)]
pub struct RandomForestModel {
    pub feature_names: Vec<String>,
    pub trees: Vec<Tree>,
}

pub async fn load_model<P: AsRef<Path>>(path: P) -> Result<RandomForestModel, AppError> {
    let path = path.as_ref();
    let missing = |detail: String| AppError::MissingArtifact {
        path: path.to_path_buf(),
        detail,
    };

    let file = File::open(path).map_err(|e| missing(e.to_string()))?;
    let model: RandomForestModel =
        serde_json::from_reader(file).map_err(|e| missing(e.to_string()))?;
    if model.trees.is_empty() {
        return Err(missing("artifact contains no trees".to_string()));
    }
    Ok(model)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// 1 = disease detected, 0 = not detected.
    pub label: i32,
    /// Probability of the returned label.
    pub probability: f64,
}

pub struct PredictionService {
    model: RandomForestModel,
}

impl PredictionService {
    pub fn new(model: RandomForestModel) -> Self {
        Self { model }
    }

    /// Scores one schema-aligned vector. A vector of the wrong width is
    /// rejected before it reaches the trees, so a submission can never take
    /// the session down.
    pub fn predict(&self, vector: &[f64]) -> Result<Prediction, AppError> {
        let expected = self.model.feature_names.len();
        if vector.len() != expected {
            return Err(AppError::Prediction(format!(
                "X has {} features, but the model expects {} features as input",
                vector.len(),
                expected
            )));
        }

        let row = DenseMatrix::new(1, vector.len(), vector.to_vec(), false);
        let mut votes = 0usize;
        for tree in &self.model.trees {
            let yhat = tree
                .predict(&row)
                .map_err(|e| AppError::Prediction(e.to_string()))?;
            if yhat[0] == 1 {
                votes += 1;
            }
        }

        let total = self.model.trees.len();
        let p1 = votes as f64 / total as f64;
        // Majority vote; ties go to the negative class.
        let (label, probability) = if votes * 2 > total {
            (1, p1)
        } else {
            (0, 1.0 - p1)
        };
        Ok(Prediction { label, probability })
    }
}
