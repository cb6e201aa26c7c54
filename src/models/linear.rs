//! Bundled inference backend: one-hot categorical weights plus linear terms.
//!
//! Artifact layout (JSON):
//!
//! ```json
//! {
//!   "name": "innings1-linear",
//!   "intercept": 12.0,
//!   "categorical": { "batting_team": { "Mumbai Indians": 4.2 } },
//!   "numeric": { "current_score": 1.0, "CRR": 1.5 }
//! }
//! ```
//!
//! A category missing from its column's table contributes nothing, the same
//! as a one-hot encoder that ignores unknown values. A row column with no
//! entry in either table is rejected.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{ScoreModel, WinProbabilityModel};
use crate::innings::{FeatureRow, FeatureValue, InferenceError};

#[derive(Debug, Clone, Deserialize)]
pub struct LinearArtifact {
    pub name: String,
    pub intercept: f64,
    #[serde(default)]
    pub categorical: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    pub numeric: HashMap<String, f64>,
}

impl LinearArtifact {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let artifact: LinearArtifact =
            serde_json::from_str(&raw).context("Failed to parse model artifact")?;
        if !artifact.intercept.is_finite() {
            anyhow::bail!("artifact '{}' has a non-finite intercept", artifact.name);
        }
        Ok(artifact)
    }

    /// Intercept plus the weighted contribution of every column in the row.
    pub fn linear_predictor(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let mut z = self.intercept;
        for (column, value) in row.columns() {
            match value {
                FeatureValue::Categorical(category) => {
                    let weights = match self.categorical.get(column) {
                        Some(w) => w,
                        None => return Err(self.missing(column, false)),
                    };
                    z += weights.get(category).copied().unwrap_or(0.0);
                }
                FeatureValue::Numeric(x) => {
                    let coef = match self.numeric.get(column) {
                        Some(c) => *c,
                        None => return Err(self.missing(column, true)),
                    };
                    z += coef * x;
                }
            }
        }
        if z.is_finite() {
            Ok(z)
        } else {
            Err(InferenceError::NonFinite(z))
        }
    }

    /// Tell apart a column of the wrong kind from one the artifact never
    /// heard of.
    fn missing(&self, column: &str, got_numeric: bool) -> InferenceError {
        let (known_elsewhere, kind) = if got_numeric {
            (self.categorical.contains_key(column), "a category")
        } else {
            (self.numeric.contains_key(column), "a number")
        };
        if known_elsewhere {
            InferenceError::ColumnKind {
                model: self.name.clone(),
                column: column.to_string(),
                kind,
            }
        } else {
            InferenceError::UnknownColumn {
                model: self.name.clone(),
                column: column.to_string(),
            }
        }
    }
}

/// Linear regression on the first-innings record.
pub struct LinearScoreModel {
    artifact: LinearArtifact,
}

impl LinearScoreModel {
    pub fn new(artifact: LinearArtifact) -> Self {
        LinearScoreModel { artifact }
    }
}

impl ScoreModel for LinearScoreModel {
    fn predict_score(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        self.artifact.linear_predictor(row)
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }
}

/// Logistic regression on the chase record; class 1 is a chasing-team win.
pub struct LogisticWinModel {
    artifact: LinearArtifact,
}

impl LogisticWinModel {
    pub fn new(artifact: LinearArtifact) -> Self {
        LogisticWinModel { artifact }
    }
}

impl WinProbabilityModel for LogisticWinModel {
    fn predict_distribution(&self, row: &FeatureRow) -> Result<[f64; 2], InferenceError> {
        let p = sigmoid(self.artifact.linear_predictor(row)?);
        Ok([1.0 - p, p])
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}
