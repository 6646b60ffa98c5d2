use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::data::model::{Feature, Label};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Artifact schema
// ---------------------------------------------------------------------------

/// Kernel of a trained support vector classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { gamma: f64, coef0: f64, degree: u32 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    fn apply(&self, a: &[f64], b: &[f64]) -> f64 {
        match *self {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf { gamma } => {
                let sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * sq).exp()
            }
            Kernel::Poly {
                gamma,
                coef0,
                degree,
            } => (gamma * dot(a, b) + coef0).powi(degree as i32),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
        }
    }

    fn params_finite(&self) -> bool {
        match *self {
            Kernel::Linear => true,
            Kernel::Rbf { gamma } => gamma.is_finite(),
            Kernel::Poly { gamma, coef0, .. } | Kernel::Sigmoid { gamma, coef0 } => {
                gamma.is_finite() && coef0.is_finite()
            }
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Standardisation applied before the kernel: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// A binary support vector classifier exported from the training notebook.
///
/// ```json
/// {
///   "feature_order": ["ALLSKY_KT", "T2M", "TS", "PRECTOTCORR", "PS", "WS10M"],
///   "scaler": { "mean": [...], "scale": [...] },
///   "kernel": { "type": "rbf", "gamma": 0.1667 },
///   "support_vectors": [[...], ...],
///   "dual_coef": [...],
///   "intercept": -0.41
/// }
/// ```
///
/// A positive decision value means potential upwelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmModel {
    pub feature_order: Vec<Feature>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl SvmModel {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let model: SvmModel = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    /// Check that every array agrees with `feature_order`.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(DashboardError::InvalidModel(msg)) };
        let n = self.feature_order.len();

        if n == 0 {
            return invalid("feature_order is empty".into());
        }
        let unique: BTreeSet<_> = self.feature_order.iter().collect();
        if unique.len() != n {
            return invalid("feature_order lists a feature twice".into());
        }
        if self.support_vectors.is_empty() {
            return invalid("no support vectors".into());
        }
        if let Some(i) = self.support_vectors.iter().position(|sv| sv.len() != n) {
            return invalid(format!(
                "support vector {i} has {} values, expected {n}",
                self.support_vectors[i].len()
            ));
        }
        if self.dual_coef.len() != self.support_vectors.len() {
            return invalid(format!(
                "{} dual coefficients for {} support vectors",
                self.dual_coef.len(),
                self.support_vectors.len()
            ));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return invalid(format!("scaler does not have {n} entries"));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return invalid("scaler has a zero or non-finite scale".into());
            }
        }
        let all_finite = self.intercept.is_finite()
            && self.kernel.params_finite()
            && self.dual_coef.iter().all(|c| c.is_finite())
            && self.support_vectors.iter().flatten().all(|v| v.is_finite());
        if !all_finite {
            return invalid("artifact contains non-finite numbers".into());
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Evaluation
    // -----------------------------------------------------------------------

    /// Signed distance from the separating surface.
    pub fn decision_function(&self, features: &[f64]) -> Result<f64> {
        let expected = self.feature_order.len();
        if features.len() != expected {
            return Err(DashboardError::FeatureCount {
                expected,
                found: features.len(),
            });
        }
        if let Some(i) = features.iter().position(|v| !v.is_finite()) {
            return Err(DashboardError::NonFiniteFeature(i));
        }

        let x: Vec<f64> = match &self.scaler {
            Some(s) => features
                .iter()
                .zip(s.mean.iter().zip(&s.scale))
                .map(|(v, (m, sc))| (v - m) / sc)
                .collect(),
            None => features.to_vec(),
        };

        let sum: f64 = self
            .support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, c)| c * self.kernel.apply(sv, &x))
            .sum();
        Ok(sum + self.intercept)
    }
}

impl Classifier for SvmModel {
    fn feature_order(&self) -> &[Feature] {
        &self.feature_order
    }

    fn classify(&self, features: &[f64]) -> Result<Label> {
        let decision = self.decision_function(features)?;
        Ok(if decision > 0.0 {
            Label::PotentialUpwelling
        } else {
            Label::NoPotentialUpwelling
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: &str = r#"{
        "feature_order": ["PRECTOTCORR", "WS10M"],
        "kernel": { "type": "linear" },
        "support_vectors": [[1.0, 0.0], [0.0, 1.0]],
        "dual_coef": [1.0, -1.0],
        "intercept": 0.0
    }"#;

    #[test]
    fn linear_kernel_sign_decides_label() {
        let model = SvmModel::from_json(LINEAR).unwrap();
        // decision = precip - wind
        assert_eq!(model.decision_function(&[3.0, 1.0]).unwrap(), 2.0);
        assert_eq!(model.classify(&[3.0, 1.0]).unwrap(), Label::PotentialUpwelling);
        assert_eq!(model.classify(&[0.5, 2.0]).unwrap(), Label::NoPotentialUpwelling);
    }

    #[test]
    fn zero_decision_is_negative_class() {
        let model = SvmModel::from_json(LINEAR).unwrap();
        assert_eq!(model.classify(&[1.0, 1.0]).unwrap(), Label::NoPotentialUpwelling);
    }

    #[test]
    fn rbf_kernel_with_scaler() {
        let json = r#"{
            "feature_order": ["T2M"],
            "scaler": { "mean": [20.0], "scale": [2.0] },
            "kernel": { "type": "rbf", "gamma": 1.0 },
            "support_vectors": [[0.0]],
            "dual_coef": [2.0],
            "intercept": -1.0
        }"#;
        let model = SvmModel::from_json(json).unwrap();
        // x' = 0 → K = 1 → 2 - 1 = 1
        let at_mean = model.decision_function(&[20.0]).unwrap();
        assert!((at_mean - 1.0).abs() < 1e-12);
        // x' = 1 → K = e^-1 → 2e^-1 - 1 < 0
        assert_eq!(model.classify(&[22.0]).unwrap(), Label::NoPotentialUpwelling);
    }

    #[test]
    fn poly_kernel() {
        let json = r#"{
            "feature_order": ["PS"],
            "kernel": { "type": "poly", "gamma": 1.0, "coef0": 1.0, "degree": 2 },
            "support_vectors": [[1.0]],
            "dual_coef": [1.0],
            "intercept": 0.0
        }"#;
        let model = SvmModel::from_json(json).unwrap();
        assert_eq!(model.decision_function(&[2.0]).unwrap(), 9.0);
    }

    #[test]
    fn wrong_vector_length_is_rejected() {
        let model = SvmModel::from_json(LINEAR).unwrap();
        let err = model.classify(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::FeatureCount {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let model = SvmModel::from_json(LINEAR).unwrap();
        let err = model.classify(&[1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, DashboardError::NonFiniteFeature(1)));
    }

    #[test]
    fn inconsistent_artifacts_are_rejected() {
        let cases = [
            // duplicated feature
            r#"{"feature_order":["PS","PS"],"kernel":{"type":"linear"},
                "support_vectors":[[1,1]],"dual_coef":[1],"intercept":0}"#,
            // support vector too short
            r#"{"feature_order":["PS","TS"],"kernel":{"type":"linear"},
                "support_vectors":[[1]],"dual_coef":[1],"intercept":0}"#,
            // coefficient count mismatch
            r#"{"feature_order":["PS"],"kernel":{"type":"linear"},
                "support_vectors":[[1]],"dual_coef":[1,2],"intercept":0}"#,
            // zero scale
            r#"{"feature_order":["PS"],"scaler":{"mean":[0],"scale":[0]},
                "kernel":{"type":"linear"},"support_vectors":[[1]],
                "dual_coef":[1],"intercept":0}"#,
        ];
        for json in cases {
            assert!(
                matches!(SvmModel::from_json(json), Err(DashboardError::InvalidModel(_))),
                "accepted: {json}"
            );
        }
    }

    #[test]
    fn unknown_feature_name_is_a_json_error() {
        let json = r#"{"feature_order":["RH2M"],"kernel":{"type":"linear"},
            "support_vectors":[[1]],"dual_coef":[1],"intercept":0}"#;
        assert!(matches!(
            SvmModel::from_json(json),
            Err(DashboardError::Json(_))
        ));
    }
}
