use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::innings::{FeatureRow, InferenceError};

pub mod linear;

pub use linear::{LinearArtifact, LinearScoreModel, LogisticWinModel};

/// Point-estimate regressor for the first-innings final score.
pub trait ScoreModel: Send + Sync {
    fn predict_score(&self, row: &FeatureRow) -> Result<f64, InferenceError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Two-class classifier for the chase. Returns `[loss, win]` from the
/// chasing team's point of view.
pub trait WinProbabilityModel: Send + Sync {
    fn predict_distribution(&self, row: &FeatureRow) -> Result<[f64; 2], InferenceError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Both model handles, loaded once at startup and shared read-only.
#[derive(Clone)]
pub struct ModelRegistry {
    pub score: Arc<dyn ScoreModel>,
    pub win: Arc<dyn WinProbabilityModel>,
}

impl ModelRegistry {
    pub fn new(score: Arc<dyn ScoreModel>, win: Arc<dyn WinProbabilityModel>) -> Self {
        ModelRegistry { score, win }
    }

    /// Load the bundled coefficient artifacts from disk.
    pub fn load(score_path: impl AsRef<Path>, win_path: impl AsRef<Path>) -> Result<Self> {
        let score_path = score_path.as_ref();
        let win_path = win_path.as_ref();

        let score = LinearArtifact::from_file(score_path)
            .with_context(|| format!("Failed to load score model {}", score_path.display()))?;
        let win = LinearArtifact::from_file(win_path)
            .with_context(|| format!("Failed to load win model {}", win_path.display()))?;

        let score = LinearScoreModel::new(score);
        let win = LogisticWinModel::new(win);
        info!("Loaded score model '{}' from {}", score.name(), score_path.display());
        info!("Loaded win model '{}' from {}", win.name(), win_path.display());

        Ok(Self::new(Arc::new(score), Arc::new(win)))
    }
}

#[cfg(test)]
pub mod testing {
    //! Recording doubles for the model traits.

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub struct StubScoreModel {
        output: f64,
        calls: AtomicUsize,
        last_row: Mutex<Option<FeatureRow>>,
    }

    impl StubScoreModel {
        pub fn new(output: f64) -> Self {
            StubScoreModel {
                output,
                calls: AtomicUsize::new(0),
                last_row: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_row(&self) -> Option<FeatureRow> {
            self.last_row.lock().unwrap().clone()
        }
    }

    impl ScoreModel for StubScoreModel {
        fn predict_score(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_row.lock().unwrap() = Some(row.clone());
            Ok(self.output)
        }

        fn name(&self) -> &str {
            "stub-score"
        }
    }

    pub struct StubWinModel {
        output: [f64; 2],
        calls: AtomicUsize,
        last_row: Mutex<Option<FeatureRow>>,
    }

    impl StubWinModel {
        pub fn new(output: [f64; 2]) -> Self {
            StubWinModel {
                output,
                calls: AtomicUsize::new(0),
                last_row: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_row(&self) -> Option<FeatureRow> {
            self.last_row.lock().unwrap().clone()
        }
    }

    impl WinProbabilityModel for StubWinModel {
        fn predict_distribution(&self, row: &FeatureRow) -> Result<[f64; 2], InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_row.lock().unwrap() = Some(row.clone());
            Ok(self.output)
        }

        fn name(&self) -> &str {
            "stub-win"
        }
    }
}
