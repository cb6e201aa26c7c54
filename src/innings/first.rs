use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use super::features::{
    balls_bowled, check_range, current_run_rate, fractional_overs, FeatureRow, INNINGS_BALLS,
    MAX_EXTRA_BALLS, MAX_OVERS, MAX_WICKETS,
};
use super::teams::{Team, TossDecision};
use super::{InferenceError, PredictionError, ValidationError};
use crate::models::ScoreModel;

/// Half-width of the range shown around the predicted score. Cosmetic, not a
/// confidence interval.
pub const DISPLAY_BAND: i64 = 10;

/// Match state part-way through the first innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Innings1Request {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub toss_winner: Team,
    pub toss_decision: TossDecision,
    pub current_score: u32,
    /// Wickets fallen (0–10)
    pub wickets: u32,
    /// Completed overs (0–20)
    pub overs: u32,
    /// Balls into the current over (0–5)
    pub balls: u32,
}

/// Values derived from an [`Innings1Request`] before they reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Innings1Features {
    pub balls_bowled: u32,
    pub balls_left: u32,
    pub overs_left: f64,
    pub fractional_overs: f64,
    pub crr: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScorePrediction {
    pub score: i64,
    pub low: i64,
    pub high: i64,
}

impl Innings1Request {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.batting_team == self.bowling_team {
            return Err(ValidationError::SameBattingAndBowling);
        }
        check_range("wickets", self.wickets, 0, MAX_WICKETS)?;
        check_range("overs", self.overs, 0, MAX_OVERS)?;
        check_range("balls", self.balls, 0, MAX_EXTRA_BALLS)?;
        Ok(())
    }

    pub fn features(&self) -> Innings1Features {
        let bowled = balls_bowled(self.overs, self.balls);
        let balls_left = INNINGS_BALLS.saturating_sub(bowled);
        Innings1Features {
            balls_bowled: bowled,
            balls_left,
            overs_left: balls_left as f64 / 6.0,
            fractional_overs: fractional_overs(self.overs, self.balls),
            crr: current_run_rate(self.current_score, self.overs, self.balls),
        }
    }

    /// The single-row record the score model was trained on. Column names
    /// and order are fixed by the model.
    pub fn feature_row(&self, features: &Innings1Features) -> FeatureRow {
        FeatureRow::new()
            .categorical("batting_team", self.batting_team.name())
            .categorical("bowling_team", self.bowling_team.name())
            .categorical("toss_winner", self.toss_winner.name())
            .categorical("toss_decision", self.toss_decision.name())
            .numeric("Overs_left", features.overs_left)
            .numeric("balls_left", features.balls_left as f64)
            .numeric("current_score", self.current_score as f64)
            .numeric("wickets", self.wickets as f64)
            .numeric("CRR", features.crr)
    }
}

impl ScorePrediction {
    /// Truncates toward zero; 157.9 becomes 157.
    pub fn from_raw(raw: f64) -> Result<Self, InferenceError> {
        if !raw.is_finite() {
            return Err(InferenceError::NonFinite(raw));
        }
        // The cast saturates, so a huge output lands on i64::MIN/MAX and the
        // band no longer fits.
        let score = raw.trunc() as i64;
        match (
            score.checked_sub(DISPLAY_BAND),
            score.checked_add(DISPLAY_BAND),
        ) {
            (Some(low), Some(high)) => Ok(ScorePrediction { score, low, high }),
            _ => Err(InferenceError::ScoreOutOfRange(raw)),
        }
    }

    pub fn range_label(&self) -> String {
        format!("Estimated Range: {} – {}", self.low, self.high)
    }
}

impl fmt::Display for ScorePrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicted Final Score: {}", self.score)
    }
}

/// Validate, derive features, and ask the score model for the final total.
pub fn predict_first_innings(
    request: &Innings1Request,
    model: &dyn ScoreModel,
) -> Result<ScorePrediction, PredictionError> {
    if let Err(e) = request.validate() {
        warn!("Rejected first-innings request: {}", e);
        return Err(e.into());
    }

    let features = request.features();
    debug!(
        balls_bowled = features.balls_bowled,
        balls_left = features.balls_left,
        overs_left = features.overs_left,
        crr = features.crr,
        "Derived first-innings features"
    );

    let row = request.feature_row(&features);
    let raw = model.predict_score(&row)?;
    let prediction = ScorePrediction::from_raw(raw)?;

    info!(
        "{} vs {}: {}/{} after {}.{} → predicted {} ({})",
        request.batting_team,
        request.bowling_team,
        request.current_score,
        request.wickets,
        request.overs,
        request.balls,
        prediction.score,
        model.name()
    );
    Ok(prediction)
}
