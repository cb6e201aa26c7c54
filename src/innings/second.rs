use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use super::features::{
    balls_bowled, check_range, current_run_rate, fractional_overs, FeatureRow, INNINGS_BALLS,
    MAX_EXTRA_BALLS, MAX_OVERS, MAX_WICKETS,
};
use super::teams::{City, Team};
use super::{InferenceError, PredictionError, ValidationError};
use crate::models::WinProbabilityModel;

/// How far a model distribution may drift from summing to 1.
const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// Match state part-way through the chase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Innings2Request {
    pub chasing_team: Team,
    pub defending_team: Team,
    pub city: City,
    pub target: u32,
    pub current_score: u32,
    /// Wickets fallen (0–10)
    pub wickets: u32,
    /// Completed overs (0–20)
    pub overs: u32,
    /// Balls into the current over (0–5)
    pub balls: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Innings2Features {
    pub balls_bowled: u32,
    /// Never below 1 so the required rate stays defined.
    pub balls_left: u32,
    pub runs_left: u32,
    pub wickets_left: u32,
    pub fractional_overs: f64,
    pub crr: f64,
    pub rrr: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WinProbability {
    pub chasing_team: Team,
    pub defending_team: Team,
    /// Chasing team win chance, percent
    pub win_pct: f64,
    /// Defending team win chance, percent
    pub loss_pct: f64,
    pub favored: Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChaseOutcome {
    /// Target already reached; the model is not consulted.
    AlreadyWon { team: Team },
    Probability(WinProbability),
}

impl Innings2Request {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chasing_team == self.defending_team {
            return Err(ValidationError::SameChasingAndDefending);
        }
        check_range("wickets", self.wickets, 0, MAX_WICKETS)?;
        check_range("overs", self.overs, 0, MAX_OVERS)?;
        check_range("balls", self.balls, 0, MAX_EXTRA_BALLS)?;
        check_range("target", self.target, 1, u32::MAX)?;
        Ok(())
    }

    pub fn is_chase_complete(&self) -> bool {
        self.current_score >= self.target
    }

    /// Only meaningful while the chase is still on (`current_score < target`).
    pub fn features(&self) -> Innings2Features {
        let bowled = balls_bowled(self.overs, self.balls);
        let balls_left = INNINGS_BALLS.saturating_sub(bowled).max(1);
        let runs_left = self.target.saturating_sub(self.current_score);
        Innings2Features {
            balls_bowled: bowled,
            balls_left,
            runs_left,
            wickets_left: MAX_WICKETS - self.wickets.min(MAX_WICKETS),
            fractional_overs: fractional_overs(self.overs, self.balls),
            crr: current_run_rate(self.current_score, self.overs, self.balls),
            rrr: (runs_left as f64 * 6.0) / balls_left as f64,
        }
    }

    /// The single-row record the win model was trained on. `wickets` carries
    /// wickets in hand, not wickets fallen.
    pub fn feature_row(&self, features: &Innings2Features) -> FeatureRow {
        FeatureRow::new()
            .categorical("batting_team", self.chasing_team.name())
            .categorical("bowling_team", self.defending_team.name())
            .categorical("city", self.city.name())
            .numeric("runs_left", features.runs_left as f64)
            .numeric("balls_left", features.balls_left as f64)
            .numeric("wickets", features.wickets_left as f64)
            .numeric("runs_target", self.target as f64)
            .numeric("CRR", features.crr)
            .numeric("RRR", features.rrr)
    }
}

impl WinProbability {
    /// `distribution` is `[loss, win]` for the chasing team. Ties go to the
    /// defending team.
    pub fn from_distribution(
        chasing_team: Team,
        defending_team: Team,
        distribution: [f64; 2],
    ) -> Result<Self, InferenceError> {
        let [loss, win] = distribution;
        let valid = distribution.iter().all(|p| p.is_finite() && *p >= 0.0)
            && ((loss + win) - 1.0).abs() <= DISTRIBUTION_TOLERANCE;
        if !valid {
            return Err(InferenceError::InvalidDistribution(loss, win));
        }

        let win_pct = win * 100.0;
        let loss_pct = loss * 100.0;
        let favored = if win_pct > loss_pct {
            chasing_team
        } else {
            defending_team
        };
        Ok(WinProbability {
            chasing_team,
            defending_team,
            win_pct,
            loss_pct,
            favored,
        })
    }

    pub fn chasing_favored(&self) -> bool {
        self.favored == self.chasing_team
    }
}

impl fmt::Display for WinProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} likely to win", self.favored)
    }
}

impl fmt::Display for ChaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChaseOutcome::AlreadyWon { team } => write!(f, "{} already won!", team),
            ChaseOutcome::Probability(p) => fmt::Display::fmt(p, f),
        }
    }
}

/// Validate, short-circuit a completed chase, otherwise derive features and
/// ask the win model for the chasing team's odds.
pub fn predict_second_innings(
    request: &Innings2Request,
    model: &dyn WinProbabilityModel,
) -> Result<ChaseOutcome, PredictionError> {
    if let Err(e) = request.validate() {
        warn!("Rejected second-innings request: {}", e);
        return Err(e.into());
    }

    if request.is_chase_complete() {
        info!(
            "{} reached {} chasing {}; no model call",
            request.chasing_team, request.current_score, request.target
        );
        return Ok(ChaseOutcome::AlreadyWon {
            team: request.chasing_team,
        });
    }

    let features = request.features();
    debug!(
        runs_left = features.runs_left,
        balls_left = features.balls_left,
        wickets_left = features.wickets_left,
        crr = features.crr,
        rrr = features.rrr,
        "Derived second-innings features"
    );

    let row = request.feature_row(&features);
    let distribution = model.predict_distribution(&row)?;
    let probability =
        WinProbability::from_distribution(request.chasing_team, request.defending_team, distribution)?;

    info!(
        "{} chasing {} vs {}: win {:.2}% / loss {:.2}% ({})",
        request.chasing_team,
        request.target,
        request.defending_team,
        probability.win_pct,
        probability.loss_pct,
        model.name()
    );
    Ok(ChaseOutcome::Probability(probability))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::StubWinModel;
    use approx::assert_relative_eq;

    fn request(target: u32, score: u32, wickets: u32, overs: u32, balls: u32) -> Innings2Request {
        Innings2Request {
            chasing_team: Team::RajasthanRoyals,
            defending_team: Team::SunrisersHyderabad,
            city: City::Jaipur,
            target,
            current_score: score,
            wickets,
            overs,
            balls,
        }
    }

    #[test]
    fn test_example_fifteen_overs() {
        let f = request(180, 100, 3, 15, 0).features();
        assert_eq!(f.runs_left, 80);
        assert_eq!(f.balls_bowled, 90);
        assert_eq!(f.balls_left, 30);
        assert_eq!(f.wickets_left, 7);
        assert_relative_eq!(f.crr, 100.0 / 15.0, epsilon = 1e-12);
        assert_relative_eq!(f.rrr, 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_example_row_reaches_model() {
        let model = StubWinModel::new([0.8, 0.2]);
        predict_second_innings(&request(180, 100, 3, 15, 0), &model).unwrap();

        let row = model.last_row().expect("model should have been called");
        assert_eq!(
            row.column_names(),
            vec![
                "batting_team",
                "bowling_team",
                "city",
                "runs_left",
                "balls_left",
                "wickets",
                "runs_target",
                "CRR",
                "RRR"
            ]
        );
        assert_eq!(row.categorical_value("batting_team"), Some("Rajasthan Royals"));
        assert_eq!(row.categorical_value("bowling_team"), Some("Sunrisers Hyderabad"));
        assert_eq!(row.categorical_value("city"), Some("Jaipur"));
        assert_eq!(row.numeric_value("runs_left"), Some(80.0));
        assert_eq!(row.numeric_value("balls_left"), Some(30.0));
        assert_eq!(row.numeric_value("wickets"), Some(7.0));
        assert_eq!(row.numeric_value("runs_target"), Some(180.0));
        assert_relative_eq!(row.numeric_value("CRR").unwrap(), 6.666_666_666_666_667, epsilon = 1e-12);
        assert_eq!(row.numeric_value("RRR"), Some(16.0));
    }

    #[test]
    fn test_rrr_formula() {
        // 60 needed off 30 balls
        let f = request(160, 100, 3, 15, 0).features();
        assert_eq!(f.runs_left, 60);
        assert_eq!(f.balls_left, 30);
        assert_relative_eq!(f.rrr, 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_balls_left_floor_of_one() {
        let f = request(180, 170, 5, 20, 0).features();
        assert_eq!(f.balls_left, 1);
        assert_relative_eq!(f.rrr, 60.0, epsilon = 1e-12);

        for overs in 0..=MAX_OVERS {
            for balls in 0..=MAX_EXTRA_BALLS {
                assert!(request(180, 100, 3, overs, balls).features().balls_left >= 1);
            }
        }
    }

    #[test]
    fn test_already_won_skips_model() {
        let model = StubWinModel::new([0.5, 0.5]);
        for score in [180, 181, 250] {
            let outcome = predict_second_innings(&request(180, score, 3, 18, 2), &model).unwrap();
            assert_eq!(
                outcome,
                ChaseOutcome::AlreadyWon {
                    team: Team::RajasthanRoyals
                }
            );
            assert_eq!(outcome.to_string(), "Rajasthan Royals already won!");
        }
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn test_same_teams_rejected_before_short_circuit() {
        let model = StubWinModel::new([0.5, 0.5]);
        let mut req = request(180, 190, 3, 18, 0);
        req.defending_team = Team::RajasthanRoyals;
        let err = predict_second_innings(&req, &model).unwrap_err();
        assert_eq!(
            err,
            PredictionError::Validation(ValidationError::SameChasingAndDefending)
        );
        assert_eq!(err.to_string(), "Teams must be different");
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn test_zero_target_rejected() {
        let model = StubWinModel::new([0.5, 0.5]);
        assert!(matches!(
            predict_second_innings(&request(0, 0, 0, 0, 0), &model),
            Err(PredictionError::Validation(ValidationError::OutOfRange { field: "target", .. }))
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let model = StubWinModel::new([0.5, 0.5]);
        assert!(matches!(
            predict_second_innings(&request(180, 100, 11, 15, 0), &model),
            Err(PredictionError::Validation(ValidationError::OutOfRange { field: "wickets", .. }))
        ));
        assert!(matches!(
            predict_second_innings(&request(180, 100, 3, 21, 0), &model),
            Err(PredictionError::Validation(ValidationError::OutOfRange { field: "overs", .. }))
        ));
        assert!(matches!(
            predict_second_innings(&request(180, 100, 3, 15, 6), &model),
            Err(PredictionError::Validation(ValidationError::OutOfRange { field: "balls", .. }))
        ));
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn test_distribution_order_preserved() {
        let model = StubWinModel::new([0.25, 0.75]);
        let outcome = predict_second_innings(&request(180, 100, 3, 15, 0), &model).unwrap();
        let ChaseOutcome::Probability(p) = outcome else {
            panic!("expected a probability, got {:?}", outcome);
        };
        assert_relative_eq!(p.win_pct, 75.0, epsilon = 1e-9);
        assert_relative_eq!(p.loss_pct, 25.0, epsilon = 1e-9);
        assert_eq!(p.favored, Team::RajasthanRoyals);
        assert!(p.chasing_favored());
        assert_eq!(p.to_string(), "Rajasthan Royals likely to win");
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        for win in [0.0, 0.013, 0.3, 0.5, 0.77, 1.0] {
            let p = WinProbability::from_distribution(
                Team::DelhiCapitals,
                Team::PunjabKings,
                [1.0 - win, win],
            )
            .unwrap();
            assert_relative_eq!(p.win_pct + p.loss_pct, 100.0, epsilon = 1e-9);
            assert!((0.0..=100.0).contains(&p.win_pct));
            assert!((0.0..=100.0).contains(&p.loss_pct));
        }
    }

    #[test]
    fn test_tie_goes_to_defending_team() {
        let model = StubWinModel::new([0.5, 0.5]);
        let outcome = predict_second_innings(&request(180, 100, 3, 15, 0), &model).unwrap();
        let ChaseOutcome::Probability(p) = outcome else {
            panic!("expected a probability, got {:?}", outcome);
        };
        assert_eq!(p.favored, Team::SunrisersHyderabad);
        assert!(!p.chasing_favored());
    }

    #[test]
    fn test_invalid_distribution_is_inference_error() {
        for bad in [[0.7, 0.7], [f64::NAN, 0.5], [-0.2, 1.2]] {
            let model = StubWinModel::new(bad);
            let err = predict_second_innings(&request(180, 100, 3, 15, 0), &model).unwrap_err();
            assert!(matches!(
                err,
                PredictionError::Inference(InferenceError::InvalidDistribution(_, _))
            ));
        }
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let won = ChaseOutcome::AlreadyWon {
            team: Team::GujaratTitans,
        };
        let json = serde_json::to_value(won).unwrap();
        assert_eq!(json["status"], "already_won");
        assert_eq!(json["team"], "Gujarat Titans");
    }
}
