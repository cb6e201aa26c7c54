//! One-row tabular records handed to the models, plus the over arithmetic
//! shared by both innings.

use serde::Serialize;

/// Balls in a full T20 innings.
pub const INNINGS_BALLS: u32 = 120;
pub const BALLS_PER_OVER: u32 = 6;
pub const MAX_OVERS: u32 = 20;
pub const MAX_EXTRA_BALLS: u32 = 5;
pub const MAX_WICKETS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Categorical(String),
    Numeric(f64),
}

/// Ordered named columns of a single-row record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureRow {
    columns: Vec<(&'static str, FeatureValue)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categorical(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.columns
            .push((column, FeatureValue::Categorical(value.into())));
        self
    }

    pub fn numeric(mut self, column: &'static str, value: f64) -> Self {
        self.columns.push((column, FeatureValue::Numeric(value)));
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        self.columns.iter().map(|(name, value)| (*name, value))
    }
}

/// Lookups for asserting on the record a model received.
#[cfg(test)]
impl FeatureRow {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(name, _)| *name).collect()
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn numeric_value(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            FeatureValue::Numeric(v) => Some(*v),
            FeatureValue::Categorical(_) => None,
        }
    }

    pub fn categorical_value(&self, column: &str) -> Option<&str> {
        match self.get(column)? {
            FeatureValue::Categorical(v) => Some(v.as_str()),
            FeatureValue::Numeric(_) => None,
        }
    }
}

pub fn balls_bowled(overs: u32, balls: u32) -> u32 {
    overs * BALLS_PER_OVER + balls
}

/// Overs faced written the scorecard way: 10.3 means ten overs and three
/// balls. The models were trained on this value, not on true over fractions.
pub fn fractional_overs(overs: u32, balls: u32) -> f64 {
    overs as f64 + balls as f64 / 10.0
}

/// Runs per scorecard over, 0 before the first ball.
pub fn current_run_rate(score: u32, overs: u32, balls: u32) -> f64 {
    let faced = fractional_overs(overs, balls);
    if faced > 0.0 {
        score as f64 / faced
    } else {
        0.0
    }
}

pub(crate) fn check_range(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), super::ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(super::ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}
