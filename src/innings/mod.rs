//! Feature derivation and decision logic for both innings.
//!
//! Each unit is a plain request → result function: validate, derive the
//! model's feature record, run one inference call, and shape the answer for
//! display. Nothing is kept between calls.

pub mod error;
pub mod features;
pub mod first;
pub mod second;
pub mod teams;

pub use error::{InferenceError, PredictionError, ValidationError};
pub use features::{FeatureRow, FeatureValue};
pub use first::{predict_first_innings, Innings1Request, ScorePrediction};
pub use second::{predict_second_innings, ChaseOutcome, Innings2Request};
pub use teams::{City, Team, TossDecision};
