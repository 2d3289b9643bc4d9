//! Conversation step enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position in the linear conversation state machine.
///
/// Transitions are monotonic along the declared order, with one loop-back
/// edge from `PreferencesCollected` to `CollectCountry`. There is no
/// terminal step; `PreferencesCollected` is a stable absorbing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Greeting,
    Name,
    Email,
    Otp,
    Verified,
    CollectCountry,
    CollectDuration,
    CollectLevel,
    CollectCourse,
    PreferencesCollected,
}

impl Step {
    /// Returns the wire name of the step.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Greeting => "greeting",
            Step::Name => "name",
            Step::Email => "email",
            Step::Otp => "otp",
            Step::Verified => "verified",
            Step::CollectCountry => "collect_country",
            Step::CollectDuration => "collect_duration",
            Step::CollectLevel => "collect_level",
            Step::CollectCourse => "collect_course",
            Step::PreferencesCollected => "preferences_collected",
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Step::Greeting
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a persisted step string is not recognized.
///
/// Callers treat the owning session as corrupt and start a fresh one;
/// unknown steps are never dispatched to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStep(pub String);

impl fmt::Display for UnknownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown step: {}", self.0)
    }
}

impl std::error::Error for UnknownStep {}

impl FromStr for Step {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greeting" => Ok(Step::Greeting),
            "name" => Ok(Step::Name),
            "email" => Ok(Step::Email),
            "otp" => Ok(Step::Otp),
            "verified" => Ok(Step::Verified),
            "collect_country" => Ok(Step::CollectCountry),
            "collect_duration" => Ok(Step::CollectDuration),
            "collect_level" => Ok(Step::CollectLevel),
            "collect_course" => Ok(Step::CollectCourse),
            "preferences_collected" => Ok(Step::PreferencesCollected),
            other => Err(UnknownStep(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Step; 10] = [
        Step::Greeting,
        Step::Name,
        Step::Email,
        Step::Otp,
        Step::Verified,
        Step::CollectCountry,
        Step::CollectDuration,
        Step::CollectLevel,
        Step::CollectCourse,
        Step::PreferencesCollected,
    ];

    #[test]
    fn default_step_is_greeting() {
        assert_eq!(Step::default(), Step::Greeting);
    }

    #[test]
    fn every_step_round_trips_through_str() {
        for step in ALL {
            assert_eq!(step.as_str().parse::<Step>().unwrap(), step);
        }
    }

    #[test]
    fn unknown_step_fails_to_parse() {
        let err = "collect_budget".parse::<Step>().unwrap_err();
        assert_eq!(err.0, "collect_budget");
    }

    #[test]
    fn serde_uses_snake_case_wire_names() {
        let json = serde_json::to_string(&Step::PreferencesCollected).unwrap();
        assert_eq!(json, "\"preferences_collected\"");
        let back: Step = serde_json::from_str("\"collect_country\"").unwrap();
        assert_eq!(back, Step::CollectCountry);
    }
}
