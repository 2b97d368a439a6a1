pub mod catalog;
pub mod script;

use serde::Serialize;
use std::time::{Duration, Instant};

pub use catalog::{catalog_scenarios, find_catalog_scenario};
pub use script::{ScriptError, ScriptScenario, load_script};

/// Synchronous check against the engine.
pub type Check = fn() -> anyhow::Result<()>;

/// A named built-in check.
#[derive(Clone, Copy)]
pub struct CatalogScenario {
    pub key: &'static str,
    pub description: &'static str,
    check: Check,
}

impl CatalogScenario {
    #[must_use]
    pub const fn new(key: &'static str, description: &'static str, check: Check) -> Self {
        Self {
            key,
            description,
            check,
        }
    }

    #[must_use]
    pub fn run(&self) -> ScenarioResult {
        let start = Instant::now();
        let outcome = (self.check)();
        ScenarioResult::from_outcome(self.key, outcome, start.elapsed())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub failures: Vec<String>,
    #[serde(serialize_with = "duration_serde::serialize")]
    pub duration: Duration,
}

impl ScenarioResult {
    #[must_use]
    pub fn from_outcome(name: &str, outcome: anyhow::Result<()>, duration: Duration) -> Self {
        let failures = match outcome {
            Ok(()) => Vec::new(),
            Err(err) => vec![format!("{err:#}")],
        };
        Self {
            scenario_name: name.to_string(),
            passed: failures.is_empty(),
            failures,
            duration,
        }
    }
}

mod duration_serde {
    use serde::{Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }
}

/// Keys and descriptions of every built-in scenario.
#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_outcome_records_error_chain() {
        let outcome = Err(anyhow::anyhow!("inner").context("outer"));
        let result = ScenarioResult::from_outcome("demo", outcome, Duration::from_millis(3));
        assert!(!result.passed);
        assert_eq!(result.failures, vec!["outer: inner".to_string()]);
    }

    #[test]
    fn result_serializes_duration_as_seconds() {
        let result = ScenarioResult::from_outcome("demo", Ok(()), Duration::from_millis(1500));
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["duration"], serde_json::json!(1.5));
        assert_eq!(json["passed"], serde_json::json!(true));
    }
}
