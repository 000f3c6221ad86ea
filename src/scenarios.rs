//! Scenario existence checks. Scenarios themselves are owned elsewhere; dataset
//! operations only need to know whether an id is live.

use std::collections::BTreeSet;

pub trait ScenarioLookup {
    fn scenario_exists(&self, scenario_id: &str) -> bool;
}

impl<F> ScenarioLookup for F
where
    F: Fn(&str) -> bool,
{
    fn scenario_exists(&self, scenario_id: &str) -> bool {
        self(scenario_id)
    }
}

/// Fixed set of known scenario ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSet {
    ids: BTreeSet<String>,
}

impl ScenarioSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScenarioSet {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, scenario_id: &str) -> bool {
        self.ids.insert(scenario_id.to_string())
    }

    pub fn remove(&mut self, scenario_id: &str) -> bool {
        self.ids.remove(scenario_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl Default for ScenarioSet {
    /// The seven demo scenarios, ids "1" through "7".
    fn default() -> Self {
        ScenarioSet::new((1..=7).map(|id| id.to_string()))
    }
}

impl ScenarioLookup for ScenarioSet {
    fn scenario_exists(&self, scenario_id: &str) -> bool {
        self.ids.contains(scenario_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenarios() {
        let scenarios = ScenarioSet::default();
        assert!(scenarios.scenario_exists("1"));
        assert!(scenarios.scenario_exists("7"));
        assert!(!scenarios.scenario_exists("8"));
        assert!(!scenarios.scenario_exists(""));
        assert_eq!(scenarios.ids().count(), 7);
    }

    #[test]
    fn test_insert_remove() {
        let mut scenarios = ScenarioSet::new(["base"]);
        assert!(scenarios.insert("high-demand"));
        assert!(!scenarios.insert("base"));
        assert!(scenarios.remove("base"));
        assert!(!scenarios.scenario_exists("base"));
        assert!(scenarios.scenario_exists("high-demand"));
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |id: &str| id.starts_with("scn-");
        assert!(lookup.scenario_exists("scn-1"));
        assert!(!lookup.scenario_exists("1"));
    }
}
