//! Types produced by policy design.

use serde::{Deserialize, Serialize};

/// A named, described artifact: a strategy, a metric, or the singular
/// strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyItem {
    pub name: String,
    pub description: String,
}

/// A strategy refined against the derived metrics set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    pub strategy_name: String,
    pub reflection: String,
}

/// Everything `PolicyDesigner::design` produces for one rules description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyBundle {
    pub action_inventory: Vec<String>,
    pub singular_strategy: PolicyItem,
    pub strategies: Vec<PolicyItem>,
    pub metrics: Vec<PolicyItem>,
    pub reflections: Vec<Reflection>,
}

/// The five ways a policy bundle can be flattened into prompt text, per
/// `get_policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMethod {
    Strategy,
    Reflect,
    Metric,
    Singular,
    StrategyMetricOneCode,
}

impl PolicyBundle {
    /// Returns the policy texts for one method.
    #[must_use]
    pub fn get_policy(&self, method: PolicyMethod) -> Vec<String> {
        match method {
            PolicyMethod::Strategy => self.strategies.iter().map(describe).collect(),
            PolicyMethod::Reflect => self.reflections.iter().map(|r| r.reflection.clone()).collect(),
            PolicyMethod::Metric => self.metrics.iter().map(describe).collect(),
            PolicyMethod::Singular => vec![describe(&self.singular_strategy)],
            PolicyMethod::StrategyMetricOneCode => {
                let mut combined = String::new();
                for metric in &self.metrics {
                    combined.push_str(&describe(metric));
                    combined.push('\n');
                }
                for strategy in &self.strategies {
                    combined.push_str(&describe(strategy));
                    combined.push('\n');
                }
                vec![combined]
            }
        }
    }
}

fn describe(item: &PolicyItem) -> String {
    format!("{}: {}", item.name, item.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle() -> PolicyBundle {
        PolicyBundle {
            action_inventory: vec!["play a card".to_string()],
            singular_strategy: PolicyItem { name: "balanced".to_string(), description: "play it safe".to_string() },
            strategies: vec![
                PolicyItem { name: "aggressive".to_string(), description: "push tempo".to_string() },
                PolicyItem { name: "defensive".to_string(), description: "hold cards".to_string() },
            ],
            metrics: vec![PolicyItem { name: "hand size".to_string(), description: "cards left".to_string() }],
            reflections: vec![Reflection { strategy_name: "aggressive".to_string(), reflection: "push when ahead".to_string() }],
        }
    }

    #[test]
    fn strategy_method_returns_one_text_per_strategy() {
        let bundle = sample_bundle();
        assert_eq!(bundle.get_policy(PolicyMethod::Strategy).len(), 2);
    }

    #[test]
    fn singular_method_returns_one_text() {
        let bundle = sample_bundle();
        assert_eq!(bundle.get_policy(PolicyMethod::Singular).len(), 1);
    }

    #[test]
    fn strategy_metric_one_code_concatenates_both() {
        let bundle = sample_bundle();
        let texts = bundle.get_policy(PolicyMethod::StrategyMetricOneCode);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("hand size"));
        assert!(texts[0].contains("aggressive"));
        assert!(texts[0].contains("defensive"));
    }
}
