//! Derives a policy bundle from a rules description.

use crate::bundle::{PolicyBundle, PolicyItem, Reflection};
use crate::error::Result;
use forge_oracle::{ChatSequence, OracleClient};
use tracing::debug;

/// Produces a full policy bundle for one game's rules.
///
/// The action inventory, singular strategy, strategies, and metrics are all
/// independent of each other and requested concurrently; reflection is
/// sequential because each strategy's reflection conditions on the full
/// metrics set but not on sibling reflections.
///
/// # Errors
///
/// Returns an error if any oracle call fails.
pub async fn design(
    oracle: &OracleClient,
    rules_text: &str,
    num_strategies: usize,
    num_metrics: usize,
) -> Result<PolicyBundle> {
    let (action_inventory, singular, strategies, metrics) = tokio::join!(
        request_action_inventory(oracle, rules_text),
        request_singular_strategy(oracle, rules_text),
        request_strategies(oracle, rules_text, num_strategies),
        request_metrics(oracle, rules_text, num_metrics),
    );
    let action_inventory = action_inventory?;
    let singular_strategy = singular?;
    let strategies = strategies?;
    let metrics = metrics?;

    let mut reflections = Vec::with_capacity(strategies.len());
    for strategy in &strategies {
        debug!("reflecting strategy {}", strategy.name);
        let reflection = request_reflection(oracle, strategy, &metrics).await?;
        reflections.push(Reflection {
            strategy_name: strategy.name.clone(),
            reflection,
        });
    }

    Ok(PolicyBundle {
        action_inventory,
        singular_strategy,
        strategies,
        metrics,
        reflections,
    })
}

async fn request_action_inventory(oracle: &OracleClient, rules_text: &str) -> Result<Vec<String>> {
    let sequence = ChatSequence::single_turn(format!("Rules:\n{rules_text}\n"))
        .with_system("List every discrete turn-action a player can take, one per line, as a short imperative phrase. No numbering.");
    let response = oracle.chat(&sequence).await?;
    Ok(response.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
}

async fn request_singular_strategy(oracle: &OracleClient, rules_text: &str) -> Result<PolicyItem> {
    let sequence = ChatSequence::single_turn(format!("Rules:\n{rules_text}\n"))
        .with_system("Describe one holistic strategy for playing this game well. Reply as `name: description` on a single line.");
    let response = oracle.chat(&sequence).await?;
    Ok(parse_items(&response).into_iter().next().unwrap_or(PolicyItem {
        name: "default".to_string(),
        description: response,
    }))
}

async fn request_strategies(oracle: &OracleClient, rules_text: &str, count: usize) -> Result<Vec<PolicyItem>> {
    let sequence = ChatSequence::single_turn(format!("Rules:\n{rules_text}\n"))
        .with_system(format!("List {count} distinct strategies for playing this game well, one per line as `name: description`."));
    let response = oracle.chat(&sequence).await?;
    Ok(parse_items(&response))
}

async fn request_metrics(oracle: &OracleClient, rules_text: &str, count: usize) -> Result<Vec<PolicyItem>> {
    let sequence = ChatSequence::single_turn(format!("Rules:\n{rules_text}\n"))
        .with_system(format!("List {count} numeric metrics derivable from the game state, one per line as `name: description`."));
    let response = oracle.chat(&sequence).await?;
    Ok(parse_items(&response))
}

async fn request_reflection(oracle: &OracleClient, strategy: &PolicyItem, metrics: &[PolicyItem]) -> Result<String> {
    let metrics_text: String = metrics.iter().map(|m| format!("- {}: {}\n", m.name, m.description)).collect();
    let sequence = ChatSequence::single_turn(format!(
        "Strategy:\n{}: {}\n\nMetrics:\n{metrics_text}\n",
        strategy.name, strategy.description
    ))
    .with_system(
        "Rewrite the strategy description so vague phrases like \"strategic use\" or \
         \"critical moment\" are tied to specific metrics above. Reply with the refined \
         description alone.",
    );
    Ok(oracle.chat(&sequence).await?)
}

fn parse_items(text: &str) -> Vec<PolicyItem> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim().trim_start_matches(['-', '*']).trim();
            if line.is_empty() {
                return None;
            }
            let (name, description) = line.split_once(':')?;
            Some(PolicyItem {
                name: name.trim().to_string(),
                description: description.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_items_splits_name_and_description() {
        let text = "- aggressive: push tempo\n* defensive: hold cards\n\n";
        let items = parse_items(text);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "aggressive");
        assert_eq!(items[1].description, "hold cards");
    }

    #[test]
    fn parse_items_skips_lines_without_colon() {
        let items = parse_items("just a sentence\nname: desc");
        assert_eq!(items.len(), 1);
    }
}
