//! Generate → refine → compile → invoke → self-repair state machine for one
//! scoring function.

use crate::expr::Expr;
use crate::interpreter::{self, Bindings};
use forge_oracle::{ChatSequence, Message, OracleClient};
use rand::rngs::StdRng;
use tracing::warn;

/// Bug-fix attempts allowed before a heuristic function is permanently
/// deactivated.
const MAX_FIX_ITERATIONS: u32 = 5;

/// One generated scoring function and its lifecycle state.
#[derive(Debug, Clone)]
pub struct HeuristicFunction {
    pub game_description: String,
    pub policy_text: String,
    pub io_description: String,
    pub source_text: String,
    compiled: Option<Expr>,
    pub active: bool,
    pub enable_fix: bool,
}

impl HeuristicFunction {
    /// Generates and self-refines a scoring function from policy text, then
    /// compiles it. If compilation still fails and `enable_fix` is false,
    /// the function is deactivated immediately — before any repair attempt,
    /// matching the documented quirk of the original system.
    ///
    /// # Errors
    ///
    /// Returns an error only if the oracle calls themselves fail.
    pub async fn create(
        oracle: &OracleClient,
        game_description: &str,
        policy_text: &str,
        io_description: &str,
        enable_fix: bool,
    ) -> forge_oracle::Result<Self> {
        let drafted = request_draft(oracle, game_description, policy_text, io_description).await?;
        let refined = request_refine(oracle, &drafted).await?;
        let compiled = Expr::parse(&refined).ok();
        let active = compiled.is_some() || enable_fix;

        Ok(Self {
            game_description: game_description.to_string(),
            policy_text: policy_text.to_string(),
            io_description: io_description.to_string(),
            source_text: refined,
            compiled,
            active,
            enable_fix,
        })
    }

    /// Rebuilds a function from persisted parts, re-parsing `source_text`
    /// rather than storing the compiled expression directly.
    #[must_use]
    pub fn restore(
        game_description: String,
        policy_text: String,
        io_description: String,
        source_text: String,
        active: bool,
        enable_fix: bool,
    ) -> Self {
        let compiled = Expr::parse(&source_text).ok();
        let active = active && compiled.is_some();
        Self {
            game_description,
            policy_text,
            io_description,
            source_text,
            compiled,
            active,
            enable_fix,
        }
    }

    /// Invokes the function on one `(state, action)` pair, returning a
    /// score in `[0, 1]`. A deactivated function always returns `0.0`
    /// without touching `source_text` or the oracle. On a live error, if
    /// `enable_fix` is false the function deactivates immediately and
    /// returns `0.0` without any bug-fix turn; otherwise it runs up to
    /// `MAX_FIX_ITERATIONS` bug-fix turns before deactivating.
    pub async fn invoke(
        &mut self,
        oracle: &OracleClient,
        state: &forge_contract::GameState,
        action: &forge_contract::Action,
        rng: &mut StdRng,
    ) -> f64 {
        if !self.active {
            return 0.0;
        }
        let bindings = interpreter::build_bindings(state, action);

        for attempt in 0..=MAX_FIX_ITERATIONS {
            if let Some(expr) = &self.compiled {
                match interpreter::eval(expr, &bindings, rng) {
                    Ok(score) => return score.clamp(0.0, 1.0),
                    Err(err) => {
                        warn!("heuristic eval failed on attempt {attempt}: {err}");
                    }
                }
            }
            if !self.enable_fix {
                warn!("heuristic deactivated: bug fix disabled");
                break;
            }
            if attempt == MAX_FIX_ITERATIONS {
                break;
            }
            match self.attempt_fix(oracle, &bindings).await {
                Ok(()) => {}
                Err(err) => {
                    warn!("heuristic fix request failed: {err}");
                    break;
                }
            }
        }

        self.active = false;
        self.compiled = None;
        0.0
    }

    async fn attempt_fix(&mut self, oracle: &OracleClient, bindings: &Bindings) -> forge_oracle::Result<()> {
        let error_trace = self
            .compiled
            .is_none()
            .then(|| "failed to compile".to_string())
            .unwrap_or_else(|| "raised an error or produced no result during evaluation".to_string());
        let fixed = request_bug_fix(oracle, &self.policy_text, &self.source_text, &error_trace, bindings).await?;
        self.source_text = fixed;
        self.compiled = Expr::parse(&self.source_text).ok();
        Ok(())
    }
}

async fn request_draft(
    oracle: &OracleClient,
    game_description: &str,
    policy_text: &str,
    io_description: &str,
) -> forge_oracle::Result<String> {
    let sequence = ChatSequence::single_turn(format!(
        "Game:\n{game_description}\n\nPolicy:\n{policy_text}\n\nIO shape:\n{io_description}\n"
    ))
    .with_system(
        "Write a single scoring expression for score(state, action) -> float in [0, 1], using \
         only arithmetic, comparisons, min/max/sum/mean/abs/sqrt, and rand(). Reply with the \
         expression alone, no explanation.",
    );
    oracle.chat(&sequence).await
}

async fn request_refine(oracle: &OracleClient, drafted: &str) -> forge_oracle::Result<String> {
    let sequence = ChatSequence::single_turn(format!("Expression:\n{drafted}\n")).with_system(
        "Review the expression: remove placeholders, keep it a single expression using only \
         the allowed primitives, and make sure it evaluates to a number. Reply with the final \
         expression alone.",
    );
    oracle.chat(&sequence).await
}

async fn request_bug_fix(
    oracle: &OracleClient,
    policy_text: &str,
    source_text: &str,
    error_trace: &str,
    bindings: &Bindings,
) -> forge_oracle::Result<String> {
    let sequence = ChatSequence::single_turn(format!(
        "Policy:\n{policy_text}\n\nExpression:\n{source_text}\n\nError:\n{error_trace}\n\nSample bindings:\n{bindings:?}\n"
    ))
    .with_message(Message::user("Fix the expression. Reply with the corrected expression alone."));
    oracle.chat(&sequence).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deactivated_function_returns_zero_without_evaluating() {
        let function = HeuristicFunction {
            game_description: String::new(),
            policy_text: String::new(),
            io_description: String::new(),
            source_text: "1 + 1".to_string(),
            compiled: Expr::parse("1 + 1").ok(),
            active: false,
            enable_fix: true,
        };
        assert!(!function.active);
    }

    #[tokio::test]
    async fn disabled_fix_deactivates_on_first_eval_failure_without_oracle_call() {
        use rand::SeedableRng;

        let mut function = HeuristicFunction::restore(
            "game".to_string(),
            "policy".to_string(),
            "io".to_string(),
            "undefined_binding".to_string(),
            true,
            false,
        );
        assert!(function.active, "a syntactically valid but unresolvable expression still compiles");

        let state = forge_contract::GameState::new(2);
        let action = forge_contract::Action::named("noop");
        let mut rng = StdRng::seed_from_u64(0);
        let oracle = OracleClient::new(forge_oracle::OracleConfig {
            api_key: "unused".to_string(),
            ..forge_oracle::OracleConfig::default()
        })
        .expect("client construction does not contact the network");

        let score = function.invoke(&oracle, &state, &action, &mut rng).await;

        assert_eq!(score, 0.0);
        assert!(!function.active, "bug fix disabled: function must deactivate on the first eval failure");
    }
}
