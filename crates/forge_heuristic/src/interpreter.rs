//! Tree-walking evaluator for the heuristic expression language.
//!
//! The original compiled artifact receives `state`/`action` as nested,
//! attribute-accessed objects. forge's interpreter trades that for a flat
//! `name -> f64` bindings map built once per invocation — the same
//! coarsening trade-off already made for snippet chunking in
//! `forge_retrieval`, justified the same way: no reflective object model
//! exists to walk in Rust without fabricating one.

use crate::error::{Error, Result};
use crate::expr::{BinOp, Expr};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;

/// Name-to-number bindings an expression is evaluated against.
pub type Bindings = BTreeMap<String, f64>;

/// Evaluates `expr` against `bindings`, drawing any `rand()` calls from
/// `rng`.
///
/// # Errors
///
/// Returns an error for unknown variables/functions or wrong argument
/// counts.
pub fn eval(expr: &Expr, bindings: &Bindings, rng: &mut StdRng) -> Result<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Expr::Var(name) => bindings.get(name).copied().ok_or_else(|| Error::UnknownName(name.clone())),
        Expr::Neg(inner) => Ok(-eval(inner, bindings, rng)?),
        Expr::Binary(left, op, right) => {
            let l = eval(left, bindings, rng)?;
            let r = eval(right, bindings, rng)?;
            Ok(match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                BinOp::Eq => f64::from(u8::from((l - r).abs() < f64::EPSILON)),
                BinOp::Ne => f64::from(u8::from((l - r).abs() >= f64::EPSILON)),
                BinOp::Lt => f64::from(u8::from(l < r)),
                BinOp::Le => f64::from(u8::from(l <= r)),
                BinOp::Gt => f64::from(u8::from(l > r)),
                BinOp::Ge => f64::from(u8::from(l >= r)),
            })
        }
        Expr::Call(name, args) => eval_call(name, args, bindings, rng),
    }
}

fn eval_call(name: &str, args: &[Expr], bindings: &Bindings, rng: &mut StdRng) -> Result<f64> {
    let values = args
        .iter()
        .map(|a| eval(a, bindings, rng))
        .collect::<Result<Vec<_>>>()?;
    match name {
        "abs" => unary(name, &values, f64::abs),
        "sqrt" => unary(name, &values, f64::sqrt),
        "min" => binary(name, &values, f64::min),
        "max" => binary(name, &values, f64::max),
        "sum" => Ok(values.iter().sum()),
        "mean" => {
            if values.is_empty() {
                Ok(0.0)
            } else {
                Ok(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        "rand" => {
            if values.is_empty() {
                Ok(rng.gen_range(0.0..1.0))
            } else {
                Err(Error::ArgCount { name: name.to_string(), expected: 0, got: values.len() })
            }
        }
        other => Err(Error::UnknownName(other.to_string())),
    }
}

fn unary(name: &str, values: &[f64], f: impl Fn(f64) -> f64) -> Result<f64> {
    match values {
        [x] => Ok(f(*x)),
        other => Err(Error::ArgCount { name: name.to_string(), expected: 1, got: other.len() }),
    }
}

fn binary(name: &str, values: &[f64], f: impl Fn(f64, f64) -> f64) -> Result<f64> {
    match values {
        [a, b] => Ok(f(*a, *b)),
        other => Err(Error::ArgCount { name: name.to_string(), expected: 2, got: other.len() }),
    }
}

/// Flattens a game state and action into the bindings an expression can
/// reference, covering the common fields every game shares plus any
/// numeric action arguments. Card-level and per-player public/private
/// fields are out of reach of this flattening by design — see the module
/// doc comment.
#[must_use]
pub fn build_bindings(state: &forge_contract::GameState, action: &forge_contract::Action) -> Bindings {
    let mut bindings = Bindings::new();
    bindings.insert("state.common.num_players".to_string(), state.common.num_players as f64);
    bindings.insert("state.common.current_player".to_string(), state.common.current_player as f64);
    bindings.insert("state.common.is_over".to_string(), f64::from(u8::from(state.common.is_over)));
    bindings.insert(
        "state.common.winner".to_string(),
        state.common.winner.map_or(-1.0, |w| w as f64),
    );
    bindings.insert("state.common.facedown_cards.len".to_string(), state.common.facedown_cards.len() as f64);
    bindings.insert("state.common.faceup_cards.len".to_string(), state.common.faceup_cards.len() as f64);

    if let Some(player) = state.players.get(state.common.current_player) {
        bindings.insert("state.player.facedown_cards.len".to_string(), player.facedown_cards.len() as f64);
        bindings.insert("state.player.faceup_cards.len".to_string(), player.faceup_cards.len() as f64);
    }

    for (key, value) in &action.args {
        if let Some(n) = value.as_f64() {
            bindings.insert(format!("action.args.{key}"), n);
        }
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    #[test]
    fn evaluates_arithmetic() {
        let expr = Expr::parse("1 + 2 * 3").unwrap();
        assert_eq!(eval(&expr, &Bindings::new(), &mut rng()).unwrap(), 7.0);
    }

    #[test]
    fn evaluates_comparison_as_zero_or_one() {
        let expr = Expr::parse("3 > 2").unwrap();
        assert_eq!(eval(&expr, &Bindings::new(), &mut rng()).unwrap(), 1.0);
    }

    #[test]
    fn resolves_bindings() {
        let mut bindings = Bindings::new();
        bindings.insert("state.common.num_players".to_string(), 4.0);
        let expr = Expr::parse("state.common.num_players / 2").unwrap();
        assert_eq!(eval(&expr, &bindings, &mut rng()).unwrap(), 2.0);
    }

    #[test]
    fn unknown_variable_errors() {
        let expr = Expr::parse("missing").unwrap();
        assert!(eval(&expr, &Bindings::new(), &mut rng()).is_err());
    }

    #[test]
    fn build_bindings_covers_common_fields() {
        let state = forge_contract::GameState::new(2);
        let action = forge_contract::Action::with_arg("play", "amount", forge_contract::Value::from(5i64));
        let bindings = build_bindings(&state, &action);
        assert_eq!(bindings["state.common.num_players"], 2.0);
        assert_eq!(bindings["action.args.amount"], 5.0);
    }
}
