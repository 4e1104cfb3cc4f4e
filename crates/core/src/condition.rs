// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Edge-condition evaluation.
//!
//! The dialect is deliberately tiny — five forms, no general expression
//! language:
//!
//! 1. empty string → `true`
//! 2. `<node>.resolved` → puzzle resolution lookup (`false` if absent)
//! 3. `event == '<name>'` → current event name match
//! 4. `<field> == '<literal>'` → event field compare; `<field>` may be a dot
//!    path into nested payload maps
//! 5. `<a> && <b>` → short-circuit AND, left-associative
//!
//! Anything else evaluates to `false`. Whitespace around terms is ignored;
//! quoting is single-quote only. Literals compare against strings directly,
//! against booleans via `'true'`/`'false'`, and against numbers after f64
//! normalisation.

use crate::event::Event;
use crate::status::Resolution;
use smol_str::SmolStr;
use std::collections::HashMap;

/// Conditions longer than this evaluate to `false` outright.
pub const MAX_CONDITION_LEN: usize = 512;

/// Evaluation context: the optional current event plus the puzzle-state map.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub event: Option<&'a Event>,
    pub puzzles: &'a HashMap<SmolStr, Resolution>,
}

/// Evaluate a condition string against the context.
pub fn evaluate(condition: &str, ctx: &EvalContext<'_>) -> bool {
    let condition = condition.trim();
    if condition.is_empty() {
        return true;
    }
    if condition.len() > MAX_CONDITION_LEN {
        return false;
    }
    condition.split("&&").all(|term| eval_term(term.trim(), ctx))
}

fn eval_term(term: &str, ctx: &EvalContext<'_>) -> bool {
    if term.is_empty() {
        return false;
    }
    if let Some((lhs, rhs)) = term.split_once("==") {
        let lhs = lhs.trim();
        let Some(literal) = unquote(rhs.trim()) else {
            return false;
        };
        if lhs == "event" {
            return ctx.event.is_some_and(|e| e.name == literal);
        }
        return ctx
            .event
            .and_then(|e| e.field_path(lhs))
            .is_some_and(|value| value_matches(value, literal));
    }
    if let Some(node) = term.strip_suffix(".resolved") {
        return ctx.puzzles.get(node).is_some_and(Resolution::is_resolved);
    }
    false
}

fn unquote(s: &str) -> Option<&str> {
    s.strip_prefix('\'')?.strip_suffix('\'')
}

fn value_matches(value: &serde_json::Value, literal: &str) -> bool {
    match value {
        serde_json::Value::String(s) => s == literal,
        serde_json::Value::Bool(b) => *b == (literal == "true") && matches!(literal, "true" | "false"),
        serde_json::Value::Number(n) => match (literal.parse::<f64>(), n.as_f64()) {
            (Ok(want), Some(have)) => want == have,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
