//! Achievement condition checker.
//!
//! Conditions are AND-only conjunctions of `identifier OP number` clauses,
//! e.g. `"killCount >= 5 && assists >= 2"`. Supported operators are
//! `>= > <= < ===` (with `==` accepted as an alias); there is no OR, NOT,
//! or nesting. This is deliberately separate from the arithmetic cost
//! evaluator and shares none of its grammar.

use std::collections::HashMap;

// Longest operators first so ">=" is not read as ">" then "=".
const OPERATORS: [&str; 6] = ["===", ">=", "<=", "==", ">", "<"];

fn check_clause(clause: &str, ctx: &HashMap<String, f64>) -> Option<bool> {
    let clause = clause.trim();
    let (op, pos) = OPERATORS
        .iter()
        .filter_map(|op| clause.find(op).map(|pos| (*op, pos)))
        .min_by_key(|(op, pos)| (*pos, std::cmp::Reverse(op.len())))?;
    let ident = clause[..pos].trim();
    let rhs = clause[pos + op.len()..].trim();
    if ident.is_empty() || !ident.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    let rhs: f64 = rhs.parse().ok()?;
    let lhs = ctx.get(ident).copied().unwrap_or(0.0);
    Some(match op {
        ">=" => lhs >= rhs,
        "<=" => lhs <= rhs,
        ">" => lhs > rhs,
        "<" => lhs < rhs,
        // "===" and "=="
        _ => lhs == rhs,
    })
}

/// Check a condition string against a combat-stat context.
///
/// Every clause must hold. Unknown identifiers read as 0; an empty or
/// malformed condition never awards.
pub fn check(condition: &str, ctx: &HashMap<String, f64>) -> bool {
    if condition.trim().is_empty() {
        return false;
    }
    condition
        .split("&&")
        .all(|clause| check_clause(clause, ctx).unwrap_or(false))
}
