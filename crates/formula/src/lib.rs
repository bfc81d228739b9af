#![deny(warnings)]

//! Safe evaluation of warchest cost formulas and achievement conditions.
//!
//! Cost formulas are tiny arithmetic expressions over named variables,
//! e.g. `"weight / wpMultiplier"`, sourced from version-controlled action
//! catalogs. They are evaluated by an explicit tokenizer, a shunting-yard
//! pass, and a postfix stack walk; no host-language code is ever executed.
//! Every failure mode (bad character, mismatched parens, dangling operator,
//! division by zero) degrades to a cost of 0 rather than surfacing an
//! error, because a typo in configuration must not take down a session.

use std::collections::HashMap;
use tracing::debug;

pub mod condition;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

fn precedence(op: char) -> u8 {
    match op {
        '*' | '/' => 2,
        _ => 1, // '+' | '-'
    }
}

/// Split a formula into tokens. Returns `None` on any character outside
/// the allowed class `[\w\s+\-*/().]` or on an unparseable number.
fn tokenize(formula: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = formula.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::Number(text.parse().ok()?));
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else {
            match c {
                '+' | '-' | '*' | '/' => tokens.push(Token::Op(c)),
                '(' => tokens.push(Token::LParen),
                ')' => tokens.push(Token::RParen),
                _ => return None,
            }
            i += 1;
        }
    }
    Some(tokens)
}

/// Shunting-yard: infix tokens to postfix. `*`/`/` bind tighter than
/// `+`/`-`, all left-associative. Returns `None` on mismatched parens.
fn to_postfix(tokens: Vec<Token>) -> Option<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();
    for tok in tokens {
        match tok {
            Token::Number(_) | Token::Ident(_) => output.push(tok),
            Token::Op(op) => {
                while let Some(Token::Op(top)) = ops.last() {
                    if precedence(*top) >= precedence(op) {
                        output.push(ops.pop()?);
                    } else {
                        break;
                    }
                }
                ops.push(Token::Op(op));
            }
            Token::LParen => ops.push(Token::LParen),
            Token::RParen => loop {
                match ops.pop() {
                    Some(Token::LParen) => break,
                    Some(t) => output.push(t),
                    None => return None,
                }
            },
        }
    }
    while let Some(t) = ops.pop() {
        if t == Token::LParen {
            return None;
        }
        output.push(t);
    }
    Some(output)
}

/// Evaluate a postfix token stream. Unknown identifiers read as 0.
/// Returns `None` on stack underflow, leftover operands, division by
/// zero, or a non-finite result.
fn eval_postfix(postfix: &[Token], ctx: &HashMap<String, f64>) -> Option<f64> {
    let mut stack: Vec<f64> = Vec::new();
    for tok in postfix {
        match tok {
            Token::Number(n) => stack.push(*n),
            Token::Ident(name) => stack.push(ctx.get(name).copied().unwrap_or(0.0)),
            Token::Op(op) => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                let v = match op {
                    '+' => a + b,
                    '-' => a - b,
                    '*' => a * b,
                    '/' => {
                        if b == 0.0 {
                            return None;
                        }
                        a / b
                    }
                    _ => return None,
                };
                stack.push(v);
            }
            Token::LParen | Token::RParen => return None,
        }
    }
    if stack.len() != 1 {
        return None;
    }
    let result = stack.pop()?;
    result.is_finite().then_some(result)
}

/// Evaluate a cost formula against a variable context.
///
/// The raw result is rounded up to the nearest integer and floored at 0;
/// any failure yields 0.
///
/// Example:
/// let mut ctx = std::collections::HashMap::new();
/// ctx.insert("weight".to_string(), 40.0);
/// ctx.insert("wpMultiplier".to_string(), 5.0);
/// assert_eq!(formula::evaluate("weight / wpMultiplier", &ctx), 8);
pub fn evaluate(formula: &str, ctx: &HashMap<String, f64>) -> i64 {
    let raw = tokenize(formula)
        .and_then(to_postfix)
        .and_then(|postfix| eval_postfix(&postfix, ctx));
    match raw {
        Some(v) => {
            let ceiled = v.ceil();
            if ceiled < 0.0 {
                0
            } else {
                ceiled as i64
            }
        }
        None => {
            debug!(formula, "formula did not evaluate; falling back to 0");
            0
        }
    }
}
