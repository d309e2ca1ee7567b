//! Spoken arithmetic: "calculate 2 + 2", "what is (3 + 4) * 2".

use regex::Regex;
use std::sync::LazyLock;

static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(calculate|what is|compute|how much is)\b").expect("valid regex")
});

static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s+\-*/^().]+$").expect("valid regex"));

/// Reply for an arithmetic utterance, or `None` if the text is not one
/// (or does not evaluate to a finite number).
pub fn try_calculate(text: &str) -> Option<String> {
    let cleaned = PREFIX.replace_all(text, "");
    let cleaned = cleaned.trim();
    if !EXPRESSION.is_match(cleaned) {
        return None;
    }
    let value = evaluate(cleaned).ok()?;
    Some(format!("The answer is {}.", format_number(value)))
}

/// Integral values print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Nesting limit for parentheses, unary signs and exponent chains.
const MAX_DEPTH: usize = 64;

/// Evaluate `+ - * / ^ ( )` over decimal literals.
///
/// `^` binds tighter than unary minus and is right-associative, so
/// `-2 ^ 2` is -4 and `2 ^ 3 ^ 2` is 512. Nesting deeper than
/// [`MAX_DEPTH`] is rejected.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens: Vec<char> = expr.chars().collect();
    let mut pos = 0;
    let result = parse_expr(&tokens, &mut pos, 0)?;
    skip_ws(&tokens, &mut pos);
    if pos < tokens.len() {
        return Err(format!("unexpected character at position {pos}"));
    }
    if !result.is_finite() {
        return Err("result is not a finite number".into());
    }
    Ok(result)
}

fn skip_ws(tokens: &[char], pos: &mut usize) {
    while *pos < tokens.len() && tokens[*pos].is_whitespace() {
        *pos += 1;
    }
}

fn peek(tokens: &[char], pos: &mut usize) -> Option<char> {
    skip_ws(tokens, pos);
    tokens.get(*pos).copied()
}

fn parse_expr(tokens: &[char], pos: &mut usize, depth: usize) -> Result<f64, String> {
    let mut left = parse_term(tokens, pos, depth)?;
    while let Some(op @ ('+' | '-')) = peek(tokens, pos) {
        *pos += 1;
        let right = parse_term(tokens, pos, depth)?;
        left = if op == '+' { left + right } else { left - right };
    }
    Ok(left)
}

fn parse_term(tokens: &[char], pos: &mut usize, depth: usize) -> Result<f64, String> {
    let mut left = parse_unary(tokens, pos, depth)?;
    while let Some(op @ ('*' | '/')) = peek(tokens, pos) {
        *pos += 1;
        let right = parse_unary(tokens, pos, depth)?;
        if op == '/' && right == 0.0 {
            return Err("division by zero".into());
        }
        left = if op == '*' { left * right } else { left / right };
    }
    Ok(left)
}

// Every recursive path passes through here.
fn parse_unary(tokens: &[char], pos: &mut usize, depth: usize) -> Result<f64, String> {
    if depth > MAX_DEPTH {
        return Err("expression too deeply nested".into());
    }
    match peek(tokens, pos) {
        Some('-') => {
            *pos += 1;
            Ok(-parse_unary(tokens, pos, depth + 1)?)
        }
        Some('+') => {
            *pos += 1;
            parse_unary(tokens, pos, depth + 1)
        }
        _ => parse_power(tokens, pos, depth),
    }
}

fn parse_power(tokens: &[char], pos: &mut usize, depth: usize) -> Result<f64, String> {
    let base = parse_atom(tokens, pos, depth)?;
    if peek(tokens, pos) == Some('^') {
        *pos += 1;
        let exponent = parse_unary(tokens, pos, depth + 1)?;
        return Ok(base.powf(exponent));
    }
    Ok(base)
}

fn parse_atom(tokens: &[char], pos: &mut usize, depth: usize) -> Result<f64, String> {
    match peek(tokens, pos) {
        None => Err("unexpected end of expression".into()),
        Some('(') => {
            *pos += 1;
            let result = parse_expr(tokens, pos, depth + 1)?;
            if peek(tokens, pos) != Some(')') {
                return Err("missing closing parenthesis".into());
            }
            *pos += 1;
            Ok(result)
        }
        Some(_) => {
            let start = *pos;
            while *pos < tokens.len() && (tokens[*pos].is_ascii_digit() || tokens[*pos] == '.') {
                *pos += 1;
            }
            if start == *pos {
                return Err(format!("expected number at position {start}"));
            }
            let literal: String = tokens[start..*pos].iter().collect();
            literal
                .parse::<f64>()
                .map_err(|e| format!("invalid number {literal:?}: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_parentheses() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("7 / 2").unwrap(), 3.5);
    }

    #[test]
    fn test_power_right_associative() {
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2 ^ 2").unwrap(), -4.0);
        assert_eq!(evaluate("2 ^ -1").unwrap(), 0.5);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(evaluate("-3 + 5").unwrap(), 2.0);
        assert_eq!(evaluate("4 * -(1 + 1)").unwrap(), -8.0);
    }

    #[test]
    fn test_faults() {
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("2 3").is_err());
        assert!(evaluate("1.2.3").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("10 ^ 400").is_err());
    }

    #[test]
    fn test_try_calculate_replies() {
        assert_eq!(
            try_calculate("calculate 2 + 2").as_deref(),
            Some("The answer is 4.")
        );
        assert_eq!(
            try_calculate("what is 1.5 * 3").as_deref(),
            Some("The answer is 4.5.")
        );
        assert_eq!(
            try_calculate("how much is 2^10").as_deref(),
            Some("The answer is 1024.")
        );
    }

    #[test]
    fn test_try_calculate_rejects_non_arithmetic() {
        assert_eq!(try_calculate("calculate rm -rf"), None);
        assert_eq!(try_calculate("what is rust"), None);
        assert_eq!(try_calculate("calculate"), None);
        assert_eq!(try_calculate("calculate 5 / 0"), None);
    }

    #[test]
    fn test_nesting_limit() {
        let parens = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(evaluate(&parens).unwrap(), 1.0);
        assert_eq!(evaluate("--1").unwrap(), 1.0);

        let too_deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 2), ")".repeat(MAX_DEPTH + 2));
        assert_eq!(evaluate(&too_deep).unwrap_err(), "expression too deeply nested");
    }

    #[test]
    fn test_hostile_input_falls_through() {
        let nested = format!("calculate {}1{}", "(".repeat(5000), ")".repeat(5000));
        assert_eq!(try_calculate(&nested), None);

        let signs = format!("calculate {}1", "-".repeat(200_000));
        assert_eq!(try_calculate(&signs), None);

        let tower = format!("calculate 1{}", " ^ 1".repeat(10_000));
        assert_eq!(try_calculate(&tower), None);
    }

    #[test]
    fn test_long_flat_expression_still_evaluates() {
        let sum = format!("calculate 1{}", " + 1".repeat(10_000));
        assert_eq!(try_calculate(&sum).as_deref(), Some("The answer is 10001."));
    }
}
