//! Arithmetic over `+ - * / ( )` and decimal literals, for the calculator.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArithError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("invalid number literal \"{0}\"")]
    InvalidNumber(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unbalanced parentheses")]
    Unbalanced,
    #[error("trailing input at offset {0}")]
    Trailing(usize),
}

/// Evaluates `source` with the usual precedence: unary signs bind tightest,
/// then `*` and `/`, then `+` and `-`, all left associative.
///
/// Division by zero is not an error here; it yields an infinite or NaN
/// result and callers decide what to show.
pub fn eval_arith(source: &str) -> Result<f64, ArithError> {
    let chars: Vec<char> = source.chars().filter(|ch| !ch.is_whitespace()).collect();
    let mut parser = ArithParser { chars, pos: 0 };
    let value = parser.sum()?;
    if parser.pos < parser.chars.len() {
        return Err(match parser.chars[parser.pos] {
            ')' => ArithError::Unbalanced,
            _ => ArithError::Trailing(parser.pos),
        });
    }
    Ok(value)
}

struct ArithParser {
    chars: Vec<char>,
    pos: usize,
}

impl ArithParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn sum(&mut self) -> Result<f64, ArithError> {
        let mut value = self.product()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.product()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn product(&mut self) -> Result<f64, ArithError> {
        let mut value = self.unary()?;
        while let Some(op @ ('*' | '/')) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = if op == '*' { value * rhs } else { value / rhs };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, ArithError> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, ArithError> {
        match self.peek() {
            None => Err(ArithError::UnexpectedEnd),
            Some('(') => {
                self.pos += 1;
                let value = self.sum()?;
                if self.peek() != Some(')') {
                    return Err(ArithError::Unbalanced);
                }
                self.pos += 1;
                Ok(value)
            }
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.number(),
            Some(ch) => Err(ArithError::UnexpectedChar(ch)),
        }
    }

    fn number(&mut self) -> Result<f64, ArithError> {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit() || ch == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| ArithError::InvalidNumber(literal))
    }
}

#[cfg(test)]
mod arith_tests {
    use super::*;

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval_arith("7 + 3").expect("valid"), 10.0);
        assert_eq!(eval_arith("2 + 3 * 4").expect("valid"), 14.0);
        assert_eq!(eval_arith("10 - 4 - 3").expect("valid"), 3.0);
        assert_eq!(eval_arith("8 / 4 / 2").expect("valid"), 1.0);
        assert_eq!(eval_arith("(2 + 3) * 4").expect("valid"), 20.0);
    }

    #[test]
    fn unary_signs_and_decimals() {
        assert_eq!(eval_arith("-3 + 5").expect("valid"), 2.0);
        assert_eq!(eval_arith("2 * -1.5").expect("valid"), -3.0);
        assert_eq!(eval_arith(".5 + 3.").expect("valid"), 3.5);
    }

    #[test]
    fn division_by_zero_is_not_finite() {
        assert!(eval_arith("1 / 0").expect("valid").is_infinite());
        assert!(eval_arith("0 / 0").expect("valid").is_nan());
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(eval_arith("7 +"), Err(ArithError::UnexpectedEnd));
        assert_eq!(eval_arith("1..2"), Err(ArithError::InvalidNumber("1..2".to_string())));
        assert_eq!(eval_arith("(1 + 2"), Err(ArithError::Unbalanced));
        assert_eq!(eval_arith("1 + 2)"), Err(ArithError::Unbalanced));
        assert_eq!(eval_arith("2 (3)"), Err(ArithError::Trailing(1)));
        assert_eq!(eval_arith("*2"), Err(ArithError::UnexpectedChar('*')));
    }
}
