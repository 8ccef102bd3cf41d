//! Restricted expression evaluator for resolved template text.
//!
//! Operands are literals only (numbers, quoted strings, `true`, `false`,
//! `null`); there are no identifiers and no calls. Supported operators are
//! the ternary `?:`, `||`, `&&`, the equality family and unary `!`/`-`.

use std::iter::Peekable;
use std::str::Chars;

use su_core::SuValue;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid number literal \"{0}\"")]
    InvalidNumber(String),
    #[error("unexpected token {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("operand of unary '-' must be a number")]
    NonNumericNegation,
    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
}

/// Bound on parenthesis, ternary and unary nesting.
pub const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    True,
    False,
    Null,
    Question,
    Colon,
    LParen,
    RParen,
    Not,
    Minus,
    StrictEq,
    StrictNe,
    LooseEq,
    LooseNe,
    And,
    Or,
}

pub fn evaluate(source: &str) -> Result<SuValue, ExprError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let value = parser.ternary()?;
    match parser.peek() {
        None => Ok(value),
        Some(token) => Err(ExprError::UnexpectedToken(format!("{:?}", token))),
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '"' | '\'' => {
                chars.next();
                tokens.push(Token::Str(read_string(&mut chars, ch)?));
            }
            '0'..='9' | '.' => tokens.push(Token::Number(read_number(&mut chars)?)),
            '?' => {
                chars.next();
                tokens.push(Token::Question);
            }
            ':' => {
                chars.next();
                tokens.push(Token::Colon);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '!' => {
                chars.next();
                if chars.next_if_eq(&'=').is_some() {
                    if chars.next_if_eq(&'=').is_some() {
                        tokens.push(Token::StrictNe);
                    } else {
                        tokens.push(Token::LooseNe);
                    }
                } else {
                    tokens.push(Token::Not);
                }
            }
            '=' => {
                chars.next();
                if chars.next_if_eq(&'=').is_none() {
                    return Err(ExprError::UnexpectedChar('='));
                }
                if chars.next_if_eq(&'=').is_some() {
                    tokens.push(Token::StrictEq);
                } else {
                    tokens.push(Token::LooseEq);
                }
            }
            '&' | '|' => {
                chars.next();
                if chars.next_if_eq(&ch).is_none() {
                    return Err(ExprError::UnexpectedChar(ch));
                }
                tokens.push(if ch == '&' { Token::And } else { Token::Or });
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(c) = chars.next_if(|c| c.is_ascii_alphanumeric() || *c == '_') {
                    word.push(c);
                }
                tokens.push(match word.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" => Token::Null,
                    _ => return Err(ExprError::UnexpectedToken(word)),
                });
            }
            other => return Err(ExprError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

fn read_string(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, ExprError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err(ExprError::UnterminatedString),
            Some('\\') => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(escaped) => out.push(escaped),
                None => return Err(ExprError::UnterminatedString),
            },
            Some(c) if c == quote => return Ok(out),
            Some(c) => out.push(c),
        }
    }
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Result<f64, ExprError> {
    let mut raw = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit() || *c == '.') {
        raw.push(c);
    }
    if let Some(e) = chars.next_if(|c| *c == 'e' || *c == 'E') {
        raw.push(e);
        if let Some(sign) = chars.next_if(|c| *c == '+' || *c == '-') {
            raw.push(sign);
        }
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            raw.push(c);
        }
    }
    raw.parse::<f64>().map_err(|_| ExprError::InvalidNumber(raw))
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.cursor += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        match self.advance() {
            Some(token) if token == *expected => Ok(()),
            Some(token) => Err(ExprError::UnexpectedToken(format!("{:?}", token))),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn nested(
        &mut self,
        rule: fn(&mut Self) -> Result<SuValue, ExprError>,
    ) -> Result<SuValue, ExprError> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::TooDeep(MAX_NESTING));
        }
        self.depth += 1;
        let value = rule(self);
        self.depth -= 1;
        value
    }

    fn ternary(&mut self) -> Result<SuValue, ExprError> {
        self.nested(Self::ternary_rule)
    }

    fn ternary_rule(&mut self) -> Result<SuValue, ExprError> {
        let condition = self.or()?;
        if !self.eat(&Token::Question) {
            return Ok(condition);
        }
        let when_true = self.ternary()?;
        self.expect(&Token::Colon)?;
        let when_false = self.ternary()?;
        Ok(if condition.is_truthy() {
            when_true
        } else {
            when_false
        })
    }

    fn or(&mut self) -> Result<SuValue, ExprError> {
        let mut left = self.and()?;
        while self.eat(&Token::Or) {
            let right = self.and()?;
            if !left.is_truthy() {
                left = right;
            }
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<SuValue, ExprError> {
        let mut left = self.equality()?;
        while self.eat(&Token::And) {
            let right = self.equality()?;
            if left.is_truthy() {
                left = right;
            }
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<SuValue, ExprError> {
        let mut left = self.unary()?;
        loop {
            let operator = match self.peek() {
                Some(
                    token @ (Token::StrictEq | Token::StrictNe | Token::LooseEq | Token::LooseNe),
                ) => token.clone(),
                _ => return Ok(left),
            };
            self.cursor += 1;
            let right = self.unary()?;
            let result = match operator {
                Token::StrictEq => strict_equals(&left, &right),
                Token::StrictNe => !strict_equals(&left, &right),
                Token::LooseEq => loose_equals(&left, &right),
                _ => !loose_equals(&left, &right),
            };
            left = SuValue::Bool(result);
        }
    }

    fn unary(&mut self) -> Result<SuValue, ExprError> {
        self.nested(Self::unary_rule)
    }

    fn unary_rule(&mut self) -> Result<SuValue, ExprError> {
        if self.eat(&Token::Not) {
            return Ok(SuValue::Bool(!self.unary()?.is_truthy()));
        }
        if self.eat(&Token::Minus) {
            return match self.unary()? {
                SuValue::Number(value) => Ok(SuValue::Number(-value)),
                _ => Err(ExprError::NonNumericNegation),
            };
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<SuValue, ExprError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(SuValue::Number(value)),
            Some(Token::Str(value)) => Ok(SuValue::String(value)),
            Some(Token::True) => Ok(SuValue::Bool(true)),
            Some(Token::False) => Ok(SuValue::Bool(false)),
            Some(Token::Null) => Ok(SuValue::Null),
            Some(Token::LParen) => {
                let value = self.ternary()?;
                self.expect(&Token::RParen)?;
                Ok(value)
            }
            Some(token) => Err(ExprError::UnexpectedToken(format!("{:?}", token))),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

fn strict_equals(left: &SuValue, right: &SuValue) -> bool {
    match (left, right) {
        (SuValue::Number(a), SuValue::Number(b)) => a == b,
        (SuValue::String(a), SuValue::String(b)) => a == b,
        (SuValue::Bool(a), SuValue::Bool(b)) => a == b,
        (SuValue::Null, SuValue::Null) => true,
        _ => false,
    }
}

fn loose_equals(left: &SuValue, right: &SuValue) -> bool {
    match (left, right) {
        (SuValue::Number(a), SuValue::String(b)) | (SuValue::String(b), SuValue::Number(a)) => {
            string_to_number(b) == *a
        }
        (SuValue::Bool(flag), other) | (other, SuValue::Bool(flag))
            if !matches!(other, SuValue::Bool(_)) =>
        {
            let as_number = SuValue::Number(if *flag { 1.0 } else { 0.0 });
            loose_equals(&as_number, other)
        }
        _ => strict_equals(left, right),
    }
}

fn string_to_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
