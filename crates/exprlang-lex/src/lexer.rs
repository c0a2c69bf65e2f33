//! Character stream to token vector.
//!
//! [`Lexer::tokenize`] consumes a source string and a caller-supplied
//! function map and produces a `Vec<Token>`, rejecting illegal character
//! sequences and illegal token adjacency along the way (see
//! [`crate::state`]).

use rustc_hash::FxHashMap;

use exprlang_util::error::LexError;
use exprlang_util::operator;
use exprlang_util::value::{Callable, Value};
use exprlang_util::Span;

use crate::cursor::Cursor;
use crate::state::{can_transition_to, lookup_state};
use crate::token::{Token, TokenKind};

/// Tokenizes `source` against `functions`, the host's registered callables.
///
/// An identifier lexes as `Function` (rather than `Variable`) exactly when
/// it is a key in `functions`; everything else about dispatch is driven by
/// the leading character, first match wins.
pub fn tokenize(
    source: &str,
    functions: &FxHashMap<String, Callable>,
) -> Result<Vec<Token>, LexError> {
    Lexer::new(source, functions).run()
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    functions: &'a FxHashMap<String, Callable>,
    state: TokenKind,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, functions: &'a FxHashMap<String, Callable>) -> Self {
        Self {
            cursor: Cursor::new(source),
            functions,
            state: TokenKind::Unknown,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_at_end() {
                break;
            }
            let token = self.next_token()?;
            let current_state = lookup_state(self.state);
            if !can_transition_to(current_state, token.kind) {
                return Err(LexError::IllegalTransition {
                    from: format!("{:?}", self.state),
                    to: format!("{:?}", token.kind),
                    span: token.span,
                });
            }
            self.state = token.kind;
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn span(&self, start: usize, start_line: u32, start_col: u32) -> Span {
        Span::new(start, self.cursor.position(), start_line, start_col)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.cursor.position();
        let start_line = self.cursor.line();
        let start_col = self.cursor.column();
        let c = self.cursor.current_char();

        if c.is_ascii_digit() || c == '.' {
            return self.lex_numeric(start, start_line, start_col);
        }
        match c {
            ',' => {
                self.cursor.advance();
                Ok(Token::new(
                    TokenKind::Separator,
                    Value::String(",".to_string()),
                    self.span(start, start_line, start_col),
                    ",",
                ))
            }
            '[' => self.lex_bracket_variable(start, start_line, start_col),
            '\'' | '"' => self.lex_string(start, start_line, start_col, c),
            '(' => {
                self.cursor.advance();
                Ok(Token::new(
                    TokenKind::Clause,
                    Value::String("(".to_string()),
                    self.span(start, start_line, start_col),
                    "(",
                ))
            }
            ')' => {
                self.cursor.advance();
                Ok(Token::new(
                    TokenKind::ClauseClose,
                    Value::String(")".to_string()),
                    self.span(start, start_line, start_col),
                    ")",
                ))
            }
            c if c.is_alphabetic() || c == '_' => self.lex_word(start, start_line, start_col),
            _ => self.lex_symbol_run(start, start_line, start_col),
        }
    }

    fn lex_numeric(
        &mut self,
        start: usize,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, LexError> {
        if self.cursor.current_char() == '0' && matches!(self.cursor.peek_char(1), 'x' | 'X') {
            self.cursor.advance(); // '0'
            self.cursor.advance(); // 'x'
            let digits_start = self.cursor.position();
            while self.cursor.current_char().is_ascii_hexdigit() {
                self.cursor.advance();
            }
            let text = self.cursor.slice_from(start);
            let hex_digits = self.cursor.slice_from(digits_start);
            if hex_digits.is_empty() {
                return Err(LexError::InvalidNumber {
                    text: text.to_string(),
                    span: self.span(start, start_line, start_col),
                });
            }
            let value = i64::from_str_radix(hex_digits, 16).map_err(|_| LexError::InvalidNumber {
                text: text.to_string(),
                span: self.span(start, start_line, start_col),
            })?;
            return Ok(Token::new(
                TokenKind::Numeric,
                Value::Int(value),
                self.span(start, start_line, start_col),
                text,
            ));
        }

        let mut seen_dot = false;
        while self.cursor.current_char().is_ascii_digit()
            || (self.cursor.current_char() == '.' && !seen_dot)
        {
            if self.cursor.current_char() == '.' {
                seen_dot = true;
            }
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        let value: f32 = text.parse().map_err(|_| LexError::InvalidNumber {
            text: text.to_string(),
            span: self.span(start, start_line, start_col),
        })?;
        Ok(Token::new(
            TokenKind::Numeric,
            Value::Float(value),
            self.span(start, start_line, start_col),
            text,
        ))
    }

    fn lex_bracket_variable(
        &mut self,
        start: usize,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, LexError> {
        self.cursor.advance(); // consume '['
        let mut name = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnclosedBracket {
                    span: self.span(start, start_line, start_col),
                });
            }
            let c = self.cursor.current_char();
            if c == ']' {
                self.cursor.advance();
                break;
            }
            if c == '\\' {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    return Err(LexError::UnclosedBracket {
                        span: self.span(start, start_line, start_col),
                    });
                }
                name.push(self.cursor.current_char());
                self.cursor.advance();
                continue;
            }
            name.push(c);
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).to_string();
        Ok(Token::new(
            TokenKind::Variable,
            Value::String(name),
            self.span(start, start_line, start_col),
            text,
        ))
    }

    fn lex_string(
        &mut self,
        start: usize,
        start_line: u32,
        start_col: u32,
        quote: char,
    ) -> Result<Token, LexError> {
        self.cursor.advance(); // consume opening quote
        let mut body = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnclosedQuote {
                    span: self.span(start, start_line, start_col),
                });
            }
            let c = self.cursor.current_char();
            if c == quote {
                self.cursor.advance();
                break;
            }
            if c == '\\' {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    return Err(LexError::UnclosedQuote {
                        span: self.span(start, start_line, start_col),
                    });
                }
                body.push(self.cursor.current_char());
                self.cursor.advance();
                continue;
            }
            body.push(c);
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).to_string();
        Ok(Token::new(
            TokenKind::String,
            Value::String(body),
            self.span(start, start_line, start_col),
            text,
        ))
    }

    fn lex_word(
        &mut self,
        start: usize,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, LexError> {
        while {
            let c = self.cursor.current_char();
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        } {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).to_string();
        let span = self.span(start, start_line, start_col);

        if text == "true" {
            return Ok(Token::new(TokenKind::Boolean, Value::Bool(true), span, text));
        }
        if text == "false" {
            return Ok(Token::new(
                TokenKind::Boolean,
                Value::Bool(false),
                span,
                text,
            ));
        }
        if text.eq_ignore_ascii_case("in") {
            return Ok(Token::new(
                TokenKind::Comparator,
                Value::String("in".to_string()),
                span,
                text,
            ));
        }
        if let Some(callable) = self.functions.get(&text) {
            return Ok(Token::new(
                TokenKind::Function,
                Value::Callable(callable.clone()),
                span,
                text,
            ));
        }
        if text.contains('.') {
            if text.ends_with('.') {
                return Err(LexError::HangingAccessor { span });
            }
            let parts: Vec<String> = text.split('.').map(str::to_string).collect();
            return Ok(Token::new(TokenKind::Accessor, Value::Array(parts), span, text));
        }
        Ok(Token::new(TokenKind::Variable, Value::String(text.clone()), span, text))
    }

    fn lex_symbol_run(
        &mut self,
        start: usize,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, LexError> {
        while {
            let c = self.cursor.current_char();
            !c.is_ascii_alphanumeric()
                && c != '_'
                && !c.is_whitespace()
                && !matches!(c, '(' | ')' | '[' | ']' | '\'' | '"' | ',' | '\0')
        } {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).to_string();
        let span = self.span(start, start_line, start_col);

        let allows_prefix = lookup_state(self.state)
            .valid_next_kinds
            .contains(&TokenKind::Prefix);
        if allows_prefix && operator::is_prefix_symbol(&text) {
            return Ok(Token::new(TokenKind::Prefix, Value::String(text.clone()), span, text));
        }
        if operator::is_modifier_symbol(&text) {
            return Ok(Token::new(TokenKind::Modifier, Value::String(text.clone()), span, text));
        }
        if operator::is_logical_symbol(&text) {
            return Ok(Token::new(
                TokenKind::LogicalOp,
                Value::String(text.clone()),
                span,
                text,
            ));
        }
        if operator::is_comparator_symbol(&text) {
            return Ok(Token::new(
                TokenKind::Comparator,
                Value::String(text.clone()),
                span,
                text,
            ));
        }
        if operator::is_ternary_symbol(&text) {
            return Ok(Token::new(TokenKind::Ternary, Value::String(text.clone()), span, text));
        }
        Err(LexError::UnsupportedSymbol { symbol: text, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn lex(source: &str) -> Result<Vec<Token>, LexError> {
        let functions: FxHashMap<String, Callable> = FxHashMap::default();
        tokenize(source, &functions)
    }

    #[test]
    fn integer_literal_via_hex() {
        let tokens = lex("0xFF").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Numeric);
        assert_eq!(tokens[0].value, Value::Int(255));
    }

    #[test]
    fn hex_with_no_digits_is_an_error() {
        assert!(lex("0x").is_err());
        assert!(lex("0x + 1").is_err());
    }

    #[test]
    fn float_literal() {
        let tokens = lex("3.14").unwrap();
        assert_eq!(tokens[0].value, Value::Float(3.14));
    }

    #[test]
    fn arithmetic_expression_tokenizes() {
        let tokens = lex("51 + 49").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Numeric);
        assert_eq!(tokens[1].kind, TokenKind::Modifier);
        assert_eq!(tokens[2].kind, TokenKind::Numeric);
    }

    #[test]
    fn leading_minus_is_prefix_not_modifier() {
        let tokens = lex("-5").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Prefix);
    }

    #[test]
    fn minus_after_value_is_modifier() {
        let tokens = lex("5 - 3").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Modifier);
    }

    #[test]
    fn dotted_accessor() {
        let tokens = lex("foo.Nested.Funk").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Accessor);
        assert_eq!(
            tokens[0].value,
            Value::Array(vec!["foo".into(), "Nested".into(), "Funk".into()])
        );
    }

    #[test]
    fn trailing_dot_is_hanging_accessor_error() {
        assert!(lex("foo.").is_err());
    }

    #[test]
    fn bracketed_variable_allows_spaces() {
        let tokens = lex("[my var]").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Variable);
        assert_eq!(tokens[0].value, Value::String("my var".to_string()));
    }

    #[test]
    fn unterminated_bracket_is_an_error() {
        assert!(lex("[my var").is_err());
    }

    #[test]
    fn string_literal_with_escape() {
        let tokens = lex(r#""say \"hi\"""#).unwrap();
        assert_eq!(tokens[0].value, Value::String("say \"hi\"".to_string()));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(lex("'unterminated").is_err());
    }

    #[test]
    fn boolean_literals() {
        let tokens = lex("true && false").unwrap();
        assert_eq!(tokens[0].value, Value::Bool(true));
        assert_eq!(tokens[1].kind, TokenKind::LogicalOp);
        assert_eq!(tokens[2].value, Value::Bool(false));
    }

    #[test]
    fn case_insensitive_in_keyword() {
        let tokens = lex("x In y").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Comparator);
        assert_eq!(tokens[1].value, Value::String("in".to_string()));
    }

    #[test]
    fn function_call_resolves_against_function_map() {
        let mut functions: FxHashMap<String, Callable> = FxHashMap::default();
        functions.insert("passthrough".to_string(), Rc::new(|v: &Value| Ok(v.clone())));
        let tokens = tokenize("passthrough(1, 2)", &functions).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Function);
        assert!(matches!(tokens[0].value, Value::Callable(_)));
        assert_eq!(tokens[1].kind, TokenKind::Clause);
        assert_eq!(tokens[3].kind, TokenKind::Separator);
    }

    #[test]
    fn unbalanced_clause_is_rejected_by_state_machine() {
        // ')' cannot legally start an expression.
        assert!(lex(")").is_err());
    }

    #[test]
    fn illegal_adjacency_is_rejected() {
        // Two numeric literals cannot be adjacent with nothing between them.
        assert!(lex("5 5").is_err());
    }

    #[test]
    fn nested_clause_expression() {
        let tokens = lex("(requests_made * requests_succeeded / 100) >= 90").unwrap();
        assert_eq!(tokens.first().unwrap().kind, TokenKind::Clause);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Numeric);
    }

    #[test]
    fn empty_expression_yields_zero_tokens() {
        assert_eq!(lex("").unwrap().len(), 0);
        assert_eq!(lex("   ").unwrap().len(), 0);
    }
}
