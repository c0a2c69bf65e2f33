//! Precedence-climbing planner: token stream to evaluation stage tree.
//!
//! One method per precedence level, loosest to tightest: [`Planner::plan`]
//! (separator) down through [`Planner::plan_value`] (the leaf). Each binary
//! level follows the same shape — plan the next tighter level for `left`,
//! and if the next token is this level's own operator family, consume it
//! and recurse into *this same level* for `right` — which is what produces
//! a right-leaning chain for `a - b - c` that
//! [`crate::associativity::rewrite_associativity`] immediately straightens
//! out before the node is handed back up the chain.

use exprlang_lex::token::{Token, TokenKind};
use exprlang_util::diagnostic::{DiagnosticCode, Handler};
use exprlang_util::error::ParseError;
use exprlang_util::operator::{self, OperatorSymbol};
use exprlang_util::value::Value;
use exprlang_util::Span;

use crate::associativity::rewrite_associativity;
use crate::operators;
use crate::stage::Stage;

type PlanResult = Result<Option<Stage>, ParseError>;

/// Plans a full token stream into one stage tree, erroring if any tokens
/// are left unconsumed when the chain bottoms out and returns.
///
/// Every symbol planned into a stage that has no evaluator implementation
/// (the bitwise/shift family, the regex comparators, `IN`, and the
/// ternary/coalesce family) records a `W_OPERATOR_UNIMPLEMENTED` warning
/// on `diagnostics` — preparing such an expression still succeeds, but a
/// caller inspecting the handler learns the stage will raise
/// `EvalError::NotImplemented` if evaluation ever reaches it.
pub fn plan(tokens: &[Token], diagnostics: &Handler) -> Result<Option<Stage>, ParseError> {
    let mut planner = Planner {
        tokens,
        pos: 0,
        diagnostics,
    };
    let root = planner.plan_separator()?;
    if let Some(token) = planner.peek() {
        return Err(ParseError::UnplannableToken {
            kind: format!("{:?}", token.kind),
            span: token.span,
        });
    }
    Ok(root)
}

struct Planner<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: &'a Handler,
}

impl<'a> Planner<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> &'a Token {
        let token = &self.tokens[self.pos];
        self.pos += 1;
        token
    }

    /// The text carried by an operator-family token; every such token's
    /// value is a `Value::String` (see `exprlang-lex`'s lexer), never read
    /// back through `lexeme`.
    fn operator_text(token: &'a Token) -> &'a str {
        match &token.value {
            Value::String(s) => s.as_str(),
            _ => unreachable!("operator-family tokens always carry a Value::String"),
        }
    }

    /// Records a `W_OPERATOR_UNIMPLEMENTED` warning if `symbol` has no
    /// evaluator implementation; a no-op otherwise.
    fn note_if_unimplemented(&self, symbol: OperatorSymbol, span: Span) {
        if is_unimplemented(symbol) {
            self.diagnostics
                .build_warning(span, format!("operator {symbol} is planned but not implemented"))
                .code(DiagnosticCode::W_OPERATOR_UNIMPLEMENTED)
                .with_help("evaluating this stage will raise EvalError::NotImplemented")
                .emit(self.diagnostics);
        }
    }

    /// `,` — the loosest level. A chain of commas folds into one
    /// `Value::List` via repeated `SEPARATE` stages.
    fn plan_separator(&mut self) -> PlanResult {
        let left = self.plan_ternary()?;
        let Some(token) = self.peek() else {
            return Ok(left);
        };
        if token.kind != TokenKind::Separator {
            return Ok(left);
        }
        let span = token.span;
        self.advance();
        let left = left.ok_or(ParseError::EmptyStage { span })?;
        let right = self.plan_separator()?.ok_or(ParseError::EmptyStage { span })?;
        self.note_if_unimplemented(OperatorSymbol::Separate, span);
        Ok(Some(rewrite_associativity(binary_stage(OperatorSymbol::Separate, span, left, right))))
    }

    /// `?`, `:`, `??`. Planned uniformly as binary stages like every other
    /// level; the operator functions for all three raise
    /// `EvalError::NotImplemented` at evaluation time (see
    /// `crate::operators::not_implemented`).
    fn plan_ternary(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_logical_or,
            Self::plan_ternary,
            TokenKind::Ternary,
            operator::ternary_symbol,
        )
    }

    fn plan_logical_or(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_logical_and,
            Self::plan_logical_or,
            TokenKind::LogicalOp,
            |text| operator::logical_symbol(text).filter(|s| *s == OperatorSymbol::Or),
        )
    }

    fn plan_logical_and(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_comparator,
            Self::plan_logical_and,
            TokenKind::LogicalOp,
            |text| operator::logical_symbol(text).filter(|s| *s == OperatorSymbol::And),
        )
    }

    fn plan_comparator(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_bitwise,
            Self::plan_comparator,
            TokenKind::Comparator,
            operator::comparator_symbol,
        )
    }

    fn plan_bitwise(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_shift,
            Self::plan_bitwise,
            TokenKind::Modifier,
            operator::bitwise_symbol,
        )
    }

    fn plan_shift(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_additive,
            Self::plan_shift,
            TokenKind::Modifier,
            operator::shift_symbol,
        )
    }

    fn plan_additive(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_multiplicative,
            Self::plan_additive,
            TokenKind::Modifier,
            operator::additive_symbol,
        )
    }

    fn plan_multiplicative(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_exponential,
            Self::plan_multiplicative,
            TokenKind::Modifier,
            operator::multiplicative_symbol,
        )
    }

    fn plan_exponential(&mut self) -> PlanResult {
        self.plan_binary_level(
            Self::plan_prefix,
            Self::plan_exponential,
            TokenKind::Modifier,
            operator::exponential_symbol,
        )
    }

    /// The generic shape shared by every binary level above: plan `left`
    /// one level tighter, and if the next token both carries this level's
    /// kind and resolves against `resolve`, consume it and plan `right` by
    /// recursing into `same_level`.
    fn plan_binary_level(
        &mut self,
        next_tighter: fn(&mut Self) -> PlanResult,
        same_level: fn(&mut Self) -> PlanResult,
        kind: TokenKind,
        resolve: fn(&str) -> Option<OperatorSymbol>,
    ) -> PlanResult {
        let left = next_tighter(self)?;
        let Some(token) = self.peek() else {
            return Ok(left);
        };
        if token.kind != kind {
            return Ok(left);
        }
        let Some(symbol) = resolve(Self::operator_text(token)) else {
            return Ok(left);
        };
        let span = token.span;
        self.advance();
        let left = left.ok_or(ParseError::EmptyStage { span })?;
        let right = same_level(self)?.ok_or(ParseError::EmptyStage { span })?;
        self.note_if_unimplemented(symbol, span);
        Ok(Some(rewrite_associativity(binary_stage(symbol, span, left, right))))
    }

    /// Unary prefix operators: `-`, `!`, `~`. Unlike the binary levels,
    /// there is no `left` operand to plan first; a chain of prefixes (`- -
    /// 5`) recurses into itself, and the eventual operand is planned one
    /// level tighter (`FUNCTIONAL`), so `-foo()` plans as `-(foo())`.
    fn plan_prefix(&mut self) -> PlanResult {
        let Some(token) = self.peek() else {
            return self.plan_functional();
        };
        if token.kind != TokenKind::Prefix {
            return self.plan_functional();
        }
        let span = token.span;
        let symbol = operator::prefix_symbol(Self::operator_text(token))
            .expect("a Prefix-kind token always resolves against prefix_symbol");
        self.advance();
        let right = self
            .plan_prefix()?
            .ok_or(ParseError::EmptyStage { span })?;
        let operator_fn = match symbol {
            OperatorSymbol::Negate => operators::negate(span),
            OperatorSymbol::Invert => operators::invert(span),
            _ => operators::not_implemented(symbol, span),
        };
        self.note_if_unimplemented(symbol, span);
        Ok(Some(
            Stage::new(symbol, span, move |l, r, p| operator_fn(l, r, p)).with_right(right),
        ))
    }

    /// `FUNCTION` tokens: the lexer's state machine guarantees a `FUNCTION`
    /// is always immediately followed by a `CLAUSE`, so this level parses
    /// that clause itself rather than delegating to [`Planner::plan_value`]
    /// — unlike a bare grouping clause, an empty argument list (`f()`) is
    /// not an error, it is a call with the none-sentinel as its argument.
    /// Comma-separated arguments fold into one `Value::List` the same way
    /// a grouping clause's contents do, via [`Planner::plan_separator`].
    fn plan_functional(&mut self) -> PlanResult {
        let Some(token) = self.peek() else {
            return self.plan_accessor();
        };
        if token.kind != TokenKind::Function {
            return self.plan_accessor();
        }
        let span = token.span;
        let callable = match &token.value {
            Value::Callable(c) => c.clone(),
            _ => unreachable!("a Function-kind token always carries a Value::Callable"),
        };
        self.advance();
        // The state machine guarantees the next token is CLAUSE.
        self.advance();
        let args = self.plan_separator()?;
        match self.peek() {
            Some(token) if token.kind == TokenKind::ClauseClose => {
                self.advance();
            }
            _ => return Err(ParseError::UnbalancedClause { span }),
        }
        let operator_fn = operators::functional(callable);
        let mut stage = Stage::new(OperatorSymbol::Functional, span, move |l, r, p| {
            operator_fn(l, r, p)
        });
        if let Some(args) = args {
            stage = stage.with_right(args);
        }
        Ok(Some(stage))
    }

    /// `ACCESSOR` tokens: a dotted/bracketed path, resolved against the
    /// parameter bag at evaluation time. A clause immediately following an
    /// accessor (`foo.bar(...)`) is rejected — this grammar has no notion
    /// of a method call.
    fn plan_accessor(&mut self) -> PlanResult {
        let Some(token) = self.peek() else {
            return self.plan_value();
        };
        if token.kind != TokenKind::Accessor {
            return self.plan_value();
        }
        let span = token.span;
        let path = match &token.value {
            Value::Array(segments) => segments.clone(),
            _ => unreachable!("an Accessor-kind token always carries a Value::Array"),
        };
        self.advance();
        if let Some(next) = self.peek() {
            if next.kind == TokenKind::Clause {
                return Err(ParseError::UnsupportedConstruct {
                    what: "a clause immediately following an accessor (method calls)".to_string(),
                    span: next.span,
                });
            }
        }
        let operator_fn = operators::access(span, path);
        Ok(Some(Stage::new(OperatorSymbol::Access, span, move |l, r, p| {
            operator_fn(l, r, p)
        })))
    }

    /// The leaf level: literals, variables, and parenthesized
    /// subexpressions. A stray `CLAUSE_CLOSE` (an empty grouping clause or
    /// an empty argument list) rewinds without consuming and yields `None`
    /// rather than erroring — the caller decides whether that is fine (a
    /// zero-argument function call) or not (a bare `()`).
    fn plan_value(&mut self) -> PlanResult {
        let Some(token) = self.peek() else {
            return Ok(None);
        };
        match token.kind {
            TokenKind::Clause => self.plan_clause(),
            TokenKind::ClauseClose => Ok(None),
            TokenKind::Variable => {
                self.advance();
                let name = match &token.value {
                    Value::String(s) => s.clone(),
                    _ => unreachable!("a Variable-kind token always carries a Value::String"),
                };
                let operator_fn = operators::variable(token.span, name);
                Ok(Some(Stage::new(
                    OperatorSymbol::Literal,
                    token.span,
                    move |l, r, p| operator_fn(l, r, p),
                )))
            }
            TokenKind::Numeric | TokenKind::String | TokenKind::Boolean | TokenKind::Pattern => {
                self.advance();
                let operator_fn = operators::literal(token.value.clone());
                Ok(Some(Stage::new(
                    OperatorSymbol::Literal,
                    token.span,
                    move |l, r, p| operator_fn(l, r, p),
                )))
            }
            _ => Ok(None),
        }
    }

    fn plan_clause(&mut self) -> PlanResult {
        let open = self.advance();
        let span = open.span;
        let inner = self.plan_separator()?;
        match self.peek() {
            Some(token) if token.kind == TokenKind::ClauseClose => {
                self.advance();
            }
            _ => return Err(ParseError::UnbalancedClause { span }),
        }
        match inner {
            Some(inner) => {
                let operator_fn = operators::noop(span);
                Ok(Some(
                    Stage::new(OperatorSymbol::Noop, span, move |l, r, p| operator_fn(l, r, p))
                        .with_right(inner),
                ))
            }
            None => Err(ParseError::EmptyStage { span }),
        }
    }
}

fn binary_stage(symbol: OperatorSymbol, span: Span, left: Stage, right: Stage) -> Stage {
    let operator_fn = binary_operator_fn(symbol, span);
    Stage::new(symbol, span, move |l, r, p| operator_fn(l, r, p))
        .with_left(left)
        .with_right(right)
}

/// True for the symbols `binary_operator_fn`/`plan_prefix` fall back to
/// `operators::not_implemented` for: the bitwise and shift family, the
/// regex comparators, `IN`, and the ternary/coalesce family.
fn is_unimplemented(symbol: OperatorSymbol) -> bool {
    use OperatorSymbol::*;
    matches!(
        symbol,
        Req | Nreq
            | In
            | BitwiseAnd
            | BitwiseOr
            | BitwiseXor
            | BitwiseLshift
            | BitwiseRshift
            | BitwiseNot
            | TernaryTrue
            | TernaryFalse
            | Coalesce
    )
}

fn binary_operator_fn(symbol: OperatorSymbol, span: Span) -> crate::stage::OperatorFn {
    use OperatorSymbol::*;
    match symbol {
        Eq => operators::eq(span),
        Neq => operators::neq(span),
        Gt => operators::gt(span),
        Lt => operators::lt(span),
        Gte => operators::gte(span),
        Lte => operators::lte(span),
        And => operators::and(span),
        Or => operators::or(span),
        Plus => operators::plus(span),
        Minus => operators::minus(span),
        Multiply => operators::multiply(span),
        Divide => operators::divide(span),
        Modulus => operators::modulus(span),
        Exponent => operators::exponent(span),
        Separate => operators::separate(span),
        other => operators::not_implemented(other, span),
    }
}
