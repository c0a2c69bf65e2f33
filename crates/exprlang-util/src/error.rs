//! Core error types shared across the lexer, planner, and evaluator crates.
//!
//! [`SymbolError`], [`SourceMapError`], [`IndexVecError`], and
//! [`DiagnosticError`] cover failures internal to this crate's own
//! foundation types. [`LexError`], [`ParseError`], [`TypeError`],
//! [`NameError`], and [`EvalError`] are the per-phase error taxonomy raised
//! while preparing or evaluating an expression; [`Error`] unifies them
//! behind one enum so a caller of `prepare`/`evaluate` has a single error
//! type to match on.

use crate::span::Span;
use thiserror::Error;

/// Error type for symbol interning operations
#[derive(Debug, Error)]
pub enum SymbolError {
    /// Failed to intern a symbol
    #[error("Failed to intern symbol: {0}")]
    InternFailed(String),

    /// Symbol not found in the interner
    #[error("Symbol not found: index {index}")]
    NotFound { index: u32 },
}

/// Error type for source map operations
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// File not found in the source map
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Invalid span range
    #[error("Invalid span: start {start} > end {end}")]
    InvalidSpan { start: usize, end: usize },

    /// Span out of bounds for file
    #[error("Span out of bounds: file has {file_len} bytes, span is {span_start}..{span_end}")]
    SpanOutOfBounds {
        file_len: usize,
        span_start: usize,
        span_end: usize,
    },

    /// Invalid line number
    #[error("Invalid line number: {line} (file has {max_lines} lines)")]
    InvalidLineNumber { line: usize, max_lines: usize },

    /// Failed to extract source snippet
    #[error("Failed to extract source: {0}")]
    ExtractFailed(String),
}

/// Error type for index vector operations
#[derive(Debug, Error)]
pub enum IndexVecError {
    /// Index out of bounds
    #[error("Index out of bounds: index {index}, length {length}")]
    OutOfBounds { index: usize, length: usize },

    /// Invalid index
    #[error("Invalid index: {0}")]
    InvalidIndex(String),
}

/// Error type for diagnostic operations
#[derive(Debug, Error)]
pub enum DiagnosticError {
    /// Failed to format diagnostic
    #[error("Failed to format diagnostic: {0}")]
    FormatFailed(String),

    /// Invalid diagnostic code
    #[error("Invalid diagnostic code: {0}")]
    InvalidCode(String),
}

/// Result type alias for symbol operations
pub type SymbolResult<T> = std::result::Result<T, SymbolError>;

/// Result type alias for source map operations
pub type SourceMapResult<T> = std::result::Result<T, SourceMapError>;

/// Result type alias for index vector operations
pub type IndexVecResult<T> = std::result::Result<T, IndexVecError>;

/// Result type alias for diagnostic operations
pub type DiagnosticResult<T> = std::result::Result<T, DiagnosticError>;

/// Errors raised while tokenizing a source string.
#[derive(Debug, Error)]
pub enum LexError {
    /// A `[` accessor or `(` clause was never closed
    #[error("unclosed bracket starting at {span:?}")]
    UnclosedBracket { span: Span },

    /// A `'` or `"` string literal was never closed
    #[error("unclosed string literal starting at {span:?}")]
    UnclosedQuote { span: Span },

    /// An accessor path ends with a trailing `.`
    #[error("accessor ends with a trailing '.' at {span:?}")]
    HangingAccessor { span: Span },

    /// A run of non-alphanumeric characters matched none of the operator maps
    #[error("unsupported symbol {symbol:?} at {span:?}")]
    UnsupportedSymbol { symbol: String, span: Span },

    /// A numeric literal (including `0x` with no following hex digits) failed to parse
    #[error("invalid numeric literal {text:?} at {span:?}")]
    InvalidNumber { text: String, span: Span },

    /// The next token's kind is not in the current state's
    /// `valid_next_kinds` set. The reference lexer silently returns the
    /// partial token sequence here instead of erroring; this implementation
    /// surfaces it as a hard error (see DESIGN.md's Open Question decision).
    #[error("token {to} cannot follow {from} at {span:?}")]
    IllegalTransition {
        from: String,
        to: String,
        span: Span,
    },
}

/// Errors raised while planning a token stream into a stage tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A precedence level was asked to plan a stage but the token stream
    /// offered nothing to plan (e.g. an empty `()` clause)
    #[error("expected an expression at {span:?}")]
    EmptyStage { span: Span },

    /// No level in the precedence chain could make sense of the next token
    #[error("could not plan token {kind:?} at {span:?}")]
    UnplannableToken { kind: String, span: Span },

    /// A construct the grammar does not support was encountered (e.g. a
    /// clause immediately following an accessor)
    #[error("unsupported construct: {what} at {span:?}")]
    UnsupportedConstruct { what: String, span: Span },

    /// A `(` was never matched by a `)` before the token stream ran out
    #[error("unbalanced clause starting at {span:?}")]
    UnbalancedClause { span: Span },
}

/// Errors raised when an operand fails its operator's type check.
#[derive(Debug, Error)]
pub enum TypeError {
    /// The left, right, or combined type check for `symbol` rejected its operand(s)
    #[error("operand type check failed for operator {symbol} at {span:?}: {reason}")]
    CheckFailed {
        symbol: String,
        reason: String,
        span: Span,
    },
}

/// Errors raised when a name cannot be resolved against the parameter bag
/// or the host's function map.
#[derive(Debug, Error)]
pub enum NameError {
    /// A bare variable reference has no entry in the parameter bag
    #[error("variable {name:?} not found in parameters at {span:?}")]
    UndefinedVariable { name: String, span: Span },

    /// The first component of an accessor path has no entry in the parameter bag
    #[error("accessor root {name:?} not found in parameters at {span:?}")]
    UndefinedAccessorRoot { name: String, span: Span },

    /// A function call names a function the host did not register
    #[error("function {name:?} is not registered at {span:?}")]
    UndefinedFunction { name: String, span: Span },
}

/// Errors raised while walking the stage tree to produce a value.
#[derive(Debug, Error)]
pub enum EvalError {
    /// An arithmetic operation is undefined for its operands (e.g. a
    /// negative exponent combination the host's numeric type can't represent)
    #[error("arithmetic domain error at {span:?}: {reason}")]
    DomainError { reason: String, span: Span },

    /// Division or modulo by zero
    #[error("division by zero at {span:?}")]
    DivisionByZero { span: Span },

    /// The operator symbol is recognized and planned but has no evaluator
    /// implementation (ternary, coalesce, regex match, bitwise/shift, `in`)
    #[error("operator {symbol} is not implemented at {span:?}")]
    NotImplemented { symbol: String, span: Span },

    /// A callable was invoked with a different argument count than it expects
    #[error("function called with {got} arguments, expected {expected} at {span:?}")]
    ArityMismatch {
        expected: usize,
        got: usize,
        span: Span,
    },
}

/// The unified error type returned by [`crate::value`] coercions and, at the
/// crate boundary, by `prepare`/`evaluate`.
///
/// Each variant wraps the phase-specific error type from the crate that
/// owns that phase (lexer, planner, or evaluator), so callers can match on
/// `Error` without needing to depend on every crate individually.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure while tokenizing the source string
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Failure while planning the token stream into a stage tree
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An operand failed an operator's type check
    #[error(transparent)]
    Type(#[from] TypeError),

    /// A variable, accessor root, or function name could not be resolved
    #[error(transparent)]
    Name(#[from] NameError),

    /// Failure while evaluating the stage tree
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Result type alias for lexer operations
pub type LexResult<T> = std::result::Result<T, LexError>;

/// Result type alias for planner operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for type-check operations
pub type TypeResult<T> = std::result::Result<T, TypeError>;

/// Result type alias for name resolution operations
pub type NameResult<T> = std::result::Result<T, NameError>;

/// Result type alias for evaluator operations
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Result type alias for the unified error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn lex_error_converts_into_unified_error() {
        let err: Error = LexError::UnclosedQuote { span: Span::DUMMY }.into();
        assert!(matches!(err, Error::Lex(LexError::UnclosedQuote { .. })));
    }

    #[test]
    fn eval_error_not_implemented_converts() {
        let err: Error = EvalError::NotImplemented {
            symbol: "COALESCE".to_string(),
            span: Span::DUMMY,
        }
        .into();
        assert!(matches!(err, Error::Eval(EvalError::NotImplemented { .. })));
    }

    #[test]
    fn name_error_display_mentions_name() {
        let err = NameError::UndefinedVariable {
            name: "amount".to_string(),
            span: Span::DUMMY,
        };
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn type_error_display_mentions_symbol() {
        let err = TypeError::CheckFailed {
            symbol: "PLUS".to_string(),
            reason: "right operand is not numeric".to_string(),
            span: Span::DUMMY,
        };
        assert!(err.to_string().contains("PLUS"));
    }
}
