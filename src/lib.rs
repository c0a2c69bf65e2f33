//! An embeddable evaluator for arithmetic/logical/relational expressions
//! over a named parameter bag.
//!
//! ```
//! use exprlang::{Expression, Span};
//! use exprlang_util::FxHashMap;
//!
//! let functions = FxHashMap::default();
//! let expr = Expression::prepare("51 + 49", &functions).unwrap();
//!
//! let params = FxHashMap::default();
//! assert_eq!(expr.evaluate(&params).unwrap().as_numeric(Span::DUMMY).unwrap(), 100.0);
//! ```
//!
//! This crate is the one public dependency a host takes: it wires
//! [`exprlang_lex::tokenize`], [`exprlang_plan::plan`], and
//! [`exprlang_eval::evaluate_optional`] together behind a prepare-once,
//! evaluate-many [`Expression`]. The lexer, planner, and evaluator crates
//! underneath are reusable on their own (an embedder that only wants
//! tokens for syntax highlighting, say, can depend on `exprlang-lex`
//! directly), but most hosts only ever touch this crate.

use exprlang_util::diagnostic::{Diagnostic, Handler};
use exprlang_util::value::{Callable, ParamBag, Value};
use exprlang_util::FxHashMap;

use exprlang_lex::Token;
use exprlang_plan::Stage;

pub use exprlang_util::error::{Error, EvalError, LexError, NameError, ParseError, TypeError};
pub use exprlang_util::value::NONE_SENTINEL;
pub use exprlang_util::Span;
pub use exprlang_util::{FxHashMap as Parameters, Value as ExprValue};

/// A prepared expression: an original source string, its token vector (kept
/// for introspection), and the planned stage tree, ready to be evaluated
/// against any number of parameter bags without re-lexing or re-planning.
///
/// Diagnostics collected while planning (currently: operator slots planned
/// but not implemented) are retained alongside the tree rather than
/// discarded once preparation succeeds, since they describe a property of
/// the prepared expression itself, not of any one evaluation.
pub struct Expression {
    original_source: String,
    tokens: Vec<Token>,
    root_stage: Option<Stage>,
    diagnostics: Vec<Diagnostic>,
}

impl Expression {
    /// Lex and plan `source` against `functions`, the host's registered
    /// callables. An empty `source` prepares successfully into an
    /// expression with no root stage, which [`Expression::evaluate`]
    /// resolves to [`NONE_SENTINEL`].
    pub fn prepare(source: &str, functions: &FxHashMap<String, Callable>) -> Result<Self, Error> {
        let tokens = exprlang_lex::tokenize(source, functions)?;
        let diagnostics = Handler::new();
        let root_stage = exprlang_plan::plan(&tokens, &diagnostics)?;
        Ok(Self {
            original_source: source.to_string(),
            tokens,
            root_stage,
            diagnostics: diagnostics.diagnostics(),
        })
    }

    /// Evaluate the prepared tree against `params`. Calling this repeatedly
    /// with different parameter bags re-uses the same tree; no re-lexing or
    /// re-planning occurs.
    pub fn evaluate(&self, params: &ParamBag) -> Result<Value, Error> {
        exprlang_eval::evaluate_optional(self.root_stage.as_ref(), params)
    }

    /// The token vector produced during preparation, retained for
    /// debugging/introspection.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The original source string this expression was prepared from.
    pub fn source(&self) -> &str {
        &self.original_source
    }

    /// Non-fatal notes recorded while planning, e.g. an operator slot that
    /// planned cleanly but has no evaluator implementation and will raise
    /// [`EvalError::NotImplemented`] if its stage is ever reached.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
