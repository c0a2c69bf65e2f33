//! The evaluation stage: one node of the tree the planner builds and the
//! evaluator walks.
//!
//! A stage is a binary tree node that is sometimes used as a leaf (no
//! children), sometimes as a unary node (only `right` set, e.g. a prefix
//! operator or a function call), and sometimes as a true binary node (both
//! children set). Which shape applies is a property of the
//! [`OperatorSymbol`] the node carries, not of the struct itself.

use exprlang_util::error::{Error, TypeError};
use exprlang_util::operator::OperatorSymbol;
use exprlang_util::value::{ParamBag, Value};
use exprlang_util::Span;

/// `left`/`right` values in hand, produce this stage's result. Leaves
/// ignore whichever side their symbol has no child for; the evaluator
/// supplies [`exprlang_util::NONE_SENTINEL`] in that position.
pub type OperatorFn = Box<dyn Fn(&Value, &Value, &ParamBag) -> Result<Value, Error>>;

/// A pre-flight check on one operand, run before `operator_fn`. Returns the
/// failure reason on mismatch, `None` on success.
pub type UnaryCheck = fn(&Value) -> Option<&'static str>;

/// A pre-flight check spanning both operands at once.
pub type CombinedCheck = fn(&Value, &Value) -> Option<&'static str>;

/// One node of a prepared expression's evaluation tree.
pub struct Stage {
    symbol: OperatorSymbol,
    span: Span,
    operator_fn: OperatorFn,
    left_check: Option<UnaryCheck>,
    right_check: Option<UnaryCheck>,
    combined_check: Option<CombinedCheck>,
    left: Option<Box<Stage>>,
    right: Option<Box<Stage>>,
}

impl Stage {
    /// A fresh stage with no children and no checks. Use the `with_*`
    /// methods to attach them.
    pub fn new(
        symbol: OperatorSymbol,
        span: Span,
        operator_fn: impl Fn(&Value, &Value, &ParamBag) -> Result<Value, Error> + 'static,
    ) -> Self {
        Self {
            symbol,
            span,
            operator_fn: Box::new(operator_fn),
            left_check: None,
            right_check: None,
            combined_check: None,
            left: None,
            right: None,
        }
    }

    pub fn with_left_check(mut self, check: UnaryCheck) -> Self {
        self.left_check = Some(check);
        self
    }

    pub fn with_right_check(mut self, check: UnaryCheck) -> Self {
        self.right_check = Some(check);
        self
    }

    pub fn with_combined_check(mut self, check: CombinedCheck) -> Self {
        self.combined_check = Some(check);
        self
    }

    pub fn with_left(mut self, left: Stage) -> Self {
        self.left = Some(Box::new(left));
        self
    }

    pub fn with_right(mut self, right: Stage) -> Self {
        self.right = Some(Box::new(right));
        self
    }

    pub fn symbol(&self) -> OperatorSymbol {
        self.symbol
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn left(&self) -> Option<&Stage> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Stage> {
        self.right.as_deref()
    }

    /// Take ownership of the right child, if any. Used by the associativity
    /// rewrite to restructure a same-precedence chain in place.
    pub(crate) fn take_right(&mut self) -> Option<Box<Stage>> {
        self.right.take()
    }

    pub(crate) fn take_left(&mut self) -> Option<Box<Stage>> {
        self.left.take()
    }

    pub(crate) fn set_left(&mut self, left: Option<Box<Stage>>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Box<Stage>>) {
        self.right = right;
    }

    /// Run this node's checks (if any) and then its operator function.
    /// `left`/`right` are the already-evaluated child results; a leaf
    /// passes [`exprlang_util::NONE_SENTINEL`] for whichever side it has no
    /// child for.
    pub fn invoke(&self, left: &Value, right: &Value, params: &ParamBag) -> Result<Value, Error> {
        if let Some(check) = self.left_check {
            if let Some(reason) = check(left) {
                return Err(self.check_failed(reason));
            }
        }
        if let Some(check) = self.right_check {
            if let Some(reason) = check(right) {
                return Err(self.check_failed(reason));
            }
        }
        if let Some(check) = self.combined_check {
            if let Some(reason) = check(left, right) {
                return Err(self.check_failed(reason));
            }
        }
        (self.operator_fn)(left, right, params)
    }

    fn check_failed(&self, reason: &'static str) -> Error {
        TypeError::CheckFailed {
            symbol: self.symbol.to_string(),
            reason: reason.to_string(),
            span: self.span,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprlang_util::FxHashMap;

    #[test]
    fn leaf_invoke_ignores_checks_when_none_set() {
        let span = Span::new(0, 1, 1, 1);
        let stage = Stage::new(OperatorSymbol::Literal, span, |_, _, _| Ok(Value::Int(5)));
        let params = FxHashMap::default();
        let result = stage
            .invoke(&Value::Bool(true), &Value::Bool(true), &params)
            .unwrap();
        assert_eq!(result, Value::Int(5));
    }

    #[test]
    fn failing_check_short_circuits_operator_fn() {
        let span = Span::new(0, 1, 1, 1);
        let stage = Stage::new(OperatorSymbol::Plus, span, |_, _, _| Ok(Value::Int(1)))
            .with_left_check(|v| if v.is_numeric() { None } else { Some("not numeric") });
        let params = FxHashMap::default();
        let err = stage
            .invoke(&Value::Bool(true), &Value::Int(1), &params)
            .unwrap_err();
        assert!(matches!(err, Error::Type(TypeError::CheckFailed { .. })));
    }
}
