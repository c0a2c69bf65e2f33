//! The evaluator: walks a planned [`Stage`] tree post-order against a
//! parameter bag and produces a [`Value`].
//!
//! Planning has already decided which operator function runs at each node
//! and which pre-flight checks gate it; this crate's only job is the
//! recursion that supplies each node's `left`/`right` operand values before
//! calling [`Stage::invoke`]. A leaf has no children to recurse into, so
//! both sides are [`NONE_SENTINEL`] — the same convention the planner's own
//! unary/leaf stages are built against.

use exprlang_plan::Stage;
use exprlang_util::error::Error;
use exprlang_util::value::{ParamBag, Value};
use exprlang_util::NONE_SENTINEL;

/// Evaluate `root` against `params`, recursing into children before running
/// the node's own checks and operator function.
///
/// A stage with no children (a literal, a variable reference) evaluates
/// immediately. A stage with only a `right` child (a prefix operator, a
/// function call) evaluates that child and passes [`NONE_SENTINEL`] as
/// `left`. A stage with both children evaluates left before right, matching
/// the source order an author would expect a side-effecting callable to
/// observe.
pub fn evaluate_tree(root: &Stage, params: &ParamBag) -> Result<Value, Error> {
    let left = match root.left() {
        Some(child) => evaluate_tree(child, params)?,
        None => NONE_SENTINEL,
    };
    let right = match root.right() {
        Some(child) => evaluate_tree(child, params)?,
        None => NONE_SENTINEL,
    };
    root.invoke(&left, &right, params)
}

/// Evaluate an optional stage, returning [`NONE_SENTINEL`] for `None`. The
/// facade's "empty expression" case plans to `None` rather than a `NOOP`
/// stage in some callers' mental model, so this spares them the match.
pub fn evaluate_optional(root: Option<&Stage>, params: &ParamBag) -> Result<Value, Error> {
    match root {
        Some(stage) => evaluate_tree(stage, params),
        None => Ok(NONE_SENTINEL),
    }
}
