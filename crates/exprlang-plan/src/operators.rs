//! Concrete operator implementations, one builder per planned
//! [`OperatorSymbol`].
//!
//! Each builder captures the stage's span and returns a boxed
//! [`crate::stage::OperatorFn`]. Every operator here leans on
//! [`Value::as_numeric`]/[`Value::as_string`]/[`Value::as_bool`], or an
//! explicit match on the operand's shape (`ACCESS`), for its own type
//! checking, so none of the planner's stages attach a separate
//! `left_check`/`right_check`/`combined_check` — doing both would just run
//! the same check twice. Those fields stay on [`crate::stage::Stage`] for a
//! future operator whose requirement genuinely isn't one of `Value`'s
//! existing coercions.
//!
//! Symbols the reference behaviour leaves unimplemented — the bitwise and
//! shift family, the two regex comparators, `IN`, and the ternary/coalesce
//! family — resolve to [`not_implemented`], which plans cleanly but raises
//! `EvalError::NotImplemented` the moment it is evaluated.

use exprlang_util::error::{EvalError, NameError};
use exprlang_util::operator::OperatorSymbol;
use exprlang_util::value::Value;
use exprlang_util::{Span, Symbol};

use crate::stage::OperatorFn;

fn numeric_binary(
    span: Span,
    f: impl Fn(f64, f64) -> f64 + 'static,
) -> OperatorFn {
    Box::new(move |left, right, _params| {
        let l = left.as_numeric(span)?;
        let r = right.as_numeric(span)?;
        Ok(Value::Float(f(l, r) as f32))
    })
}

pub fn plus(span: Span) -> OperatorFn {
    Box::new(move |left, right, _params| {
        if left.is_numeric() && right.is_numeric() {
            Ok(Value::Float((left.as_numeric(span)? + right.as_numeric(span)?) as f32))
        } else {
            Ok(Value::String(format!(
                "{}{}",
                left.as_string(span)?,
                right.as_string(span)?
            )))
        }
    })
}

pub fn minus(span: Span) -> OperatorFn {
    numeric_binary(span, |l, r| l - r)
}

pub fn multiply(span: Span) -> OperatorFn {
    numeric_binary(span, |l, r| l * r)
}

pub fn divide(span: Span) -> OperatorFn {
    Box::new(move |left, right, _params| {
        let l = left.as_numeric(span)?;
        let r = right.as_numeric(span)?;
        if r == 0.0 {
            return Err(EvalError::DivisionByZero { span }.into());
        }
        Ok(Value::Float((l / r) as f32))
    })
}

pub fn modulus(span: Span) -> OperatorFn {
    Box::new(move |left, right, _params| {
        let l = left.as_numeric(span)?;
        let r = right.as_numeric(span)?;
        if r == 0.0 {
            return Err(EvalError::DivisionByZero { span }.into());
        }
        Ok(Value::Float((l % r) as f32))
    })
}

pub fn exponent(span: Span) -> OperatorFn {
    numeric_binary(span, |l, r| l.powf(r))
}

fn comparator(span: Span, accept: fn(std::cmp::Ordering) -> bool) -> OperatorFn {
    Box::new(move |left, right, _params| {
        let ordering = left
            .partial_compare(right)
            .ok_or_else(|| EvalError::DomainError {
                reason: format!(
                    "cannot compare {} with {}",
                    left.type_name(),
                    right.type_name()
                ),
                span,
            })?;
        Ok(Value::Bool(accept(ordering)))
    })
}

/// `==`/`!=` use `Value`'s own cross-tag equality (so `1 == 1.0` holds)
/// rather than `partial_compare`, since equality is meaningful for
/// booleans and other shapes `partial_compare` does not order.
pub fn eq(_span: Span) -> OperatorFn {
    Box::new(move |left, right, _params| Ok(Value::Bool(left == right)))
}

pub fn neq(_span: Span) -> OperatorFn {
    Box::new(move |left, right, _params| Ok(Value::Bool(left != right)))
}

pub fn gt(span: Span) -> OperatorFn {
    comparator(span, |o| o == std::cmp::Ordering::Greater)
}

pub fn lt(span: Span) -> OperatorFn {
    comparator(span, |o| o == std::cmp::Ordering::Less)
}

pub fn gte(span: Span) -> OperatorFn {
    comparator(span, |o| o != std::cmp::Ordering::Less)
}

pub fn lte(span: Span) -> OperatorFn {
    comparator(span, |o| o != std::cmp::Ordering::Greater)
}

pub fn and(span: Span) -> OperatorFn {
    Box::new(move |left, right, _params| {
        Ok(Value::Bool(left.as_bool(span)? && right.as_bool(span)?))
    })
}

pub fn or(span: Span) -> OperatorFn {
    Box::new(move |left, right, _params| {
        Ok(Value::Bool(left.as_bool(span)? || right.as_bool(span)?))
    })
}

pub fn negate(span: Span) -> OperatorFn {
    Box::new(move |_left, right, _params| Ok(Value::Float((-right.as_numeric(span)?) as f32)))
}

pub fn invert(span: Span) -> OperatorFn {
    Box::new(move |_left, right, _params| Ok(Value::Bool(!right.as_bool(span)?)))
}

/// The function-call node: `left` is unused (a function token carries its
/// callable directly, captured here rather than routed through a child
/// stage), `right` is the already-evaluated argument value.
pub fn functional(callable: exprlang_util::value::Callable) -> OperatorFn {
    Box::new(move |_left, right, _params| callable(right))
}

/// A literal or variable leaf. `value` is the token's own payload for a
/// literal, or a closure that looks the name up in the parameter bag for a
/// variable; both shapes return a fixed value independent of `left`/`right`.
pub fn literal(value: Value) -> OperatorFn {
    Box::new(move |_left, _right, _params| Ok(value.clone()))
}

/// Interns `name` once at plan time so every subsequent evaluation of this
/// stage looks it up in the parameter bag by a cheap `&'static str` rather
/// than re-hashing a freshly allocated `String`.
pub fn variable(span: Span, name: String) -> OperatorFn {
    let symbol = Symbol::intern(&name);
    Box::new(move |_left, _right, params| {
        params
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| NameError::UndefinedVariable {
                name: symbol.as_str().to_string(),
                span,
            }.into())
    })
}

/// Walks a dotted/bracketed accessor path through the parameter bag: the
/// first segment resolves against `params` directly, each subsequent
/// segment indexes into the previous segment's `Value::Map`. Every segment
/// is interned once at plan time for the same reason [`variable`] is.
pub fn access(span: Span, path: Vec<String>) -> OperatorFn {
    let symbols: Vec<Symbol> = path.iter().map(|s| Symbol::intern(s)).collect();
    Box::new(move |_left, _right, params| {
        let mut segments = symbols.iter();
        let root = segments.next().expect("accessor path is never empty");
        let mut current = params
            .get(root.as_str())
            .cloned()
            .ok_or_else(|| NameError::UndefinedAccessorRoot {
                name: root.as_str().to_string(),
                span,
            })?;
        for segment in segments {
            let map = match &current {
                Value::Map(map) => map,
                other => {
                    return Err(EvalError::DomainError {
                        reason: format!(
                            "cannot access field {:?} of a {}",
                            segment.as_str(),
                            other.type_name()
                        ),
                        span,
                    }
                    .into())
                }
            };
            current = map.get(segment.as_str()).cloned().ok_or_else(|| {
                NameError::UndefinedAccessorRoot {
                    name: segment.as_str().to_string(),
                    span,
                }
            })?;
        }
        Ok(current)
    })
}

/// `SEPARATE`: accumulates comma-joined arguments into one `Value::List`.
/// `left` is the accumulator so far (a plain value for the first comma, a
/// `List` for every comma after that); `right` is the newly parsed operand.
pub fn separate(_span: Span) -> OperatorFn {
    Box::new(move |left, right, _params| {
        let mut items = match left {
            Value::List(items) => items.clone(),
            other => vec![other.clone()],
        };
        items.push(right.clone());
        Ok(Value::List(items))
    })
}

/// `NOOP`: a parenthesized grouping. Returns its right child's value
/// unchanged, or the none-sentinel when there is no right child (an empty
/// top-level expression).
pub fn noop(_span: Span) -> OperatorFn {
    Box::new(move |_left, right, _params| Ok(right.clone()))
}

/// A planned-but-unsupported symbol: the bitwise/shift family, `=~`/`!~`,
/// `IN`, and the ternary/coalesce family all plan into a stage carrying
/// this, so malformed expressions using them still fail lazily at
/// evaluation time with a specific, named symbol rather than at parse time.
pub fn not_implemented(symbol: OperatorSymbol, span: Span) -> OperatorFn {
    Box::new(move |_left, _right, _params| {
        Err(EvalError::NotImplemented {
            symbol: symbol.to_string(),
            span,
        }
        .into())
    })
}
