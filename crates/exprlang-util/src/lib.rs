//! Foundation types shared by every crate in the workspace.
//!
//! This crate has no knowledge of tokens, operators, or expression trees. It
//! provides the utilities that the lexer, planner, and evaluator crates all
//! build on:
//!
//! - [`symbol`]: string interning for accessor/variable/function names.
//! - [`span`]: byte-offset source locations and a multi-file source map.
//! - [`diagnostic`]: structured error/warning reporting built on top of spans.
//! - [`error`]: the `thiserror`-derived error taxonomy shared across phases.
//! - [`value`]: the dynamically typed [`value::Value`] every expression
//!   evaluates to.
//! - [`operator`]: the operator symbol table consulted by both the lexer
//!   (to classify a symbol run) and the planner (to resolve it at a given
//!   precedence level).

pub mod diagnostic;
pub mod error;
pub mod operator;
pub mod span;
pub mod symbol;
pub mod value;

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;

pub use span::{FileId, Span};
pub use symbol::Symbol;
pub use value::{ParamBag, Value, NONE_SENTINEL};
