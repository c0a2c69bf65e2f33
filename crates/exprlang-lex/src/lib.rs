//! Character stream → token vector, with a state-machine gate on legal
//! token adjacency.
//!
//! This crate owns the token kind and transition table ([`state`],
//! [`token`]) and the lexer itself ([`lexer`]). It has no notion of
//! precedence or of an evaluation tree — that begins one crate up, in
//! `exprlang-plan`.

pub mod cursor;
pub mod lexer;
pub mod state;
pub mod token;

pub use lexer::tokenize;
pub use state::{can_transition_to, lookup_state, TokenState};
pub use token::{Token, TokenKind};
