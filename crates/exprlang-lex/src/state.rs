//! The token-state transition table gating legal adjacency.
//!
//! There is exactly one [`TokenState`] record per [`TokenKind`]. The lexer
//! starts in the `Unknown` state and, after producing each token, moves to
//! that token's kind's own record; before accepting the *next* token it
//! checks that the new token's kind is in the current record's
//! `valid_next_kinds`. An expression that begins `)` or `&&`, for example,
//! is rejected because those kinds are absent from `Unknown`'s set.

use crate::token::TokenKind;

/// `{kind, is_terminal, is_nullable, valid_next_kinds}` for one token kind.
pub struct TokenState {
    pub kind: TokenKind,
    /// True if a token of this kind may legally be the last token of an
    /// expression (there is nothing syntactically required to follow it).
    pub is_terminal: bool,
    /// True if this kind's value payload carries no information beyond its
    /// own presence (structural punctuation rather than literal data).
    pub is_nullable: bool,
    pub valid_next_kinds: &'static [TokenKind],
}

use TokenKind::*;

/// Kinds that may legally start a (sub-)expression: a literal, a variable,
/// a function call, an accessor, a nested clause, or a unary prefix op.
const EXPRESSION_START: &[TokenKind] = &[
    Prefix, Numeric, Boolean, String, Pattern, Time, Variable, Function, Accessor, Clause,
];

/// Kinds that may legally follow a completed value: a binary operator at
/// any precedence, a separator, a clause close, or a ternary symbol.
const AFTER_VALUE: &[TokenKind] = &[
    Comparator,
    LogicalOp,
    Modifier,
    Separator,
    ClauseClose,
    Ternary,
];

const TABLE: &[TokenState] = &[
    TokenState {
        kind: Unknown,
        is_terminal: true,
        is_nullable: true,
        valid_next_kinds: EXPRESSION_START,
    },
    TokenState {
        kind: Prefix,
        is_terminal: false,
        is_nullable: false,
        valid_next_kinds: EXPRESSION_START,
    },
    TokenState {
        kind: Numeric,
        is_terminal: true,
        is_nullable: false,
        valid_next_kinds: AFTER_VALUE,
    },
    TokenState {
        kind: Boolean,
        is_terminal: true,
        is_nullable: false,
        valid_next_kinds: AFTER_VALUE,
    },
    TokenState {
        kind: String,
        is_terminal: true,
        is_nullable: false,
        valid_next_kinds: AFTER_VALUE,
    },
    TokenState {
        kind: Pattern,
        is_terminal: true,
        is_nullable: false,
        valid_next_kinds: AFTER_VALUE,
    },
    TokenState {
        kind: Time,
        is_terminal: true,
        is_nullable: false,
        valid_next_kinds: AFTER_VALUE,
    },
    TokenState {
        kind: Variable,
        is_terminal: true,
        is_nullable: false,
        valid_next_kinds: AFTER_VALUE,
    },
    TokenState {
        kind: Function,
        is_terminal: false,
        is_nullable: false,
        // A function token must be immediately followed by its call clause.
        valid_next_kinds: &[Clause],
    },
    TokenState {
        kind: Separator,
        is_terminal: false,
        is_nullable: true,
        valid_next_kinds: EXPRESSION_START,
    },
    TokenState {
        kind: Accessor,
        is_terminal: true,
        is_nullable: false,
        // `CLAUSE` is listed here so the lexer never rejects `foo.bar(` at
        // the state-machine level; the planner raises `UnsupportedConstruct`
        // for a clause following an accessor instead, since there is no
        // method-call grammar to plan it into.
        valid_next_kinds: &[
            Comparator,
            LogicalOp,
            Modifier,
            Separator,
            ClauseClose,
            Ternary,
            Clause,
        ],
    },
    TokenState {
        kind: Comparator,
        is_terminal: false,
        is_nullable: false,
        valid_next_kinds: EXPRESSION_START,
    },
    TokenState {
        kind: LogicalOp,
        is_terminal: false,
        is_nullable: false,
        valid_next_kinds: EXPRESSION_START,
    },
    TokenState {
        kind: Modifier,
        is_terminal: false,
        is_nullable: false,
        valid_next_kinds: EXPRESSION_START,
    },
    TokenState {
        kind: Clause,
        is_terminal: false,
        is_nullable: true,
        valid_next_kinds: &[
            Prefix, Numeric, Boolean, String, Pattern, Time, Variable, Function, Accessor, Clause,
            ClauseClose,
        ],
    },
    TokenState {
        kind: ClauseClose,
        is_terminal: true,
        is_nullable: true,
        valid_next_kinds: AFTER_VALUE,
    },
    TokenState {
        kind: Ternary,
        is_terminal: false,
        is_nullable: false,
        valid_next_kinds: EXPRESSION_START,
    },
];

/// Look up the state record for a given kind. Exactly one record per kind
/// exists in [`TABLE`], so this never falls through to a default.
pub fn lookup_state(kind: TokenKind) -> &'static TokenState {
    TABLE
        .iter()
        .find(|state| state.kind == kind)
        .expect("every TokenKind has exactly one TokenState record")
}

/// True if a token of kind `next` may legally follow a token currently in
/// `state`.
pub fn can_transition_to(state: &TokenState, next: TokenKind) -> bool {
    state.valid_next_kinds.contains(&next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_allows_expression_starters() {
        let unknown = lookup_state(Unknown);
        assert!(can_transition_to(unknown, Numeric));
        assert!(can_transition_to(unknown, Prefix));
        assert!(!can_transition_to(unknown, Comparator));
        assert!(!can_transition_to(unknown, ClauseClose));
    }

    #[test]
    fn value_kinds_allow_binary_operators_not_another_value() {
        let numeric = lookup_state(Numeric);
        assert!(can_transition_to(numeric, Modifier));
        assert!(can_transition_to(numeric, ClauseClose));
        assert!(!can_transition_to(numeric, Numeric));
    }

    #[test]
    fn function_must_be_followed_by_clause() {
        let function = lookup_state(Function);
        assert!(can_transition_to(function, Clause));
        assert!(!can_transition_to(function, Numeric));
        assert!(!can_transition_to(function, ClauseClose));
    }

    #[test]
    fn every_kind_has_exactly_one_record() {
        let kinds = [
            Unknown, Prefix, Numeric, Boolean, String, Pattern, Time, Variable, Function,
            Separator, Accessor, Comparator, LogicalOp, Modifier, Clause, ClauseClose, Ternary,
        ];
        for kind in kinds {
            assert_eq!(TABLE.iter().filter(|s| s.kind == kind).count(), 1);
        }
    }
}
