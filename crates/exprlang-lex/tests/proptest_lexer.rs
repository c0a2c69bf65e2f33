//! Property tests for the lexer's two cross-cutting invariants:
//!
//! 1. Every token sequence `tokenize` accepts satisfies the transition
//!    predicate between each adjacent pair.
//! 2. Re-joining a prepared expression's token lexemes with single spaces
//!    and re-lexing it produces an equivalent (same-kind) token sequence.

use proptest::prelude::*;
use rustc_hash::FxHashMap;

use exprlang_lex::state::{can_transition_to, lookup_state};
use exprlang_lex::tokenize;
use exprlang_util::value::{Callable, Value};

/// A small, self-contained grammar of alternating operand/operator
/// fragments that is always lexically well-formed, so proptest can shrink
/// failures without fighting the lexer's own error paths.
fn arbitrary_expression() -> impl Strategy<Value = String> {
    let operand = prop_oneof![
        (1i64..1000).prop_map(|n| n.to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
        "[a-z][a-z0-9_]{0,6}".prop_map(|s| s),
    ];
    let operator = prop_oneof![
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("==".to_string()),
        Just("&&".to_string()),
        Just("||".to_string()),
    ];
    (operand.clone(), prop::collection::vec((operator, operand), 0..6)).prop_map(
        |(first, rest)| {
            let mut out = first;
            for (op, operand) in rest {
                out.push(' ');
                out.push_str(&op);
                out.push(' ');
                out.push_str(&operand);
            }
            out
        },
    )
}

proptest! {
    #[test]
    fn transition_invariant_holds(source in arbitrary_expression()) {
        let functions: FxHashMap<String, Callable> = FxHashMap::default();
        let tokens = tokenize(&source, &functions).expect("well-formed generated expression");
        for pair in tokens.windows(2) {
            let state = lookup_state(pair[0].kind);
            prop_assert!(can_transition_to(state, pair[1].kind));
        }
    }

    #[test]
    fn lexeme_round_trip(source in arbitrary_expression()) {
        let functions: FxHashMap<String, Callable> = FxHashMap::default();
        let tokens = tokenize(&source, &functions).expect("well-formed generated expression");
        let rejoined: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        let rejoined = rejoined.join(" ");
        let retokenized = tokenize(&rejoined, &functions).expect("round-tripped text re-lexes");
        prop_assert_eq!(tokens.len(), retokenized.len());
        for (a, b) in tokens.iter().zip(retokenized.iter()) {
            prop_assert_eq!(&a.kind, &b.kind);
            prop_assert_eq!(format!("{:?}", &a.value), format!("{:?}", &b.value));
        }
    }
}
