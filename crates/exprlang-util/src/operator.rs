//! The operator symbol table shared by the lexer and the planner.
//!
//! The lexer consults these string maps only to *classify* a run of
//! non-alphanumeric characters into a [`crate::Span`]-tagged token kind (is
//! `"-"` a prefix or a modifier in this position?); the planner consults the
//! same maps again, per precedence level, to pick the concrete
//! [`OperatorSymbol`] and its [`Precedence`] when building a stage node.
//! Keeping the table here (rather than splitting it between the lexer and
//! planner crates) avoids a circular dependency between the two.

use std::fmt;

/// One of the 31 operator symbols the planner can attach to a stage node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorSymbol {
    Noop,
    Literal,
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    Req,
    Nreq,
    In,
    And,
    Or,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseLshift,
    BitwiseRshift,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    Exponent,
    Negate,
    Invert,
    BitwiseNot,
    TernaryTrue,
    TernaryFalse,
    Coalesce,
    Functional,
    Access,
    Separate,
}

impl fmt::Display for OperatorSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Binding strength, loosest to tightest. Higher binds tighter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Noop,
    Separator,
    Ternary,
    LogicalOr,
    LogicalAnd,
    Comparator,
    Bitwise,
    BitwiseShift,
    Additive,
    Multiplicative,
    Exponential,
    Prefix,
    Functional,
    Value,
}

impl OperatorSymbol {
    /// The precedence level this symbol is planned at.
    pub fn precedence(self) -> Precedence {
        use OperatorSymbol::*;
        match self {
            Noop => Precedence::Noop,
            Literal => Precedence::Value,
            Eq | Neq | Gt | Lt | Gte | Lte | Req | Nreq | In => Precedence::Comparator,
            And => Precedence::LogicalAnd,
            Or => Precedence::LogicalOr,
            BitwiseAnd | BitwiseOr | BitwiseXor => Precedence::Bitwise,
            BitwiseLshift | BitwiseRshift => Precedence::BitwiseShift,
            Plus | Minus => Precedence::Additive,
            Multiply | Divide | Modulus => Precedence::Multiplicative,
            Exponent => Precedence::Exponential,
            Negate | Invert | BitwiseNot => Precedence::Prefix,
            TernaryTrue | TernaryFalse | Coalesce => Precedence::Ternary,
            Functional | Access => Precedence::Functional,
            Separate => Precedence::Separator,
        }
    }
}

/// `==`, `!=`, `>`, `<`, `>=`, `<=`, `=~`, `!~`. `in` is handled separately by
/// the lexer (it lexes as a keyword, not a symbol run) but is folded into
/// this family for planning purposes.
pub fn comparator_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "==" => OperatorSymbol::Eq,
        "!=" => OperatorSymbol::Neq,
        ">" => OperatorSymbol::Gt,
        "<" => OperatorSymbol::Lt,
        ">=" => OperatorSymbol::Gte,
        "<=" => OperatorSymbol::Lte,
        "=~" => OperatorSymbol::Req,
        "!~" => OperatorSymbol::Nreq,
        "in" => OperatorSymbol::In,
        _ => return None,
    })
}

/// `&&`, `||`.
pub fn logical_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "&&" => OperatorSymbol::And,
        "||" => OperatorSymbol::Or,
        _ => return None,
    })
}

/// `&`, `|`, `^`.
pub fn bitwise_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "&" => OperatorSymbol::BitwiseAnd,
        "|" => OperatorSymbol::BitwiseOr,
        "^" => OperatorSymbol::BitwiseXor,
        _ => return None,
    })
}

/// `<<`, `>>`.
pub fn shift_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "<<" => OperatorSymbol::BitwiseLshift,
        ">>" => OperatorSymbol::BitwiseRshift,
        _ => return None,
    })
}

/// `+`, `-`.
pub fn additive_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "+" => OperatorSymbol::Plus,
        "-" => OperatorSymbol::Minus,
        _ => return None,
    })
}

/// `*`, `/`, `%`.
pub fn multiplicative_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "*" => OperatorSymbol::Multiply,
        "/" => OperatorSymbol::Divide,
        "%" => OperatorSymbol::Modulus,
        _ => return None,
    })
}

/// `**`.
pub fn exponential_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "**" => OperatorSymbol::Exponent,
        _ => return None,
    })
}

/// `-`, `!`, `~` in unary position.
pub fn prefix_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "-" => OperatorSymbol::Negate,
        "!" => OperatorSymbol::Invert,
        "~" => OperatorSymbol::BitwiseNot,
        _ => return None,
    })
}

/// `?`, `:`, `??`.
pub fn ternary_symbol(text: &str) -> Option<OperatorSymbol> {
    Some(match text {
        "?" => OperatorSymbol::TernaryTrue,
        ":" => OperatorSymbol::TernaryFalse,
        "??" => OperatorSymbol::Coalesce,
        _ => return None,
    })
}

/// `,`.
pub fn separator_symbol(text: &str) -> Option<OperatorSymbol> {
    (text == ",").then_some(OperatorSymbol::Separate)
}

/// True if `text` belongs to the union of the arithmetic/bitwise families:
/// additive, multiplicative, exponential, bitwise, and shift. This is the
/// test the lexer runs to tag a symbol run `MODIFIER`; the planner later
/// re-dispatches the same text against the individual family maps above
/// when it knows which precedence level it is planning.
pub fn is_modifier_symbol(text: &str) -> bool {
    additive_symbol(text).is_some()
        || multiplicative_symbol(text).is_some()
        || exponential_symbol(text).is_some()
        || bitwise_symbol(text).is_some()
        || shift_symbol(text).is_some()
}

pub fn is_prefix_symbol(text: &str) -> bool {
    prefix_symbol(text).is_some()
}

pub fn is_logical_symbol(text: &str) -> bool {
    logical_symbol(text).is_some()
}

pub fn is_comparator_symbol(text: &str) -> bool {
    // `in` is excluded here: the lexer never reaches this table for it,
    // since `in` is classified while scanning an identifier, not a symbol run.
    matches!(
        text,
        "==" | "!=" | ">" | "<" | ">=" | "<=" | "=~" | "!~"
    )
}

pub fn is_ternary_symbol(text: &str) -> bool {
    ternary_symbol(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_ordering_matches_spec() {
        assert!(Precedence::Value > Precedence::Functional);
        assert!(Precedence::Functional > Precedence::Prefix);
        assert!(Precedence::Prefix > Precedence::Exponential);
        assert!(Precedence::Exponential > Precedence::Multiplicative);
        assert!(Precedence::Multiplicative > Precedence::Additive);
        assert!(Precedence::Additive > Precedence::BitwiseShift);
        assert!(Precedence::BitwiseShift > Precedence::Bitwise);
        assert!(Precedence::Bitwise > Precedence::Comparator);
        assert!(Precedence::Comparator > Precedence::LogicalAnd);
        assert!(Precedence::LogicalAnd > Precedence::LogicalOr);
        assert!(Precedence::LogicalOr > Precedence::Ternary);
        assert!(Precedence::Ternary > Precedence::Separator);
        assert!(Precedence::Separator > Precedence::Noop);
    }

    #[test]
    fn modifier_union_covers_all_families() {
        assert!(is_modifier_symbol("+"));
        assert!(is_modifier_symbol("*"));
        assert!(is_modifier_symbol("**"));
        assert!(is_modifier_symbol("&"));
        assert!(is_modifier_symbol("<<"));
        assert!(!is_modifier_symbol("&&"));
        assert!(!is_modifier_symbol("=="));
    }

    #[test]
    fn comparator_excludes_in_keyword() {
        assert!(!is_comparator_symbol("in"));
        assert_eq!(comparator_symbol("in"), Some(OperatorSymbol::In));
    }
}
