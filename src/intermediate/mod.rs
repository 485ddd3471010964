//! Intermediate language
//!
//! Diagram texts are normalized into one backend-independent notation before
//! any backend sees them: markers stripped, operators unified, increment and
//! decrement calls turned into assignments.

mod builder;
mod exprlist;
mod markers;
mod unify;

pub use builder::{rewrite_inc_dec, strip_markers, to_intermediate};
pub use exprlist::split_expression_list;
pub use markers::{strip_keyword, MarkerConfig, MarkerPosition};
pub use unify::{
    collapse_blanks, find_rule, unify_operator_tokens, unify_operators, OperatorFamily,
    OperatorRule, OPERATOR_RULES,
};
