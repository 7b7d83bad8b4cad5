/// Parsing errors.
///
/// Defines the errors that can occur while lexing source text and grouping
/// the tokens into component values (unknown characters, unbalanced
/// brackets).
pub mod parse_error;
/// Runtime errors.
///
/// Contains the errors raised while reducing an expression: type and
/// dimension mismatches, out of range indexes, wrong argument counts,
/// malformed syntax, unknown variables, and internal logic errors.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::{LogicError, RuntimeError};
