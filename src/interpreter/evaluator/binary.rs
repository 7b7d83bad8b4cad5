/// `+` and `-` on numbers, percentages, strings and colors.
pub mod additive;

/// Equality, string matching and ordering operators.
pub mod comparison;

/// Value comparison helpers shared by the operators.
pub mod core;

/// The conditional operator and the boolean `and` / `or` operators.
pub mod logic;

/// `*`, `/` and `%` with their dimension rules.
///
/// Also covers string repetition, unicode range intersection, color
/// scaling and the `font-size/line-height` shorthand.
pub mod multiplicative;

/// The `**` operator.
pub mod power;
