/// Argument extraction helpers shared by the builtins.
///
/// Every helper requires the argument to hold exactly one value.
pub mod args;
/// Color constructors and component accessors.
///
/// `rgb()`, `hsl()` and their variants, plus `red()`, `hue()` and friends.
pub mod color;
/// Conversions between value types.
pub mod convert;
/// The builtin table and function call dispatch.
pub mod core;
/// Functions looking at values or at the resolver rather than computing.
///
/// `type_of()`, `unit()`, `if()`, `not()`, the `*_exists()` checks,
/// `unique_id()` and `random()`.
pub mod introspect;
/// Numeric functions: absolute value, rounding, trigonometry, logarithm and
/// square root.
pub mod math;
/// `min()` and `max()` over any number of arguments.
pub mod min_max;
