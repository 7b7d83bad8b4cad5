/// Binary operator evaluation logic.
///
/// Implements the precedence levels from the conditional operator down to
/// `**`: logical, equality, relational, additive, multiplicative and power
/// operators, with their type and dimension rules.
pub mod binary;

/// Unary values and argument compilation.
///
/// Turns literals, identifiers, colors, groups and function calls into
/// values, and reduces the arguments of a function call in place.
pub mod unary;

/// Core evaluation logic.
///
/// Contains the `Expression` driver: its token cursor, the replacement of
/// reduced tokens in the tree, and error reporting.
pub mod core;

/// Arrays, maps, local assignments, indexing and field access.
pub mod list;

/// Dimension arithmetic for numbers with units.
///
/// Splits dimensions such as `px * em / s` in units, combines them for
/// multiplications, divisions and powers, and cancels units found on both
/// sides of the fraction bar.
pub mod dimension;

/// The interface between an expression and the variables around it.
pub mod resolver;

/// A scoped variable and user function store.
///
/// Implements `VariableResolver` with nested frames, replaces `$variables`
/// in a tree before evaluation, and runs user defined functions.
pub mod scope;

/// Function evaluation.
///
/// Handles the built-in function table, argument count checking, and
/// forwards unknown functions to the resolver.
pub mod function;
