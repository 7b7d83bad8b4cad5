/// Grouping of the token stream into component values.
///
/// Turns the flat token list into a node tree where brackets and function
/// calls own the tokens they enclose.
pub mod core;

/// Utility functions for the parser.
///
/// Provides whitespace trimming and `argify`, which splits the content of a
/// function call into its comma separated arguments.
pub mod utils;
