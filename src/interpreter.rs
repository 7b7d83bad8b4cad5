/// The evaluator module reduces value-node trees to results.
///
/// The evaluator walks the children of a node with a cursor and climbs the
/// operator precedence levels, replacing the tokens it consumes by the
/// value they compute. It also runs the builtin functions and talks to the
/// variable resolver.
///
/// # Responsibilities
/// - Evaluates operators with their type and dimension rules.
/// - Runs builtin functions and forwards the others to the resolver.
/// - Reports type, dimension, range and arity errors with a position.
pub mod evaluator;
/// The lexer module tokenizes CSS values.
///
/// The lexer reads the raw source text and produces a stream of tokens:
/// numbers with their unit, strings, identifiers, hashes, variables,
/// function openings, unicode ranges, flags and operators. Comments are
/// skipped and newlines counted.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with a source line.
/// - Parses the text of a number for the conversion builtins.
/// - Reports characters that start no token.
pub mod lexer;
/// Value nodes.
///
/// Declares the arena `Tree` holding every node of an expression, the node
/// kinds with their payloads, colors and unicode ranges, and the routine
/// serializing a node back to CSS text.
pub mod node;
/// The parser module groups tokens into component values.
///
/// Brackets and function calls become nodes owning their content, so an
/// expression is a flat list of values and operators with nested groups.
///
/// # Responsibilities
/// - Builds the node tree from the token stream.
/// - Checks that brackets are balanced.
/// - Splits function arguments on commas.
pub mod parser;
/// The diagnostic sink and evaluation context.
///
/// A `Session` collects the errors and warnings emitted while evaluating,
/// and carries the state shared by consecutive evaluations: the output
/// precision, the `unique_id()` counter and the `random()` generator.
pub mod session;
