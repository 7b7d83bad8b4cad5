//! # csspp-expr
//!
//! csspp-expr is the expression engine of a CSS preprocessor written in Rust.
//! It reduces CSS values such as `3px * 2 + 1px`, `darken(#f00, 10%)` or
//! `$width > 100px ? a : b` with support for unit algebra, colors,
//! comparisons, arrays, maps, local variables and builtin functions.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{
    evaluator::{core::Expression, scope::Scope},
    node::{
        core::{NodeType, Tree},
        display::{DisplayOptions, to_css_string},
    },
    parser::{core::parse_component_values, utils::argify},
    session::Session,
};

/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing a value,
/// grouping its tokens, or reducing it. Recoverable evaluation errors carry
/// the position they were raised at and are reported to the session; logic
/// errors flag a broken invariant of the engine itself.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches positions and detailed messages for context.
/// - Supports integration with standard error handling traits and reporting
///   utilities.
pub mod error;
/// Orchestrates the evaluation of CSS values.
///
/// This module ties together lexing, grouping, value nodes, diagnostics and
/// the evaluator to reduce the expressions found in CSS declarations.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, node tree and
///   evaluator.
/// - Provides the `Expression` driver and the `Scope` resolver.
/// - Manages the flow of values and diagnostics between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers and conversion routines that are used
/// throughout the lexer, the evaluator and the serializer. These include safe
/// conversions between integer and floating-point types and the formatting
/// of decimal numbers.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Print decimal numbers the way CSS expects them.
pub mod util;

/// File name used in the positions of evaluated sources.
const INPUT_FILE: &str = "<input>";

/// How [`evaluate_with`] treats its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Preload the `_csspp_*` constants and the system functions.
    pub system_definitions:  bool,
    /// Treat the source as a declaration value: comma separated arguments,
    /// each a space separated list of expressions, with `!flags` allowed at
    /// the end.
    pub declaration:         bool,
    /// In declaration mode, turn `a / b` into a `font-size/line-height`
    /// pair instead of dividing.
    pub divide_font_metrics: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { system_definitions:  true,
               declaration:         false,
               divide_font_metrics: false, }
    }
}

/// Evaluates one expression and returns its CSS text.
///
/// The source is parsed, its `$variables` are replaced using a scope holding
/// the system definitions, and it is reduced to a single value. Strings are
/// written with their quotes.
///
/// # Returns
/// - `Ok(Some(text))`: the value of the expression.
/// - `Ok(None)`: the expression is invalid; the error was reported to the
///   session.
///
/// # Errors
/// Returns an error if the source cannot be parsed, or if an internal
/// invariant of the evaluator is broken.
///
/// # Examples
/// ```
/// use csspp_expr::{evaluate, interpreter::session::Session};
///
/// let mut session = Session::new();
/// let value = evaluate("3px * 2 + 1px", &mut session).unwrap();
/// assert_eq!(value.as_deref(), Some("7px"));
///
/// // Adding a length and a color is reported, not returned as an error.
/// let value = evaluate("3px + red", &mut session).unwrap();
/// assert_eq!(value, None);
/// assert_eq!(session.error_count(), 1);
/// ```
pub fn evaluate(source: &str, session: &mut Session) -> Result<Option<String>, Box<dyn std::error::Error>> {
    evaluate_with(source, session, Options::default())
}

/// Same as [`evaluate`] with explicit [`Options`].
///
/// In declaration mode the arguments are written separated by `", "`, and
/// the flags found, such as `!important`, follow them.
///
/// # Examples
/// ```
/// use csspp_expr::{Options, evaluate_with, interpreter::session::Session};
///
/// let mut session = Session::new();
/// let options = Options { declaration: true,
///                         ..Options::default() };
/// let value = evaluate_with("1px + 2px 3px, 4px * 2 !important", &mut session, options).unwrap();
/// assert_eq!(value.as_deref(), Some("3px 3px, 8px !important"));
/// ```
#[tracing::instrument(skip(session))]
pub fn evaluate_with(source: &str,
                     session: &mut Session,
                     options: Options)
                     -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut tree = Tree::new();
    let root = parse_component_values(source, INPUT_FILE, &mut tree)?;

    let mut scope = if options.system_definitions {
        Scope::with_system_definitions(&mut tree)?
    } else {
        Scope::new()
    };
    if !scope.replace_variables(&mut tree, session, root)? {
        return Ok(None);
    }

    let display = DisplayOptions { show_quotes: true,
                                   precision:   session.precision(), };

    if options.declaration {
        if let Err(e) = argify(&mut tree, root) {
            if e.is_logic() {
                return Err(Box::new(e));
            }
            session.report_error(&e);
            return Ok(None);
        }
        let mut expr = Expression::new(&mut tree, session, root);
        expr.set_variable_handler(&mut scope);
        if !expr.compile_args(options.divide_font_metrics)? {
            return Ok(None);
        }

        let mut text = tree.children(root)
                           .iter()
                           .map(|&arg| to_css_string(&tree, arg, display))
                           .collect::<Vec<_>>()
                           .join(", ");
        for flag in &tree.get(root).flags {
            text.push_str(" !");
            text.push_str(flag);
        }
        return Ok(Some(text));
    }

    let mut expr = Expression::new(&mut tree, session, root);
    expr.set_variable_handler(&mut scope);
    let Some(result) = expr.compile()? else {
        return Ok(None);
    };

    if let Some(&extra) = tree.children(root)
                              .iter()
                              .skip(1)
                              .find(|&&c| !tree.is(c, NodeType::Whitespace))
    {
        session.error(tree.position(extra),
                      format!("unexpected {} after the end of the expression.",
                              tree.node_type(extra)));
        return Ok(None);
    }

    Ok(Some(to_css_string(&tree, result, display)))
}
