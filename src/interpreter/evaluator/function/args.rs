use std::f64::consts::PI;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        node::{
            color::Color,
            core::{NodeId, NodeKind, Position, Tree},
        },
    },
};

/// The single value held by argument `argn` of `func`.
///
/// # Returns
/// `None` when the argument does not exist or holds more than one value,
/// as in `f(1px 2px)`.
#[must_use]
pub fn get_any(tree: &Tree, func: NodeId, argn: usize) -> Option<NodeId> {
    let arg = tree.child(func, argn)?;
    if tree.len(arg) != 1 {
        return None;
    }
    tree.child(arg, 0)
}

/// The color held by argument `argn`.
#[must_use]
pub fn get_color(tree: &Tree, func: NodeId, argn: usize) -> Option<Color> {
    match tree.kind(get_any(tree, func, argn)?) {
        NodeKind::Color(c) => Some(*c),
        _ => None,
    }
}

/// The integer or decimal number held by argument `argn`, with its value.
///
/// Percentages are refused.
#[must_use]
pub fn get_number(tree: &Tree, func: NodeId, argn: usize) -> Option<(NodeId, f64)> {
    let value = get_any(tree, func, argn)?;
    match tree.kind(value) {
        NodeKind::Integer { .. } | NodeKind::DecimalNumber { .. } => {
            tree.kind(value).as_f64().map(|n| (value, n))
        },
        _ => None,
    }
}

/// Same as [`get_number`] but percentages are accepted. Their value is the
/// fraction, `0.5` for `50%`.
#[must_use]
pub fn get_number_or_percent(tree: &Tree, func: NodeId, argn: usize) -> Option<(NodeId, f64)> {
    let value = get_any(tree, func, argn)?;
    tree.kind(value).as_f64().map(|n| (value, n))
}

/// The string held by argument `argn`.
#[must_use]
pub fn get_string(tree: &Tree, func: NodeId, argn: usize) -> Option<String> {
    match tree.kind(get_any(tree, func, argn)?) {
        NodeKind::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// The string or identifier held by argument `argn`.
#[must_use]
pub fn get_string_or_identifier(tree: &Tree, func: NodeId, argn: usize) -> Option<String> {
    match tree.kind(get_any(tree, func, argn)?) {
        NodeKind::String(s) | NodeKind::Identifier(s) => Some(s.clone()),
        _ => None,
    }
}

/// Converts an angle to radians.
///
/// # Parameters
/// - `position`: Used for the diagnostic.
/// - `angle`: The value of the angle.
/// - `dimension`: One of `rad`, `deg`, `grad` or `turn`. A unitless angle
///   is in degrees.
///
/// # Errors
/// Any other dimension.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::{
///     evaluator::function::args::dimension_to_radians,
///     node::core::Position,
/// };
///
/// let pos = Position::new("a.css", 1);
/// let half_turn = dimension_to_radians(&pos, 0.5, "turn").unwrap();
/// assert!((half_turn - std::f64::consts::PI).abs() < 1e-12);
/// assert!(dimension_to_radians(&pos, 1.0, "px").is_err());
/// ```
pub fn dimension_to_radians(position: &Position, angle: f64, dimension: &str) -> EvalResult<f64> {
    match dimension {
        "rad" => Ok(angle),
        "deg" | "" => Ok(angle * PI / 180.0),
        "grad" => Ok(angle * PI / 200.0),
        "turn" => Ok(angle * PI * 2.0),
        _ => Err(RuntimeError::dimension(position.clone(),
                                         "trigonometry functions expect an angle (deg, grad, rad, turn) as a parameter.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parser::{core::parse_component_values, utils::argify};

    fn call(source: &str) -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let list = parse_component_values(source, "test.css", &mut tree).unwrap();
        let func = tree.children(list)[0];
        argify(&mut tree, func).unwrap();
        (tree, func)
    }

    #[test]
    fn arguments_must_hold_one_value() {
        let (tree, func) = call("f(3px, 1px 2px)");
        assert_eq!(get_number(&tree, func, 0).map(|(_, n)| n), Some(3.0));
        assert!(get_any(&tree, func, 1).is_none());
        assert!(get_any(&tree, func, 2).is_none());
    }

    #[test]
    fn percentages_are_not_plain_numbers() {
        let (tree, func) = call("f(50%)");
        assert!(get_number(&tree, func, 0).is_none());
        assert_eq!(get_number_or_percent(&tree, func, 0).map(|(_, n)| n), Some(0.5));
    }

    #[test]
    fn strings_and_identifiers() {
        let (tree, func) = call("f(\"text\", word)");
        assert_eq!(get_string(&tree, func, 0).as_deref(), Some("text"));
        assert!(get_string(&tree, func, 1).is_none());
        assert_eq!(get_string_or_identifier(&tree, func, 1).as_deref(), Some("word"));
    }

    #[test]
    fn angles() {
        let pos = Position::new("test.css", 1);
        assert!((dimension_to_radians(&pos, 180.0, "deg").unwrap() - PI).abs() < 1e-12);
        assert!((dimension_to_radians(&pos, 200.0, "grad").unwrap() - PI).abs() < 1e-12);
        assert!((dimension_to_radians(&pos, 90.0, "").unwrap() - PI / 2.0).abs() < 1e-12);
        assert_eq!(dimension_to_radians(&pos, 2.0, "rad").unwrap(), 2.0);
    }
}
