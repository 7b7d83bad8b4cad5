use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            dimension::square_root_dimension,
            function::args::{dimension_to_radians, get_number, get_number_or_percent},
        },
        node::core::{NodeId, NodeKind},
    },
};

/// Generates an inverse trigonometric builtin.
///
/// The argument must be an integer or a decimal number; the result is a
/// decimal number in `rad`.
macro_rules! inverse_trigonometry {
    ($fname:ident) => {
        pub(crate) fn $fname(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
            let position = expr.tree.position(func);
            let Some((_, n)) = get_number(expr.tree, func, 0) else {
                return Err(RuntimeError::type_error(position,
                                                    concat!(stringify!($fname),
                                                            "() expects a number as parameter.")));
            };
            Ok(expr.add(NodeKind::DecimalNumber { value:     n.$fname(),
                                                  dimension: "rad".into(), },
                        position))
        }
    };
}

/// Generates a trigonometric builtin.
///
/// The angle is converted to radians from its dimension (`deg` when
/// unitless) and the result is a unitless decimal number.
macro_rules! trigonometry {
    ($fname:ident) => {
        pub(crate) fn $fname(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
            let position = expr.tree.position(func);
            let Some((number, n)) = get_number(expr.tree, func, 0) else {
                return Err(RuntimeError::type_error(position,
                                                    concat!(stringify!($fname),
                                                            "() expects an angle as parameter.")));
            };
            let dimension = expr.kind(number).dimension().unwrap_or_default();
            let radians = dimension_to_radians(&position, n, dimension)?;
            Ok(expr.add(NodeKind::decimal(radians.$fname()), position))
        }
    };
}

/// Generates a rounding builtin.
///
/// Integers are returned unchanged. Decimal numbers keep their dimension.
macro_rules! rounding {
    ($fname:ident) => {
        pub(crate) fn $fname(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
            let position = expr.tree.position(func);
            let Some((number, _)) = get_number(expr.tree, func, 0) else {
                return Err(RuntimeError::type_error(position,
                                                    concat!(stringify!($fname),
                                                            "() expects a number as parameter.")));
            };
            let kind = match expr.kind(number) {
                NodeKind::DecimalNumber { value, dimension } => {
                    NodeKind::DecimalNumber { value:     value.$fname(),
                                              dimension: dimension.clone(), }
                },
                _ => return Ok(number),
            };
            Ok(expr.add(kind, position))
        }
    };
}

inverse_trigonometry!(acos);
inverse_trigonometry!(asin);
inverse_trigonometry!(atan);

trigonometry!(cos);
trigonometry!(sin);
trigonometry!(tan);

rounding!(ceil);
rounding!(floor);
rounding!(round);

/// `abs(number)`: the absolute value, keeping the type and dimension.
pub(crate) fn abs(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let Some((number, _)) = get_number(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "abs() expects a number as parameter."));
    };
    let kind = match expr.kind(number) {
        NodeKind::Integer { value, dimension } => NodeKind::Integer { value:     value.wrapping_abs(),
                                                                      dimension: dimension.clone(), },
        NodeKind::DecimalNumber { value, dimension } => {
            NodeKind::DecimalNumber { value:     value.abs(),
                                      dimension: dimension.clone(), }
        },
        _ => return Ok(number),
    };
    Ok(expr.add(kind, position))
}

/// `log(number)`: the natural logarithm of a positive unitless number.
pub(crate) fn log(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let Some((number, n)) = get_number(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "log() expects a number as parameter."));
    };
    if expr.kind(number).dimension().is_some_and(|d| !d.is_empty()) {
        return Err(RuntimeError::dimension(position,
                                           "log() expects a unit less number as parameter."));
    }
    if n <= 0.0 {
        return Err(RuntimeError::range(position,
                                       "log() expects a positive number as parameter."));
    }
    Ok(expr.add(NodeKind::decimal(n.ln()), position))
}

/// `sign(number)`: `-1`, `0` or `1` with the type and dimension of the
/// argument. Percentages are accepted.
pub(crate) fn sign(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let Some((number, n)) = get_number_or_percent(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "sign() expects a number as parameter."));
    };
    let unit = if n < 0.0 {
        -1.0
    } else if n > 0.0 {
        1.0
    } else {
        0.0
    };
    let kind = match expr.kind(number) {
        NodeKind::Integer { dimension, .. } => {
            NodeKind::Integer { value:     if n < 0.0 { -1 } else { i64::from(n > 0.0) },
                                dimension: dimension.clone(), }
        },
        NodeKind::DecimalNumber { dimension, .. } => {
            NodeKind::DecimalNumber { value:     unit,
                                      dimension: dimension.clone(), }
        },
        _ => NodeKind::Percent(unit),
    };
    Ok(expr.add(kind, position))
}

/// `sqrt(number)`: the square root of a non-negative number.
///
/// A dimension must be a square such as `px * px`, the result then has
/// each unit once.
pub(crate) fn sqrt(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let Some((number, n)) = get_number(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "sqrt() expects a number as parameter."));
    };
    if n < 0.0 {
        return Err(RuntimeError::range(position, "sqrt() expects zero or a positive number."));
    }

    let dimension = expr.kind(number).dimension().unwrap_or_default().to_string();
    let dimension = if dimension.is_empty() {
        dimension
    } else {
        square_root_dimension(&position, &dimension)?.ok_or_else(|| {
            RuntimeError::dimension(position.clone(),
                                    "sqrt() expects dimensions to be squarely defined (i.e. 'px * px').")
        })?
    };

    Ok(expr.add(NodeKind::DecimalNumber { value: n.sqrt(),
                                          dimension },
                position))
}

#[cfg(test)]
mod tests {
    use crate::{evaluate, interpreter::session::Session};

    fn value(source: &str) -> String {
        let mut session = Session::new();
        let result = evaluate(source, &mut session).unwrap();
        assert_eq!(session.error_count(), 0, "{:?}", session.diagnostics());
        result.unwrap()
    }

    fn error(source: &str) -> String {
        let mut session = Session::new();
        assert_eq!(evaluate(source, &mut session).unwrap(), None);
        session.diagnostics()[0].message.clone()
    }

    #[test]
    fn abs_keeps_the_dimension() {
        assert_eq!(value("abs(-3px)"), "3px");
        assert_eq!(value("abs(-2.5em)"), "2.5em");
        assert_eq!(error("abs(-50%)"), "abs() expects a number as parameter.");
    }

    #[test]
    fn rounding_only_changes_decimals() {
        assert_eq!(value("ceil(1.2px)"), "2px");
        assert_eq!(value("floor(-1.2)"), "-2");
        assert_eq!(value("round(2.5)"), "3");
        assert_eq!(value("round(7)"), "7");
    }

    #[test]
    fn trigonometry_converts_angles() {
        assert_eq!(value("cos(0)"), "1");
        assert_eq!(value("sin(90deg)"), "1");
        assert_eq!(value("cos(0.5turn)"), "-1");
        assert_eq!(value("acos(1)"), "0rad");
        assert_eq!(error("sin(3px)"),
                   "trigonometry functions expect an angle (deg, grad, rad, turn) as a parameter.");
        assert_eq!(error("tan(\"a\")"), "tan() expects an angle as parameter.");
    }

    #[test]
    fn logarithm_domain() {
        assert_eq!(value("log(1)"), "0");
        assert_eq!(error("log(3px)"), "log() expects a unit less number as parameter.");
        assert_eq!(error("log(0)"), "log() expects a positive number as parameter.");
    }

    #[test]
    fn sign_of_numbers() {
        assert_eq!(value("sign(-7px)"), "-1px");
        assert_eq!(value("sign(0.0)"), "0");
        assert_eq!(value("sign(25%)"), "100%");
    }

    #[test]
    fn square_roots_need_square_dimensions() {
        assert_eq!(value("sqrt(16)"), "4");
        assert_eq!(value("sqrt(9px * 1px)"), "3px");
        assert_eq!(error("sqrt(-1)"), "sqrt() expects zero or a positive number.");
        assert_eq!(error("sqrt(4px)"),
                   "sqrt() expects dimensions to be squarely defined (i.e. 'px * px').");
    }
}
