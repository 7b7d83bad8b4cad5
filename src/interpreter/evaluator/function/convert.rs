use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            function::args::{get_any, get_string},
        },
        lexer::{NumberLiteral, parse_number},
        node::{
            core::{NodeId, NodeKind},
            display::{DisplayOptions, to_css_string},
        },
    },
    util::num::{f64_to_i64_truncated, i64_to_f64, usize_to_i64},
};

/// The numeric type a conversion function produces.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Target {
    Decimal,
    Integer,
    Percent,
}

impl Target {
    const fn name(self) -> &'static str {
        match self {
            Self::Decimal => "decimal_number",
            Self::Integer => "integer",
            Self::Percent => "percentage",
        }
    }

    /// Converts a number to this type.
    ///
    /// Integers and decimal numbers keep their dimension unless they become
    /// a percentage. A percentage becomes its fraction.
    fn convert(self, number: NumberLiteral) -> NodeKind {
        match (self, number) {
            (Self::Decimal, NumberLiteral::Integer(value, dimension)) => {
                NodeKind::DecimalNumber { value: i64_to_f64(value),
                                          dimension }
            },
            (Self::Decimal, NumberLiteral::Decimal(value, dimension)) => {
                NodeKind::DecimalNumber { value, dimension }
            },
            (Self::Decimal, NumberLiteral::Percent(value)) => NodeKind::decimal(value),
            (Self::Integer, NumberLiteral::Integer(value, dimension)) => {
                NodeKind::Integer { value, dimension }
            },
            (Self::Integer, NumberLiteral::Decimal(value, dimension)) => {
                NodeKind::Integer { value: f64_to_i64_truncated(value),
                                    dimension }
            },
            (Self::Integer, NumberLiteral::Percent(value)) => {
                NodeKind::integer(f64_to_i64_truncated(value))
            },
            (Self::Percent, NumberLiteral::Integer(value, _)) => NodeKind::Percent(i64_to_f64(value)),
            (Self::Percent, NumberLiteral::Decimal(value, _) | NumberLiteral::Percent(value)) => {
                NodeKind::Percent(value)
            },
        }
    }

    /// Whether a node already has the type of this conversion.
    const fn is(self, kind: &NodeKind) -> bool {
        matches!((self, kind),
                 (Self::Decimal, NodeKind::DecimalNumber { .. })
                 | (Self::Integer, NodeKind::Integer { .. })
                 | (Self::Percent, NodeKind::Percent(_)))
    }
}

/// Runs one of `decimal_number()`, `integer()` and `percentage()`.
///
/// Numbers are converted directly. Identifiers, strings and URLs must hold
/// the text of a number, such as `"3px"` or `"25%"`.
fn convert_number(expr: &mut Expression<'_>, func: NodeId, target: Target) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let name = target.name();

    let Some(value) = get_any(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position,
                                            format!("{name}() expects one value as parameter.")));
    };
    if target.is(expr.kind(value)) {
        return Ok(value);
    }

    let number = match expr.kind(value) {
        NodeKind::Integer { value, dimension } => NumberLiteral::Integer(*value, dimension.clone()),
        NodeKind::DecimalNumber { value, dimension } => {
            NumberLiteral::Decimal(*value, dimension.clone())
        },
        NodeKind::Percent(value) => NumberLiteral::Percent(*value),
        NodeKind::Identifier(text) | NodeKind::String(text) | NodeKind::Url(text) => {
            match parse_number(text) {
                Some(number) => number,
                None => {
                    return Err(RuntimeError::type_error(position,
                                                        format!("{name}() expects a string parameter to represent a valid integer, decimal number, or percent value.")));
                },
            }
        },
        _ => {
            return Err(RuntimeError::type_error(position,
                                                format!("{name}() expects one value as parameter.")));
        },
    };

    let position = expr.tree.position(value);
    Ok(expr.add(target.convert(number), position))
}

/// `decimal_number(value)`
pub(crate) fn decimal_number(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    convert_number(expr, func, Target::Decimal)
}

/// `integer(value)`, decimal numbers are truncated toward zero.
pub(crate) fn integer(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    convert_number(expr, func, Target::Integer)
}

/// `percentage(value)`, the value is used as the fraction: `percentage(0.5)`
/// is `50%`.
pub(crate) fn percentage(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    convert_number(expr, func, Target::Percent)
}

/// The text of a value for `identifier()` and `string()`.
///
/// Numbers and colors are serialized, strings, identifiers and URLs give
/// their content.
fn text_of(expr: &Expression<'_>, value: NodeId) -> Option<String> {
    match expr.kind(value) {
        NodeKind::Color(_)
        | NodeKind::DecimalNumber { .. }
        | NodeKind::Integer { .. }
        | NodeKind::Percent(_) => {
            let options = DisplayOptions { show_quotes: false,
                                           precision:   expr.session.precision(), };
            Some(to_css_string(expr.tree, value, options))
        },
        NodeKind::String(s) | NodeKind::Identifier(s) | NodeKind::Url(s) => Some(s.clone()),
        _ => None,
    }
}

/// `identifier(value)`: turns a value in an identifier.
pub(crate) fn identifier(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let value = get_any(expr.tree, func, 0);
    if let Some(v) = value
       && matches!(expr.kind(v), NodeKind::Identifier(_))
    {
        return Ok(v);
    }
    match value.and_then(|v| text_of(expr, v).map(|text| (v, text))) {
        Some((v, text)) => {
            let position = expr.tree.position(v);
            Ok(expr.add(NodeKind::Identifier(text), position))
        },
        None => Err(RuntimeError::type_error(position, "identifier() expects one value as parameter.")),
    }
}

/// `string(value)`: turns a value in a string.
pub(crate) fn string(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let value = get_any(expr.tree, func, 0);
    if let Some(v) = value
       && matches!(expr.kind(v), NodeKind::String(_))
    {
        return Ok(v);
    }
    match value.and_then(|v| text_of(expr, v).map(|text| (v, text))) {
        Some((v, text)) => {
            let position = expr.tree.position(v);
            Ok(expr.add(NodeKind::String(text), position))
        },
        None => Err(RuntimeError::type_error(position, "string() expects one value as parameter.")),
    }
}

/// `str_length(string)`: the number of characters of a string.
pub(crate) fn str_length(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let Some(text) = get_string(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "str_length() expects one string as parameter."));
    };
    Ok(expr.add(NodeKind::integer(usize_to_i64(text.chars().count())), position))
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
    fn numbers_from_text() {
        assert_eq!(value("integer(\"12px\") + 3px"), "15px");
        assert_eq!(value("decimal_number(\"3.5em\")"), "3.5em");
        assert_eq!(value("percentage(\"0.25\")"), "25%");
        assert_eq!(error("integer(\"twelve\")"),
                   "integer() expects a string parameter to represent a valid integer, decimal number, or percent value.");
    }

    #[test]
    fn numbers_between_types() {
        assert_eq!(value("integer(3.9px)"), "3px");
        assert_eq!(value("decimal_number(50%)"), "0.5");
        assert_eq!(value("percentage(0.125)"), "12.5%");
        assert_eq!(error("percentage(red)"), "percentage() expects one value as parameter.");
    }

    #[test]
    fn strings_and_identifiers() {
        assert_eq!(value("string(bold)"), "\"bold\"");
        assert_eq!(value("string(1.5px)"), "\"1.5px\"");
        assert_eq!(value("identifier(\"sans-serif\")"), "sans-serif");
        assert_eq!(value("identifier(#ff0000)"), "red");
        assert_eq!(value("str_length(\"h\u{e9}llo\")"), "5");
        assert_eq!(error("str_length(hello)"), "str_length() expects one string as parameter.");
    }
}
