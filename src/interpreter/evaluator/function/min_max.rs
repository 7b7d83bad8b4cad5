use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            function::args::get_number_or_percent,
        },
        node::core::{NodeId, NodeKind},
    },
};

/// Picks the smallest or largest of the arguments.
///
/// Every argument must be a number, and they must all share the same
/// dimension; percentages only compare with percentages. Among equal
/// values the first one wins. The winning argument is returned as is, so
/// its type and dimension are kept.
///
/// # Parameters
/// - `name`: `min` or `max`, used in diagnostics.
/// - `keep`: The ordering of a new value against the current one that
///   makes it the new result.
///
/// # Errors
/// A non-number argument, or arguments with different dimensions.
fn pick(expr: &mut Expression<'_>, func: NodeId, name: &str, keep: Ordering) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let mut best: Option<(NodeId, OrderedFloat<f64>, String)> = None;

    for idx in 0..expr.tree.len(func) {
        let Some((number, value)) = get_number_or_percent(expr.tree, func, idx) else {
            return Err(RuntimeError::type_error(position, format!("{name}() expects any number of numbers.")));
        };
        let dimension = match expr.kind(number) {
            NodeKind::Percent(_) => "%".to_string(),
            kind => kind.dimension().unwrap_or_default().to_string(),
        };
        let value = OrderedFloat(value);

        match &best {
            None => best = Some((number, value, dimension)),
            Some((_, current, unit)) => {
                if *unit != dimension {
                    return Err(RuntimeError::dimension(position,
                                                       format!("{name}() expects all numbers to have the same dimension.")));
                }
                if value.cmp(current) == keep {
                    best = Some((number, value, dimension));
                }
            },
        }
    }

    best.map(|(number, ..)| number)
        .ok_or_else(|| RuntimeError::logic(format!("{name}() called without parameters.")))
}

/// `min(number, ...)`: the smallest of one or more numbers.
pub(crate) fn min(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    pick(expr, func, "min", Ordering::Less)
}

/// `max(number, ...)`: the largest of one or more numbers.
pub(crate) fn max(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    pick(expr, func, "max", Ordering::Greater)
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
    fn picks_among_numbers() {
        assert_eq!(value("min(3px, 1.5px, 2px)"), "1.5px");
        assert_eq!(value("max(3px, 1.5px, 2px)"), "3px");
        assert_eq!(value("max(10%, 25%)"), "25%");
        assert_eq!(value("min(-4)"), "-4");
    }

    #[test]
    fn rejects_mixed_arguments() {
        assert_eq!(error("min(3px, 2em)"), "min() expects all numbers to have the same dimension.");
        assert_eq!(error("max(3, 50%)"), "max() expects all numbers to have the same dimension.");
        assert_eq!(error("max(3, red)"), "max() expects any number of numbers.");
        assert_eq!(error("min()"), "min() expects at least 1 parameter.");
    }
}
