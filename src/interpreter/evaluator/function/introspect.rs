use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            function::{
                args::{get_any, get_number_or_percent, get_string_or_identifier},
                core::is_builtin,
            },
        },
        node::{
            core::{NodeId, NodeKind, NodeType},
            display::{DisplayOptions, to_css_string},
        },
    },
};

/// Name used by `unique_id()` when none is given.
const DEFAULT_UNIQUE_ID: &str = "_csspp_unique";

/// `inspect(value)`: the CSS text of the argument, as a string.
pub(crate) fn inspect(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let Some(arg) = expr.tree.child(func, 0) else {
        return Err(RuntimeError::logic("inspect() called without its argument."));
    };
    let options = DisplayOptions { show_quotes: true,
                                   precision:   expr.session.precision(), };
    let text = to_css_string(expr.tree, arg, options);
    let position = expr.tree.position(arg);
    Ok(expr.add(NodeKind::String(text), position))
}

/// `type_of(value)`: the kind of a value as a string.
///
/// One of `list`, `bool`, `color`, `number`, `identifier`, `integer`,
/// `map`, `string`, `unicode-range` or `undefined`. Percentages are
/// numbers.
pub(crate) fn type_of(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let Some(value) = get_any(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "type_of() expects one value as a parameter."));
    };
    let name = match expr.node_type(value) {
        NodeType::Array | NodeType::List => "list",
        NodeType::Boolean => "bool",
        NodeType::Color => "color",
        NodeType::DecimalNumber | NodeType::Percent => "number",
        NodeType::Identifier => "identifier",
        NodeType::Integer => "integer",
        NodeType::Map => "map",
        NodeType::String => "string",
        NodeType::UnicodeRange => "unicode-range",
        _ => "undefined",
    };
    Ok(expr.add(NodeKind::String(name.into()), position))
}

/// `unit(number)`: the dimension of a number as a string, `"%"` for a
/// percentage.
pub(crate) fn unit(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let Some((number, _)) = get_number_or_percent(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "unit() expects a number as parameter."));
    };
    let unit = match expr.kind(number) {
        NodeKind::Percent(_) => "%".to_string(),
        kind => kind.dimension().unwrap_or_default().to_string(),
    };
    Ok(expr.add(NodeKind::String(unit), position))
}

/// `unique_id()` or `unique_id(name)`: an identifier made of the name and
/// the next value of the session counter.
pub(crate) fn unique_id(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);

    let mut name = String::new();
    if expr.tree.len(func) == 1 {
        let Some(user) = get_string_or_identifier(expr.tree, func, 0) else {
            return Err(RuntimeError::type_error(position,
                                                "unique_id() expects a string or an identifier as its optional parameter."));
        };
        name = user;
    }
    if name.is_empty() {
        name = DEFAULT_UNIQUE_ID.to_string();
    }

    let counter = expr.session.next_unique_id();
    Ok(expr.add(NodeKind::Identifier(format!("{name}{counter}")), position))
}

/// `random()`: a decimal number from 0 included to 1 excluded.
pub(crate) fn random(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let value = expr.session.next_random();
    let position = expr.tree.position(func);
    Ok(expr.add(NodeKind::decimal(value), position))
}

/// `not(value)`: the boolean negation of a value.
pub(crate) fn not(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let Some(value) = get_any(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "not() expects a boolean as its first argument."));
    };
    let truth = expr.boolean(value);
    Ok(expr.add(NodeKind::Boolean(!truth), position))
}

/// `if(condition, when_true, when_false)`.
///
/// The arguments arrive unreduced: the condition is reduced first and then
/// only the chosen branch. A branch holding several values is returned as
/// a `LIST`.
pub(crate) fn if_else(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);
    let (Some(condition), Some(when_true), Some(when_false)) =
        (expr.tree.child(func, 0), expr.tree.child(func, 1), expr.tree.child(func, 2))
    else {
        return Err(RuntimeError::logic("if() called without its three arguments."));
    };

    expr.nested(condition).compile_list(func)?;
    let Some(value) = get_any(expr.tree, func, 0) else {
        return Err(RuntimeError::type_error(position, "if() expects a boolean as its first argument."));
    };

    let branch = if expr.boolean(value) { when_true } else { when_false };
    expr.nested(branch).compile_list(func)?;

    if let Some(result) = get_any(expr.tree, func, if branch == when_true { 1 } else { 2 }) {
        return Ok(result);
    }
    let list = expr.add(NodeKind::List, expr.tree.position(branch));
    let children = expr.tree.take_children(branch);
    expr.tree.set_children(list, children);
    Ok(list)
}

/// Whether the resolver knows `name` with a declaration of one of `types`.
fn declared_as(expr: &Expression<'_>, name: &str, global_only: bool, types: &[NodeType]) -> bool {
    let Some(resolver) = expr.resolver.as_deref() else {
        return false;
    };
    resolver.get_variable(name, global_only)
            .filter(|&entry| expr.tree.is(entry, NodeType::List))
            .and_then(|entry| expr.tree.child(entry, 0))
            .is_some_and(|declaration| types.contains(&expr.node_type(declaration)))
}

/// The name argument of the `*_exists()` functions.
fn exists_parameter(expr: &Expression<'_>, func: NodeId, function: &str) -> EvalResult<String> {
    get_string_or_identifier(expr.tree, func, 0).filter(|name| !name.is_empty())
                                                .ok_or_else(|| {
                                                    RuntimeError::type_error(expr.tree.position(func),
                                                                             format!("{function}() expects a string or an identifier as parameter."))
                                                })
}

/// `function_exists(name)`: whether `name` is a builtin or a global user
/// function.
pub(crate) fn function_exists(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let name = exists_parameter(expr, func, "function_exists")?;
    let exists = is_builtin(&name)
                 || declared_as(expr,
                                &name,
                                true,
                                &[NodeType::VariableFunction, NodeType::Function]);
    let position = expr.tree.position(func);
    Ok(expr.add(NodeKind::Boolean(exists), position))
}

/// `global_variable_exists(name)`: whether `name` is a global variable.
pub(crate) fn global_variable_exists(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let name = exists_parameter(expr, func, "global_variable_exists")?;
    let exists = declared_as(expr, &name, true, &[NodeType::Variable, NodeType::Identifier]);
    let position = expr.tree.position(func);
    Ok(expr.add(NodeKind::Boolean(exists), position))
}

/// `variable_exists(name)`: whether `name` is a variable assigned in the
/// expression with `:=` or known to the resolver in any scope.
pub(crate) fn variable_exists(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let name = exists_parameter(expr, func, "variable_exists")?;
    let exists = expr.variables.contains_key(&name)
                 || declared_as(expr, &name, false, &[NodeType::Variable, NodeType::Identifier]);
    let position = expr.tree.position(func);
    Ok(expr.add(NodeKind::Boolean(exists), position))
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
    fn type_names() {
        assert_eq!(value("type_of(3)"), "\"integer\"");
        assert_eq!(value("type_of(3.5px)"), "\"number\"");
        assert_eq!(value("type_of(10%)"), "\"number\"");
        assert_eq!(value("type_of((1, 2))"), "\"list\"");
        assert_eq!(value("type_of((a: 1))"), "\"map\"");
        assert_eq!(value("type_of(U+1F)"), "\"unicode-range\"");
        assert_eq!(value("type_of(null)"), "\"undefined\"");
        assert_eq!(error("type_of(1 2)"), "type_of() expects one value as a parameter.");
    }

    #[test]
    fn units() {
        assert_eq!(value("unit(3px * 2em)"), "\"px * em\"");
        assert_eq!(value("unit(25%)"), "\"%\"");
        assert_eq!(value("unit(7)"), "\"\"");
        assert_eq!(error("unit(red)"), "unit() expects a number as parameter.");
    }

    #[test]
    fn unique_ids_count_per_session() {
        let mut session = Session::new();
        assert_eq!(evaluate("unique_id()", &mut session).unwrap().as_deref(),
                   Some("_csspp_unique1"));
        assert_eq!(evaluate("unique_id(tab)", &mut session).unwrap().as_deref(),
                   Some("tab2"));
        session.set_unique_id_counter(0);
        assert_eq!(evaluate("unique_id(\"\")", &mut session).unwrap().as_deref(),
                   Some("_csspp_unique1"));
    }

    #[test]
    fn random_is_a_fraction() {
        let mut session = Session::new();
        session.seed_random(42);
        for _ in 0..20 {
            let text = evaluate("random()", &mut session).unwrap().unwrap();
            let n: f64 = text.parse().unwrap();
            assert!((0.0..1.0).contains(&n));
        }
    }

    #[test]
    fn if_only_compiles_the_chosen_branch() {
        assert_eq!(value("if(1 < 2, 10px, 1px + \"a\")"), "10px");
        assert_eq!(value("if(false, 1, 2px 3px)"), "2px 3px");
        assert_eq!(error("if(1 2, a, b)"), "if() expects a boolean as its first argument.");
    }

    #[test]
    fn negation() {
        assert_eq!(value("not(0)"), "true");
        assert_eq!(value("not(\"text\")"), "false");
    }

    #[test]
    fn existence_checks() {
        assert_eq!(value("function_exists(rgba)"), "true");
        assert_eq!(value("function_exists(\"darken\")"), "true");
        assert_eq!(value("function_exists(translate)"), "false");
        assert_eq!(value("global_variable_exists(_csspp_pi)"), "true");
        assert_eq!(value("variable_exists(nothing_here)"), "false");
        assert_eq!(value("(x := 3, variable_exists(x))"), "(3, true)");
        assert_eq!(error("function_exists(3)"),
                   "function_exists() expects a string or an identifier as parameter.");
    }

    #[test]
    fn inspect_keeps_quotes() {
        assert_eq!(value("inspect(\"a\" 2px)"), "'\"a\" 2px'");
    }
}
