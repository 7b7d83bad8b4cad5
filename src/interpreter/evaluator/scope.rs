use std::collections::HashMap;

use crate::{
    error::{LogicError, ParseError, RuntimeError},
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            resolver::VariableResolver,
        },
        node::core::{NodeId, NodeKind, NodeType, Position, Tree},
        parser::{core::parse_component_values, utils::argify},
        session::Session,
    },
};

/// File name given to the nodes of the system definitions.
const SYSTEM_FILE: &str = "<system>";

/// Constants preloaded by [`Scope::with_system_definitions`].
const SYSTEM_CONSTANTS: &[(&str, f64)] = &[("_csspp_e", std::f64::consts::E),
                                           ("_csspp_ln10e", std::f64::consts::LN_10),
                                           ("_csspp_ln2e", std::f64::consts::LN_2),
                                           ("_csspp_log10e", std::f64::consts::LOG10_E),
                                           ("_csspp_log2e", std::f64::consts::LOG2_E),
                                           ("_csspp_pi", std::f64::consts::PI),
                                           ("_csspp_sqrt2", std::f64::consts::SQRT_2)];

/// Functions preloaded by [`Scope::with_system_definitions`], written in the
/// expression language as `(signature, body)`.
const SYSTEM_FUNCTIONS: &[(&str, &str)] = &[
    ("adjust_hue($color, $angle)",
     "hsla(deg2rad(hue($color)) + $angle, saturation($color), lightness($color), alpha($color))"),
    ("complement($color)", "adjust_hue($color, $_csspp_pi_rad)"),
    ("darken($color, $percent)", "lighten($color, -$percent)"),
    ("deg2rad($angle)", "$angle * $_csspp_pi_rad / 180deg"),
    ("desaturate($color, $percent)", "saturate($color, -$percent)"),
    ("fade_in($color, $number)", "opacify($color, $number)"),
    ("fade_out($color, $number)", "transparentize($color, $number)"),
    ("grayscale($color)", "saturate($color, -saturation($color))"),
    ("invert($color)",
     "rgba(255.0 - red($color), 255.0 - green($color), 255.0 - blue($color), alpha($color))"),
    ("lighten($color, $percent)",
     "hsla(hue($color), saturation($color), lightness($color) + $percent, alpha($color))"),
    ("mix($color1, $color2, $weight: 0.5)", "$color1 * $weight + $color2 * (1.0 - $weight)"),
    ("opacify($color, $number)", "rgba($color, alpha($color) + $number)"),
    ("opacity($color)", "alpha($color)"),
    ("quote($identifier)", "string($identifier)"),
    ("remove_unit($value)",
     "unit($value) = \"%\" ? decimal_number($value) : type_of($value) = \"integer\" ? $value / integer(\"1\" + unit($value)) : $value / decimal_number(\"1\" + unit($value))"),
    ("saturate($color, $percent)",
     "hsla(hue($color), saturation($color) + $percent, lightness($color), alpha($color))"),
    ("set_unit($value, $unit)",
     "string($unit) = \"%\" ? percentage($value) : type_of($value) = \"integer\" ? integer(string(remove_unit($value)) + string($unit)) : decimal_number(string(remove_unit($value)) + string($unit))"),
    ("transparentize($color, $number)", "rgba($color, alpha($color) - $number)"),
    ("unitless($number)", "unit($number) = \"\""),
    ("unquote($string)", "identifier($string)"),
];

/// A stack of variable frames.
///
/// Frame 0 holds the global variables and functions and is never popped.
/// Every entry is a `LIST[declaration, value]` node living in the tree the
/// scope was filled with; the scope must only be used with that tree.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::{
///     evaluator::{core::Expression, scope::Scope},
///     node::{core::{NodeKind, Position, Tree}, display::{DisplayOptions, to_css_string}},
///     parser::core::parse_component_values,
///     session::Session,
/// };
///
/// let mut tree = Tree::new();
/// let mut session = Session::new();
/// let mut scope = Scope::new();
/// let width = tree.add(NodeKind::Integer { value: 12, dimension: "px".into() },
///                      Position::new("a.css", 1));
/// scope.set_variable(&mut tree, "width", width);
///
/// let list = parse_component_values("$width * 2", "a.css", &mut tree).unwrap();
/// assert!(scope.replace_variables(&mut tree, &mut session, list).unwrap());
///
/// let mut expr = Expression::new(&mut tree, &mut session, list);
/// expr.set_variable_handler(&mut scope);
/// let result = expr.compile().unwrap().unwrap();
/// assert_eq!(to_css_string(&tree, result, DisplayOptions::default()), "24px");
/// ```
#[derive(Debug, Clone)]
pub struct Scope {
    frames: Vec<HashMap<String, NodeId>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    /// Creates a scope with an empty global frame.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![HashMap::new()] }
    }

    /// Creates a scope preloaded with the `_csspp_*` constants and the
    /// system functions such as `darken()` and `mix()`.
    ///
    /// # Errors
    /// Only if one of the built-in definitions fails to parse.
    pub fn with_system_definitions(tree: &mut Tree) -> Result<Self, LogicError> {
        let mut scope = Self::new();
        let position = Position::new(SYSTEM_FILE, 1);

        for &(name, value) in SYSTEM_CONSTANTS {
            let node = tree.add(NodeKind::decimal(value), position.clone());
            scope.set_variable(tree, name, node);
        }
        let pi_rad = tree.add(NodeKind::DecimalNumber { value:     std::f64::consts::PI,
                                                        dimension: "rad".into(), },
                              position.clone());
        scope.set_variable(tree, "_csspp_pi_rad", pi_rad);

        let versions = [("_csspp_major", env!("CARGO_PKG_VERSION_MAJOR")),
                        ("_csspp_minor", env!("CARGO_PKG_VERSION_MINOR")),
                        ("_csspp_patch", env!("CARGO_PKG_VERSION_PATCH"))];
        for (name, number) in versions {
            let node = tree.add(NodeKind::integer(number.parse().unwrap_or_default()),
                                position.clone());
            scope.set_variable(tree, name, node);
        }
        let version = tree.add(NodeKind::String(env!("CARGO_PKG_VERSION").into()), position);
        scope.set_variable(tree, "_csspp_version", version);

        for &(signature, body) in SYSTEM_FUNCTIONS {
            scope.define_function(tree, signature, body).map_err(|e| {
                                                             LogicError(format!("invalid system function {signature}: {}",
                                                                                e.message()))
                                                         })?;
        }

        Ok(scope)
    }

    /// Opens a new innermost frame.
    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Closes the innermost frame. The global frame stays.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of open frames, the global one included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn insert(&mut self, name: &str, entry: NodeId) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), entry);
        }
    }

    /// Sets a variable in the innermost frame.
    ///
    /// A `LIST` value is inserted as its children where the variable is
    /// used; any other value is inserted as is.
    pub fn set_variable(&mut self, tree: &mut Tree, name: &str, value: NodeId) {
        let position = tree.position(value);
        let declaration = tree.add(NodeKind::Variable(name.to_string()), position.clone());
        let entry = tree.add_with_children(NodeKind::List, position, vec![declaration, value]);
        tracing::trace!(%name, depth = self.frames.len(), "variable set");
        self.insert(name, entry);
    }

    /// Defines a function in the innermost frame.
    ///
    /// # Parameters
    /// - `signature`: The name and the parameters, such as
    ///   `mix($color1, $color2, $weight: 0.5)`. A parameter may have a
    ///   default value after a colon.
    /// - `body`: The expression computing the result.
    ///
    /// # Errors
    /// A signature or a body that does not parse, or a parameter that is
    /// not a variable.
    pub fn define_function(&mut self, tree: &mut Tree, signature: &str, body: &str) -> EvalResult<()> {
        let position = Position::new(SYSTEM_FILE, 1);
        let syntax = |e: ParseError| RuntimeError::syntax(Position::new(SYSTEM_FILE, 1), e.to_string());

        let list = parse_component_values(signature, SYSTEM_FILE, tree).map_err(syntax)?;
        let declaration = match tree.children(list) {
            [only] if tree.is(*only, NodeType::Function) => *only,
            _ => {
                return Err(RuntimeError::syntax(position,
                                                format!("a function signature such as \"name($param)\" was expected, not \"{signature}\".")));
            },
        };
        let NodeKind::Function(name) = tree.kind(declaration) else {
            return Err(RuntimeError::logic("define_function(): declaration is not a FUNCTION."));
        };
        let name = name.clone();

        argify(tree, declaration)?;
        for &param in tree.children(declaration) {
            let is_variable = tree.child(param, 0).is_some_and(|c| tree.is(c, NodeType::Variable));
            let has_default = tree.child(param, 1).is_none_or(|c| tree.is(c, NodeType::Colon));
            if !is_variable || !has_default {
                return Err(RuntimeError::syntax(tree.position(param),
                                                format!("function parameters must be variables with an optional default, as in \"$name: value\", in {name}().")));
            }
        }

        let value = parse_component_values(body, SYSTEM_FILE, tree).map_err(syntax)?;
        let entry = tree.add_with_children(NodeKind::List, position, vec![declaration, value]);
        tracing::trace!(%name, depth = self.frames.len(), "function defined");
        self.insert(&name, entry);
        Ok(())
    }

    /// Replaces every `$name` found under `root` by a copy of its value,
    /// and every `$name(...)` by a call to the function `name`.
    ///
    /// # Returns
    /// - `Ok(true)`: all the variables were found.
    /// - `Ok(false)`: a variable is missing or misused; the error was
    ///   reported to the session.
    ///
    /// # Errors
    /// Internal invariant violations only.
    pub fn replace_variables(&self,
                             tree: &mut Tree,
                             session: &mut Session,
                             root: NodeId)
                             -> Result<bool, LogicError> {
        match self.substitute(tree, root) {
            Ok(()) => Ok(true),
            Err(RuntimeError::Logic(e)) => Err(e),
            Err(e) => {
                session.report_error(&e);
                Ok(false)
            },
        }
    }

    /// The entry of `name`, checking whether it is a function or not.
    fn entry_for(&self,
                 tree: &Tree,
                 name: &str,
                 position: Position,
                 want_function: bool)
                 -> EvalResult<NodeId> {
        let Some(entry) = self.get_variable(name, false) else {
            return Err(RuntimeError::variable(position, format!("variable named \"{name}\" is not set.")));
        };
        let declaration = tree.child(entry, 0)
                              .ok_or_else(|| RuntimeError::logic("a variable entry has no declaration."))?;
        let is_function = matches!(tree.node_type(declaration),
                                   NodeType::Function | NodeType::VariableFunction);
        match (want_function, is_function) {
            (true, false) => {
                Err(RuntimeError::variable(position,
                                           format!("variable named \"{name}\" is not a function and it cannot be referenced as such.")))
            },
            (false, true) => {
                Err(RuntimeError::variable(position,
                                           format!("variable named \"{name}\" is a function and it can only be referenced with a function (${name}() or @include {name};).")))
            },
            _ => Ok(entry),
        }
    }

    fn substitute(&self, tree: &mut Tree, node: NodeId) -> EvalResult<()> {
        let mut idx = 0;
        while let Some(child) = tree.child(node, idx) {
            match tree.kind(child) {
                NodeKind::Variable(name) => {
                    let name = name.clone();
                    let entry = self.entry_for(tree, &name, tree.position(child), false)?;
                    let value = tree.child(entry, 1)
                                    .ok_or_else(|| RuntimeError::logic("a variable entry has no value."))?;
                    let copy = tree.deep_copy(value);

                    tree.remove_child(node, idx);
                    if tree.is(copy, NodeType::List) {
                        let items = tree.take_children(copy);
                        let count = items.len();
                        for (offset, item) in items.into_iter().enumerate() {
                            tree.insert_child(node, idx + offset, item);
                        }
                        idx += count;
                    } else {
                        tree.insert_child(node, idx, copy);
                        idx += 1;
                    }
                },
                NodeKind::VariableFunction(name) => {
                    let name = name.clone();
                    let position = tree.position(child);
                    self.entry_for(tree, &name, position.clone(), true)?;

                    let call = tree.add(NodeKind::Function(name), position);
                    let args = tree.take_children(child);
                    tree.set_children(call, args);
                    self.substitute(tree, call)?;
                    tree.splice(node, idx..idx + 1, call);
                    idx += 1;
                },
                _ => {
                    self.substitute(tree, child)?;
                    idx += 1;
                },
            }
        }
        Ok(())
    }

    /// Binds the parameters of a function to the arguments of a call, in
    /// the innermost frame.
    fn bind_parameters(&mut self,
                       tree: &mut Tree,
                       name: &str,
                       declaration: NodeId,
                       func: NodeId)
                       -> EvalResult<()> {
        let params = tree.children(declaration).to_vec();
        for (idx, param) in params.into_iter().enumerate() {
            let Some(NodeKind::Variable(param_name)) = tree.child(param, 0).map(|c| tree.kind(c)) else {
                return Err(RuntimeError::logic("a function parameter is not a variable."));
            };
            let param_name = param_name.clone();

            let source: Vec<NodeId> = match tree.child(func, idx).filter(|&a| tree.is(a, NodeType::Arg)) {
                Some(arg) => tree.children(arg).to_vec(),
                None => {
                    let default = tree.children(param)
                                      .iter()
                                      .skip(2)
                                      .copied()
                                      .skip_while(|&c| tree.is(c, NodeType::Whitespace))
                                      .collect::<Vec<_>>();
                    if default.is_empty() {
                        return Err(RuntimeError::variable(tree.position(func),
                                                          format!("missing function variable named \"{param_name}\" when calling {name}();.")));
                    }
                    default
                },
            };

            let position = tree.position(func);
            let value = tree.add(NodeKind::List, position);
            for item in source {
                let copy = tree.deep_copy(item);
                tree.push_child(value, copy);
            }
            self.set_variable(tree, &param_name, value);
        }
        Ok(())
    }

    fn call(&mut self,
            tree: &mut Tree,
            session: &mut Session,
            name: &str,
            entry: NodeId,
            func: NodeId)
            -> EvalResult<NodeId> {
        let (Some(declaration), Some(body)) = (tree.child(entry, 0), tree.child(entry, 1)) else {
            return Err(RuntimeError::logic("a function entry must have a declaration and a body."));
        };

        self.bind_parameters(tree, name, declaration, func)?;

        let body = tree.deep_copy(body);
        self.substitute(tree, body)?;

        let mut expr = Expression::new(tree, session, body);
        expr.set_variable_handler(self);
        expr.reduce()
    }
}

impl VariableResolver for Scope {
    fn get_variable(&self, name: &str, global_only: bool) -> Option<NodeId> {
        if global_only {
            return self.frames.first().and_then(|frame| frame.get(name)).copied();
        }
        self.frames.iter().rev().find_map(|frame| frame.get(name)).copied()
    }

    fn execute_user_function(&mut self,
                             tree: &mut Tree,
                             session: &mut Session,
                             func: NodeId)
                             -> EvalResult<NodeId> {
        let NodeKind::Function(name) = tree.kind(func) else {
            return Ok(func);
        };
        let name = name.clone();

        let Some(entry) = self.get_variable(&name, false) else {
            return Ok(func);
        };
        let is_function = tree.child(entry, 0).is_some_and(|d| {
                                                  matches!(tree.node_type(d),
                                                           NodeType::Function | NodeType::VariableFunction)
                                              });
        if !is_function {
            return Ok(func);
        }

        tracing::debug!(function = %name, depth = self.frames.len(), "calling user function");
        self.push_frame();
        let result = self.call(tree, session, &name, entry, func);
        self.pop_frame();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{evaluate, interpreter::node::display::{DisplayOptions, to_css_string}};

    fn run(scope: &mut Scope, tree: &mut Tree, source: &str) -> (Option<String>, Session) {
        let mut session = Session::new();
        let list = parse_component_values(source, "test.css", tree).unwrap();
        if !scope.replace_variables(tree, &mut session, list).unwrap() {
            return (None, session);
        }
        let mut expr = Expression::new(tree, &mut session, list);
        expr.set_variable_handler(scope);
        let result = expr.compile().unwrap();
        let text = result.map(|id| to_css_string(tree, id, DisplayOptions::default()));
        (text, session)
    }

    fn value(source: &str) -> String {
        let mut session = Session::new();
        let result = evaluate(source, &mut session).unwrap();
        assert_eq!(session.error_count(), 0, "{:?}", session.diagnostics());
        result.unwrap()
    }

    #[test]
    fn frames_shadow_and_pop() {
        let mut tree = Tree::new();
        let mut scope = Scope::new();
        let pos = Position::new("test.css", 1);
        let one = tree.add(NodeKind::integer(1), pos.clone());
        let two = tree.add(NodeKind::integer(2), pos);
        scope.set_variable(&mut tree, "x", one);
        scope.push_frame();
        scope.set_variable(&mut tree, "x", two);

        let local = scope.get_variable("x", false).unwrap();
        assert_eq!(tree.child(local, 1), Some(two));
        let global = scope.get_variable("x", true).unwrap();
        assert_eq!(tree.child(global, 1), Some(one));

        scope.pop_frame();
        scope.pop_frame();
        assert_eq!(scope.depth(), 1);
        assert!(scope.get_variable("x", false).is_some());
    }

    #[test]
    fn variables_are_copied_in() {
        let mut tree = Tree::new();
        let mut scope = Scope::new();
        let size = parse_component_values("1px + 2px", "test.css", &mut tree).unwrap();
        scope.set_variable(&mut tree, "size", size);

        let (text, _) = run(&mut scope, &mut tree, "$size * 2");
        assert_eq!(text.as_deref(), Some("5px"));
        let (text, _) = run(&mut scope, &mut tree, "$size");
        assert_eq!(text.as_deref(), Some("3px"));
        let entry = scope.get_variable("size", false).unwrap();
        let stored = tree.child(entry, 1).unwrap();
        assert_eq!(to_css_string(&tree, stored, DisplayOptions::default()), "1px + 2px");
    }

    #[test]
    fn misused_variables_are_reported() {
        let mut tree = Tree::new();
        let mut scope = Scope::new();
        scope.define_function(&mut tree, "double($n)", "$n * 2").unwrap();

        let (text, session) = run(&mut scope, &mut tree, "$missing + 1");
        assert_eq!(text, None);
        assert_eq!(session.diagnostics()[0].message, "variable named \"missing\" is not set.");

        let (_, session) = run(&mut scope, &mut tree, "$double + 1");
        assert_eq!(session.diagnostics()[0].message,
                   "variable named \"double\" is a function and it can only be referenced with a function ($double() or @include double;).");

        let pos = Position::new("test.css", 1);
        let n = tree.add(NodeKind::integer(3), pos);
        scope.set_variable(&mut tree, "n", n);
        let (_, session) = run(&mut scope, &mut tree, "$n(1)");
        assert_eq!(session.diagnostics()[0].message,
                   "variable named \"n\" is not a function and it cannot be referenced as such.");
    }

    #[test]
    fn user_functions_bind_parameters() {
        let mut tree = Tree::new();
        let mut scope = Scope::new();
        scope.define_function(&mut tree, "scale($n, $by: 2)", "$n * $by").unwrap();

        assert_eq!(run(&mut scope, &mut tree, "scale(3px)").0.as_deref(), Some("6px"));
        assert_eq!(run(&mut scope, &mut tree, "$scale(3px, 3) + 1px").0.as_deref(), Some("10px"));
        assert_eq!(run(&mut scope, &mut tree, "translate(1px + 1px)").0.as_deref(),
                   Some("translate(2px)"));
        assert_eq!(scope.depth(), 1);

        scope.define_function(&mut tree, "pair($a, $b)", "$a + $b").unwrap();
        let (text, session) = run(&mut scope, &mut tree, "pair(1)");
        assert_eq!(text, None);
        assert_eq!(session.diagnostics()[0].message,
                   "missing function variable named \"b\" when calling pair();.");
    }

    #[test]
    fn bad_signatures_are_rejected() {
        let mut tree = Tree::new();
        let mut scope = Scope::new();
        assert!(scope.define_function(&mut tree, "$x", "1").is_err());
        assert!(scope.define_function(&mut tree, "f(a)", "1").is_err());
        assert!(scope.define_function(&mut tree, "f(", "1").is_err());
    }

    #[test]
    fn system_functions() {
        assert_eq!(value("darken(#ff0000, 25%)"), "maroon");
        assert_eq!(value("lighten(black, 50%)"), "gray");
        assert_eq!(value("invert(white)"), "#000");
        assert_eq!(value("complement(red)"), "aqua");
        assert_eq!(value("grayscale(red)"), "gray");
        assert_eq!(value("mix(red, blue)"), "purple");
        assert_eq!(value("opacity(transparentize(red, 0.5))"), "0.5");
        assert_eq!(value("remove_unit(12px)"), "12");
        assert_eq!(value("set_unit(12, em)"), "12em");
        assert_eq!(value("unitless(3)"), "true");
        assert_eq!(value("unitless(3px)"), "false");
        assert_eq!(value("quote(bold)"), "\"bold\"");
        assert_eq!(value("deg2rad(180deg)"), "3.142rad");
    }

    #[test]
    fn system_constants() {
        assert_eq!(value("$_csspp_pi"), "3.142");
        assert_eq!(value("$_csspp_major"), env!("CARGO_PKG_VERSION_MAJOR"));
        assert_eq!(value("type_of($_csspp_version)"), "\"string\"");
    }
}
