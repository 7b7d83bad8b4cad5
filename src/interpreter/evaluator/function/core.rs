use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            function::{color, convert, introspect, math, min_max},
        },
        node::core::{NodeId, NodeKind},
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the expression running it and the `FUNCTION` node,
/// whose arguments are already split in `ARG`s and, except for `if()`,
/// reduced. It returns the node replacing the call.
type BuiltinFn = fn(&mut Expression<'_>, NodeId) -> EvalResult<NodeId>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `Range(min, max)` accepts any count from `min` to `max` inclusive.
/// - `AtLeast(n)` accepts `n` arguments or more.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of the functions implemented by the engine itself.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "abs"                    => { arity: Arity::Exact(1),      func: math::abs },
    "acos"                   => { arity: Arity::Exact(1),      func: math::acos },
    "alpha"                  => { arity: Arity::Exact(1),      func: color::alpha },
    "asin"                   => { arity: Arity::Exact(1),      func: math::asin },
    "atan"                   => { arity: Arity::Exact(1),      func: math::atan },
    "blue"                   => { arity: Arity::Exact(1),      func: color::blue },
    "ceil"                   => { arity: Arity::Exact(1),      func: math::ceil },
    "cos"                    => { arity: Arity::Exact(1),      func: math::cos },
    "decimal_number"         => { arity: Arity::Exact(1),      func: convert::decimal_number },
    "floor"                  => { arity: Arity::Exact(1),      func: math::floor },
    "frgb"                   => { arity: Arity::Range(1, 3),   func: color::frgb },
    "frgba"                  => { arity: Arity::Range(2, 4),   func: color::frgba },
    "function_exists"        => { arity: Arity::Exact(1),      func: introspect::function_exists },
    "global_variable_exists" => { arity: Arity::Exact(1),      func: introspect::global_variable_exists },
    "green"                  => { arity: Arity::Exact(1),      func: color::green },
    "hsl"                    => { arity: Arity::Exact(3),      func: color::hsl },
    "hsla"                   => { arity: Arity::Exact(4),      func: color::hsla },
    "hue"                    => { arity: Arity::Exact(1),      func: color::hue },
    "identifier"             => { arity: Arity::Exact(1),      func: convert::identifier },
    "if"                     => { arity: Arity::Exact(3),      func: introspect::if_else },
    "inspect"                => { arity: Arity::Exact(1),      func: introspect::inspect },
    "integer"                => { arity: Arity::Exact(1),      func: convert::integer },
    "lightness"              => { arity: Arity::Exact(1),      func: color::lightness },
    "log"                    => { arity: Arity::Exact(1),      func: math::log },
    "max"                    => { arity: Arity::AtLeast(1),    func: min_max::max },
    "min"                    => { arity: Arity::AtLeast(1),    func: min_max::min },
    "not"                    => { arity: Arity::Exact(1),      func: introspect::not },
    "percentage"             => { arity: Arity::Exact(1),      func: convert::percentage },
    "random"                 => { arity: Arity::Exact(0),      func: introspect::random },
    "red"                    => { arity: Arity::Exact(1),      func: color::red },
    "rgb"                    => { arity: Arity::Range(1, 3),   func: color::rgb },
    "rgba"                   => { arity: Arity::Range(2, 4),   func: color::rgba },
    "round"                  => { arity: Arity::Exact(1),      func: math::round },
    "saturation"             => { arity: Arity::Exact(1),      func: color::saturation },
    "sign"                   => { arity: Arity::Exact(1),      func: math::sign },
    "sin"                    => { arity: Arity::Exact(1),      func: math::sin },
    "sqrt"                   => { arity: Arity::Exact(1),      func: math::sqrt },
    "str_length"             => { arity: Arity::Exact(1),      func: convert::str_length },
    "string"                 => { arity: Arity::Exact(1),      func: convert::string },
    "tan"                    => { arity: Arity::Exact(1),      func: math::tan },
    "type_of"                => { arity: Arity::Exact(1),      func: introspect::type_of },
    "unique_id"              => { arity: Arity::Range(0, 1),   func: introspect::unique_id },
    "unit"                   => { arity: Arity::Exact(1),      func: introspect::unit },
    "variable_exists"        => { arity: Arity::Exact(1),      func: introspect::variable_exists },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// Returns `true` if the count is permitted, `false` otherwise.
    const fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::Range(min, max) => n >= min && n <= max,
            Self::AtLeast(min) => n >= min,
        }
    }

    /// The diagnostic for a call to `name` with the wrong number of
    /// arguments.
    fn message(self, name: &str) -> String {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        match self {
            Self::Exact(n) => format!("{name}() expects exactly {n} parameter{}.", plural(n)),
            Self::Range(min, max) => {
                format!("{name}() expects between {min} and {max} parameters.")
            },
            Self::AtLeast(n) => format!("{name}() expects at least {n} parameter{}.", plural(n)),
        }
    }
}

/// Whether `name` is implemented by the engine itself.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::evaluator::function::core::is_builtin;
///
/// assert!(is_builtin("rgba"));
/// assert!(!is_builtin("translate"));
/// ```
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    find_builtin(name).is_some()
}

/// Binary search of the table, which is sorted by name.
fn find_builtin(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.binary_search_by(|b| b.name.cmp(name))
                 .ok()
                 .map(|idx| &BUILTIN_TABLE[idx])
}

impl Expression<'_> {
    /// Runs a function call.
    ///
    /// A builtin has its arity checked and then runs. Any other name goes
    /// to the resolver, which runs user functions and returns the call
    /// unchanged for plain CSS functions. Without a resolver the call is
    /// returned unchanged.
    ///
    /// # Parameters
    /// - `func`: The `FUNCTION` node, its arguments split in `ARG`s.
    ///
    /// # Returns
    /// The node replacing the call.
    ///
    /// # Errors
    /// A wrong number of arguments, or any error raised by the function.
    pub(crate) fn execute_function(&mut self, func: NodeId) -> EvalResult<NodeId> {
        let NodeKind::Function(name) = self.kind(func) else {
            return Err(RuntimeError::logic(format!("execute_function() called with a {} node.",
                                                   self.node_type(func))));
        };
        let name = name.clone();

        if let Some(builtin) = find_builtin(&name) {
            let count = self.tree.len(func);
            if !builtin.arity.check(count) {
                return Err(RuntimeError::arity(self.tree.position(func),
                                               builtin.arity.message(&name)));
            }
            tracing::debug!(function = %name, arguments = count, "calling builtin");
            return (builtin.func)(self, func);
        }

        match self.resolver.as_deref_mut() {
            Some(resolver) => {
                tracing::debug!(function = %name, "delegating call to resolver");
                resolver.execute_user_function(self.tree, self.session, func)
            },
            None => Ok(func),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(BUILTIN_FUNCTIONS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn every_builtin_is_found() {
        for name in BUILTIN_FUNCTIONS {
            assert_eq!(find_builtin(name).map(|b| b.name), Some(*name));
        }
        assert!(find_builtin("aaa").is_none());
        assert!(find_builtin("lighten").is_none());
        assert!(find_builtin("zzz").is_none());
    }

    #[test]
    fn arity_checks() {
        assert!(Arity::Exact(1).check(1));
        assert!(!Arity::Exact(1).check(2));
        assert!(Arity::Range(2, 4).check(3));
        assert!(!Arity::Range(2, 4).check(1));
        assert!(Arity::AtLeast(1).check(10));
        assert!(!Arity::AtLeast(1).check(0));
    }

    #[test]
    fn arity_messages() {
        assert_eq!(Arity::Exact(1).message("abs"), "abs() expects exactly 1 parameter.");
        assert_eq!(Arity::Exact(3).message("hsl"), "hsl() expects exactly 3 parameters.");
        assert_eq!(Arity::Range(2, 4).message("rgba"),
                   "rgba() expects between 2 and 4 parameters.");
        assert_eq!(Arity::AtLeast(1).message("max"), "max() expects at least 1 parameter.");
    }
}
