use crate::interpreter::{
    evaluator::core::EvalResult,
    node::core::{NodeId, Tree},
    session::Session,
};

/// Gives an expression access to the variables and functions defined
/// outside of it.
///
/// Variables are described by a `LIST` node holding two children: the
/// declaration and the value. The type of the declaration tells what the
/// entry is:
/// - `VARIABLE` (`$name: value`) or `IDENTIFIER` (`@mixin name`): a plain
///   variable.
/// - `VARIABLE_FUNCTION` (`$name(...)`) or `FUNCTION` (`@mixin name(...)`):
///   a function.
pub trait VariableResolver {
    /// Looks up a variable or a function by name.
    ///
    /// # Parameters
    /// - `name`: The name without the `$`.
    /// - `global_only`: Only look at the outermost scope.
    ///
    /// # Returns
    /// The `LIST[declaration, value]` entry, if any.
    fn get_variable(&self, name: &str, global_only: bool) -> Option<NodeId>;

    /// Runs a function the expression engine does not know.
    ///
    /// Unknown names must be returned unchanged: they are plain CSS
    /// functions such as `translate()` whose arguments were already
    /// reduced.
    ///
    /// # Parameters
    /// - `tree`: The tree owning `func`.
    /// - `session`: Where diagnostics go.
    /// - `func`: The `FUNCTION` node, its arguments already split in `ARG`s.
    ///
    /// # Returns
    /// The node replacing the call.
    fn execute_user_function(&mut self,
                             tree: &mut Tree,
                             session: &mut Session,
                             func: NodeId)
                             -> EvalResult<NodeId>;
}
