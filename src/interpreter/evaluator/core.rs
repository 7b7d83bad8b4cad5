use std::collections::HashMap;

use crate::{
    error::{LogicError, RuntimeError},
    interpreter::{
        evaluator::resolver::VariableResolver,
        node::core::{NodeId, NodeKind, NodeType, Position, Tree},
        session::Session,
    },
};

/// Result type used by the evaluator.
///
/// All grammar levels return either the id of the node they reduced to or
/// a `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Reduces the children of one node to a single value.
///
/// An `Expression` walks the children of `node` with a cursor, skipping
/// blanks, and climbs the precedence levels from the conditional operator
/// down to unary values. The tokens consumed by a reduction are replaced in
/// the tree by the resulting node.
///
/// ## Usage
///
/// An expression is created for one node, optionally given a
/// [`VariableResolver`], and compiled once. Parenthesized groups, function
/// arguments and indexes are handled by nested expressions sharing the same
/// tree, session and resolver.
///
/// ```
/// use csspp_expr::interpreter::{
///     evaluator::core::Expression,
///     node::{core::Tree, display::{DisplayOptions, to_css_string}},
///     parser::core::parse_component_values,
///     session::Session,
/// };
///
/// let mut tree = Tree::new();
/// let mut session = Session::new();
/// let list = parse_component_values("3px * 2 + 1px", "a.css", &mut tree).unwrap();
///
/// let result = Expression::new(&mut tree, &mut session, list).compile().unwrap().unwrap();
/// assert_eq!(to_css_string(&tree, result, DisplayOptions::default()), "7px");
/// ```
pub struct Expression<'a> {
    pub(crate) tree:                &'a mut Tree,
    pub(crate) session:             &'a mut Session,
    pub(crate) resolver:            Option<&'a mut dyn VariableResolver>,
    /// The node whose children are being reduced.
    pub(crate) node:                NodeId,
    /// Index of the child following `current`, blanks skipped.
    pub(crate) pos:                 usize,
    start:                          Option<usize>,
    /// The token being looked at; an `EOF` node past the last child.
    pub(crate) current:             NodeId,
    /// Variables assigned with `:=` in this expression.
    pub(crate) variables:           HashMap<String, NodeId>,
    pub(crate) divide_font_metrics: bool,
    /// Set while parsing a branch whose value is thrown away.
    pub(crate) quiet:               bool,
}

impl<'a> Expression<'a> {
    /// Creates an expression reducing the children of `node`.
    pub fn new(tree: &'a mut Tree, session: &'a mut Session, node: NodeId) -> Self {
        let position = tree.position(node);
        let current = tree.add(NodeKind::Eof, position);
        Self { tree,
               session,
               resolver: None,
               node,
               pos: 0,
               start: None,
               current,
               variables: HashMap::new(),
               divide_font_metrics: false,
               quiet: false }
    }

    /// Binds the resolver used for `$variables`, user functions and the
    /// `*_exists()` functions.
    pub fn set_variable_handler(&mut self, resolver: &'a mut dyn VariableResolver) {
        self.resolver = Some(resolver);
    }

    /// Reduces the whole content of the node to one value.
    ///
    /// The consumed tokens are replaced by the result in the tree; tokens
    /// the grammar did not accept are left after it.
    ///
    /// # Returns
    /// - `Ok(Some(id))`: the reduced value.
    /// - `Ok(None)`: the expression is invalid; one error was reported to
    ///   the session.
    ///
    /// # Errors
    /// Internal invariant violations only.
    #[tracing::instrument(skip(self))]
    pub fn compile(&mut self) -> Result<Option<NodeId>, LogicError> {
        let result = self.reduce();
        self.settle(result)
    }

    /// Same as [`Expression::compile`] without reporting: the error is
    /// returned to the caller instead.
    ///
    /// Resolvers use this to compile function bodies so that failures travel
    /// back through the expression that called the function.
    pub fn reduce(&mut self) -> EvalResult<NodeId> {
        self.mark_start();
        self.next();
        let result = self.conditional()?;
        self.replace_with_result(result)
    }

    /// Coerces a node to a boolean.
    ///
    /// Values that have no truth value are reported as an error and count
    /// as `false`.
    pub fn boolean(&mut self, node: NodeId) -> bool {
        match self.to_boolean(node) {
            Ok(b) => b,
            Err(e) => {
                self.report(&e);
                false
            },
        }
    }

    /// Coerces a node to a boolean, failing for values without a truth
    /// value.
    pub(crate) fn to_boolean(&self, node: NodeId) -> EvalResult<bool> {
        truthiness(self.tree, node).ok_or_else(|| {
                                       RuntimeError::type_error(self.tree.position(node),
                                                                "a boolean expression was expected.")
                                   })
    }

    /// Turns a failed reduction into the public outcome, reporting
    /// recoverable errors once.
    pub(crate) fn settle<T>(&mut self, result: EvalResult<T>) -> Result<Option<T>, LogicError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(RuntimeError::Logic(e)) => Err(e),
            Err(e) => {
                self.report(&e);
                Ok(None)
            },
        }
    }

    /// Reports an error unless diagnostics are currently muted.
    pub(crate) fn report(&mut self, error: &RuntimeError) {
        if !self.quiet {
            self.session.report_error(error);
        }
    }

    /// Reports a warning unless diagnostics are currently muted.
    pub(crate) fn warn(&mut self, position: Position, message: impl Into<String>) {
        if !self.quiet {
            self.session.warning(position, message);
        }
    }

    /// Creates an expression for a child node sharing this expression's
    /// tree, session and resolver. Local variables are not shared.
    pub(crate) fn nested(&mut self, node: NodeId) -> Expression<'_> {
        let resolver: Option<&mut dyn VariableResolver> = match &mut self.resolver {
            Some(r) => Some(&mut **r),
            None => None,
        };
        let mut expr = Expression::new(&mut *self.tree, &mut *self.session, node);
        expr.resolver = resolver;
        expr.quiet = self.quiet;
        expr
    }

    /// Parses a sub-expression whose value is not wanted.
    ///
    /// The tokens are consumed so parsing can go on after them, and nothing
    /// is reported, including what resolvers report while running user
    /// functions. Logic errors still go through.
    pub(crate) fn skip_conditional(&mut self) -> EvalResult<()> {
        let quiet = self.quiet;
        self.quiet = true;
        self.session.mute();
        let result = self.conditional();
        self.session.unmute();
        self.quiet = quiet;
        match result {
            Err(e) if e.is_logic() => Err(e),
            _ => Ok(()),
        }
    }

    /// Moves to the next token, skipping the blanks following it.
    pub(crate) fn next(&mut self) {
        match self.tree.child(self.node, self.pos) {
            Some(child) => {
                self.current = child;
                self.pos += 1;
                while self.tree
                          .child(self.node, self.pos)
                          .is_some_and(|c| self.tree.is(c, NodeType::Whitespace))
                {
                    self.pos += 1;
                }
            },
            None => {
                if !self.tree.is(self.current, NodeType::Eof) {
                    let position = self.tree.position(self.node);
                    self.current = self.tree.add(NodeKind::Eof, position);
                }
            },
        }
    }

    pub(crate) fn end_of_nodes(&self) -> bool {
        self.pos >= self.tree.len(self.node)
    }

    /// Remembers where the tokens of the next reduction start.
    pub(crate) const fn mark_start(&mut self) {
        self.start = Some(self.pos);
    }

    /// Replaces the tokens consumed since [`Expression::mark_start`] by
    /// `result`.
    ///
    /// The current token and the blank right before it were not consumed
    /// and stay in place, after the result.
    pub(crate) fn replace_with_result(&mut self, result: NodeId) -> EvalResult<NodeId> {
        let Some(start) = self.start else {
            return Err(RuntimeError::logic("replace_with_result() cannot be called if mark_start() was never called."));
        };

        if !self.tree.is(self.current, NodeType::Eof) && self.pos > 0 {
            while self.pos > 0 {
                self.pos -= 1;
                if self.tree.child(self.node, self.pos) == Some(self.current) {
                    break;
                }
            }
            if self.pos > 0
               && self.tree
                      .child(self.node, self.pos - 1)
                      .is_some_and(|c| self.tree.is(c, NodeType::Whitespace))
            {
                self.pos -= 1;
            }
        }

        let end = self.pos.max(start);
        self.tree.splice(self.node, start..end, result);
        self.pos = start + 1;
        self.mark_start();

        Ok(result)
    }

    pub(crate) fn current_is(&self, node_type: NodeType) -> bool {
        self.tree.is(self.current, node_type)
    }

    /// Whether the current token is the identifier `word`.
    pub(crate) fn current_is_word(&self, word: &str) -> bool {
        matches!(self.tree.kind(self.current), NodeKind::Identifier(s) if s == word)
    }

    pub(crate) fn current_position(&self) -> Position {
        self.tree.position(self.current)
    }

    /// Adds a node to the tree.
    pub(crate) fn add(&mut self, kind: NodeKind, position: Position) -> NodeId {
        self.tree.add(kind, position)
    }

    pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
        self.tree.kind(id)
    }

    pub(crate) fn node_type(&self, id: NodeId) -> NodeType {
        self.tree.node_type(id)
    }
}

/// The truth value of a node, `None` when it has none.
///
/// Numbers are true when not zero, strings and containers when not empty,
/// colors when not black (alpha is ignored), `null` is false, and the
/// identifiers `true`, `false` and `null` have their obvious value.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::{
///     evaluator::core::truthiness,
///     node::core::{NodeKind, Position, Tree},
/// };
///
/// let mut tree = Tree::new();
/// let pos = Position::new("a.css", 1);
/// let zero = tree.add(NodeKind::integer(0), pos.clone());
/// let word = tree.add(NodeKind::Identifier("maybe".into()), pos);
/// assert_eq!(truthiness(&tree, zero), Some(false));
/// assert_eq!(truthiness(&tree, word), None);
/// ```
#[must_use]
#[allow(clippy::float_cmp)]
pub fn truthiness(tree: &Tree, id: NodeId) -> Option<bool> {
    match tree.kind(id) {
        NodeKind::Boolean(b) => Some(*b),
        NodeKind::Identifier(s) => match s.as_str() {
            "true" => Some(true),
            "false" | "null" => Some(false),
            _ => None,
        },
        NodeKind::Integer { value, .. } => Some(*value != 0),
        NodeKind::DecimalNumber { value, .. } | NodeKind::Percent(value) => Some(*value != 0.0),
        NodeKind::String(s) => Some(!s.is_empty()),
        NodeKind::Array | NodeKind::List | NodeKind::Map => Some(!tree.is_empty(id)),
        NodeKind::Color(c) => Some(c.to_rgba() & 0x00ff_ffff != 0),
        NodeKind::Null => Some(false),
        _ => None,
    }
}
