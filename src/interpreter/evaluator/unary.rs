use crate::{
    error::{LogicError, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Expression},
        node::{
            color::Color,
            core::{NodeId, NodeKind, NodeType},
        },
        parser::utils::argify,
    },
};

impl Expression<'_> {
    /// Parses a single value.
    ///
    /// Literals are returned as they are. `#hash` tokens and color names
    /// become colors, `null`, `true` and `false` become their value, and an
    /// identifier naming a local variable gives that variable's value. A
    /// function call has its arguments reduced before it runs, except for
    /// `calc()` and `expression()`. Parentheses hold a nested list, and a
    /// leading `+` or `-` applies to the following power expression.
    ///
    /// # Errors
    /// An invalid color, a negated non-number, a token that cannot start a
    /// value, or any error raised by a function call.
    pub(crate) fn unary(&mut self) -> EvalResult<NodeId> {
        let current = self.current;
        let position = self.current_position();

        match self.kind(current) {
            NodeKind::Array
            | NodeKind::Boolean(_)
            | NodeKind::Color(_)
            | NodeKind::DecimalNumber { .. }
            | NodeKind::Exclamation(_)
            | NodeKind::Integer { .. }
            | NodeKind::Map
            | NodeKind::Null
            | NodeKind::Percent(_)
            | NodeKind::String(_)
            | NodeKind::UnicodeRange(_)
            | NodeKind::Url(_) => {
                self.next();
                Ok(current)
            },
            NodeKind::Function(name) => {
                let lazy = matches!(name.as_str(), "calc" | "expression" | "if");
                self.next();
                argify(self.tree, current)?;
                if !lazy {
                    self.nested(current).reduce_args(false)?;
                }
                self.execute_function(current)
            },
            NodeKind::OpenParenthesis => {
                let mut group = self.nested(current);
                group.next();
                let result = group.expression_list();
                drop(group);
                self.next();
                result
            },
            NodeKind::Add => {
                self.next();
                self.power()
            },
            NodeKind::Subtract => {
                self.next();
                let result = self.power()?;
                let negated = match self.kind(result) {
                    NodeKind::Integer { value, dimension } => {
                        NodeKind::Integer { value:     value.wrapping_neg(),
                                            dimension: dimension.clone(), }
                    },
                    NodeKind::DecimalNumber { value, dimension } => {
                        NodeKind::DecimalNumber { value:     -value,
                                                  dimension: dimension.clone(), }
                    },
                    NodeKind::Percent(value) => NodeKind::Percent(-value),
                    _ => {
                        return Err(RuntimeError::type_error(self.current_position(),
                                                            format!("unsupported type {} for operator '-'.",
                                                                    self.node_type(result))));
                    },
                };
                let position = self.tree.position(result);
                Ok(self.add(negated, position))
            },
            NodeKind::Hash(name) => {
                let color = Color::from_hash(name);
                let message = format!("the color in #{name} is not valid.");
                self.next();
                match color {
                    Some(c) => Ok(self.add(NodeKind::Color(c), position)),
                    None => Err(RuntimeError::type_error(position, message)),
                }
            },
            NodeKind::Identifier(name) => {
                let name = name.clone();
                self.next();
                Ok(self.identifier_value(current, &name))
            },
            other => Err(RuntimeError::syntax(position,
                                              format!("unsupported type {} as a unary expression token.",
                                                      other.node_type()))),
        }
    }

    /// The value of an identifier used as an operand.
    fn identifier_value(&mut self, identifier: NodeId, name: &str) -> NodeId {
        let position = self.tree.position(identifier);
        match name {
            "null" => return self.add(NodeKind::Null, position),
            "true" => return self.add(NodeKind::Boolean(true), position),
            "false" => return self.add(NodeKind::Boolean(false), position),
            _ => {},
        }
        if let Some(c) = Color::from_name(name) {
            return self.add(NodeKind::Color(c), position);
        }
        self.variables.get(name).copied().unwrap_or(identifier)
    }

    /// Reduces each space separated expression of the node, in place.
    ///
    /// `a + 1 b * 2` becomes two values separated by a blank. A `!flag`
    /// token is removed and set as a flag on `parent` instead; it should
    /// be the last token, otherwise a warning is emitted.
    ///
    /// # Errors
    /// The first error raised by one of the expressions.
    pub(crate) fn compile_list(&mut self, parent: NodeId) -> EvalResult<()> {
        self.mark_start();
        self.next();

        loop {
            if let NodeKind::Exclamation(flag) = self.kind(self.current) {
                let flag = flag.clone();
                if !self.end_of_nodes() {
                    self.warn(self.current_position(),
                              format!("A special flag, !{flag} in this case, must only appear at the end of a declaration."));
                }
                if let Some(idx) = self.tree
                                       .children(self.node)
                                       .iter()
                                       .position(|&c| c == self.current)
                {
                    self.tree.remove_child(self.node, idx);
                }
                self.pos = self.pos.saturating_sub(1);
                self.tree.set_flag(parent, &flag);
            } else {
                let result = self.conditional()?;
                self.replace_with_result(result)?;
            }

            if self.end_of_nodes() {
                return Ok(());
            }
            self.next();

            if self.current_is(NodeType::Whitespace) {
                if self.end_of_nodes() {
                    return Ok(());
                }
                self.mark_start();
                self.next();
            }
        }
    }

    /// Reduces every `ARG` of the function call this expression is on.
    ///
    /// A trailing `{ ... }` block is not an argument and is left alone.
    pub(crate) fn reduce_args(&mut self, divide_font_metrics: bool) -> EvalResult<()> {
        let func = self.node;
        let mut count = self.tree.len(func);
        if self.tree
               .last_child(func)
               .is_some_and(|c| self.tree.is(c, NodeType::OpenCurlyBracket))
        {
            count -= 1;
        }

        for idx in 0..count {
            let Some(arg) = self.tree.child(func, idx) else {
                break;
            };
            let mut arg_expr = self.nested(arg);
            arg_expr.divide_font_metrics = divide_font_metrics;
            arg_expr.compile_list(func)?;
        }

        Ok(())
    }

    /// Reduces the arguments of a function call or a declaration value in
    /// place.
    ///
    /// The node must already be split in `ARG`s. Each argument is a space
    /// separated list of expressions; flags such as `!important` found at
    /// the end are moved to the node.
    ///
    /// # Parameters
    /// - `divide_font_metrics`: Turn `a / b` into a `font-size/line-height`
    ///   pair instead of dividing, as wanted for the `font` property.
    ///
    /// # Returns
    /// - `Ok(true)`: all arguments were reduced.
    /// - `Ok(false)`: one argument failed; its error was reported.
    ///
    /// # Errors
    /// Internal invariant violations only.
    #[tracing::instrument(skip(self))]
    pub fn compile_args(&mut self, divide_font_metrics: bool) -> Result<bool, LogicError> {
        let result = self.reduce_args(divide_font_metrics);
        Ok(self.settle(result)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{
        evaluator::core::Expression,
        node::{
            core::{NodeId, NodeType, Tree},
            display::{DisplayOptions, to_css_string},
        },
        parser::{core::parse_component_values, utils::argify},
        session::Session,
    };

    fn compile_declaration(source: &str) -> (Tree, Session, NodeId) {
        let mut tree = Tree::new();
        let mut session = Session::new();
        let list = parse_component_values(source, "test.css", &mut tree).unwrap();
        argify(&mut tree, list).unwrap();
        let ok = Expression::new(&mut tree, &mut session, list).compile_args(false).unwrap();
        assert!(ok);
        (tree, session, list)
    }

    #[test]
    fn space_separated_values_stay_separate() {
        let (tree, _, list) = compile_declaration("1px + 2px 3px * 2");
        let arg = tree.children(list)[0];
        let text = to_css_string(&tree, arg, DisplayOptions::default());
        assert_eq!(text, "3px 6px");
    }

    #[test]
    fn important_becomes_a_flag() {
        let (tree, session, list) = compile_declaration("10px !important");
        assert!(tree.has_flag(list, "important"));
        assert_eq!(session.warning_count(), 0);
        let arg = tree.children(list)[0];
        assert!(tree.children(arg)
                    .iter()
                    .all(|&c| !tree.is(c, NodeType::Exclamation)));
    }

    #[test]
    fn misplaced_flag_warns() {
        let (tree, session, list) = compile_declaration("10px !important 3px");
        assert!(tree.has_flag(list, "important"));
        assert_eq!(session.warning_count(), 1);
    }

    #[test]
    fn negation_needs_a_number() {
        let mut tree = Tree::new();
        let mut session = Session::new();
        let list = parse_component_values("-\"text\"", "test.css", &mut tree).unwrap();
        let result = Expression::new(&mut tree, &mut session, list).compile().unwrap();
        assert!(result.is_none());
        assert_eq!(session.diagnostics()[0].message, "unsupported type STRING for operator '-'.");
    }
}
