use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Expression},
        node::core::{NodeId, NodeKind, NodeType},
    },
};

impl Expression<'_> {
    /// Parses `condition ? a : b`.
    ///
    /// Both branches are parsed so the cursor ends after them, but the
    /// branch that is not selected reports nothing. A condition without a
    /// truth value is reported and counts as `false`.
    ///
    /// # Errors
    /// A missing `:` after the first branch, or any error of the selected
    /// branch.
    pub(crate) fn conditional(&mut self) -> EvalResult<NodeId> {
        let mut result = self.logical_or()?;

        while self.current_is(NodeType::Conditional) {
            let condition = self.boolean(result);
            self.next();

            if condition {
                result = self.conditional()?;
            } else {
                self.skip_conditional()?;
            }

            if !self.current_is(NodeType::Colon) {
                return Err(RuntimeError::syntax(self.current_position(),
                                                "a mandatory ':' was expected after a '?' first expression."));
            }
            self.next();

            if condition {
                self.skip_conditional()?;
            } else {
                result = self.conditional()?;
            }
        }

        Ok(result)
    }

    /// Parses `a || b`, also written `a or b`.
    ///
    /// Both sides are always evaluated.
    pub(crate) fn logical_or(&mut self) -> EvalResult<NodeId> {
        let mut result = self.logical_and()?;

        while self.current_is_operator(NodeType::Column, "or") {
            let position = self.current_position();
            self.next();
            let rhs = self.logical_and()?;

            let lhs = self.boolean(result);
            let rhs = self.boolean(rhs);
            result = self.add(NodeKind::Boolean(lhs || rhs), position);
        }

        Ok(result)
    }

    /// Parses `a && b`, also written `a and b`.
    ///
    /// Both sides are always evaluated.
    pub(crate) fn logical_and(&mut self) -> EvalResult<NodeId> {
        let mut result = self.equality()?;

        while self.current_is_operator(NodeType::And, "and") {
            let position = self.current_position();
            self.next();
            let rhs = self.equality()?;

            let lhs = self.boolean(result);
            let rhs = self.boolean(rhs);
            result = self.add(NodeKind::Boolean(lhs && rhs), position);
        }

        Ok(result)
    }
}
