use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Expression},
        node::core::{NodeId, NodeKind, NodeType},
    },
};

/// Applies one of the CSS attribute selector match operators to two
/// strings.
///
/// # Parameters
/// - `op`: One of the `*_MATCH` node types.
/// - `value`: The left hand side, searched in.
/// - `pattern`: The right hand side, searched for.
///
/// # Returns
/// - `~=`: `pattern` is one of the space separated words of `value`.
/// - `^=` and `$=`: `value` starts or ends with `pattern`.
/// - `*=`: `value` contains `pattern`.
/// - `|=`: `pattern` is one of the dash separated parts of `value`.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::{
///     evaluator::binary::comparison::string_match,
///     node::core::NodeType,
/// };
///
/// assert_eq!(string_match(NodeType::IncludeMatch, "a bc d", "bc"), Some(true));
/// assert_eq!(string_match(NodeType::IncludeMatch, "a bcd", "bc"), Some(false));
/// assert_eq!(string_match(NodeType::DashMatch, "en-US", "en"), Some(true));
/// assert_eq!(string_match(NodeType::Equal, "a", "a"), None);
/// ```
#[must_use]
pub fn string_match(op: NodeType, value: &str, pattern: &str) -> Option<bool> {
    match op {
        NodeType::IncludeMatch => Some(format!(" {value} ").contains(&format!(" {pattern} "))),
        NodeType::PrefixMatch => Some(value.starts_with(pattern)),
        NodeType::SuffixMatch => Some(value.ends_with(pattern)),
        NodeType::SubstringMatch => Some(value.contains(pattern)),
        NodeType::DashMatch => Some(format!("-{value}-").contains(&format!("-{pattern}-"))),
        _ => None,
    }
}

impl Expression<'_> {
    /// The equality operator under the cursor, if any.
    fn equality_operator(&self) -> Option<NodeType> {
        match self.node_type(self.current) {
            op @ (NodeType::Equal
            | NodeType::NotEqual
            | NodeType::IncludeMatch
            | NodeType::PrefixMatch
            | NodeType::SuffixMatch
            | NodeType::SubstringMatch
            | NodeType::DashMatch) => Some(op),
            NodeType::Identifier if self.current_is_word("not-equal") => Some(NodeType::NotEqual),
            _ => None,
        }
    }

    /// Parses `=`, `!=` (or `not-equal`) and the string match operators.
    ///
    /// Values that cannot be compared are reported and the comparison gives
    /// `false`; parsing goes on after the right hand side.
    pub(crate) fn equality(&mut self) -> EvalResult<NodeId> {
        let mut result = self.relational()?;

        while let Some(op) = self.equality_operator() {
            let position = self.current_position();
            self.next();
            let rhs = self.relational()?;

            let value = match self.compare_equality(op, result, rhs) {
                Ok(value) => value,
                Err(e) if e.is_logic() => return Err(e),
                Err(e) => {
                    self.report(&e);
                    false
                },
            };
            result = self.add(NodeKind::Boolean(value), position);
        }

        Ok(result)
    }

    fn compare_equality(&self, op: NodeType, lhs: NodeId, rhs: NodeId) -> EvalResult<bool> {
        self.is_comparable(lhs, rhs)?;

        match op {
            NodeType::Equal => self.is_equal(lhs, rhs),
            NodeType::NotEqual => Ok(!self.is_equal(lhs, rhs)?),
            _ => {
                let (NodeKind::String(value), NodeKind::String(pattern)) =
                    (self.kind(lhs), self.kind(rhs))
                else {
                    return Err(RuntimeError::type_error(self.tree.position(lhs),
                                                        format!("incompatible types between {} and {} for operator '~=', '^=', '$=', '*=', '|='.",
                                                                self.node_type(lhs),
                                                                self.node_type(rhs))));
                };
                string_match(op, value, pattern).ok_or_else(|| {
                    RuntimeError::logic(format!("equality(): unexpected operator {op}."))
                })
            },
        }
    }

    /// Parses `<`, `<=`, `>` and `>=`.
    ///
    /// Numbers are ordered by value even when their dimensions differ.
    /// Values without an order are reported and the comparison gives
    /// `false`.
    pub(crate) fn relational(&mut self) -> EvalResult<NodeId> {
        let mut result = self.additive()?;

        loop {
            let op = match self.node_type(self.current) {
                op @ (NodeType::LessThan
                | NodeType::LessEqual
                | NodeType::GreaterThan
                | NodeType::GreaterEqual) => op,
                _ => return Ok(result),
            };
            let position = self.current_position();
            self.next();
            let rhs = self.additive()?;

            let value = match self.compare_order(op, result, rhs) {
                Ok(value) => value,
                Err(e) if e.is_logic() => return Err(e),
                Err(e) => {
                    self.report(&e);
                    false
                },
            };
            result = self.add(NodeKind::Boolean(value), position);
        }
    }

    fn compare_order(&self, op: NodeType, lhs: NodeId, rhs: NodeId) -> EvalResult<bool> {
        let less = self.is_less_than(lhs, rhs)?;
        Ok(match op {
            NodeType::LessThan => less,
            NodeType::LessEqual => less || self.is_equal(lhs, rhs)?,
            NodeType::GreaterThan => !less && !self.is_equal(lhs, rhs)?,
            _ => !less,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_match_needs_whole_words() {
        assert_eq!(string_match(NodeType::IncludeMatch, "left right", "right"), Some(true));
        assert_eq!(string_match(NodeType::IncludeMatch, "left right", "igh"), Some(false));
    }

    #[test]
    fn prefix_and_suffix() {
        assert_eq!(string_match(NodeType::PrefixMatch, "border-top", "border"), Some(true));
        assert_eq!(string_match(NodeType::PrefixMatch, "top", "border-top"), Some(false));
        assert_eq!(string_match(NodeType::SuffixMatch, "border-top", "top"), Some(true));
        assert_eq!(string_match(NodeType::SubstringMatch, "border-top", "r-t"), Some(true));
    }

    #[test]
    fn dash_match_needs_whole_parts() {
        assert_eq!(string_match(NodeType::DashMatch, "fr-CA", "fr"), Some(true));
        assert_eq!(string_match(NodeType::DashMatch, "fra-CA", "fr"), Some(false));
    }
}
