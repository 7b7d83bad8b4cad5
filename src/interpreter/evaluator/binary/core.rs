use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Expression},
        node::core::{NodeId, NodeKind, NodeType},
    },
    util::num::i64_to_f64,
};

impl Expression<'_> {
    /// Checks whether `=` and the other comparison operators accept a pair
    /// of values.
    ///
    /// Booleans, colors, percentages and strings compare with their own
    /// type. Integers and decimal numbers compare with each other when
    /// their dimensions are the same.
    ///
    /// # Errors
    /// A type error naming both types when the pair cannot be compared.
    pub(crate) fn is_comparable(&self, lhs: NodeId, rhs: NodeId) -> EvalResult<()> {
        use NodeKind::{Boolean, Color, DecimalNumber, Integer, Percent, String};

        let comparable = match (self.kind(lhs), self.kind(rhs)) {
            (Boolean(_), Boolean(_))
            | (Color(_), Color(_))
            | (Percent(_), Percent(_))
            | (String(_), String(_)) => true,
            (Integer { dimension: l, .. } | DecimalNumber { dimension: l, .. },
             Integer { dimension: r, .. } | DecimalNumber { dimension: r, .. }) => l == r,
            _ => false,
        };
        if comparable {
            return Ok(());
        }

        Err(RuntimeError::type_error(self.tree.position(lhs),
                                     format!("incompatible types or dimensions between {} and {} for operator '=', '!=', '<', '<=', '>', '>=', '~=', '^=', '$=', '*=', or '|='.",
                                             self.node_type(lhs),
                                             self.node_type(rhs))))
    }

    /// Compares two values that passed [`Expression::is_comparable`].
    ///
    /// Numbers compare exactly, without tolerance. Colors compare by their
    /// RGBA bytes.
    ///
    /// # Errors
    /// A logic error for pairs `is_comparable` rejects.
    #[allow(clippy::float_cmp)]
    pub(crate) fn is_equal(&self, lhs: NodeId, rhs: NodeId) -> EvalResult<bool> {
        use NodeKind::{Boolean, Color, DecimalNumber, Integer, Percent, String};

        Ok(match (self.kind(lhs), self.kind(rhs)) {
            (Boolean(l), Boolean(r)) => l == r,
            (Integer { value: l, .. }, Integer { value: r, .. }) => l == r,
            (Integer { value: l, .. }, DecimalNumber { value: r, .. }) => i64_to_f64(*l) == *r,
            (DecimalNumber { value: l, .. }, Integer { value: r, .. }) => *l == i64_to_f64(*r),
            (DecimalNumber { value: l, .. }, DecimalNumber { value: r, .. })
            | (Percent(l), Percent(r)) => l == r,
            (String(l), String(r)) => l == r,
            (Color(l), Color(r)) => l.to_rgba() == r.to_rgba(),
            _ => {
                return Err(RuntimeError::logic(format!("is_equal(): called with unsupported types {} and {}.",
                                                       self.node_type(lhs),
                                                       self.node_type(rhs))));
            },
        })
    }

    /// Orders two values.
    ///
    /// Numbers are compared by value whatever their dimensions, strings by
    /// their bytes, and `false` is less than `true`.
    ///
    /// # Errors
    /// A type error for pairs without an order, colors among them.
    pub(crate) fn is_less_than(&self, lhs: NodeId, rhs: NodeId) -> EvalResult<bool> {
        use NodeKind::{Boolean, DecimalNumber, Integer, Percent, String};

        match (self.kind(lhs), self.kind(rhs)) {
            (Boolean(l), Boolean(r)) => Ok(!l && *r),
            (Integer { value: l, .. }, Integer { value: r, .. }) => Ok(l < r),
            (Integer { .. } | DecimalNumber { .. }, Integer { .. } | DecimalNumber { .. })
            | (Percent(_), Percent(_)) => {
                let l = self.kind(lhs).as_f64().unwrap_or_default();
                let r = self.kind(rhs).as_f64().unwrap_or_default();
                Ok(l < r)
            },
            (String(l), String(r)) => Ok(l < r),
            _ => Err(RuntimeError::type_error(self.tree.position(lhs),
                                              format!("incompatible types between {} and {} for operator '<', '<=', '>', or '>='.",
                                                      self.node_type(lhs),
                                                      self.node_type(rhs)))),
        }
    }

    /// The type of a node for diagnostics, followed by its text for strings
    /// and identifiers: `IDENTIFIER (auto)`.
    pub(crate) fn described_type(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::String(s) | NodeKind::Identifier(s) => {
                format!("{} ({s})", self.node_type(id))
            },
            other => other.node_type().to_string(),
        }
    }

    /// Whether the current token is the operator `node_type` or the
    /// identifier spelling it (`and`, `mul`, ...).
    pub(crate) fn current_is_operator(&self, node_type: NodeType, word: &str) -> bool {
        self.current_is(node_type) || self.current_is_word(word)
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{
        evaluator::core::Expression,
        node::{
            color::Color,
            core::{NodeId, NodeKind, Position, Tree},
        },
        session::Session,
    };

    fn values(tree: &mut Tree, kinds: Vec<NodeKind>) -> Vec<NodeId> {
        let pos = Position::new("test.css", 1);
        kinds.into_iter().map(|k| tree.add(k, pos.clone())).collect()
    }

    #[test]
    fn numbers_compare_across_types_with_same_dimension() {
        let mut tree = Tree::new();
        let mut session = Session::new();
        let ids = values(&mut tree,
                         vec![NodeKind::Integer { value:     3,
                                                  dimension: "px".into(), },
                              NodeKind::DecimalNumber { value:     3.0,
                                                        dimension: "px".into(), },
                              NodeKind::DecimalNumber { value:     3.0,
                                                        dimension: "em".into(), }]);
        let expr = Expression::new(&mut tree, &mut session, ids[0]);

        assert!(expr.is_comparable(ids[0], ids[1]).is_ok());
        assert!(expr.is_equal(ids[0], ids[1]).unwrap());
        assert!(expr.is_comparable(ids[1], ids[2]).is_err());
    }

    #[test]
    fn colors_are_equal_by_bytes() {
        let mut tree = Tree::new();
        let mut session = Session::new();
        let ids = values(&mut tree,
                         vec![NodeKind::Color(Color::new(1.0, 0.0, 0.0, 1.0)),
                              NodeKind::Color(Color::new(1.0, 0.001, 0.0, 1.0))]);
        let expr = Expression::new(&mut tree, &mut session, ids[0]);

        assert!(expr.is_equal(ids[0], ids[1]).unwrap());
        assert!(expr.is_less_than(ids[0], ids[1]).is_err());
    }

    #[test]
    fn ordering_ignores_dimensions() {
        let mut tree = Tree::new();
        let mut session = Session::new();
        let ids = values(&mut tree,
                         vec![NodeKind::Integer { value:     2,
                                                  dimension: "px".into(), },
                              NodeKind::DecimalNumber { value:     2.5,
                                                        dimension: "em".into(), },
                              NodeKind::Boolean(false),
                              NodeKind::Boolean(true)]);
        let expr = Expression::new(&mut tree, &mut session, ids[0]);

        assert!(expr.is_less_than(ids[0], ids[1]).unwrap());
        assert!(expr.is_less_than(ids[2], ids[3]).unwrap());
        assert!(!expr.is_less_than(ids[3], ids[2]).unwrap());
    }

    #[test]
    fn described_type_shows_text() {
        let mut tree = Tree::new();
        let mut session = Session::new();
        let ids = values(&mut tree, vec![NodeKind::Identifier("auto".into()), NodeKind::Null]);
        let expr = Expression::new(&mut tree, &mut session, ids[0]);

        assert_eq!(expr.described_type(ids[0]), "IDENTIFIER (auto)");
        assert_eq!(expr.described_type(ids[1]), "NULL_TOKEN");
    }
}
