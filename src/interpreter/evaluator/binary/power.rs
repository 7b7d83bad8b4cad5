use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            dimension::power_dimension,
        },
        node::core::{NodeId, NodeKind, NodeType},
    },
    util::num::{f64_to_i64_truncated, i64_to_f64},
};

/// Largest power accepted for a number with a dimension.
const MAX_DIMENSION_POWER: u64 = 100;

impl Expression<'_> {
    /// Parses `a ** b`, also written `a pow b`.
    ///
    /// The operator does not chain: `a ** b ** c` leaves the second `**`
    /// unparsed.
    pub(crate) fn power(&mut self) -> EvalResult<NodeId> {
        let result = self.post()?;

        if !self.current_is_operator(NodeType::Power, "pow") {
            return Ok(result);
        }
        self.next();
        let rhs = self.post()?;
        self.eval_power(result, rhs)
    }

    /// Raises a number or a percentage to a unitless power.
    ///
    /// Two integers give an integer, truncated toward zero. The units of a
    /// number with a dimension are repeated, so `(3px) ** 2` is `9px * px`;
    /// its power must then be a non-zero integer no larger than 100 in
    /// absolute value.
    ///
    /// # Errors
    /// A power with a dimension, incompatible types, or an invalid power for
    /// a number with a dimension.
    pub(crate) fn eval_power(&mut self, lhs: NodeId, rhs: NodeId) -> EvalResult<NodeId> {
        use NodeKind::{DecimalNumber, Integer, Percent};

        if let Some(dimension) = self.kind(rhs).dimension()
           && !dimension.is_empty()
        {
            return Err(RuntimeError::dimension(self.current_position(),
                                               format!("the number representing the power cannot be a dimension ({dimension}); it has to be unitless.")));
        }

        let position = self.tree.position(lhs);
        let kind = match (self.kind(lhs), self.kind(rhs)) {
            (Integer { value: base, dimension }, Integer { value: exponent, .. }) => {
                let value = i64_to_f64(*base).powf(i64_to_f64(*exponent));
                Integer { value:     f64_to_i64_truncated(value),
                          dimension: dimension.clone(), }
            },
            (Integer { dimension, .. } | DecimalNumber { dimension, .. },
             Integer { .. } | DecimalNumber { .. }) => {
                let base = self.kind(lhs).as_f64().unwrap_or_default();
                let exponent = self.kind(rhs).as_f64().unwrap_or_default();
                DecimalNumber { value:     base.powf(exponent),
                                dimension: dimension.clone(), }
            },
            (Percent(base), Integer { .. } | DecimalNumber { .. }) => {
                let exponent = self.kind(rhs).as_f64().unwrap_or_default();
                Percent(base.powf(exponent))
            },
            _ => {
                return Err(RuntimeError::type_error(self.current_position(),
                                                    format!("incompatible types between {} and {} for operator '**'.",
                                                            self.node_type(lhs),
                                                            self.node_type(rhs))));
            },
        };

        let kind = match kind {
            Integer { value, dimension } if !dimension.is_empty() => {
                Integer { value,
                          dimension: self.raised_dimension(&dimension, rhs)? }
            },
            DecimalNumber { value, dimension } if !dimension.is_empty() => {
                DecimalNumber { value,
                                dimension: self.raised_dimension(&dimension, rhs)? }
            },
            other => other,
        };

        Ok(self.add(kind, position))
    }

    /// The dimension of a number with `dimension` raised to `exponent`.
    #[allow(clippy::float_cmp)]
    fn raised_dimension(&self, dimension: &str, exponent: NodeId) -> EvalResult<String> {
        let power = match self.kind(exponent) {
            NodeKind::Integer { value, .. } => *value,
            NodeKind::DecimalNumber { value, .. } => {
                if value.fract() != 0.0 {
                    return Err(RuntimeError::range(self.current_position(),
                                                   "a number with a dimension only supports integers as their power (i.e. 3px ** 2 is fine, 3px ** 2.1 is not supported)."));
                }
                f64_to_i64_truncated(*value)
            },
            _ => return Err(RuntimeError::logic("raised_dimension(): the power is not a number.")),
        };

        if power == 0 {
            return Err(RuntimeError::range(self.current_position(),
                                           "a number with a dimension power zero cannot be calculated (i.e. 3px ** 0 = 1 what?)."));
        }
        if power.unsigned_abs() > MAX_DIMENSION_POWER {
            return Err(RuntimeError::range(self.current_position(),
                                           "a number with a dimension power 101 or more would generate a very large string so we refuse it at this time. You may use unitless numbers instead."));
        }

        power_dimension(&self.tree.position(exponent), dimension, power)
    }
}
