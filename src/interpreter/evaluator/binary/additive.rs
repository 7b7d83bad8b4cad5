use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Expression},
        node::{
            color::Color,
            core::{NodeId, NodeKind, NodeType},
        },
    },
};

impl Expression<'_> {
    /// Parses `a + b` and `a - b`.
    pub(crate) fn additive(&mut self) -> EvalResult<NodeId> {
        let mut result = self.multiplicative()?;

        loop {
            let subtract = if self.current_is(NodeType::Add) {
                false
            } else if self.current_is(NodeType::Subtract) {
                true
            } else {
                return Ok(result);
            };
            self.next();
            let rhs = self.multiplicative()?;
            result = self.eval_additive(result, rhs, subtract)?;
        }
    }

    /// Adds or subtracts two values.
    ///
    /// Numbers must have the same dimension and the result keeps it. An
    /// integer mixed with a decimal number gives a decimal number.
    /// Percentages only combine with percentages. Two strings are
    /// concatenated by `+`. A unitless number is added to each component of
    /// a color, alpha included, and two colors are combined component by
    /// component.
    ///
    /// # Errors
    /// Incompatible types, different dimensions, or a color offset with a
    /// dimension.
    pub(crate) fn eval_additive(&mut self,
                                lhs: NodeId,
                                rhs: NodeId,
                                subtract: bool)
                                -> EvalResult<NodeId> {
        use NodeKind::{DecimalNumber, Integer, Percent, String};

        let operator = if subtract { '-' } else { '+' };
        let position = self.tree.position(lhs);
        let apply = |a: f64, b: f64| if subtract { a - b } else { a + b };

        let kind = match (self.kind(lhs), self.kind(rhs)) {
            (String(l), String(r)) if !subtract => String(format!("{l}{r}")),
            (Integer { value: l, dimension: ldim }, Integer { value: r, dimension: rdim }) => {
                self.check_additive_dimensions(lhs, ldim, rdim, operator)?;
                Integer { value:     if subtract { l.wrapping_sub(*r) } else { l.wrapping_add(*r) },
                          dimension: ldim.clone(), }
            },
            (Integer { dimension: ldim, .. } | DecimalNumber { dimension: ldim, .. },
             Integer { dimension: rdim, .. } | DecimalNumber { dimension: rdim, .. }) => {
                self.check_additive_dimensions(lhs, ldim, rdim, operator)?;
                let l = self.kind(lhs).as_f64().unwrap_or_default();
                let r = self.kind(rhs).as_f64().unwrap_or_default();
                DecimalNumber { value:     apply(l, r),
                                dimension: ldim.clone(), }
            },
            (Percent(l), Percent(r)) => Percent(apply(*l, *r)),
            (Integer { .. } | DecimalNumber { .. }, NodeKind::Color(c)) => {
                let offset = self.color_offset(lhs)?;
                NodeKind::Color(offset_color(*c, offset, subtract, true))
            },
            (NodeKind::Color(c), Integer { .. } | DecimalNumber { .. }) => {
                let offset = self.color_offset(rhs)?;
                NodeKind::Color(offset_color(*c, offset, subtract, false))
            },
            (NodeKind::Color(l), NodeKind::Color(r)) => {
                let channel = |a: f32, b: f32| if subtract { a - b } else { a + b };
                NodeKind::Color(Color::new(channel(l.red, r.red),
                                           channel(l.green, r.green),
                                           channel(l.blue, r.blue),
                                           channel(l.alpha, r.alpha)))
            },
            _ => {
                return Err(RuntimeError::type_error(position,
                                                    format!("incompatible types between {} and {} for operator '{operator}'.",
                                                            self.described_type(lhs),
                                                            self.described_type(rhs))));
            },
        };

        Ok(self.add(kind, position))
    }

    fn check_additive_dimensions(&self,
                                 lhs: NodeId,
                                 ldim: &str,
                                 rdim: &str,
                                 operator: char)
                                 -> EvalResult<()> {
        if ldim == rdim {
            return Ok(());
        }
        Err(RuntimeError::dimension(self.tree.position(lhs),
                                    format!("incompatible dimensions: \"{ldim}\" and \"{rdim}\" cannot be used as is with operator '{operator}'.")))
    }

    /// The value of a number added to a color, which must be unitless.
    fn color_offset(&self, number: NodeId) -> EvalResult<f64> {
        let kind = self.kind(number);
        let value = kind.as_f64().unwrap_or_default();
        match kind.dimension() {
            Some("") | None => Ok(value),
            Some(dimension) => {
                Err(RuntimeError::dimension(self.tree.position(number),
                                            format!("color offsets (numbers added with + or - operators) must be unit less values, {value}{dimension} is not acceptable.")))
            },
        }
    }
}

/// Adds `offset` to every component of `color`.
///
/// When `swapped`, the number was on the left: `1 - color` subtracts each
/// component from the offset.
#[allow(clippy::cast_possible_truncation)]
fn offset_color(color: Color, offset: f64, subtract: bool, swapped: bool) -> Color {
    let offset = offset as f32;
    let channel = |c: f32| match (subtract, swapped) {
        (false, _) => c + offset,
        (true, false) => c - offset,
        (true, true) => offset - c,
    };
    Color::new(channel(color.red),
               channel(color.green),
               channel(color.blue),
               channel(color.alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapped_subtraction_inverts_components() {
        let c = offset_color(Color::new(0.25, 0.5, 1.0, 1.0), 1.0, true, true);
        assert_eq!(c, Color::new(0.75, 0.5, 0.0, 0.0));

        let c = offset_color(Color::new(0.25, 0.5, 1.0, 1.0), 0.25, true, false);
        assert_eq!(c, Color::new(0.0, 0.25, 0.75, 0.75));
    }
}
