use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            dimension::multiplicative_dimension,
        },
        node::{
            color::Color,
            core::{NodeId, NodeKind, NodeType, Position},
        },
    },
    util::num::i64_to_f64,
};

/// Largest string, in bytes, that `string * integer` may build.
const MAX_REPEATED_STRING_LEN: usize = 1 << 20;

/// The numeric operands of a multiplicative operator once their types are
/// known.
#[derive(Clone, Copy)]
enum Operands {
    Integers(i64, i64),
    Decimals(f64, f64),
    Percents(f64, f64),
}

const UNICODE_RANGE_OPERATORS: &str =
    "unicode_range * unicode_range is the only multiplicative operator accepted with unicode ranges, '/' and '%' are not allowed.";

impl Expression<'_> {
    /// The multiplicative operator under the cursor, if any.
    fn multiplicative_operator(&self) -> Option<NodeType> {
        match self.kind(self.current) {
            NodeKind::Multiply => Some(NodeType::Multiply),
            NodeKind::Divide => Some(NodeType::Divide),
            NodeKind::Modulo => Some(NodeType::Modulo),
            NodeKind::Identifier(word) => match word.as_str() {
                "mul" => Some(NodeType::Multiply),
                "div" => Some(NodeType::Divide),
                "mod" => Some(NodeType::Modulo),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parses `a * b`, `a / b` and `a % b`, also written `mul`, `div` and
    /// `mod`.
    pub(crate) fn multiplicative(&mut self) -> EvalResult<NodeId> {
        let mut result = self.power()?;

        while let Some(op) = self.multiplicative_operator() {
            self.next();
            let rhs = self.power()?;
            result = self.eval_multiplicative(op, result, rhs)?;
        }

        Ok(result)
    }

    /// Applies `*`, `/` or `%` to two values.
    ///
    /// Numbers of any dimension multiply and divide, the dimensions being
    /// combined; `%` needs equal dimensions. A percentage counts as unitless
    /// next to a number. A string times a non-negative integer is repeated.
    /// Unicode ranges intersect with `*`. Colors are scaled by unitless
    /// numbers or combined with another color component by component.
    ///
    /// When font metrics division is on, `a / b` builds a `FONT_METRICS`
    /// node instead of dividing.
    ///
    /// # Errors
    /// Incompatible types or dimensions, and division or modulo by zero.
    pub(crate) fn eval_multiplicative(&mut self,
                                      op: NodeType,
                                      lhs: NodeId,
                                      rhs: NodeId)
                                      -> EvalResult<NodeId> {
        use NodeKind::{DecimalNumber, Integer, Null, Percent, UnicodeRange};

        let position = self.tree.position(lhs);
        let operands = match (self.kind(lhs), self.kind(rhs)) {
            (NodeKind::String(_), Integer { .. }) => return self.repeat_string(op, lhs, rhs),
            (Integer { .. }, NodeKind::String(_)) => return self.repeat_string(op, rhs, lhs),
            (Integer { value: l, .. }, Integer { value: r, .. }) => Operands::Integers(*l, *r),
            (Percent(l), Percent(r)) => Operands::Percents(*l, *r),
            (Integer { .. } | DecimalNumber { .. } | Percent(_),
             Integer { .. } | DecimalNumber { .. } | Percent(_)) => {
                let l = self.kind(lhs).as_f64().unwrap_or_default();
                let r = self.kind(rhs).as_f64().unwrap_or_default();
                Operands::Decimals(l, r)
            },
            (Null, Null | UnicodeRange(_)) => {
                return self.unicode_range_only(op).map(|()| lhs);
            },
            (UnicodeRange(_), Null) => {
                return self.unicode_range_only(op).map(|()| rhs);
            },
            (UnicodeRange(l), UnicodeRange(r)) => {
                self.unicode_range_only(op)?;
                let kind = l.intersect(r).map_or(Null, UnicodeRange);
                return Ok(self.add(kind, position));
            },
            (Integer { .. } | DecimalNumber { .. } | Percent(_), NodeKind::Color(_)) => {
                if op != NodeType::Multiply {
                    return Err(RuntimeError::type_error(self.current_position(),
                                                        "'number / color' and 'number % color' are not available."));
                }
                return self.scale_color(op, rhs, lhs);
            },
            (NodeKind::Color(_), Integer { .. } | DecimalNumber { .. } | Percent(_)) => {
                return self.scale_color(op, lhs, rhs);
            },
            (NodeKind::Color(l), NodeKind::Color(r)) => {
                let color = self.combine_colors(op, *l, *r)?;
                return Ok(self.add(NodeKind::Color(color), position));
            },
            _ => {
                return Err(RuntimeError::type_error(self.current_position(),
                                                    format!("incompatible types between {} and {} for operator '*', '/', or '%'.",
                                                            self.node_type(lhs),
                                                            self.node_type(rhs))));
            },
        };

        if op == NodeType::Divide && self.divide_font_metrics {
            let (font_size, line_height) = match operands {
                Operands::Integers(l, r) => (i64_to_f64(l), i64_to_f64(r)),
                Operands::Decimals(l, r) | Operands::Percents(l, r) => (l, r),
            };
            let kind = NodeKind::FontMetrics { font_size,
                                               line_height,
                                               font_dimension: self.metrics_dimension(lhs),
                                               line_height_dimension: self.metrics_dimension(rhs) };
            return Ok(self.add(kind, position));
        }

        let dimension = match operands {
            Operands::Percents(..) => String::new(),
            _ => self.multiplicative_result_dimension(op, lhs, rhs)?,
        };

        let kind = match operands {
            Operands::Integers(l, r) => {
                let value = match op {
                    NodeType::Multiply => l.wrapping_mul(r),
                    NodeType::Divide => {
                        if r == 0 {
                            return Err(RuntimeError::range(position, "division by zero."));
                        }
                        l.wrapping_div(r)
                    },
                    _ => {
                        if r == 0 {
                            return Err(RuntimeError::range(position, "modulo by zero."));
                        }
                        l.wrapping_rem(r)
                    },
                };
                Integer { value, dimension }
            },
            Operands::Decimals(l, r) => DecimalNumber { value: Self::apply_decimal(op, l, r, &position)?,
                                                        dimension },
            Operands::Percents(l, r) => Percent(Self::apply_decimal(op, l, r, &position)?),
        };

        Ok(self.add(kind, position))
    }

    #[allow(clippy::float_cmp)]
    fn apply_decimal(op: NodeType,
                     l: f64,
                     r: f64,
                     position: &Position)
                     -> EvalResult<f64> {
        match op {
            NodeType::Multiply => Ok(l * r),
            NodeType::Divide if r == 0.0 => Err(RuntimeError::range(position.clone(), "division by zero.")),
            NodeType::Divide => Ok(l / r),
            _ if r == 0.0 => Err(RuntimeError::range(position.clone(), "modulo by zero.")),
            _ => Ok(l % r),
        }
    }

    /// The dimension of a numeric product, quotient or remainder.
    ///
    /// Percentages count as unitless.
    fn multiplicative_result_dimension(&self,
                                       op: NodeType,
                                       lhs: NodeId,
                                       rhs: NodeId)
                                       -> EvalResult<String> {
        let ldim = self.kind(lhs).dimension().unwrap_or_default();
        let rdim = self.kind(rhs).dimension().unwrap_or_default();
        let position = self.tree.position(lhs);

        if op == NodeType::Modulo {
            if ldim != rdim {
                return Err(RuntimeError::dimension(position,
                                                   format!("incompatible dimensions (\"{ldim}\" and \"{rdim}\") cannot be used with operator '%'.")));
            }
            return Ok(ldim.to_string());
        }
        multiplicative_dimension(&position, ldim, op, rdim)
    }

    /// The dimension stored in a `FONT_METRICS` node: `%` for percentages.
    fn metrics_dimension(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Percent(_) => "%".to_string(),
            kind => kind.dimension().unwrap_or_default().to_string(),
        }
    }

    fn unicode_range_only(&self, op: NodeType) -> EvalResult<()> {
        if op == NodeType::Multiply {
            return Ok(());
        }
        Err(RuntimeError::type_error(self.current_position(), UNICODE_RANGE_OPERATORS))
    }

    /// `string * count` repeats the string.
    ///
    /// The result may not exceed [`MAX_REPEATED_STRING_LEN`] bytes.
    fn repeat_string(&mut self, op: NodeType, text: NodeId, count: NodeId) -> EvalResult<NodeId> {
        let position = self.tree.position(text);
        if op != NodeType::Multiply {
            return Err(RuntimeError::type_error(position,
                                                format!("incompatible types between {} and {} for operator '/' or '%'.",
                                                        self.node_type(text),
                                                        self.node_type(count))));
        }

        let (NodeKind::String(s), NodeKind::Integer { value, .. }) = (self.kind(text), self.kind(count))
        else {
            return Err(RuntimeError::logic("repeat_string(): expected a string and an integer."));
        };
        let times = usize::try_from(*value).map_err(|_| {
                        RuntimeError::range(position.clone(),
                                            format!("string * integer requires that the integer not be negative ({value})."))
                    })?;
        if s.len().checked_mul(times).is_none_or(|len| len > MAX_REPEATED_STRING_LEN) {
            return Err(RuntimeError::range(position,
                                           format!("string * integer would create a string of more than {MAX_REPEATED_STRING_LEN} bytes.")));
        }

        let repeated = s.repeat(times);
        Ok(self.add(NodeKind::String(repeated), position))
    }

    /// Multiplies, divides or takes the remainder of each color component,
    /// alpha included, by a unitless number or a percentage.
    #[allow(clippy::cast_possible_truncation)]
    fn scale_color(&mut self, op: NodeType, color: NodeId, factor: NodeId) -> EvalResult<NodeId> {
        let NodeKind::Color(c) = self.kind(color) else {
            return Err(RuntimeError::logic("scale_color(): expected a color."));
        };
        let c = *c;
        let kind = self.kind(factor);
        let value = kind.as_f64().unwrap_or_default();
        if let Some(dimension) = kind.dimension()
           && !dimension.is_empty()
        {
            return Err(RuntimeError::dimension(self.current_position(),
                                               format!("color factors must be unit less values, {value}{dimension} is not acceptable.")));
        }

        let f = value as f32;
        let channel = |x: f32| match op {
            NodeType::Multiply => x * f,
            NodeType::Divide => x / f,
            _ => x % f,
        };
        let scaled = Color::new(channel(c.red), channel(c.green), channel(c.blue), channel(c.alpha));
        let position = self.tree.position(color);
        Ok(self.add(NodeKind::Color(scaled), position))
    }

    /// Combines two colors component by component.
    #[allow(clippy::float_cmp)]
    fn combine_colors(&self, op: NodeType, l: Color, r: Color) -> EvalResult<Color> {
        let has_zero = [r.red, r.green, r.blue, r.alpha].contains(&0.0);
        let channel: fn(f32, f32) -> f32 = match op {
            NodeType::Multiply => |a, b| a * b,
            NodeType::Divide => {
                if has_zero {
                    return Err(RuntimeError::range(self.current_position(),
                                                   "color division does not accept any color component set to zero."));
                }
                |a, b| a / b
            },
            _ => {
                if has_zero {
                    return Err(RuntimeError::range(self.current_position(),
                                                   "color modulo does not accept any color component set to zero."));
                }
                |a, b| a % b
            },
        };

        Ok(Color::new(channel(l.red, r.red),
                      channel(l.green, r.green),
                      channel(l.blue, r.blue),
                      channel(l.alpha, r.alpha)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{node::core::Tree, session::Session};

    #[test]
    fn zero_components_are_rejected_for_color_division() {
        let mut tree = Tree::new();
        let mut session = Session::new();
        let pos = Position::new("test.css", 1);
        let node = tree.add(NodeKind::List, pos);
        let expr = Expression::new(&mut tree, &mut session, node);

        let white = Color::new(1.0, 1.0, 1.0, 1.0);
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(expr.combine_colors(NodeType::Divide, white, red).unwrap_err().message(),
                   "color division does not accept any color component set to zero.");
        assert_eq!(expr.combine_colors(NodeType::Modulo, white, red).unwrap_err().message(),
                   "color modulo does not accept any color component set to zero.");
        assert_eq!(expr.combine_colors(NodeType::Multiply, white, red).unwrap(), red);
    }

    #[test]
    fn decimal_zero_checks() {
        let pos = Position::new("test.css", 1);
        assert!(Expression::apply_decimal(NodeType::Divide, 1.0, 0.0, &pos).is_err());
        assert!(Expression::apply_decimal(NodeType::Modulo, 1.0, 0.0, &pos).is_err());
        assert!((Expression::apply_decimal(NodeType::Modulo, 7.5, 2.0, &pos).unwrap() - 1.5).abs() < 1e-12);
    }
}
