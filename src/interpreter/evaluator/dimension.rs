use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        node::core::{NodeType, Position},
    },
};

/// Splits a dimension such as `px * em / s` into its units and appends them
/// to `dividend` and `divisor`.
///
/// A leading `1/` or `1 /` means the dividend is empty. Units are separated
/// by `*`, and a single `/` switches from the dividend to the divisor.
/// Blanks around the operators are optional.
///
/// # Parameters
/// - `position`: Used for the diagnostics.
/// - `dimension`: The dimension to split. An empty string adds nothing.
/// - `dividend`: Receives the units above the fraction bar.
/// - `divisor`: Receives the units below the fraction bar.
///
/// # Errors
/// A missing unit name, a second `/`, or any other separator.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::{
///     evaluator::dimension::dimensions_to_vectors,
///     node::core::Position,
/// };
///
/// let pos = Position::new("a.css", 1);
/// let (mut dividend, mut divisor) = (Vec::new(), Vec::new());
/// dimensions_to_vectors(&pos, "px * em / s", &mut dividend, &mut divisor).unwrap();
/// assert_eq!(dividend, ["px", "em"]);
/// assert_eq!(divisor, ["s"]);
/// ```
pub fn dimensions_to_vectors(position: &Position,
                             dimension: &str,
                             dividend: &mut Vec<String>,
                             divisor: &mut Vec<String>)
                             -> EvalResult<()> {
    if dimension.is_empty() {
        return Ok(());
    }

    let bytes = dimension.as_bytes();
    let mut pos = 0;
    let mut found_slash = false;

    if dimension.len() > 2 && dimension.starts_with("1/") {
        pos = 2;
        found_slash = true;
    } else if dimension.len() > 3 && dimension.starts_with("1 /") {
        pos = 3;
        found_slash = true;
    }
    if found_slash && pos + 1 < bytes.len() && bytes[pos] == b' ' {
        pos += 1;
    }

    loop {
        let end = dimension[pos..].find([' ', '*', '/'])
                                  .map_or(dimension.len(), |i| pos + i);
        if end == pos {
            return Err(RuntimeError::dimension(position.clone(),
                                               "number dimension is missing a dimension name."));
        }
        let unit = dimension[pos..end].to_string();
        if found_slash {
            divisor.push(unit);
        } else {
            dividend.push(unit);
        }

        pos = end;
        if pos < bytes.len() && bytes[pos] == b' ' {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Ok(());
        }

        match bytes[pos] {
            b'/' => {
                if found_slash {
                    return Err(RuntimeError::dimension(position.clone(),
                                                       "a valid dimension can have any number of '*' operators and a single '/' operator, here we found a second '/'."));
                }
                found_slash = true;
                pos += 1;
            },
            b'*' => pos += 1,
            _ => {
                let separator = dimension[pos..].chars().next().unwrap_or(' ');
                return Err(RuntimeError::dimension(position.clone(),
                                                   format!("multiple dimensions can only be separated by '*' or '/' not '{separator}'.")));
            },
        }

        if pos < bytes.len() && bytes[pos] == b' ' {
            pos += 1;
        }
    }
}

/// Serializes a dividend and a divisor back to a dimension string.
///
/// Units are joined with ` * `, the divisor follows ` / `, and an empty
/// dividend is written `1`. Two empty lists give an empty string.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::evaluator::dimension::rebuild_dimension;
///
/// let px = vec!["px".to_string()];
/// let s = vec!["s".to_string()];
/// assert_eq!(rebuild_dimension(&px, &s), "px / s");
/// assert_eq!(rebuild_dimension(&[], &s), "1 / s");
/// assert_eq!(rebuild_dimension(&[], &[]), "");
/// ```
#[must_use]
pub fn rebuild_dimension(dividend: &[String], divisor: &[String]) -> String {
    if dividend.is_empty() && divisor.is_empty() {
        return String::new();
    }

    let mut result = if dividend.is_empty() {
        "1".to_string()
    } else {
        dividend.join(" * ")
    };
    if !divisor.is_empty() {
        result.push_str(" / ");
        result.push_str(&divisor.join(" * "));
    }
    result
}

/// Computes the dimension of `ldim op rdim` for `*` and `/`.
///
/// The units of both sides are merged, the right hand side going to the
/// opposite side of the fraction bar for a division. Units found on both
/// sides then cancel out one pair at a time.
///
/// # Errors
/// Malformed dimensions. An operator other than `*` or `/` is a logic error.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::{
///     evaluator::dimension::multiplicative_dimension,
///     node::core::{NodeType, Position},
/// };
///
/// let pos = Position::new("a.css", 1);
/// let area = multiplicative_dimension(&pos, "px", NodeType::Multiply, "em").unwrap();
/// assert_eq!(area, "px * em");
/// assert_eq!(multiplicative_dimension(&pos, &area, NodeType::Divide, "px").unwrap(), "em");
/// ```
pub fn multiplicative_dimension(position: &Position,
                                ldim: &str,
                                op: NodeType,
                                rdim: &str)
                                -> EvalResult<String> {
    let mut dividend = Vec::new();
    let mut divisor = Vec::new();

    dimensions_to_vectors(position, ldim, &mut dividend, &mut divisor)?;
    match op {
        NodeType::Multiply => dimensions_to_vectors(position, rdim, &mut dividend, &mut divisor)?,
        NodeType::Divide => dimensions_to_vectors(position, rdim, &mut divisor, &mut dividend)?,
        other => {
            return Err(RuntimeError::logic(format!("multiplicative_dimension(): unexpected operator {other}.")));
        },
    }

    for idx in (0..dividend.len()).rev() {
        if let Some(found) = divisor.iter().position(|d| *d == dividend[idx]) {
            dividend.remove(idx);
            divisor.remove(found);
        }
    }

    Ok(rebuild_dimension(&dividend, &divisor))
}

/// Computes the dimension of `value ** power`.
///
/// Every unit is repeated `|power|` times; a negative power moves the units
/// to the other side of the fraction bar.
///
/// # Errors
/// Malformed dimensions.
pub fn power_dimension(position: &Position, dimension: &str, power: i64) -> EvalResult<String> {
    let mut dividend = Vec::new();
    let mut divisor = Vec::new();
    if power >= 0 {
        dimensions_to_vectors(position, dimension, &mut dividend, &mut divisor)?;
    } else {
        dimensions_to_vectors(position, dimension, &mut divisor, &mut dividend)?;
    }

    let count = usize::try_from(power.unsigned_abs()).map_err(|_| {
                    RuntimeError::logic("power_dimension(): power does not fit in memory.")
                })?;
    let repeat = |units: &[String]| {
        (0..count).flat_map(|_| units.iter().cloned())
                  .collect::<Vec<_>>()
    };

    Ok(rebuild_dimension(&repeat(&dividend), &repeat(&divisor)))
}

/// Computes the dimension of the square root of a value.
///
/// Each unit must appear an even number of times on its side of the
/// fraction bar (`px * px`, `1 / s * s`).
///
/// # Returns
/// `Some(dimension)` with each unit halved, or `None` when the dimension is
/// not a square.
///
/// # Errors
/// Malformed dimensions.
pub fn square_root_dimension(position: &Position, dimension: &str) -> EvalResult<Option<String>> {
    let mut dividend = Vec::new();
    let mut divisor = Vec::new();
    dimensions_to_vectors(position, dimension, &mut dividend, &mut divisor)?;

    let (Some(dividend), Some(divisor)) = (halve(dividend), halve(divisor)) else {
        return Ok(None);
    };
    Ok(Some(rebuild_dimension(&dividend, &divisor)))
}

/// Pairs identical units; `None` when one is left without a twin.
fn halve(mut units: Vec<String>) -> Option<Vec<String>> {
    if units.len() % 2 != 0 {
        return None;
    }
    let mut half = Vec::with_capacity(units.len() / 2);
    while let Some(unit) = units.pop() {
        let twin = units.iter().position(|u| *u == unit)?;
        units.remove(twin);
        half.push(unit);
    }
    Some(half)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new("test.css", 1)
    }

    fn split(dimension: &str) -> EvalResult<(Vec<String>, Vec<String>)> {
        let (mut dividend, mut divisor) = (Vec::new(), Vec::new());
        dimensions_to_vectors(&pos(), dimension, &mut dividend, &mut divisor)?;
        Ok((dividend, divisor))
    }

    #[test]
    fn leading_one_means_empty_dividend() {
        let (dividend, divisor) = split("1/px").unwrap();
        assert!(dividend.is_empty());
        assert_eq!(divisor, ["px"]);

        let (dividend, divisor) = split("1 / px * em").unwrap();
        assert!(dividend.is_empty());
        assert_eq!(divisor, ["px", "em"]);
    }

    #[test]
    fn malformed_dimensions() {
        assert_eq!(split("px / em / s").unwrap_err().message(),
                   "a valid dimension can have any number of '*' operators and a single '/' operator, here we found a second '/'.");
        assert_eq!(split("px + em").unwrap_err().message(),
                   "multiple dimensions can only be separated by '*' or '/' not '+'.");
        assert_eq!(split("px * ").unwrap_err().message(),
                   "number dimension is missing a dimension name.");
    }

    #[test]
    fn units_cancel_out() {
        let d = multiplicative_dimension(&pos(), "px * em", NodeType::Divide, "em * s").unwrap();
        assert_eq!(d, "px / s");
        let d = multiplicative_dimension(&pos(), "px", NodeType::Divide, "px").unwrap();
        assert_eq!(d, "");
        let d = multiplicative_dimension(&pos(), "", NodeType::Divide, "s").unwrap();
        assert_eq!(d, "1 / s");
    }

    #[test]
    fn modulo_is_not_multiplicative() {
        assert!(multiplicative_dimension(&pos(), "px", NodeType::Modulo, "px").unwrap_err()
                                                                            .is_logic());
    }

    #[test]
    fn powers_repeat_units() {
        assert_eq!(power_dimension(&pos(), "px", 3).unwrap(), "px * px * px");
        assert_eq!(power_dimension(&pos(), "px / s", -2).unwrap(), "s * s / px * px");
    }

    #[test]
    fn square_roots() {
        assert_eq!(square_root_dimension(&pos(), "px * px").unwrap(), Some("px".into()));
        assert_eq!(square_root_dimension(&pos(), "px * em * px * em / s * s").unwrap(),
                   Some("em * px / s".into()));
        assert_eq!(square_root_dimension(&pos(), "px * em").unwrap(), None);
        assert_eq!(square_root_dimension(&pos(), "px").unwrap(), None);
    }
}
