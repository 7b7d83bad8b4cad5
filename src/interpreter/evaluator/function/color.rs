use std::f64::consts::PI;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Expression},
            function::args::{dimension_to_radians, get_color, get_number, get_number_or_percent},
        },
        node::{
            color::Color,
            core::{NodeId, NodeKind},
        },
    },
    util::num::f64_to_i64_truncated,
};

/// Builds a color from `f64` components.
#[allow(clippy::cast_possible_truncation)]
fn color_from(red: f64, green: f64, blue: f64, alpha: f64) -> Color {
    Color::new(red as f32, green as f32, blue as f32, alpha as f32)
}

/// The color argument of a component accessor such as `red()`.
fn color_parameter(expr: &Expression<'_>, func: NodeId, name: &str) -> EvalResult<Color> {
    get_color(expr.tree, func, 0).ok_or_else(|| {
                                     RuntimeError::type_error(expr.tree.position(func),
                                                              format!("{name}() expects a color as parameter."))
                                 })
}

/// The first three number arguments, as `(red, green, blue)`.
fn components(expr: &Expression<'_>, func: NodeId) -> Option<(f64, f64, f64)> {
    let (_, red) = get_number(expr.tree, func, 0)?;
    let (_, green) = get_number(expr.tree, func, 1)?;
    let (_, blue) = get_number(expr.tree, func, 2)?;
    Some((red, green, blue))
}

/// `rgb(color)` or `rgb(red, green, blue)`, components from 0 to 255.
///
/// A color argument is returned fully opaque.
pub(crate) fn rgb(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    solid(expr, func, 255.0, "rgb() expects exactly one color parameter (Color) or three numbers (Red, Green, Blue).")
}

/// `frgb(color)` or `frgb(red, green, blue)`, components from 0.0 to 1.0.
pub(crate) fn frgb(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    solid(expr, func, 1.0, "frgb() expects exactly one color parameter or three numbers (Red, Green, Blue).")
}

/// `rgba(color, alpha)` or `rgba(red, green, blue, alpha)`, components from
/// 0 to 255 and alpha from 0.0 to 1.0.
pub(crate) fn rgba(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    translucent(expr,
                func,
                255.0,
                "rgba() expects exactly one color parameter followed by alpha (Color, Alpha) or four numbers (Red, Green, Blue, Alpha).")
}

/// `frgba(color, alpha)` or `frgba(red, green, blue, alpha)`, all the
/// components from 0.0 to 1.0.
pub(crate) fn frgba(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    translucent(expr,
                func,
                1.0,
                "frgba() expects exactly one color parameter followed by one number (Color, Alpha), or four numbers (Red, Green, Blue, Alpha).")
}

fn solid(expr: &mut Expression<'_>, func: NodeId, scale: f64, message: &str) -> EvalResult<NodeId> {
    let position = expr.tree.position(func);

    let color = if let Some(c) = get_color(expr.tree, func, 0) {
        Color::new(c.red, c.green, c.blue, 1.0)
    } else if let Some((red, green, blue)) = components(expr, func) {
        color_from(red / scale, green / scale, blue / scale, 1.0)
    } else {
        return Err(RuntimeError::type_error(position, message));
    };

    Ok(expr.add(NodeKind::Color(color), position))
}

#[allow(clippy::cast_possible_truncation)]
fn translucent(expr: &mut Expression<'_>,
               func: NodeId,
               scale: f64,
               message: &str)
               -> EvalResult<NodeId> {
    let position = expr.tree.position(func);

    let color = if let (Some(c), Some((_, alpha))) =
        (get_color(expr.tree, func, 0), get_number(expr.tree, func, 1))
    {
        Color { alpha: alpha as f32,
                ..c }
    } else if let (Some((red, green, blue)), Some((_, alpha))) =
        (components(expr, func), get_number(expr.tree, func, 3))
    {
        color_from(red / scale, green / scale, blue / scale, alpha)
    } else {
        return Err(RuntimeError::type_error(position, message));
    };

    Ok(expr.add(NodeKind::Color(color), position))
}

/// `hsl(hue, saturation, lightness)`.
///
/// The hue is an angle, in degrees when unitless. Saturation and lightness
/// are percentages or fractions.
pub(crate) fn hsl(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    from_hsl(expr,
             func,
             false,
             "hsl() expects exactly three numbers: Hue (angle), Saturation (%), and Lightness (%).")
}

/// `hsla(hue, saturation, lightness, alpha)`.
pub(crate) fn hsla(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    from_hsl(expr,
             func,
             true,
             "hsla() expects exactly four numbers: Hue (angle), Saturation (%), Lightness (%), and Alpha (0.0 to 1.0).")
}

fn from_hsl(expr: &mut Expression<'_>,
            func: NodeId,
            with_alpha: bool,
            message: &str)
            -> EvalResult<NodeId> {
    let position = expr.tree.position(func);

    let hue = get_number(expr.tree, func, 0);
    let saturation = get_number_or_percent(expr.tree, func, 1);
    let lightness = get_number_or_percent(expr.tree, func, 2);
    let alpha = if with_alpha {
        get_number(expr.tree, func, 3).map(|(_, a)| a)
    } else {
        Some(1.0)
    };

    let (Some((angle, h)), Some((_, s)), Some((_, l)), Some(a)) = (hue, saturation, lightness, alpha)
    else {
        return Err(RuntimeError::type_error(position, message));
    };

    let dimension = expr.kind(angle).dimension().unwrap_or_default();
    let h = dimension_to_radians(&position, h, dimension)?;
    Ok(expr.add(NodeKind::Color(Color::from_hsl(h, s, l, a)), position))
}

/// Generates an accessor returning one RGB component as an integer from 0
/// to 255.
macro_rules! byte_component {
    ($fname:ident) => {
        pub(crate) fn $fname(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
            let color = color_parameter(expr, func, stringify!($fname))?;
            let byte = f64::from(color.$fname).mul_add(255.0, 0.5);
            let position = expr.tree.position(func);
            Ok(expr.add(NodeKind::integer(f64_to_i64_truncated(byte)), position))
        }
    };
}

byte_component!(red);
byte_component!(green);
byte_component!(blue);

/// `alpha(color)`: the alpha channel as a decimal number.
pub(crate) fn alpha(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let color = color_parameter(expr, func, "alpha")?;
    let position = expr.tree.position(func);
    Ok(expr.add(NodeKind::decimal(f64::from(color.alpha)), position))
}

/// `hue(color)`: the hue in `deg`.
pub(crate) fn hue(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let (h, _, _, _) = color_parameter(expr, func, "hue")?.to_hsl();
    let position = expr.tree.position(func);
    Ok(expr.add(NodeKind::DecimalNumber { value:     h * 180.0 / PI,
                                          dimension: "deg".into(), },
                position))
}

/// `saturation(color)`: the saturation as a percentage.
pub(crate) fn saturation(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let (_, s, _, _) = color_parameter(expr, func, "saturation")?.to_hsl();
    let position = expr.tree.position(func);
    Ok(expr.add(NodeKind::Percent(s), position))
}

/// `lightness(color)`: the lightness as a percentage.
pub(crate) fn lightness(expr: &mut Expression<'_>, func: NodeId) -> EvalResult<NodeId> {
    let (_, _, l, _) = color_parameter(expr, func, "lightness")?.to_hsl();
    let position = expr.tree.position(func);
    Ok(expr.add(NodeKind::Percent(l), position))
}

#[cfg(test)]
mod tests {
    use crate::{evaluate, interpreter::session::Session};

    fn value(source: &str) -> String {
        let mut session = Session::new();
        let result = evaluate(source, &mut session).unwrap();
        assert_eq!(session.error_count(), 0, "{:?}", session.diagnostics());
        result.unwrap()
    }

    fn error(source: &str) -> String {
        let mut session = Session::new();
        assert_eq!(evaluate(source, &mut session).unwrap(), None);
        session.diagnostics()[0].message.clone()
    }

    #[test]
    fn constructors() {
        assert_eq!(value("rgb(255, 0, 0)"), "red");
        assert_eq!(value("frgb(0, 0, 1)"), "blue");
        assert_eq!(value("rgba(255, 0, 0, 0.5)"), "rgba(255,0,0,.5)");
        assert_eq!(value("rgba(#123, 0.0)"), "transparent");
        assert_eq!(value("rgb(rgba(255, 255, 255, 0.25))"), "#fff");
        assert_eq!(value("hsl(120deg, 100%, 25%)"), "green");
        assert_eq!(value("hsla(0, 1, 0.5, 1)"), "red");
    }

    #[test]
    fn constructor_errors() {
        assert_eq!(error("rgb(1, 2, \"3\")"),
                   "rgb() expects exactly one color parameter (Color) or three numbers (Red, Green, Blue).");
        assert_eq!(error("hsl(0, 50%, red)"),
                   "hsl() expects exactly three numbers: Hue (angle), Saturation (%), and Lightness (%).");
        assert_eq!(error("rgba(1, 2)"),
                   "rgba() expects exactly one color parameter followed by alpha (Color, Alpha) or four numbers (Red, Green, Blue, Alpha).");
    }

    #[test]
    fn components() {
        assert_eq!(value("red(#ff8000)"), "255");
        assert_eq!(value("green(#ff8000)"), "128");
        assert_eq!(value("blue(#ff8000)"), "0");
        assert_eq!(value("alpha(rgba(0, 0, 0, 0.25))"), "0.25");
        assert_eq!(value("hue(lime)"), "120deg");
        assert_eq!(value("saturation(gray)"), "0%");
        assert_eq!(value("lightness(white)"), "100%");
        assert_eq!(error("red(12)"), "red() expects a color as parameter.");
    }
}
