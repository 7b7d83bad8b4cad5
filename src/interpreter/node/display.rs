use crate::{
    interpreter::node::core::{NodeId, NodeKind, Tree},
    util::num::decimal_number_to_string,
};

/// Options for [`to_css_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Write strings with their quotes. Array and map items always show them.
    pub show_quotes: bool,
    /// Digits after the decimal point for decimal numbers and percentages.
    pub precision:   usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self { show_quotes: false,
               precision:   crate::interpreter::session::DEFAULT_PRECISION, }
    }
}

/// Serializes a node and its children back to CSS text.
///
/// Numbers keep their dimension, percentages are printed multiplied by 100,
/// colors use their shortest form, arrays are written `(a, b)` and maps
/// `(name: value, ...)`.
///
/// # Parameters
/// - `tree`: The tree owning the node.
/// - `id`: The node to serialize.
/// - `options`: Quoting and precision.
///
/// # Returns
/// The textual form of the node.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::node::{
///     core::{NodeKind, Position, Tree},
///     display::{DisplayOptions, to_css_string},
/// };
///
/// let mut tree = Tree::new();
/// let pos = Position::new("a.css", 1);
/// let n = tree.add(NodeKind::DecimalNumber { value: 1.5, dimension: "em".into() }, pos.clone());
/// assert_eq!(to_css_string(&tree, n, DisplayOptions::default()), "1.5em");
///
/// let p = tree.add(NodeKind::Percent(0.18), pos);
/// assert_eq!(to_css_string(&tree, p, DisplayOptions::default()), "18%");
/// ```
#[must_use]
pub fn to_css_string(tree: &Tree, id: NodeId, options: DisplayOptions) -> String {
    let quoted = DisplayOptions { show_quotes: true,
                                  ..options };
    let join = |separator: &str, opts: DisplayOptions| {
        tree.children(id)
            .iter()
            .map(|&c| to_css_string(tree, c, opts))
            .collect::<Vec<_>>()
            .join(separator)
    };
    let number = |value: f64| decimal_number_to_string(value, options.precision, false);

    match tree.kind(id) {
        NodeKind::Integer { value, dimension } => format!("{value}{dimension}"),
        NodeKind::DecimalNumber { value, dimension } => format!("{}{dimension}", number(*value)),
        NodeKind::Percent(value) => format!("{}%", number(value * 100.0)),
        NodeKind::String(s) => {
            if options.show_quotes {
                quote_string(s)
            } else {
                s.clone()
            }
        },
        NodeKind::Identifier(s) => s.clone(),
        NodeKind::Boolean(b) => b.to_string(),
        NodeKind::Color(c) => c.to_string(),
        NodeKind::UnicodeRange(r) => format!("U+{r}"),
        NodeKind::Null | NodeKind::Eof => String::new(),
        NodeKind::Url(s) => format!("url({s})"),
        NodeKind::Hash(s) => format!("#{s}"),
        NodeKind::Variable(s) => format!("${s}"),
        NodeKind::VariableFunction(s) => format!("${s}({})", join(",", options)),
        NodeKind::Function(s) => format!("{s}({})", join(",", options)),
        NodeKind::Exclamation(s) => format!("!{s}"),
        NodeKind::Array => format!("({})", join(", ", quoted)),
        NodeKind::Map => {
            let pairs = tree.children(id)
                            .chunks(2)
                            .map(|pair| {
                                let name = to_css_string(tree, pair[0], quoted);
                                let value = pair.get(1)
                                                .map(|&v| to_css_string(tree, v, quoted))
                                                .unwrap_or_default();
                                format!("{name}: {value}")
                            })
                            .collect::<Vec<_>>();
            format!("({})", pairs.join(", "))
        },
        NodeKind::List | NodeKind::Arg => join("", options),
        NodeKind::OpenParenthesis => format!("({})", join("", options)),
        NodeKind::OpenSquareBracket => format!("[{}]", join("", options)),
        NodeKind::OpenCurlyBracket => format!("{{{}}}", join("", options)),
        NodeKind::FontMetrics { font_size,
                                line_height,
                                font_dimension,
                                line_height_dimension, } => {
            let scale = |dim: &str| if dim == "%" { 100.0 } else { 1.0 };
            format!("{}{font_dimension}/{}{line_height_dimension}",
                    number(font_size * scale(font_dimension)),
                    number(line_height * scale(line_height_dimension)))
        },
        NodeKind::Whitespace => " ".to_string(),
        other => operator_symbol(other).to_string(),
    }
}

/// Quotes a string with the quote character it contains the least of.
fn quote_string(s: &str) -> String {
    let single = s.matches('\'').count();
    let double = s.matches('"').count();
    if single >= double {
        format!("\"{}\"", s.replace('"', "\\\""))
    } else {
        format!("'{}'", s.replace('\'', "\\'"))
    }
}

/// The source text of an operator token.
const fn operator_symbol(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Add => "+",
        NodeKind::Subtract => "-",
        NodeKind::Multiply => "*",
        NodeKind::Divide => "/",
        NodeKind::Modulo => "%",
        NodeKind::Power => "**",
        NodeKind::Comma => ",",
        NodeKind::Colon => ":",
        NodeKind::Assignment => ":=",
        NodeKind::Conditional => "?",
        NodeKind::Period => ".",
        NodeKind::Equal => "=",
        NodeKind::NotEqual => "!=",
        NodeKind::IncludeMatch => "~=",
        NodeKind::PrefixMatch => "^=",
        NodeKind::SuffixMatch => "$=",
        NodeKind::SubstringMatch => "*=",
        NodeKind::DashMatch => "|=",
        NodeKind::LessThan => "<",
        NodeKind::LessEqual => "<=",
        NodeKind::GreaterThan => ">",
        NodeKind::GreaterEqual => ">=",
        NodeKind::And => "&&",
        NodeKind::Column => "||",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::node::core::Position;

    fn leaf(tree: &mut Tree, kind: NodeKind) -> NodeId {
        tree.add(kind, Position::new("test.css", 1))
    }

    #[test]
    fn strings_pick_the_least_used_quote() {
        let mut tree = Tree::new();
        let opts = DisplayOptions { show_quotes: true,
                                    ..DisplayOptions::default() };
        let plain = leaf(&mut tree, NodeKind::String("abc".into()));
        let with_double = leaf(&mut tree, NodeKind::String("say \"hi\"".into()));
        assert_eq!(to_css_string(&tree, plain, opts), "\"abc\"");
        assert_eq!(to_css_string(&tree, with_double, opts), "'say \"hi\"'");
    }

    #[test]
    fn arrays_and_maps() {
        let mut tree = Tree::new();
        let array = leaf(&mut tree, NodeKind::Array);
        for kind in [NodeKind::integer(1), NodeKind::String("x".into())] {
            let c = leaf(&mut tree, kind);
            tree.push_child(array, c);
        }
        assert_eq!(to_css_string(&tree, array, DisplayOptions::default()), "(1, \"x\")");

        let map = leaf(&mut tree, NodeKind::Map);
        for kind in [NodeKind::Identifier("a".into()), NodeKind::integer(1), NodeKind::Identifier("b".into()), NodeKind::Null] {
            let c = leaf(&mut tree, kind);
            tree.push_child(map, c);
        }
        assert_eq!(to_css_string(&tree, map, DisplayOptions::default()), "(a: 1, b: )");
    }

    #[test]
    fn font_metrics() {
        let mut tree = Tree::new();
        let n = leaf(&mut tree,
                     NodeKind::FontMetrics { font_size:             12.0,
                                             line_height:           1.5,
                                             font_dimension:        "px".into(),
                                             line_height_dimension: "%".into(), });
        assert_eq!(to_css_string(&tree, n, DisplayOptions::default()), "12px/150%");
    }
}
