use std::rc::Rc;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{NumberLiteral, Token, tokenize},
        node::core::{NodeId, NodeKind, NodeType, Position, Tree},
        parser::utils::trim_whitespace,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// A block being filled: the node, the character closing it and the line it
/// was opened on.
type OpenBlock = (NodeId, char, usize);

/// Parses a CSS value into a `LIST` node of component values.
///
/// Brackets (`(`, `[`, `{`) and function calls (`name(`, `$name(`) become
/// nodes owning the tokens up to their closing character. Runs of blanks
/// collapse to a single `WHITESPACE` node, and blanks at the start or end
/// of any group are removed.
///
/// # Parameters
/// - `source`: The text to parse.
/// - `filename`: Name used in the positions of the created nodes.
/// - `tree`: The arena receiving the nodes.
///
/// # Returns
/// The id of the `LIST` node holding the parsed values.
///
/// # Errors
/// - `UnexpectedToken` when the lexer does not recognize some input.
/// - `UnclosedBlock`, `MismatchedClosing` or `UnexpectedClosing` for
///   unbalanced brackets.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::{node::core::{NodeKind, Tree}, parser::core::parse_component_values};
///
/// let mut tree = Tree::new();
/// let list = parse_component_values("rgb(1, 2, 3) + 4", "a.css", &mut tree).unwrap();
/// let children = tree.children(list);
/// assert_eq!(children.len(), 5);
/// assert_eq!(tree.kind(children[0]), &NodeKind::Function("rgb".into()));
/// assert_eq!(tree.len(children[0]), 7);
/// ```
pub fn parse_component_values(source: &str,
                              filename: &str,
                              tree: &mut Tree)
                              -> ParseResult<NodeId> {
    let filename: Rc<str> = Rc::from(filename);
    let position = |line: usize| Position { filename: Rc::clone(&filename),
                                            line };

    let root = tree.add(NodeKind::List, position(1));
    let mut stack: Vec<OpenBlock> = Vec::new();

    for (token, line) in tokenize(source)? {
        let parent = stack.last().map_or(root, |&(id, _, _)| id);

        let (kind, closing) = match token {
            Token::RParen | Token::RBracket | Token::RBrace => {
                let found = match token {
                    Token::RParen => ')',
                    Token::RBracket => ']',
                    _ => '}',
                };
                close_block(tree, &mut stack, found, line)?;
                continue;
            },
            Token::Whitespace => {
                let skip = tree.last_child(parent)
                               .is_none_or(|last| tree.is(last, NodeType::Whitespace));
                if !skip {
                    let ws = tree.add(NodeKind::Whitespace, position(line));
                    tree.push_child(parent, ws);
                }
                continue;
            },
            Token::LParen => (NodeKind::OpenParenthesis, Some(')')),
            Token::LBracket => (NodeKind::OpenSquareBracket, Some(']')),
            Token::LBrace => (NodeKind::OpenCurlyBracket, Some('}')),
            Token::Function(name) => (NodeKind::Function(name), Some(')')),
            Token::VariableFunction(name) => (NodeKind::VariableFunction(name), Some(')')),
            other => (leaf_kind(other), None),
        };

        let node = tree.add(kind, position(line));
        tree.push_child(parent, node);
        if let Some(closing) = closing {
            stack.push((node, closing, line));
        }
    }

    if let Some(&(_, expected, line)) = stack.last() {
        return Err(ParseError::UnclosedBlock { expected, line });
    }
    trim_whitespace(tree, root);

    Ok(root)
}

/// Closes the innermost open block, checking that `found` matches it.
fn close_block(tree: &mut Tree,
               stack: &mut Vec<OpenBlock>,
               found: char,
               line: usize)
               -> ParseResult<()> {
    match stack.pop() {
        Some((node, expected, _)) if expected == found => {
            trim_whitespace(tree, node);
            Ok(())
        },
        Some((_, expected, _)) => Err(ParseError::MismatchedClosing { found,
                                                                      expected,
                                                                      line }),
        None => Err(ParseError::UnexpectedClosing { found, line }),
    }
}

/// Converts a token that does not open or close a block to a node kind.
fn leaf_kind(token: Token) -> NodeKind {
    match token {
        Token::Number(NumberLiteral::Integer(value, dimension)) => {
            NodeKind::Integer { value, dimension }
        },
        Token::Number(NumberLiteral::Decimal(value, dimension)) => {
            NodeKind::DecimalNumber { value, dimension }
        },
        Token::Number(NumberLiteral::Percent(value)) => NodeKind::Percent(value),
        Token::String(s) => NodeKind::String(s),
        Token::Hash(s) => NodeKind::Hash(s),
        Token::Variable(s) => NodeKind::Variable(s),
        Token::Url(s) => NodeKind::Url(s),
        Token::UnicodeRange(r) => NodeKind::UnicodeRange(r),
        Token::Identifier(s) => NodeKind::Identifier(s),
        Token::Exclamation(s) => NodeKind::Exclamation(s),
        Token::Plus => NodeKind::Add,
        Token::Minus => NodeKind::Subtract,
        Token::Star => NodeKind::Multiply,
        Token::Slash => NodeKind::Divide,
        Token::Percent => NodeKind::Modulo,
        Token::Power => NodeKind::Power,
        Token::Comma => NodeKind::Comma,
        Token::Colon => NodeKind::Colon,
        Token::Assignment => NodeKind::Assignment,
        Token::Question => NodeKind::Conditional,
        Token::Period => NodeKind::Period,
        Token::Equal => NodeKind::Equal,
        Token::NotEqual => NodeKind::NotEqual,
        Token::IncludeMatch => NodeKind::IncludeMatch,
        Token::PrefixMatch => NodeKind::PrefixMatch,
        Token::SuffixMatch => NodeKind::SuffixMatch,
        Token::SubstringMatch => NodeKind::SubstringMatch,
        Token::DashMatch => NodeKind::DashMatch,
        Token::Less => NodeKind::LessThan,
        Token::LessEqual => NodeKind::LessEqual,
        Token::Greater => NodeKind::GreaterThan,
        Token::GreaterEqual => NodeKind::GreaterEqual,
        Token::And => NodeKind::And,
        Token::Column => NodeKind::Column,
        Token::Function(s) => NodeKind::Function(s),
        Token::VariableFunction(s) => NodeKind::VariableFunction(s),
        Token::LParen => NodeKind::OpenParenthesis,
        Token::LBracket => NodeKind::OpenSquareBracket,
        Token::LBrace => NodeKind::OpenCurlyBracket,
        Token::Comment | Token::Whitespace | Token::RParen | Token::RBracket | Token::RBrace => {
            NodeKind::Whitespace
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanks_are_trimmed_and_collapsed() {
        let mut tree = Tree::new();
        let list = parse_component_values("  ( 1 /* x */  2 )  ", "a.css", &mut tree).unwrap();
        assert_eq!(tree.len(list), 1);
        let group = tree.children(list)[0];
        let kinds: Vec<_> = tree.children(group).iter().map(|&c| tree.node_type(c)).collect();
        assert_eq!(kinds, vec![NodeType::Integer, NodeType::Whitespace, NodeType::Integer]);
    }

    #[test]
    fn unbalanced_brackets() {
        let mut tree = Tree::new();
        assert_eq!(parse_component_values("(1", "a.css", &mut tree),
                   Err(ParseError::UnclosedBlock { expected: ')', line: 1 }));
        assert_eq!(parse_component_values("(1]", "a.css", &mut tree),
                   Err(ParseError::MismatchedClosing { found:    ']',
                                                       expected: ')',
                                                       line:     1, }));
        assert_eq!(parse_component_values("1)", "a.css", &mut tree),
                   Err(ParseError::UnexpectedClosing { found: ')', line: 1 }));
    }

    #[test]
    fn positions_follow_lines() {
        let mut tree = Tree::new();
        let list = parse_component_values("1\n+\n2", "b.css", &mut tree).unwrap();
        let last = tree.last_child(list).unwrap();
        assert_eq!(tree.position(last), Position::new("b.css", 3));
    }
}
