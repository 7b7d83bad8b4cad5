use crate::{
    error::RuntimeError,
    interpreter::node::core::{NodeId, NodeKind, NodeType, Tree},
};

/// Removes the `WHITESPACE` children at the start and at the end of `node`.
pub fn trim_whitespace(tree: &mut Tree, node: NodeId) {
    while tree.last_child(node).is_some_and(|c| tree.is(c, NodeType::Whitespace)) {
        tree.remove_child(node, tree.len(node) - 1);
    }
    while tree.child(node, 0).is_some_and(|c| tree.is(c, NodeType::Whitespace)) {
        tree.remove_child(node, 0);
    }
}

/// Splits the children of a function call into `ARG` nodes.
///
/// Each comma starts a new argument. Blanks before a comma and at the start
/// of an argument are dropped. A trailing `{ ... }` block is not part of the
/// arguments and stays the last child. Nodes whose first child already is an
/// `ARG` are left alone, so calling this twice is harmless.
///
/// # Parameters
/// - `tree`: The arena owning the node.
/// - `node`: The function (or list) to split.
///
/// # Errors
/// A comma at the start or the end of the list, or two commas in a row.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::{
///     node::core::{NodeType, Tree},
///     parser::{core::parse_component_values, utils::argify},
/// };
///
/// let mut tree = Tree::new();
/// let list = parse_component_values("f(1 2, 3)", "a.css", &mut tree).unwrap();
/// let f = tree.children(list)[0];
/// argify(&mut tree, f).unwrap();
/// assert_eq!(tree.len(f), 2);
/// assert!(tree.is(tree.children(f)[0], NodeType::Arg));
/// assert_eq!(tree.len(tree.children(f)[0]), 3);
/// ```
pub fn argify(tree: &mut Tree, node: NodeId) -> Result<(), RuntimeError> {
    match tree.child(node, 0) {
        None => return Ok(()),
        Some(first) if tree.is(first, NodeType::Arg) => return Ok(()),
        Some(_) => {},
    }

    let position = tree.position(node);
    let children = tree.take_children(node);
    let count = children.len();

    let mut arg = tree.add(NodeKind::Arg, position.clone());
    tree.push_child(node, arg);

    for (i, &child) in children.iter().enumerate() {
        match tree.node_type(child) {
            NodeType::OpenCurlyBracket => {
                if i + 1 != count {
                    return Err(RuntimeError::logic("argify(): list that has an OPEN_CURLYBRACKET that is not the last child."));
                }
                trim_whitespace(tree, arg);
                tree.push_child(node, child);
                break;
            },
            NodeType::Comma => {
                trim_whitespace(tree, arg);
                if tree.is_empty(arg) {
                    let message = if tree.len(node) == 1 {
                        "dangling comma at the beginning of a list of arguments or selectors."
                    } else {
                        "two commas in a row are invalid in a list of arguments or selectors."
                    };
                    return Err(RuntimeError::syntax(position, message));
                }
                let followed_by_block =
                    children.get(i + 1)
                            .is_none_or(|&next| tree.is(next, NodeType::OpenCurlyBracket));
                if followed_by_block {
                    return Err(RuntimeError::syntax(position,
                                                    "dangling comma at the end of a list of arguments or selectors."));
                }
                arg = tree.add(NodeKind::Arg, position.clone());
                tree.push_child(node, arg);
            },
            NodeType::Whitespace if tree.is_empty(arg) => {},
            _ => tree.push_child(arg, child),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parser::core::parse_component_values;

    fn function(tree: &mut Tree, source: &str) -> NodeId {
        let list = parse_component_values(source, "a.css", tree).unwrap();
        tree.children(list)[0]
    }

    #[test]
    fn dangling_commas() {
        let mut tree = Tree::new();

        let f = function(&mut tree, "f(, 1)");
        assert_eq!(argify(&mut tree, f).unwrap_err().message(),
                   "dangling comma at the beginning of a list of arguments or selectors.");

        let f = function(&mut tree, "f(1,, 2)");
        assert_eq!(argify(&mut tree, f).unwrap_err().message(),
                   "two commas in a row are invalid in a list of arguments or selectors.");

        let f = function(&mut tree, "f(1, 2,)");
        assert_eq!(argify(&mut tree, f).unwrap_err().message(),
                   "dangling comma at the end of a list of arguments or selectors.");
    }

    #[test]
    fn trailing_block_is_kept_apart() {
        let mut tree = Tree::new();
        let f = function(&mut tree, "f(1, 2 {3})");
        argify(&mut tree, f).unwrap();
        let kinds: Vec<_> = tree.children(f).iter().map(|&c| tree.node_type(c)).collect();
        assert_eq!(kinds, vec![NodeType::Arg, NodeType::Arg, NodeType::OpenCurlyBracket]);
    }

    #[test]
    fn empty_call_has_no_arguments() {
        let mut tree = Tree::new();
        let f = function(&mut tree, "f()");
        argify(&mut tree, f).unwrap();
        assert!(tree.is_empty(f));
    }
}
