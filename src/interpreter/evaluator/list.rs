use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Expression},
        node::core::{NodeId, NodeKind, NodeType, Position},
    },
    util::num::{i64_to_usize_checked, usize_to_i64},
};

impl Expression<'_> {
    /// Whether the cursor is on a `name:` map label.
    fn is_label(&self) -> bool {
        self.current_is(NodeType::Identifier)
        && self.tree
               .child(self.node, self.pos)
               .is_some_and(|c| self.tree.is(c, NodeType::Colon))
    }

    /// Parses the content of a group: a map, an array or a single value.
    ///
    /// `name: value, ...` builds a `MAP`; an empty value becomes `null`.
    /// Otherwise values separated by commas build an `ARRAY`, and a lone
    /// value is returned as is.
    pub(crate) fn expression_list(&mut self) -> EvalResult<NodeId> {
        if self.is_label() {
            let position = self.current_position();
            let map = self.add(NodeKind::Map, position);

            let mut found_end = false;
            while !found_end && self.is_label() {
                let name = self.current;
                // skip the name and the ':'
                self.next();
                self.next();

                let value = if self.current_is(NodeType::Comma) {
                    self.next();
                    None
                } else if self.current_is(NodeType::Eof) {
                    None
                } else {
                    let value = self.assignment()?;
                    if self.current_is(NodeType::Comma) {
                        self.next();
                    } else {
                        found_end = true;
                    }
                    Some(value)
                };
                let value = match value {
                    Some(v) => v,
                    None => {
                        let position = self.current_position();
                        self.add(NodeKind::Null, position)
                    },
                };

                self.tree.push_child(map, name);
                self.tree.push_child(map, value);
            }
            return Ok(map);
        }

        let result = self.assignment()?;
        if !self.current_is(NodeType::Comma) {
            return Ok(result);
        }

        let position = self.current_position();
        let array = self.add(NodeKind::Array, position);
        self.tree.push_child(array, result);
        while self.current_is(NodeType::Comma) {
            self.next();
            let item = self.assignment()?;
            self.tree.push_child(array, item);
        }
        Ok(array)
    }

    /// Parses `name := value`, saving the value in the local variables.
    ///
    /// The assignment evaluates to the assigned value.
    pub(crate) fn assignment(&mut self) -> EvalResult<NodeId> {
        let result = self.conditional()?;

        if let NodeKind::Identifier(name) = self.kind(result)
           && self.current_is(NodeType::Assignment)
        {
            let name = name.clone();
            self.next();
            let value = self.conditional()?;
            tracing::trace!(%name, "local variable assigned");
            self.variables.insert(name, value);
            return Ok(value);
        }

        Ok(result)
    }

    /// Parses the `[index]` and `.field` suffixes applied to a value.
    pub(crate) fn post(&mut self) -> EvalResult<NodeId> {
        let mut result = self.unary()?;

        loop {
            if self.current_is(NodeType::OpenSquareBracket) {
                let bracket = self.current;
                let index = {
                    let mut index_expr = self.nested(bracket);
                    index_expr.next();
                    index_expr.expression_list()?
                };
                self.next();

                match self.kind(index) {
                    NodeKind::Integer { value, .. } => {
                        let value = *value;
                        result = self.item_at(result, value)?;
                    },
                    NodeKind::String(name) | NodeKind::Identifier(name) => {
                        let name = name.clone();
                        result = self.field(result, &name)?;
                    },
                    _ => {
                        return Err(RuntimeError::type_error(self.current_position(),
                                                            format!("an integer, an identifier, or a string was expected as the index (defined in '[ ... ]'). A {} was not expected.",
                                                                    self.node_type(index))));
                    },
                }
            } else if self.current_is(NodeType::Period) {
                self.next();
                let NodeKind::Identifier(name) = self.kind(self.current) else {
                    return Err(RuntimeError::syntax(self.current_position(),
                                                    "only an identifier is expected after a '.'."));
                };
                let name = name.clone();
                self.next();
                result = self.field(result, &name)?;
            } else {
                return Ok(result);
            }
        }
    }

    /// Returns item `index` of an array, a list or a map.
    ///
    /// Indexes start at 1 and negative indexes count from the end. Map
    /// indexes select the value of the entry.
    fn item_at(&self, container: NodeId, index: i64) -> EvalResult<NodeId> {
        let size = usize_to_i64(self.tree.len(container));
        let out_of_range = |count: i64, position: Position| {
            RuntimeError::range(position,
                                format!("index {index} is out of range. The allowed range is 1 to {count}."))
        };

        let (child, count) = match self.node_type(container) {
            NodeType::Array | NodeType::List => {
                let idx = if index < 0 { size + index } else { index - 1 };
                (idx, size)
            },
            NodeType::Map => {
                let pairs = size / 2;
                let idx = if index < 0 { pairs + index } else { index - 1 };
                (if idx < 0 { idx } else { idx * 2 + 1 }, pairs)
            },
            other => {
                return Err(RuntimeError::type_error(self.current_position(),
                                                    format!("unsupported type {other} for the 'array[<index>]' operation.")));
            },
        };

        let child = i64_to_usize_checked(child, out_of_range(count, self.current_position()))?;
        self.tree
            .child(container, child)
            .ok_or_else(|| out_of_range(count, self.current_position()))
    }

    /// Returns the value named `name` in a map.
    fn field(&self, container: NodeId, name: &str) -> EvalResult<NodeId> {
        if !self.tree.is(container, NodeType::Map) {
            return Err(RuntimeError::type_error(self.current_position(),
                                                format!("unsupported left handside type {} for the '<map>.<identifier>' operation.",
                                                        self.node_type(container))));
        }

        let entries = self.tree.children(container);
        if entries.len() % 2 != 0 {
            return Err(RuntimeError::logic("post(): number of items in a map has to be even."));
        }
        for pair in entries.chunks(2) {
            let NodeKind::Identifier(key) = self.kind(pair[0]) else {
                return Err(RuntimeError::logic("post(): a map has the name of an entry which is not an identifier."));
            };
            if key == name {
                return Ok(pair[1]);
            }
        }

        Err(RuntimeError::range(self.current_position(), format!("'map[\"{name}\"]' is not set.")))
    }
}
