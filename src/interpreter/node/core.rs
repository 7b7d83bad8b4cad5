use std::{fmt, ops::Range, rc::Rc};

use crate::interpreter::node::{color::Color, unicode_range::UnicodeRange};

/// Index of a node inside a [`Tree`].
///
/// Ids are only meaningful for the tree that produced them. They are cheap to
/// copy and never invalidated: removing a node from its parent only detaches
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Source location attached to every node.
///
/// Derived nodes (results of an operator or a function) inherit the position
/// of the token that produced them so diagnostics point back at the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Name of the file the node was read from.
    pub filename: Rc<str>,
    /// One based line number.
    pub line:     usize,
}

impl Position {
    /// Creates a new position.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::core::Position;
    ///
    /// let pos = Position::new("style.css", 3);
    /// assert_eq!(pos.to_string(), "style.css(3)");
    /// ```
    #[must_use]
    pub fn new(filename: &str, line: usize) -> Self {
        Self { filename: Rc::from(filename),
               line }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.filename, self.line)
    }
}

/// The payload carrying part of a node.
///
/// Scalars hold their value inline. Composite nodes (arrays, maps, lists,
/// function calls, arguments and brackets) keep their content in
/// [`Node::children`]. Operator tokens carry nothing; they are consumed by the
/// expression grammar and never survive in a reduced result.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An integer with an optional dimension (`3`, `10px`, `2px * em`).
    Integer {
        /// The numeric value.
        value:     i64,
        /// The unit, empty when unitless.
        dimension: String,
    },
    /// A floating point number with an optional dimension.
    DecimalNumber {
        /// The numeric value.
        value:     f64,
        /// The unit, empty when unitless.
        dimension: String,
    },
    /// A percentage stored as a fraction: `15%` is `0.15`.
    Percent(f64),
    /// A quoted string, without its quotes.
    String(String),
    /// A bare identifier.
    Identifier(String),
    /// `true` or `false`.
    Boolean(bool),
    /// An RGBA color.
    Color(Color),
    /// A `U+XXXX` range.
    UnicodeRange(UnicodeRange),
    /// The `null` value.
    Null,
    /// The content of a `url(...)` token.
    Url(String),
    /// A `#name` token, not yet validated as a color.
    Hash(String),
    /// A `$name` reference.
    Variable(String),
    /// A `$name(...)` call, arguments are children.
    VariableFunction(String),
    /// A `name(...)` call, arguments are children.
    Function(String),
    /// A `!name` flag such as `!important`.
    Exclamation(String),
    /// An ordered list of values.
    Array,
    /// Alternating name and value children.
    Map,
    /// A generic list, used for multi-node values and resolver entries.
    List,
    /// One argument of a function call.
    Arg,
    /// A `( ... )` group.
    OpenParenthesis,
    /// A `[ ... ]` group.
    OpenSquareBracket,
    /// A `{ ... }` group.
    OpenCurlyBracket,
    /// The result of `size/line-height` when font metrics division is active.
    FontMetrics {
        /// Left hand side of the division.
        font_size:             f64,
        /// Right hand side of the division.
        line_height:           f64,
        /// Dimension of the font size (`%` for percentages).
        font_dimension:        String,
        /// Dimension of the line height (`%` for percentages).
        line_height_dimension: String,
    },
    /// A run of blanks.
    Whitespace,
    /// Synthesized when the cursor runs past the last child.
    Eof,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `**`
    Power,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `:=`
    Assignment,
    /// `?`
    Conditional,
    /// `.`
    Period,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `~=`
    IncludeMatch,
    /// `^=`
    PrefixMatch,
    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,
    /// `|=`
    DashMatch,
    /// `<`
    LessThan,
    /// `<=`
    LessEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterEqual,
    /// `&&`
    And,
    /// `||`
    Column,
}

/// The payload free tag of a [`NodeKind`].
///
/// This is what operators dispatch on when they only care about the type, and
/// what diagnostics print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Integer,
    DecimalNumber,
    Percent,
    String,
    Identifier,
    Boolean,
    Color,
    UnicodeRange,
    Null,
    Url,
    Hash,
    Variable,
    VariableFunction,
    Function,
    Exclamation,
    Array,
    Map,
    List,
    Arg,
    OpenParenthesis,
    OpenSquareBracket,
    OpenCurlyBracket,
    FontMetrics,
    Whitespace,
    Eof,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Comma,
    Colon,
    Assignment,
    Conditional,
    Period,
    Equal,
    NotEqual,
    IncludeMatch,
    PrefixMatch,
    SuffixMatch,
    SubstringMatch,
    DashMatch,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    And,
    Column,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "INTEGER",
            Self::DecimalNumber => "DECIMAL_NUMBER",
            Self::Percent => "PERCENT",
            Self::String => "STRING",
            Self::Identifier => "IDENTIFIER",
            Self::Boolean => "BOOLEAN",
            Self::Color => "COLOR",
            Self::UnicodeRange => "UNICODE_RANGE",
            Self::Null => "NULL_TOKEN",
            Self::Url => "URL",
            Self::Hash => "HASH",
            Self::Variable => "VARIABLE",
            Self::VariableFunction => "VARIABLE_FUNCTION",
            Self::Function => "FUNCTION",
            Self::Exclamation => "EXCLAMATION",
            Self::Array => "ARRAY",
            Self::Map => "MAP",
            Self::List => "LIST",
            Self::Arg => "ARG",
            Self::OpenParenthesis => "OPEN_PARENTHESIS",
            Self::OpenSquareBracket => "OPEN_SQUAREBRACKET",
            Self::OpenCurlyBracket => "OPEN_CURLYBRACKET",
            Self::FontMetrics => "FONT_METRICS",
            Self::Whitespace => "WHITESPACE",
            Self::Eof => "EOF_TOKEN",
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
            Self::Modulo => "MODULO",
            Self::Power => "POWER",
            Self::Comma => "COMMA",
            Self::Colon => "COLON",
            Self::Assignment => "ASSIGNMENT",
            Self::Conditional => "CONDITIONAL",
            Self::Period => "PERIOD",
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::IncludeMatch => "INCLUDE_MATCH",
            Self::PrefixMatch => "PREFIX_MATCH",
            Self::SuffixMatch => "SUFFIX_MATCH",
            Self::SubstringMatch => "SUBSTRING_MATCH",
            Self::DashMatch => "DASH_MATCH",
            Self::LessThan => "LESS_THAN",
            Self::LessEqual => "LESS_EQUAL",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterEqual => "GREATER_EQUAL",
            Self::And => "AND",
            Self::Column => "COLUMN",
        };
        f.write_str(name)
    }
}

impl NodeKind {
    /// Returns the payload free tag of this kind.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Integer { .. } => NodeType::Integer,
            Self::DecimalNumber { .. } => NodeType::DecimalNumber,
            Self::Percent(_) => NodeType::Percent,
            Self::String(_) => NodeType::String,
            Self::Identifier(_) => NodeType::Identifier,
            Self::Boolean(_) => NodeType::Boolean,
            Self::Color(_) => NodeType::Color,
            Self::UnicodeRange(_) => NodeType::UnicodeRange,
            Self::Null => NodeType::Null,
            Self::Url(_) => NodeType::Url,
            Self::Hash(_) => NodeType::Hash,
            Self::Variable(_) => NodeType::Variable,
            Self::VariableFunction(_) => NodeType::VariableFunction,
            Self::Function(_) => NodeType::Function,
            Self::Exclamation(_) => NodeType::Exclamation,
            Self::Array => NodeType::Array,
            Self::Map => NodeType::Map,
            Self::List => NodeType::List,
            Self::Arg => NodeType::Arg,
            Self::OpenParenthesis => NodeType::OpenParenthesis,
            Self::OpenSquareBracket => NodeType::OpenSquareBracket,
            Self::OpenCurlyBracket => NodeType::OpenCurlyBracket,
            Self::FontMetrics { .. } => NodeType::FontMetrics,
            Self::Whitespace => NodeType::Whitespace,
            Self::Eof => NodeType::Eof,
            Self::Add => NodeType::Add,
            Self::Subtract => NodeType::Subtract,
            Self::Multiply => NodeType::Multiply,
            Self::Divide => NodeType::Divide,
            Self::Modulo => NodeType::Modulo,
            Self::Power => NodeType::Power,
            Self::Comma => NodeType::Comma,
            Self::Colon => NodeType::Colon,
            Self::Assignment => NodeType::Assignment,
            Self::Conditional => NodeType::Conditional,
            Self::Period => NodeType::Period,
            Self::Equal => NodeType::Equal,
            Self::NotEqual => NodeType::NotEqual,
            Self::IncludeMatch => NodeType::IncludeMatch,
            Self::PrefixMatch => NodeType::PrefixMatch,
            Self::SuffixMatch => NodeType::SuffixMatch,
            Self::SubstringMatch => NodeType::SubstringMatch,
            Self::DashMatch => NodeType::DashMatch,
            Self::LessThan => NodeType::LessThan,
            Self::LessEqual => NodeType::LessEqual,
            Self::GreaterThan => NodeType::GreaterThan,
            Self::GreaterEqual => NodeType::GreaterEqual,
            Self::And => NodeType::And,
            Self::Column => NodeType::Column,
        }
    }

    /// Shorthand for a unitless integer.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Integer { value,
                        dimension: String::new() }
    }

    /// Shorthand for a unitless decimal number.
    #[must_use]
    pub const fn decimal(value: f64) -> Self {
        Self::DecimalNumber { value,
                              dimension: String::new() }
    }

    /// The textual payload of string like nodes.
    ///
    /// Returns `None` for nodes that do not carry a name or a string.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::String(s)
            | Self::Identifier(s)
            | Self::Url(s)
            | Self::Hash(s)
            | Self::Variable(s)
            | Self::VariableFunction(s)
            | Self::Function(s)
            | Self::Exclamation(s) => Some(s),
            _ => None,
        }
    }

    /// The dimension of an integer or decimal number.
    #[must_use]
    pub fn dimension(&self) -> Option<&str> {
        match self {
            Self::Integer { dimension, .. } | Self::DecimalNumber { dimension, .. } => {
                Some(dimension)
            },
            _ => None,
        }
    }

    /// The value of an integer, decimal number or percentage as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer { value, .. } => Some(*value as f64),
            Self::DecimalNumber { value, .. } | Self::Percent(value) => Some(*value),
            _ => None,
        }
    }
}

/// One entry of the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// What the node is.
    pub kind:     NodeKind,
    /// Where the node comes from.
    pub position: Position,
    /// Ordered children, meaning depends on `kind`.
    pub children: Vec<NodeId>,
    /// Flags such as `important` collected from `!important`.
    pub flags:    Vec<String>,
}

/// Owns every node of one or more expression trees.
///
/// Nodes are never freed individually. Reducing an expression detaches the
/// consumed children from their parent and attaches the result in their
/// place, the detached entries simply become unreachable.
#[derive(Debug, Default, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a childless node and returns its id.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::core::{NodeKind, Position, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let n = tree.add(NodeKind::integer(3), Position::new("a.css", 1));
    /// assert_eq!(tree.kind(n), &NodeKind::integer(3));
    /// ```
    pub fn add(&mut self, kind: NodeKind, position: Position) -> NodeId {
        self.add_with_children(kind, position, Vec::new())
    }

    /// Adds a node with the given children and returns its id.
    pub fn add_with_children(&mut self,
                             kind: NodeKind,
                             position: Position,
                             children: Vec<NodeId>)
                             -> NodeId {
        self.nodes.push(Node { kind,
                               position,
                               children,
                               flags: Vec::new() });
        NodeId(self.nodes.len() - 1)
    }

    /// Returns the node behind `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    #[must_use]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.nodes[id.0].kind.node_type()
    }

    /// Tests the type of a node.
    #[must_use]
    pub fn is(&self, id: NodeId, node_type: NodeType) -> bool {
        self.node_type(id) == node_type
    }

    #[must_use]
    pub fn position(&self, id: NodeId) -> Position {
        self.nodes[id.0].position.clone()
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of children of `id`.
    #[must_use]
    pub fn len(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    /// Whether `id` has no children.
    #[must_use]
    pub fn is_empty(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    /// Returns child `idx` of `id` when it exists.
    #[must_use]
    pub fn child(&self, id: NodeId, idx: usize) -> Option<NodeId> {
        self.nodes[id.0].children.get(idx).copied()
    }

    /// Returns the last child of `id` when it exists.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    pub fn insert_child(&mut self, parent: NodeId, idx: usize, child: NodeId) {
        self.nodes[parent.0].children.insert(idx, child);
    }

    /// Detaches child `idx` from `parent` and returns it.
    pub fn remove_child(&mut self, parent: NodeId, idx: usize) -> NodeId {
        self.nodes[parent.0].children.remove(idx)
    }

    /// Replaces the children of `parent` in `range` by `with`.
    ///
    /// This is the tree surgery performed each time the expression grammar
    /// reduces a run of tokens to a single value.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::core::{NodeKind, Position, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let pos = Position::new("a.css", 1);
    /// let list = tree.add(NodeKind::List, pos.clone());
    /// for kind in [NodeKind::integer(1), NodeKind::Add, NodeKind::integer(2)] {
    ///     let c = tree.add(kind, pos.clone());
    ///     tree.push_child(list, c);
    /// }
    /// let three = tree.add(NodeKind::integer(3), pos);
    /// tree.splice(list, 0..3, three);
    /// assert_eq!(tree.children(list), &[three]);
    /// ```
    pub fn splice(&mut self, parent: NodeId, range: Range<usize>, with: NodeId) {
        self.nodes[parent.0].children.splice(range, [with]);
    }

    /// Replaces all the children of `parent`.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        self.nodes[parent.0].children = children;
    }

    /// Detaches and returns all the children of `parent`.
    pub fn take_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        std::mem::take(&mut self.nodes[parent.0].children)
    }

    /// Creates a new node with the same kind, position and flags as `id`.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let node = self.nodes[id.0].clone();
        let copy = self.add(node.kind, node.position);
        self.nodes[copy.0].flags = node.flags;
        copy
    }

    /// Recursively copies `id` and all its descendants.
    ///
    /// Values taken from a variable are always copied this way so the
    /// stored value can never be modified through the expression using it.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let copy = self.clone_node(id);
        let children = self.nodes[id.0].children.clone();
        for child in children {
            let c = self.deep_copy(child);
            self.push_child(copy, c);
        }
        copy
    }

    /// Adds a flag to a node, ignoring duplicates.
    pub fn set_flag(&mut self, id: NodeId, flag: &str) {
        let flags = &mut self.nodes[id.0].flags;
        if !flags.iter().any(|f| f == flag) {
            flags.push(flag.to_string());
        }
    }

    #[must_use]
    pub fn has_flag(&self, id: NodeId, flag: &str) -> bool {
        self.nodes[id.0].flags.iter().any(|f| f == flag)
    }
}
