use crate::interpreter::node::core::Position;

/// An internal invariant was violated.
///
/// Logic errors are never caused by the user's input. They are not reported
/// as diagnostics; they travel up to the caller of the expression engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("logic error: {0}")]
pub struct LogicError(pub String);

/// Represents all errors that can occur while reducing an expression.
///
/// Every variant except [`RuntimeError::Logic`] is recoverable: it is reported
/// exactly once, with its position, and the expression being compiled yields
/// no value.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Incompatible operand types for an operator or a function parameter.
    #[error("{position}: {message}")]
    Type {
        /// Human readable description.
        message:  String,
        /// Where the offending value comes from.
        position: Position,
    },
    /// Mismatched, malformed or unsupported dimensions.
    #[error("{position}: {message}")]
    Dimension {
        /// Human readable description.
        message:  String,
        /// Where the offending value comes from.
        position: Position,
    },
    /// Index out of range, map entry not set, division by zero.
    #[error("{position}: {message}")]
    Range {
        /// Human readable description.
        message:  String,
        /// Where the offending value comes from.
        position: Position,
    },
    /// Wrong number of arguments to a function.
    #[error("{position}: {message}")]
    Arity {
        /// Human readable description.
        message:  String,
        /// Where the function call is.
        position: Position,
    },
    /// Tokens in an order the grammar does not accept.
    #[error("{position}: {message}")]
    Syntax {
        /// Human readable description.
        message:  String,
        /// Where the unexpected token is.
        position: Position,
    },
    /// Unknown variable, or a variable used as a function or vice versa.
    #[error("{position}: {message}")]
    Variable {
        /// Human readable description.
        message:  String,
        /// Where the variable is referenced.
        position: Position,
    },
    /// An internal invariant was violated.
    #[error(transparent)]
    Logic(#[from] LogicError),
}

impl RuntimeError {
    pub fn type_error(position: Position, message: impl Into<String>) -> Self {
        Self::Type { message: message.into(),
                     position }
    }

    pub fn dimension(position: Position, message: impl Into<String>) -> Self {
        Self::Dimension { message: message.into(),
                          position }
    }

    pub fn range(position: Position, message: impl Into<String>) -> Self {
        Self::Range { message: message.into(),
                      position }
    }

    pub fn arity(position: Position, message: impl Into<String>) -> Self {
        Self::Arity { message: message.into(),
                      position }
    }

    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self::Syntax { message: message.into(),
                       position }
    }

    pub fn variable(position: Position, message: impl Into<String>) -> Self {
        Self::Variable { message: message.into(),
                         position }
    }

    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic(LogicError(message.into()))
    }

    /// The message without the position.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Type { message, .. }
            | Self::Dimension { message, .. }
            | Self::Range { message, .. }
            | Self::Arity { message, .. }
            | Self::Syntax { message, .. }
            | Self::Variable { message, .. } => message.clone(),
            Self::Logic(e) => e.to_string(),
        }
    }

    /// Where the error happened; logic errors have no position.
    #[must_use]
    pub const fn position(&self) -> Option<&Position> {
        match self {
            Self::Type { position, .. }
            | Self::Dimension { position, .. }
            | Self::Range { position, .. }
            | Self::Arity { position, .. }
            | Self::Syntax { position, .. }
            | Self::Variable { position, .. } => Some(position),
            Self::Logic(_) => None,
        }
    }

    #[must_use]
    pub const fn is_logic(&self) -> bool {
        matches!(self, Self::Logic(_))
    }
}
