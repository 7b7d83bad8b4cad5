/// Represents all errors that can occur during lexing or parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Found a character sequence that is not a token.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The text that could not be tokenized.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A bracket or function call was still open at the end of the input.
    #[error("Error on line {line}: Expected '{expected}' but reached the end of input.")]
    UnclosedBlock {
        /// The closing character that was expected.
        expected: char,
        /// The source line where the block was opened.
        line:     usize,
    },
    /// A closing bracket did not match the innermost opened block.
    #[error("Error on line {line}: Found '{found}' where '{expected}' was expected.")]
    MismatchedClosing {
        /// The closing character found.
        found:    char,
        /// The closing character that was expected.
        expected: char,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A closing bracket appeared with no block open.
    #[error("Error on line {line}: Unexpected '{found}' without a matching opening bracket.")]
    UnexpectedClosing {
        /// The closing character found.
        found: char,
        /// The source line where the error occurred.
        line:  usize,
    },
}
