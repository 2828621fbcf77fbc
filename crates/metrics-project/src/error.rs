//! Error types for parsing documents and loading project files.

use thiserror::Error;

/// A parse failure. Offsets are byte positions into the input text.
///
/// Parsing is all-or-nothing: no partial tree accompanies an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input ended where a value, delimiter or closing quote was expected.
    /// Apart from a dangling backslash, end of input is always reported this way.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A character that cannot start a value.
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter { found: char, offset: usize },

    /// A specific delimiter was required (`:`, `,`, a closing bracket, a quote).
    #[error("expected '{expected}' at offset {offset}, found '{found}'")]
    ExpectedCharacter {
        expected: char,
        found: char,
        offset: usize,
    },

    /// A token starting with `t`, `f` or `n` that is not `true`, `false` or `null`.
    #[error("invalid literal at offset {offset}")]
    InvalidLiteral { offset: usize },

    /// A backslash as the last character of the input.
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    /// A numeric literal with no digits, or an integer outside the i64 range.
    #[error("invalid number '{literal}' at offset {offset}")]
    InvalidNumber { literal: String, offset: usize },

    /// Containers nested deeper than the parser's recursion limit.
    #[error("nesting too deep at offset {offset}")]
    NestingTooDeep { offset: usize },

    /// Non-whitespace after a complete top-level value.
    #[error("trailing characters at offset {offset}")]
    TrailingCharacters { offset: usize },
}

/// Errors from reading a project document.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("project parse error: {0}")]
    Parse(#[from] ParseError),

    /// The document parsed, but its root is not an object.
    #[error("invalid project file: root value is not an object")]
    NotAnObject,
}

/// Convenience alias used throughout metrics-project.
pub type Result<T> = std::result::Result<T, ProjectError>;
