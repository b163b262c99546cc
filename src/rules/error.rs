use std::fmt;

/// What went wrong while compiling a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    /// A bug in the compiler.
    #[error("internal error")]
    InternalError,

    /// An escape such as `\u12` did not have the hex digits it needs.
    #[error("hex digits expected")]
    HexDigitsExpected,

    #[error("missing ';' at the end of a rule")]
    SemicolonExpected,

    /// Any other grammar violation.
    #[error("syntax error")]
    RuleSyntax,

    #[error("set is missing its closing ']'")]
    UnclosedSet,

    #[error("malformed variable assignment")]
    AssignError,

    #[error("variable redefined")]
    VariableRedefinition,

    #[error("mismatched parentheses")]
    MismatchedParentheses,

    #[error("newline inside a quoted string")]
    NewLineInQuotedString,

    #[error("undefined variable")]
    UndefinedVariable,

    /// The property data could not be used.
    #[error("initialization error")]
    InitializationError,

    #[error("empty set")]
    RuleEmptySet,

    #[error("unrecognized option")]
    UnrecognizedOption,

    /// A `{tag}` that is not a non-negative integer.
    #[error("malformed rule tag")]
    MalformedRuleTag,
}

/// Where in the rule source an error was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// The line and column, both counted from 1. Columns count UTF-16 code
    /// units.
    LineAndColumn { line: usize, column: usize },

    /// An offset in UTF-16 code units, for errors that are not tied to any
    /// one line of the source.
    Offset(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::LineAndColumn { line, column } => write!(f, "line {line}, column {column}"),
            Location::Offset(offset) => write!(f, "offset {offset}"),
        }
    }
}

/// The location of an error along with some of the source text around it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseErrorContext {
    pub location: Location,
    /// Source text just before the error.
    pub pre_context: String,
    /// The source text starting at the error.
    pub post_context: String,
}

impl ParseErrorContext {
    /// Most code units of context kept on either side of an error.
    pub const CONTEXT_LEN: usize = 15;

    pub(crate) fn at_offset(offset: usize) -> Self {
        Self {
            location: Location::Offset(offset),
            pre_context: String::new(),
            post_context: String::new(),
        }
    }
}

/// Returned when a rule set fails to compile. Only the first error is ever
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {}", .context.location)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub context: ParseErrorContext,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn location(&self) -> Location {
        self.context.location
    }
}
