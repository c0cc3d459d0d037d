#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// Unrecognized stats function name
    UnknownFunction(String),

    /// A required argument was missing
    MissingArgument(String),

    /// Unexpected token found while parsing
    UnexpectedToken(String),

    /// Expected a specific keyword but found something else
    ExpectedKeyword(String, String),

    /// Input ended in the middle of an expression
    UnexpectedEnd(String),

    /// Argument is syntactically valid but not allowed in this position
    InvalidArgument(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnknownFunction(name) => write!(f, "Unknown stats function: {}", name),
            ParseError::MissingArgument(arg) => write!(f, "Missing argument: {}", arg),
            ParseError::UnexpectedToken(tok) => write!(f, "Unexpected token: {}", tok),
            ParseError::ExpectedKeyword(expected, found) => {
                write!(f, "Expected keyword '{}', but found '{}'", expected, found)
            }
            ParseError::UnexpectedEnd(ctx) => write!(f, "Unexpected end of input: {}", ctx),
            ParseError::InvalidArgument(arg) => write!(f, "Invalid argument: {}", arg),
        }
    }
}

impl std::error::Error for ParseError {}
