use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// A line that does not follow the expected path layout.
    Parse(ParseError),
    /// IO error while reading input lines.
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<ParseError> for ReconError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

/// Why a path line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseReason {
    TooFewSegments { expected: usize, found: usize },
    EmptyEntityId,
    EmptyVersion,
    EmptyFilename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number in the input.
    pub line_number: usize,
    pub line: String,
    pub reason: ParseReason,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.line_number;
        let line = &self.line;
        match &self.reason {
            ParseReason::TooFewSegments { expected, found } => write!(
                f,
                "line {n}: expected at least {expected} '/'-separated segments, found {found}: {line:?}"
            ),
            ParseReason::EmptyEntityId => write!(f, "line {n}: empty item id: {line:?}"),
            ParseReason::EmptyVersion => write!(f, "line {n}: empty item version: {line:?}"),
            ParseReason::EmptyFilename => write!(f, "line {n}: empty filename: {line:?}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Entity-level fetch failure. Isolated to the group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError(pub String);

impl FetchError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for FetchError {}
