/*!
Error types used in the library.

- Some of these are external --- e.g. a parse error surfaces a malformed input file to the caller.
- Others are internally expected --- e.g. an undetermined oracle outcome is used by the approximation policies to decide how to classify a group.

Names of the error enums --- for the most part --- mirror the module the error originates in.
*/

use crate::structures::Gid;

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An error related to parsing.
    Parse(ParseError),

    /// An error in the configuration.
    Config(ConfigError),

    /// An error from the oracle.
    Oracle(OracleError),

    /// An error in the extraction state.
    State(StateError),

    /// An error while writing results.
    Write(WriteError),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Oracle(e) => write!(f, "oracle error: {e}"),
            Self::State(e) => write!(f, "state error: {e}"),
            Self::Write(e) => write!(f, "write error: {e}"),
        }
    }
}

/// Errors during parsing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Some issue with the problem line of the input.
    ProblemSpecification,

    /// Some unspecific problem at a specific line.
    Line(usize),

    /// A literal outside the representable range, at a specific line.
    Literal(usize),

    /// A group label was malformed or missing, at a specific line.
    GroupLabel(usize),

    /// No file was found at the given path.
    NoFile(String),

    /// The input ended inside a clause.
    UnterminatedClause,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProblemSpecification => write!(f, "malformed problem line"),
            Self::Line(n) => write!(f, "unable to read line {n}"),
            Self::Literal(n) => write!(f, "malformed literal on line {n}"),
            Self::GroupLabel(n) => write!(f, "malformed group label on line {n}"),
            Self::NoFile(path) => write!(f, "no file at {path}"),
            Self::UnterminatedClause => write!(f, "input ended inside a clause"),
        }
    }
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Errors in the configuration, typically incompatible flag combinations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A value outside the permitted range of an option.
    OutOfRange(&'static str),

    /// The selected strategy does not support group input.
    GroupsUnsupported(&'static str),

    /// The selected strategy does not support variable-group input.
    VarGroupsUnsupported(&'static str),

    /// Two selected options cannot be combined.
    Incompatible(&'static str, &'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange(name) => write!(f, "value for {name} is out of range"),
            Self::GroupsUnsupported(what) => {
                write!(f, "{what} does not support group (GCNF) input")
            }
            Self::VarGroupsUnsupported(what) => {
                write!(f, "{what} does not support variable-group (VGCNF) input")
            }
            Self::Incompatible(a, b) => write!(f, "{a} cannot be combined with {b}"),
        }
    }
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::Config(e)
    }
}

/// Errors from the oracle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OracleError {
    /// The oracle returned an undetermined outcome where a definite one was required.
    Undetermined,

    /// An operation referred to a group the oracle does not hold.
    MissingGroup(Gid),

    /// The oracle back-end failed internally.
    Backend(String),
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undetermined => write!(f, "undetermined oracle outcome"),
            Self::MissingGroup(gid) => write!(f, "group {gid} is not in the oracle"),
            Self::Backend(msg) => write!(f, "solver back-end: {msg}"),
        }
    }
}

impl From<OracleError> for ErrorKind {
    fn from(e: OracleError) -> Self {
        ErrorKind::Oracle(e)
    }
}

/// Errors due to the extraction state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StateError {
    /// A work item was processed against a state it no longer matches.
    VersionMismatch,

    /// A check was requested for the background group.
    BackgroundGroup,

    /// The instance turned out satisfiable where unsatisfiability was required.
    Satisfiable,
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VersionMismatch => write!(f, "results computed against a stale state"),
            Self::BackgroundGroup => write!(f, "the background group cannot be checked"),
            Self::Satisfiable => write!(f, "the instance is satisfiable"),
        }
    }
}

impl From<StateError> for ErrorKind {
    fn from(e: StateError) -> Self {
        ErrorKind::State(e)
    }
}

/// Errors while writing results out.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WriteError {
    /// The output file could not be created or written.
    Io(String),
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<WriteError> for ErrorKind {
    fn from(e: WriteError) -> Self {
        ErrorKind::Write(e)
    }
}
