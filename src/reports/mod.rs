/*!
Reports and result writers.
*/

pub mod write;

/// High-level report on an extraction.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The instance is unsatisfiable and a (group-)MUS, or an over-approximation of one, was produced.
    Unsatisfiable,

    /// The instance turned out satisfiable.
    Satisfiable,

    /// No verdict was reached.
    Unknown,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Satisfiable => write!(f, "SATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
