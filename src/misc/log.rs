/*!
Miscellaneous items related to [logging](log).

Calls to the log macros are made throughout the library.
These are intended to provide useful information when extending the library or chasing an issue.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to the [oracle](crate::oracle).
    pub const ORACLE: &str = "oracle";

    /// Logs related to [oracle synchronisation](crate::checker).
    pub const SYNC: &str = "sync";

    /// Logs related to the [SAT-check worker](crate::checker).
    pub const CHECKER: &str = "checker";

    /// Logs related to [refinement](crate::checker).
    pub const REFINE: &str = "refine";

    /// Logs related to [model rotation](crate::rotation).
    pub const ROTATION: &str = "rotation";

    /// Logs related to [group scheduling](crate::schedule).
    pub const SCHEDULE: &str = "schedule";

    /// Logs related to the [extraction strategies](crate::strategies).
    pub const STRATEGY: &str = "strategy";

    /// Logs related to [preprocessing](crate::preprocess).
    pub const PREPROCESSING: &str = "preprocessing";

    /// Logs related to [trimming](crate::checker).
    pub const TRIM: &str = "trim";

    /// Logs related to [parsing](crate::builder).
    pub const PARSER: &str = "parser";
}
