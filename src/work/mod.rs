/*!
Work items: passive records describing one unit of work.

Fields split into *parameters*, set by the scheduler or strategy, and *results*, filled by whichever worker processes the item.
Items are reset and reused across iterations to amortise allocation.

An incomplete item after processing means the worker could not reach a verdict --- e.g. the status of the group was already known, or the oracle returned an undetermined outcome --- and the strategy decides how to proceed.
*/

mod check;
pub use check::{
    CheckGroupStatus, CheckGroupStatusChunk, CheckRangeStatus, CheckSubsetStatus, CheckUnsat,
    TrimGroupSet,
};

mod rotate;
pub use rotate::RotateModel;

mod simplify;
pub use simplify::{BcpVarData, SimplifyBce, SimplifyBcp};

/// Completion tracking shared by every work item.
pub trait WorkItem {
    /// True when a worker has filled the results.
    fn completed(&self) -> bool;

    /// Marks the item complete.
    fn set_completed(&mut self);

    /// Returns the item to its initial state for reuse.
    fn reset(&mut self);
}
