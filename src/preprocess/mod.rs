/*!
Pre-extraction simplifiers.

Both simplifiers rewrite the group set in place before the oracle is ever populated, and both support putting the instance back together for output:

- [BCP](bcp): top-level unit propagation. Satisfied clauses are removed, falsified literals are shrunk off clause tails, and a conflict is recorded in the conflict clause rather than unwound through the call stack.
- [BCE](bce): blocked-clause elimination. A clause blocked on one of its literals resolves tautologically against every partner, so dropping it preserves satisfiability.
*/

pub mod bce;
pub mod bcp;

pub use bce::BceSimplifier;
pub use bcp::BcpSimplifier;
