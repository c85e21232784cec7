/*!
A library for extracting minimal unsatisfiable subformulas from boolean formulas written in conjunctive normal form.

musket takes an unsatisfiable formula whose clauses are partitioned into labelled *groups* and computes a sub-partition which is unsatisfiable and becomes satisfiable as soon as any single group is dropped --- a group-MUS.
Plain CNF input is the special case in which every clause is its own group.
A distinguished *background* group (group 0) is kept in every result and is never a candidate for removal.

# Orientation

The library is designed around a handful of cooperating parts:

- A [group set](crate::db::group_set) stores the clauses, their group structure, and occurrence lists.
- The [extraction state](crate::db::state) records the classification of every group as the computation proceeds.
- An incremental SAT [oracle](crate::oracle) answers satisfiability queries over subsets of groups, toggled through per-group activation literals.
- The [checker](crate::checker) turns [work items](crate::work) into oracle calls, keeps the oracle synchronised with the extraction state, and refines UNSAT cores into bulk removals.
- [Model rotation](crate::rotation) turns a single satisfying assignment into further necessary groups without touching the oracle.
- The [strategies](crate::strategies) drive the main loop: deletion, insertion, dichotomic, progression, chunked, subset-based, and an abstraction-refinement variant.

The [extractor](crate::extractor) ties these together, and the [builder](crate::builder) reads the supported input formats.

# Example

```rust
use musket::builder;
use musket::config::Config;
use musket::db::state::MusState;
use musket::extractor::MusExtractor;

let dimacs = b"
p cnf 2 4
 1  2 0
 1 -2 0
-1  2 0
-1 -2 0
";

let gset = builder::dimacs::read_cnf(&dimacs[..]).unwrap();
let mut state = MusState::new(gset);

let mut extractor = MusExtractor::new(Config::default());
let outcome = extractor.process(&mut state).unwrap();

assert!(outcome.is_unsat());
// The four clauses form a minimal unsatisfiable set already.
assert_eq!(state.necessary_gids().count(), 4);
```

# Logs

Calls to [log!](log) are made throughout the library, and a set of targets is defined to narrow output to one subsystem.
No logger is installed by the library; the bundled CLI uses [env_logger](https://docs.rs/env_logger/latest/env_logger/), so for example `RUST_LOG=checker …` follows the SAT-check worker only.
The targets are listed in [misc::log].
*/

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::single_match)]
#![allow(clippy::too_many_arguments)]

pub mod builder;
pub mod checker;
pub mod config;
pub mod db;
pub mod extractor;
pub mod generic;
pub mod misc;
pub mod oracle;
pub mod preprocess;
pub mod reports;
pub mod rotation;
pub mod schedule;
pub mod strategies;
pub mod structures;
pub mod types;
pub mod verify;
pub mod work;
