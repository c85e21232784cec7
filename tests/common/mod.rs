#![allow(dead_code)]

use musket::db::group_set::GroupSet;
use musket::db::state::MusState;
use musket::structures::{Gid, Lit};

/// Builds a group set from (group id, literals) pairs.
pub fn group_set(clauses: &[(Gid, &[i32])]) -> GroupSet {
    let mut gset = GroupSet::new();
    for (gid, ints) in clauses {
        gset.add_clause(*gid, ints.iter().map(|i| Lit::from_int(*i)).collect());
    }
    gset.seal();
    gset
}

pub fn state(clauses: &[(Gid, &[i32])]) -> MusState {
    MusState::new(group_set(clauses))
}

/// The necessary group ids of a state, sorted.
pub fn necessary(state: &MusState) -> Vec<Gid> {
    state.necessary_gids().collect()
}
