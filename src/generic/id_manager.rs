//! A monotonic allocator of variable identifiers.
//!
//! The problem variables of an instance occupy a prefix of the identifier space.
//! Everything allocated afterwards --- activation variables, auxiliaries for negation encodings --- is taken from here, one identifier at a time.
//! Identifiers are never recycled while the manager is alive.

use crate::structures::Var;

/// Hands out fresh variable identifiers above a registered maximum.
#[derive(Clone, Debug, Default)]
pub struct IdManager {
    top: Var,
}

impl IdManager {
    /// A manager whose fresh identifiers start above `max_used`.
    pub fn new(max_used: Var) -> Self {
        IdManager { top: max_used }
    }

    /// Registers `var` as used, if it is above everything seen so far.
    pub fn register(&mut self, var: Var) {
        if var > self.top {
            self.top = var;
        }
    }

    /// A fresh identifier, strictly above every registered or allocated one.
    pub fn fresh(&mut self) -> Var {
        self.top += 1;
        self.top
    }

    /// The largest identifier registered or allocated.
    pub fn top(&self) -> Var {
        self.top
    }
}

#[cfg(test)]
mod id_tests {
    use super::*;

    #[test]
    fn fresh_above_registered() {
        let mut imgr = IdManager::new(5);
        assert_eq!(imgr.fresh(), 6);
        imgr.register(10);
        assert_eq!(imgr.fresh(), 11);
        imgr.register(3);
        assert_eq!(imgr.fresh(), 12);
    }
}
