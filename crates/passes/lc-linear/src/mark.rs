//! Per-variable analysis state

use lc_intern::Symbol;

/// State a scope-based pass attaches to a variable.
///
/// Marks are cloned when a scope is duplicated for branch analysis and
/// folded back together when the branches rejoin.
pub trait Mark: Clone {
    /// Folds the state of the detached sibling branch into `self`.
    ///
    /// Called once per variable when two mutually exclusive branches
    /// rejoin; the result must be the conservative combination of both.
    fn merge(&mut self, other: &Self);
}

/// Consumption state of one linear variable.
///
/// The counter is signed so that one pending use can be forgiven:
/// aliasing reads the source variable syntactically without consuming
/// it, which [`LinearMark::ignore_next_use`] expresses as a decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearMark {
    name: Symbol,
    uses: i32,
}

impl LinearMark {
    /// A fresh, unconsumed mark. `name` is the originally declared
    /// variable, kept stable across aliasing so diagnostics can report
    /// both the surface name and the origin.
    pub fn new(name: Symbol) -> Self {
        Self { name, uses: 0 }
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn mark_used(&mut self) {
        self.uses += 1;
    }

    /// Forgives the next use, neutralizing the syntactic read that an
    /// aliasing assignment performs on its right-hand side.
    pub fn ignore_next_use(&mut self) {
        self.uses -= 1;
    }

    pub fn is_used_up(&self) -> bool {
        self.uses > 0
    }
}

impl Mark for LinearMark {
    fn merge(&mut self, other: &Self) {
        // A variable consumed on either branch is consumed after the join.
        self.uses = self.uses.max(other.uses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_intern::Interner;

    #[test]
    fn fresh_mark_is_not_used_up() {
        let interner = Interner::new();
        let mark = LinearMark::new(interner.intern("x"));
        assert!(!mark.is_used_up());
    }

    #[test]
    fn single_use_consumes() {
        let interner = Interner::new();
        let mut mark = LinearMark::new(interner.intern("x"));
        mark.mark_used();
        assert!(mark.is_used_up());
    }

    #[test]
    fn ignored_use_cancels_one_read() {
        let interner = Interner::new();
        let mut mark = LinearMark::new(interner.intern("x"));
        mark.ignore_next_use();
        mark.mark_used();
        assert!(!mark.is_used_up());
        mark.mark_used();
        assert!(mark.is_used_up());
    }

    #[test]
    fn merge_keeps_the_consumed_side() {
        let interner = Interner::new();
        let mut used = LinearMark::new(interner.intern("x"));
        used.mark_used();
        let fresh = LinearMark::new(interner.intern("x"));

        let mut merged = fresh.clone();
        merged.merge(&used);
        assert!(merged.is_used_up());

        let mut merged = used;
        merged.merge(&fresh);
        assert!(merged.is_used_up());
    }
}
