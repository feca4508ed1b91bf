//! Scope stack with branch duplication and merging
//!
//! Marks live in an arena owned by the stack; scope frames map variable
//! names to mark ids. Entering a nested scope copies the *ids*, so a
//! mutation made inside the child is visible to the parent. Duplicating
//! a frame for branch analysis deep-copies the marks instead, keeping
//! alias groups intact: names that shared one mark before the copy
//! share one mark in the copy.

use crate::block::BlockKind;
use crate::mark::Mark;
use indexmap::IndexMap;
use la_arena::{Arena, Idx};
use lc_ast::TypeRef;
use lc_intern::Symbol;
use rustc_hash::FxHashMap;

pub type MarkId<M> = Idx<M>;

/// The routine a frame belongs to, carried down into nested frames so
/// return statements can see the enclosing signature.
#[derive(Debug, Clone)]
pub struct RoutineInfo {
    pub name: Symbol,
    pub return_ty: Option<TypeRef>,
}

/// One frame of the stack: the construct it was opened for and the
/// variables visible in it.
#[derive(Debug)]
pub struct Scope<M> {
    kind: BlockKind,
    vars: IndexMap<Symbol, MarkId<M>>,
    routine: Option<RoutineInfo>,
}

impl<M> Scope<M> {
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn vars(&self) -> &IndexMap<Symbol, MarkId<M>> {
        &self.vars
    }
}

#[derive(Debug)]
pub struct ScopeStack<M: Mark> {
    marks: Arena<M>,
    scopes: Vec<Scope<M>>,
}

impl<M: Mark> Default for ScopeStack<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Mark> ScopeStack<M> {
    pub fn new() -> Self {
        let root = Scope { kind: BlockKind::Root, vars: IndexMap::new(), routine: None };
        Self { marks: Arena::new(), scopes: vec![root] }
    }

    /// Number of frames on the stack, the root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current(&self) -> &Scope<M> {
        self.scopes.last().expect("the scope stack always has a root frame")
    }

    fn current_mut(&mut self) -> &mut Scope<M> {
        self.scopes.last_mut().expect("the scope stack always has a root frame")
    }

    /// Opens a nested frame. Variable ids are shared with the parent,
    /// so consuming a variable inside the child consumes it outside too.
    pub fn enter(&mut self, kind: BlockKind) {
        let current = self.current();
        let vars = current.vars.clone();
        let routine = current.routine.clone();
        self.scopes.push(Scope { kind, vars, routine });
    }

    /// Opens a method frame and records its signature for return checks.
    pub fn enter_routine(&mut self, info: RoutineInfo) {
        let vars = self.current().vars.clone();
        self.scopes.push(Scope { kind: BlockKind::Method, vars, routine: Some(info) });
    }

    /// Pushes an independent copy of the current frame for analyzing a
    /// mutually exclusive branch. Marks are deep-copied, preserving
    /// alias groups: two names that resolved to one mark still do.
    pub fn duplicate(&mut self) {
        let top = self.scopes.len() - 1;
        let (kind, routine, entries) = {
            let current = &self.scopes[top];
            let entries: Vec<_> = current.vars.iter().map(|(name, id)| (*name, *id)).collect();
            (current.kind, current.routine.clone(), entries)
        };

        let mut copied: FxHashMap<MarkId<M>, MarkId<M>> = FxHashMap::default();
        let mut vars = IndexMap::new();
        for (name, id) in entries {
            let new_id = *copied.entry(id).or_insert_with(|| {
                let mark = self.marks[id].clone();
                self.marks.alloc(mark)
            });
            vars.insert(name, new_id);
        }
        self.scopes.push(Scope { kind, vars, routine });
    }

    /// Swaps the two topmost frames, activating the detached copy.
    pub fn swap(&mut self) {
        let len = self.scopes.len();
        assert!(len >= 2, "cannot swap without two frames on the stack");
        self.scopes.swap(len - 1, len - 2);
    }

    /// Pops and returns the current frame.
    ///
    /// # Panics
    /// Panics when only the root frame is left; an unbalanced exit is a
    /// traversal bug, not an input error.
    pub fn exit(&mut self) -> Scope<M> {
        assert!(self.scopes.len() > 1, "cannot exit the root scope");
        self.scopes.pop().expect("the scope stack always has a root frame")
    }

    /// Binds `name` to a fresh mark in the current frame.
    pub fn declare(&mut self, name: Symbol, mark: M) -> MarkId<M> {
        let id = self.marks.alloc(mark);
        self.current_mut().vars.insert(name, id);
        id
    }

    /// Binds `name` to an existing mark, making it an alias.
    pub fn alias(&mut self, name: Symbol, id: MarkId<M>) {
        self.current_mut().vars.insert(name, id);
    }

    pub fn get_id(&self, name: Symbol) -> Option<MarkId<M>> {
        self.current().vars.get(&name).copied()
    }

    pub fn get(&self, name: Symbol) -> Option<&M> {
        self.get_id(name).map(|id| &self.marks[id])
    }

    pub fn mark(&self, id: MarkId<M>) -> &M {
        &self.marks[id]
    }

    pub fn mark_mut(&mut self, id: MarkId<M>) -> &mut M {
        &mut self.marks[id]
    }

    /// Whether any frame on the stack belongs to a loop.
    pub fn is_within_loop(&self) -> bool {
        self.scopes.iter().any(|scope| scope.kind.is_loop())
    }

    pub fn current_routine(&self) -> Option<&RoutineInfo> {
        self.current().routine.as_ref()
    }

    /// Folds the marks of two exited sibling frames together. Only
    /// variables present in both survive the join; `active` holds the
    /// shared ids, so merging through it updates the enclosing frame.
    pub fn merge_scopes(&mut self, active: &Scope<M>, detached: &Scope<M>) {
        for (name, id) in &active.vars {
            if let Some(other_id) = detached.vars.get(name) {
                let other = self.marks[*other_id].clone();
                self.marks[*id].merge(&other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::LinearMark;
    use lc_intern::Interner;

    #[test]
    fn nested_scopes_share_marks() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes: ScopeStack<LinearMark> = ScopeStack::new();
        scopes.declare(x, LinearMark::new(x));

        scopes.enter(BlockKind::Other);
        let id = scopes.get_id(x).expect("x is visible in the child");
        scopes.mark_mut(id).mark_used();
        scopes.exit();

        assert!(scopes.get(x).expect("x is still bound").is_used_up());
    }

    #[test]
    fn duplicated_scope_is_independent() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes: ScopeStack<LinearMark> = ScopeStack::new();
        scopes.declare(x, LinearMark::new(x));

        scopes.duplicate();
        let id = scopes.get_id(x).expect("x is visible in the copy");
        scopes.mark_mut(id).mark_used();
        scopes.exit();

        assert!(!scopes.get(x).expect("x is still bound").is_used_up());
    }

    #[test]
    fn duplicate_preserves_alias_groups() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let y = interner.intern("y");
        let mut scopes: ScopeStack<LinearMark> = ScopeStack::new();
        let id = scopes.declare(x, LinearMark::new(x));
        scopes.alias(y, id);

        scopes.duplicate();
        let copied_x = scopes.get_id(x).expect("x is visible in the copy");
        let copied_y = scopes.get_id(y).expect("y is visible in the copy");
        assert_eq!(copied_x, copied_y);
        assert_ne!(copied_x, id);
    }

    #[test]
    fn swap_activates_the_detached_copy() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes: ScopeStack<LinearMark> = ScopeStack::new();
        scopes.declare(x, LinearMark::new(x));

        scopes.duplicate();
        let copy_id = scopes.get_id(x).expect("x is visible in the copy");
        scopes.swap();
        let original_id = scopes.get_id(x).expect("x is visible in the original");
        assert_ne!(copy_id, original_id);
    }

    #[test]
    fn merge_takes_the_consumed_side() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes: ScopeStack<LinearMark> = ScopeStack::new();
        scopes.declare(x, LinearMark::new(x));

        scopes.enter(BlockKind::If);
        scopes.duplicate();
        let id = scopes.get_id(x).expect("x visible in first branch");
        scopes.mark_mut(id).mark_used();
        scopes.swap();
        let active = scopes.exit();
        let detached = scopes.exit();
        scopes.merge_scopes(&active, &detached);

        assert!(scopes.get(x).expect("x is still bound").is_used_up());
    }

    #[test]
    fn merge_with_both_branches_clean_stays_clean() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes: ScopeStack<LinearMark> = ScopeStack::new();
        scopes.declare(x, LinearMark::new(x));

        scopes.enter(BlockKind::If);
        scopes.duplicate();
        scopes.swap();
        let active = scopes.exit();
        let detached = scopes.exit();
        scopes.merge_scopes(&active, &detached);

        assert!(!scopes.get(x).expect("x is still bound").is_used_up());
    }

    #[test]
    fn is_within_loop_sees_enclosing_frames() {
        let mut scopes: ScopeStack<LinearMark> = ScopeStack::new();
        assert!(!scopes.is_within_loop());
        scopes.enter(BlockKind::WhileLoop);
        scopes.enter(BlockKind::If);
        assert!(scopes.is_within_loop());
        scopes.exit();
        scopes.exit();
        assert!(!scopes.is_within_loop());
    }

    #[test]
    #[should_panic(expected = "cannot exit the root scope")]
    fn exiting_the_root_panics() {
        let mut scopes: ScopeStack<LinearMark> = ScopeStack::new();
        scopes.exit();
    }
}
