//! Recognizing the linear marker annotation
//!
//! The marker is configured as a fully qualified name such as
//! `linearcheck.annotation.Linear`. The qualified spelling is always
//! recognized; the simple spelling (`Linear`) only becomes valid after
//! the unit imports the marker directly or via a star import of its
//! package.

use lc_ast::TypeRef;
use lc_intern::{Interner, Symbol};
use rustc_hash::FxHashSet;

#[derive(Debug)]
pub struct AnnotationDetector {
    qualified: Symbol,
    simple: Option<Symbol>,
    star_import: Option<Symbol>,
    recognized: FxHashSet<Symbol>,
}

impl AnnotationDetector {
    pub fn new(marker: &str, interner: &Interner) -> Self {
        let qualified = interner.intern(marker);
        let (simple, star_import) = match marker.rfind('.') {
            Some(dot) => {
                let simple = interner.intern(&marker[dot + 1..]);
                let star = interner.intern(&format!("{}.*", &marker[..dot]));
                (Some(simple), Some(star))
            }
            // An unqualified marker has no import story at all.
            None => (None, None),
        };
        let mut detector = Self { qualified, simple, star_import, recognized: FxHashSet::default() };
        detector.reset();
        detector
    }

    /// Clears import-derived state, keeping only the qualified spelling.
    /// Called at the start of every unit.
    pub fn reset(&mut self) {
        self.recognized.clear();
        self.recognized.insert(self.qualified);
    }

    /// Feeds one import path. A direct import of the marker or a star
    /// import of its package unlocks the simple spelling.
    pub fn observe_import(&mut self, path: Symbol) {
        let Some(simple) = self.simple else { return };
        if path == self.qualified || Some(path) == self.star_import {
            self.recognized.insert(simple);
        }
    }

    /// Whether any of the spelled annotation names is the marker.
    pub fn is_marked(&self, annotations: &[Symbol]) -> bool {
        annotations.iter().any(|a| self.recognized.contains(a))
    }

    /// Whether a value of type `ty` may flow into a linear position.
    /// Primitives are copied, not moved, so they are always compatible.
    pub fn is_linear_compatible(&self, ty: &TypeRef) -> bool {
        ty.is_primitive() || self.is_marked(&ty.annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "linearcheck.annotation.Linear";

    #[test]
    fn qualified_name_always_recognized() {
        let interner = Interner::new();
        let detector = AnnotationDetector::new(MARKER, &interner);
        assert!(detector.is_marked(&[interner.intern(MARKER)]));
        assert!(!detector.is_marked(&[interner.intern("Linear")]));
        assert!(!detector.is_marked(&[interner.intern("Override")]));
    }

    #[test]
    fn direct_import_unlocks_simple_name() {
        let interner = Interner::new();
        let mut detector = AnnotationDetector::new(MARKER, &interner);
        detector.observe_import(interner.intern(MARKER));
        assert!(detector.is_marked(&[interner.intern("Linear")]));
    }

    #[test]
    fn star_import_unlocks_simple_name() {
        let interner = Interner::new();
        let mut detector = AnnotationDetector::new(MARKER, &interner);
        detector.observe_import(interner.intern("linearcheck.annotation.*"));
        assert!(detector.is_marked(&[interner.intern("Linear")]));
    }

    #[test]
    fn unrelated_import_changes_nothing() {
        let interner = Interner::new();
        let mut detector = AnnotationDetector::new(MARKER, &interner);
        detector.observe_import(interner.intern("java.util.*"));
        detector.observe_import(interner.intern("linearcheck.other.Linear"));
        assert!(!detector.is_marked(&[interner.intern("Linear")]));
    }

    #[test]
    fn reset_forgets_imports() {
        let interner = Interner::new();
        let mut detector = AnnotationDetector::new(MARKER, &interner);
        detector.observe_import(interner.intern(MARKER));
        detector.reset();
        assert!(!detector.is_marked(&[interner.intern("Linear")]));
        assert!(detector.is_marked(&[interner.intern(MARKER)]));
    }

    #[test]
    fn primitives_are_linear_compatible() {
        let interner = Interner::new();
        let detector = AnnotationDetector::new(MARKER, &interner);
        let int_ty = TypeRef::primitive(interner.intern("int"));
        assert!(detector.is_linear_compatible(&int_ty));

        let plain = TypeRef::reference(interner.intern("String"));
        assert!(!detector.is_linear_compatible(&plain));

        let marked = TypeRef::reference(interner.intern("String")).annotated(interner.intern(MARKER));
        assert!(detector.is_linear_compatible(&marked));
    }
}
