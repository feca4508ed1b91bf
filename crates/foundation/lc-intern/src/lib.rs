//! String interning for identifiers, type names and annotation names

pub use lasso::Spur as Symbol;
use lasso::ThreadedRodeo;

/// String interner.
///
/// Interns through `&self`, so one interner can be shared freely between
/// the tree builder and the passes reading it.
#[derive(Debug)]
pub struct Interner {
    rodeo: ThreadedRodeo,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    pub fn intern(&self, text: &str) -> Symbol {
        self.rodeo.get_or_intern(text)
    }

    /// Looks up a symbol without interning
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.rodeo.get(text)
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        self.rodeo.resolve(&sym)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let interner = Interner::new();
        let first = interner.intern("x");
        let second = interner.intern("x");
        assert_eq!(first, second);
        assert_eq!(interner.resolve(first), "x");
    }

    #[test]
    fn distinct_strings_get_distinct_symbols() {
        let interner = Interner::new();
        assert_ne!(interner.intern("x"), interner.intern("y"));
        assert_eq!(interner.get("z"), None);
    }
}
