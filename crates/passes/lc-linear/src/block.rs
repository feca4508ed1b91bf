//! Block classification for scope bookkeeping

/// What kind of syntactic construct a scope frame was opened for.
///
/// Most of the checker only cares whether a frame belongs to a loop,
/// but keeping the full classification around makes scope dumps and
/// assertion messages legible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// The synthetic bottom frame that is never exited
    Root,
    Class,
    Method,
    If,
    ForLoop,
    WhileLoop,
    Switch,
    SwitchCase,
    Synchronized,
    /// Plain blocks, try/catch/finally and anything else without
    /// special control-flow meaning
    Other,
}

impl BlockKind {
    pub fn is_loop(self) -> bool {
        matches!(self, BlockKind::ForLoop | BlockKind::WhileLoop)
    }
}
