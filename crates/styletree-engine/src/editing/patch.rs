use std::ops::Range;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Flat char ranges whose styling or structure changed. A placeholder
    /// inserted at a caret shows up as an empty range.
    pub changed: Vec<Range<usize>>,
    /// Selection after the edit, as a flat char range. Carets are empty ranges.
    pub new_selection: Option<Range<usize>>,
    pub version: u64,
}

impl Patch {
    /// True when the command left the tree untouched.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}
