use crate::style::StyleMap;

/// Edit commands understood by [`Document::apply`](crate::editing::Document::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Style every character of the current range selection. On a caret the
    /// patch is remembered as the typing style instead.
    ApplyStyle { patch: StyleMap },
    /// Insert an empty styled anchor at the caret so text typed next picks up
    /// `patch`.
    AnchorCaretStyle { patch: StyleMap },
    /// Re-run the tree optimizer on its own.
    Optimize,
}
