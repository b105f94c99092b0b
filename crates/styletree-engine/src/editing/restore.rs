use crate::editing::position::position_at;
use crate::editing::selection::{Selection, correct_end};
use crate::tree::{NodeId, Tree};

/// Rebuilds a selection from flat indices after the tree was restructured.
///
/// Flat indices survive any rewrite that keeps the text, so this is how a
/// selection outlives splitting and optimizing. The end gets the same
/// offset-0 correction as a freshly resolved selection. Reversed indices are
/// swapped.
pub fn restore(tree: &Tree, limit_root: NodeId, start_flat: usize, end_flat: usize) -> Selection {
    let (lo, hi) = if start_flat <= end_flat {
        (start_flat, end_flat)
    } else {
        (end_flat, start_flat)
    };
    let start = position_at(tree, limit_root, lo);
    let end = position_at(tree, limit_root, hi);
    let end = correct_end(tree, start, end, limit_root);
    Selection::from_ordered(tree, start, end, limit_root)
}
