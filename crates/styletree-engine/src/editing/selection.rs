//! # Selection Resolver
//!
//! Turns two raw endpoints, as reported by whatever surface the user is
//! interacting with, into a canonical [`Selection`]:
//!
//! 1. endpoints on elements or breaks are moved onto text
//! 2. endpoints are ordered by document position
//! 3. endpoints outside the limit root are clamped onto its first/last text
//! 4. an end sitting at offset 0 is moved back to the end of the previous text
//! 5. common ancestor, caret flag and flat indices are derived
//!
//! Step 4 matters for styling: "offset 0 of the next node" and "end of the
//! previous node" are the same flat point, but only the latter keeps a trailing
//! boundary from dragging the next segment into the range.

use std::cmp::Ordering;
use std::ops::Range;

use crate::editing::position::{Position, flat_index_of, position_at};
use crate::tree::{NodeId, NodeKind, Tree};

/// Raw endpoints in the order the user produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSelection {
    pub anchor: Position,
    pub focus: Position,
}

impl RawSelection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(at: Position) -> Self {
        Self::new(at, at)
    }
}

/// Canonical, ordered selection over a limit root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    /// Deepest node containing both endpoints (may be one of them).
    pub common_ancestor: NodeId,
    /// Subtree the flat indices are measured in.
    pub limit_root: NodeId,
    /// Flat char range over `limit_root`. `None` for carets.
    pub flat: Option<Range<usize>>,
    pub is_caret: bool,
}

impl Selection {
    /// Builds a selection from already ordered text positions.
    pub(crate) fn from_ordered(tree: &Tree, start: Position, end: Position, limit_root: NodeId) -> Self {
        let common_ancestor = tree
            .common_ancestor(start.node, end.node)
            .unwrap_or(limit_root);
        let is_caret = start == end;
        let flat = if is_caret {
            None
        } else {
            match (
                flat_index_of(tree, start.node, start.offset, limit_root),
                flat_index_of(tree, end.node, end.offset, limit_root),
            ) {
                (Some(s), Some(e)) => Some(s..e),
                _ => None,
            }
        };
        Self {
            start,
            end,
            common_ancestor,
            limit_root,
            flat,
            is_caret,
        }
    }

    pub fn start_flat_index(&self) -> Option<usize> {
        self.flat.as_ref().map(|r| r.start)
    }

    pub fn end_flat_index(&self) -> Option<usize> {
        self.flat.as_ref().map(|r| r.end)
    }

    /// True if both endpoints sit in the same node.
    pub fn is_single_node(&self) -> bool {
        self.start.node == self.end.node
    }
}

/// Resolves a possibly absent raw selection. `None` in, `None` out.
pub fn resolve_raw(tree: &Tree, raw: Option<RawSelection>, limit_root: NodeId) -> Option<Selection> {
    let Some(raw) = raw else {
        log::debug!("no selection endpoints");
        return None;
    };
    resolve_selection(tree, raw.anchor, raw.focus, limit_root)
}

/// Orders, clamps and corrects two raw endpoints into a [`Selection`].
///
/// Returns `None` when the range doesn't touch `limit_root` at all.
pub fn resolve_selection(
    tree: &Tree,
    anchor: Position,
    focus: Position,
    limit_root: NodeId,
) -> Option<Selection> {
    if !tree.contains(limit_root) {
        log::warn!("selection limit {limit_root} is not part of the tree");
        return None;
    }
    let anchor = normalize_endpoint(tree, anchor);
    let focus = normalize_endpoint(tree, focus);

    let reversed = compare_positions(tree, anchor, focus) == Ordering::Greater;
    let (mut start, mut end) = if reversed {
        (focus, anchor)
    } else {
        (anchor, focus)
    };

    if !tree.is_inclusive_ancestor(limit_root, start.node) {
        if side_of_limit(tree, start, limit_root) == Ordering::Greater {
            log::debug!("selection starts after {limit_root}; nothing selected");
            return None;
        }
        start = leftmost(tree, limit_root);
    }
    if !tree.is_inclusive_ancestor(limit_root, end.node) {
        if side_of_limit(tree, end, limit_root) == Ordering::Less {
            log::debug!("selection ends before {limit_root}; nothing selected");
            return None;
        }
        end = rightmost(tree, limit_root);
    }

    let end = correct_end(tree, start, end, limit_root);
    let selection = Selection::from_ordered(tree, start, end, limit_root);
    log::trace!(
        "resolved selection {:?}..{:?} (reversed: {reversed}, flat: {:?})",
        selection.start,
        selection.end,
        selection.flat
    );
    Some(selection)
}

/// Moves an end at offset 0 back onto the end of the previous non-empty text.
///
/// Never moves the end before `start` and never leaves `limit_root`.
pub fn correct_end(tree: &Tree, start: Position, end: Position, limit_root: NodeId) -> Position {
    if end.offset != 0 || end == start || !tree.is_text(end.node) {
        return end;
    }
    let Some(leaf) = tree.prev_text_leaf(end.node, limit_root) else {
        return end;
    };
    let corrected = Position::new(leaf, tree.text_len(leaf));
    if compare_positions(tree, corrected, start) == Ordering::Less {
        return end;
    }
    corrected
}

/// Document-order comparison of two positions.
///
/// Positions on the same node compare by offset. An element position compares
/// against its descendants by treating the offset as a child index. Positions
/// that aren't both attached compare equal.
pub fn compare_positions(tree: &Tree, a: Position, b: Position) -> Ordering {
    if a.node == b.node {
        return a.offset.cmp(&b.offset);
    }
    let root = tree.root();
    let (Some(path_a), Some(path_b)) = (tree.path_from(root, a.node), tree.path_from(root, b.node))
    else {
        return Ordering::Equal;
    };
    let shared = path_a
        .iter()
        .zip(path_b.iter())
        .take_while(|(x, y)| x == y)
        .count();

    match (path_a.get(shared), path_b.get(shared)) {
        (Some(&x), Some(&y)) => {
            let ix = tree.index_in_parent(x).unwrap_or(0);
            let iy = tree.index_in_parent(y).unwrap_or(0);
            ix.cmp(&iy)
        }
        // a is an ancestor of b
        (None, Some(&y)) => {
            let iy = tree.index_in_parent(y).unwrap_or(0);
            if a.offset <= iy {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        // b is an ancestor of a
        (Some(&x), None) => {
            let ix = tree.index_in_parent(x).unwrap_or(0);
            if b.offset <= ix {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (None, None) => Ordering::Equal,
    }
}

/// Whether an endpoint outside `limit` lies before it (`Less`), after it
/// (`Greater`), or can't be placed (`Equal`).
fn side_of_limit(tree: &Tree, pos: Position, limit: NodeId) -> Ordering {
    if !tree.is_attached(pos.node) || !tree.is_attached(limit) {
        return Ordering::Equal;
    }
    if tree.is_inclusive_ancestor(pos.node, limit) {
        // enclosing element position: compare its child index with the limit's branch
        let branch = tree
            .path_from(pos.node, limit)
            .and_then(|path| path.get(1).copied());
        return match branch.and_then(|b| tree.index_in_parent(b)) {
            Some(index) if pos.offset <= index => Ordering::Less,
            Some(_) => Ordering::Greater,
            None => Ordering::Equal,
        };
    }
    compare_positions(tree, pos, Position::new(limit, 0))
}

fn leftmost(tree: &Tree, limit: NodeId) -> Position {
    match tree.first_text_leaf(limit) {
        Some(leaf) => Position::new(leaf, 0),
        None => Position::new(limit, 0),
    }
}

fn rightmost(tree: &Tree, limit: NodeId) -> Position {
    match tree.last_text_leaf(limit) {
        Some(leaf) => Position::new(leaf, tree.text_len(leaf)),
        None => Position::new(limit, 0),
    }
}

/// Moves element and break endpoints onto text.
///
/// An element endpoint's offset is a child index; a break endpoint sits just
/// before the break.
fn normalize_endpoint(tree: &Tree, pos: Position) -> Position {
    match tree.get(pos.node) {
        Some(NodeKind::Text(text)) => Position::new(pos.node, pos.offset.min(text.chars().count())),
        Some(NodeKind::Element(_)) => {
            let children = tree.children(pos.node);
            let before: usize = children
                .iter()
                .take(pos.offset)
                .map(|&c| tree.text_len(c))
                .sum();
            let landed = position_at(tree, pos.node, before);
            if tree.is_text(landed.node) {
                landed
            } else {
                pos
            }
        }
        Some(NodeKind::Break) => match (tree.parent(pos.node), tree.index_in_parent(pos.node)) {
            (Some(parent), Some(index)) => normalize_endpoint(tree, Position::new(parent, index)),
            _ => pos,
        },
        None => pos,
    }
}
