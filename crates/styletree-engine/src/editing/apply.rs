//! # Style Applicator
//!
//! Pushes a style patch onto every node a selection covers. Partially covered
//! text is split first so unselected characters never pick up the patch.
//!
//! For a range spanning several nodes two frontiers are walked up to the
//! common ancestor: forward from the start (styling every following sibling on
//! the way) and backward from the end (styling every preceding sibling). The
//! common ancestor's children strictly between the two branches are styled
//! whole.
//!
//! This is a pure tree mutation. Callers run the optimizer and restore the
//! selection afterwards; see [`Document::apply`](crate::editing::Document::apply).

use std::cmp::Ordering;
use std::ops::Range;

use crate::editing::position::Position;
use crate::editing::selection::{Selection, compare_positions, correct_end};
use crate::editing::split::{split_at, split_before};
use crate::error::EditError;
use crate::policy::TagPolicy;
use crate::style::StyleMap;
use crate::tree::{NodeId, NodeKind, Tree};

/// Applies `patch` to everything `selection` covers.
///
/// Returns the flat range that was styled, or `None` when nothing changed
/// (carets, empty patches, stale selections).
pub fn apply_style(
    tree: &mut Tree,
    policy: &TagPolicy,
    selection: &Selection,
    patch: &StyleMap,
) -> Option<Range<usize>> {
    if patch.is_empty() {
        return None;
    }
    if selection.is_caret {
        log::debug!("caret selection; style is left for the next typed character");
        return None;
    }
    let Some(flat) = selection.flat.clone() else {
        log::warn!("selection has no flat range; not applying style");
        return None;
    };
    let (start, end) = (selection.start, selection.end);
    if !tree.is_text(start.node) || !tree.is_text(end.node) {
        log::warn!("selection endpoints are not text; not applying style");
        return None;
    }

    if start.node == end.node {
        let target = isolate(tree, policy, start.node, start.offset, end.offset);
        style_node(tree, policy, target, patch);
        return Some(flat);
    }

    // a start sitting after its node's last char selects nothing in it
    let start = if start.offset >= tree.text_len(start.node) {
        match tree.next_text_leaf(start.node, selection.common_ancestor) {
            Some(next) => Position::new(next, 0),
            None => return None,
        }
    } else {
        start
    };
    if compare_positions(tree, start, end) != Ordering::Less {
        log::debug!("nothing left to style after skipping an exhausted start");
        return None;
    }
    let end = correct_end(tree, start, end, selection.limit_root);
    if start.node == end.node {
        let target = isolate(tree, policy, start.node, start.offset, end.offset);
        style_node(tree, policy, target, patch);
        return Some(flat);
    }

    // the moved start may share a deeper ancestor with the end
    let Some(common) = tree.common_ancestor(start.node, end.node) else {
        log::warn!("selection endpoints share no ancestor; not applying style");
        return None;
    };

    let first = split_at(tree, policy, start.node, start.offset);
    let last = if end.offset < tree.text_len(end.node) {
        split_before(tree, policy, end.node, end.offset)
    } else {
        end.node
    };

    let start_branch = walk_frontier(tree, policy, first, common, patch, Direction::Forward);
    let end_branch = walk_frontier(tree, policy, last, common, patch, Direction::Backward);

    if let (Some(from), Some(to)) = (start_branch, end_branch) {
        let between = between_siblings(tree, common, from, to);
        for node in between {
            style_node(tree, policy, node, patch);
        }
    }
    log::debug!("applied {patch} over {flat:?}");
    Some(flat)
}

/// Inserts a zero-width text node styled with `patch` at a caret, for text
/// typed next. Returns the new text node.
pub fn anchor_caret(
    tree: &mut Tree,
    policy: &TagPolicy,
    selection: &Selection,
    patch: &StyleMap,
) -> Option<NodeId> {
    if !selection.is_caret {
        return None;
    }
    try_anchor_caret(tree, policy, selection.start, patch)
        .inspect_err(|err| log::warn!("could not anchor caret style: {err}"))
        .ok()
}

fn try_anchor_caret(
    tree: &mut Tree,
    policy: &TagPolicy,
    at: Position,
    patch: &StyleMap,
) -> Result<NodeId, EditError> {
    let wrapper = tree.create_element(policy.inline_tag.clone(), patch.clone());
    let placeholder = tree.create_text("");
    tree.append(wrapper, placeholder)?;

    match tree.get(at.node) {
        Some(NodeKind::Text(text)) => {
            let len = text.chars().count();
            if at.offset == 0 {
                tree.insert_before(at.node, wrapper)?;
            } else if at.offset >= len {
                tree.insert_after(at.node, wrapper)?;
            } else {
                let suffix = split_at(tree, policy, at.node, at.offset);
                let suffix_wrapper = tree.parent(suffix).ok_or(EditError::Detached(suffix))?;
                tree.insert_before(suffix_wrapper, wrapper)?;
            }
        }
        Some(NodeKind::Element(_)) => tree.append(at.node, wrapper)?,
        Some(NodeKind::Break) => tree.insert_after(at.node, wrapper)?,
        None => return Err(EditError::UnknownNode(at.node)),
    }
    Ok(placeholder)
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Styles `from`, then climbs towards `common` styling the siblings on the
/// `direction` side at each level. Returns the child of `common` the walk
/// ended in.
fn walk_frontier(
    tree: &mut Tree,
    policy: &TagPolicy,
    from: NodeId,
    common: NodeId,
    patch: &StyleMap,
    direction: Direction,
) -> Option<NodeId> {
    style_node(tree, policy, from, patch);
    let mut cur = from;
    loop {
        let parent = tree.parent(cur)?;
        if parent == common {
            return Some(cur);
        }
        let siblings = match direction {
            Direction::Forward => tree.following_siblings(cur),
            Direction::Backward => tree.preceding_siblings(cur),
        };
        for sibling in siblings {
            style_node(tree, policy, sibling, patch);
        }
        cur = parent;
    }
}

fn between_siblings(tree: &Tree, parent: NodeId, from: NodeId, to: NodeId) -> Vec<NodeId> {
    let children = tree.children(parent);
    let (Some(a), Some(b)) = (
        children.iter().position(|&c| c == from),
        children.iter().position(|&c| c == to),
    ) else {
        return Vec::new();
    };
    if a + 1 >= b {
        return Vec::new();
    }
    children[a + 1..b].to_vec()
}

/// Cuts `from..to` of a text node out into its own node and returns it.
fn isolate(tree: &mut Tree, policy: &TagPolicy, node: NodeId, from: usize, to: usize) -> NodeId {
    let len = tree.text_len(node);
    let (mut target, mut to) = (node, to);
    if from > 0 && from < len {
        target = split_at(tree, policy, node, from);
        to = to.saturating_sub(from);
    }
    if to > 0 && to < tree.text_len(target) {
        target = split_before(tree, policy, target, to);
    }
    target
}

/// Puts `patch` on a node.
///
/// Text has no style of its own: a lone child of a style-accepting parent
/// styles the parent, anything else gets wrapped first. Breaks are skipped.
fn style_node(tree: &mut Tree, policy: &TagPolicy, node: NodeId, patch: &StyleMap) {
    let target = match tree.get(node) {
        Some(NodeKind::Element(_)) => node,
        Some(NodeKind::Text(_)) => match style_target_for_text(tree, policy, node) {
            Ok(target) => target,
            Err(err) => {
                log::warn!("cannot style {node}: {err}");
                return;
            }
        },
        Some(NodeKind::Break) | None => return,
    };
    set_style(tree, target, patch);
}

fn style_target_for_text(tree: &mut Tree, policy: &TagPolicy, node: NodeId) -> Result<NodeId, EditError> {
    let parent = tree.parent(node).ok_or(EditError::Detached(node))?;
    let lone = tree.children(parent).len() == 1;
    let accepts = tree
        .as_element(parent)
        .is_some_and(|el| policy.accepts_style(&el.tag));
    if lone && accepts {
        Ok(parent)
    } else {
        tree.wrap(node, policy.inline_tag.clone(), StyleMap::new())
    }
}

/// Sets `patch` on `target` and clears the same properties below it, so a
/// stale descendant value can't override the new one.
fn set_style(tree: &mut Tree, target: NodeId, patch: &StyleMap) {
    let below: Vec<NodeId> = tree.descendants(target).skip(1).collect();
    for node in below {
        if let Some(el) = tree.element_mut(node) {
            for prop in patch.keys() {
                el.style.remove(prop);
            }
        }
    }
    if let Some(el) = tree.element_mut(target) {
        el.style.extend_from(patch);
    }
}
