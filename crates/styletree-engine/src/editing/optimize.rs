//! # Tree Optimizer
//!
//! Rebuilds a tree into its smallest equivalent form after styling has left
//! wrappers everywhere. Every character keeps its effective style; only the
//! shape changes.
//!
//! Per element, bottom-up:
//!
//! - own style is pruned of values already inherited
//! - adjacent text merges, and plain inline siblings with the same tag and
//!   effective style merge into one
//! - a break right after a plain inline element moves inside it
//! - elements left with no children disappear
//! - plain inline elements with no own style dissolve into their children
//! - a styled plain inline element wrapping other styled inline elements is
//!   pushed down: its style is folded into those children and repeated on
//!   wrappers around the rest
//!
//! Block and preserved tags are kept as they are, and blocks get their bare
//! text wrapped in the policy's inline tag. The root is only ever dropped when
//! it ends up with no children.
//!
//! The result is a fixpoint: optimizing it again changes nothing.

use crate::policy::TagPolicy;
use crate::style::{StyleMap, equal_styles, merge_cascade, prune_redundant};
use crate::tree::{NodeId, NodeKind, NodeSpec, Tree};

/// Optimized copy of `tree`, or `None` if nothing in it survived.
pub fn optimize(tree: &Tree, policy: &TagPolicy) -> Option<Tree> {
    let spec = optimize_node(tree, policy, tree.root(), &StyleMap::new())?;
    log::trace!("optimized tree: {spec:?}");
    Some(Tree::from_spec(&spec))
}

/// Optimizes the subtree under `node` into a single node, given the style
/// it inherits. The node itself is kept unless it empties out.
pub fn optimize_node(
    tree: &Tree,
    policy: &TagPolicy,
    node: NodeId,
    inherited: &StyleMap,
) -> Option<NodeSpec> {
    match tree.get(node)? {
        NodeKind::Text(text) => Some(NodeSpec::Text(text.clone())),
        NodeKind::Break => Some(NodeSpec::Break),
        NodeKind::Element(el) => {
            let own = prune_redundant(&el.style, inherited);
            let effective = merge_cascade(inherited, &own);
            let children = rewrite_children(tree, policy, node, &effective);
            if children.is_empty() {
                log::debug!("{node} has nothing left; dropping it");
                return None;
            }
            let children = if policy.is_block(&el.tag) {
                wrap_bare_text(policy, children)
            } else {
                children
            };
            Some(NodeSpec::styled(el.tag.clone(), own, children))
        }
    }
}

/// Rewrites an element into zero or more replacement nodes.
fn rewrite(tree: &Tree, policy: &TagPolicy, node: NodeId, inherited: &StyleMap) -> Vec<NodeSpec> {
    let Some(el) = tree.as_element(node) else {
        return optimize_node(tree, policy, node, inherited).into_iter().collect();
    };
    if !policy.is_plain_inline(&el.tag) {
        return optimize_node(tree, policy, node, inherited).into_iter().collect();
    }

    let own = prune_redundant(&el.style, inherited);
    let effective = merge_cascade(inherited, &own);
    let children = rewrite_children(tree, policy, node, &effective);
    if children.is_empty() {
        return Vec::new();
    }
    if own.is_empty() {
        return children;
    }
    if !children.iter().any(|child| is_plain_inline_element(policy, child)) {
        return vec![NodeSpec::styled(el.tag.clone(), own, children)];
    }

    children
        .into_iter()
        .flat_map(|child| push_down(policy, &el.tag, &own, inherited, child))
        .collect()
}

fn rewrite_children(tree: &Tree, policy: &TagPolicy, node: NodeId, effective: &StyleMap) -> Vec<NodeSpec> {
    let mut out = Vec::new();
    for &child in tree.children(node) {
        match tree.get(child) {
            Some(NodeKind::Text(text)) => out.push(NodeSpec::Text(text.clone())),
            Some(NodeKind::Break) => out.push(NodeSpec::Break),
            Some(NodeKind::Element(_)) => out.extend(rewrite(tree, policy, child, effective)),
            None => {}
        }
    }
    merge_siblings(policy, out, effective)
}

/// Moves a styled wrapper's style onto one of its children.
fn push_down(
    policy: &TagPolicy,
    tag: &str,
    own: &StyleMap,
    inherited: &StyleMap,
    child: NodeSpec,
) -> Vec<NodeSpec> {
    match child {
        NodeSpec::Break => vec![NodeSpec::Break],
        NodeSpec::Element {
            tag: child_tag,
            style,
            children,
        } if policy.is_plain_inline(&child_tag) => {
            let combined = prune_redundant(&merge_cascade(own, &style), inherited);
            if combined.is_empty() {
                children
            } else {
                vec![NodeSpec::styled(child_tag, combined, children)]
            }
        }
        other => vec![NodeSpec::styled(tag, own.clone(), vec![other])],
    }
}

/// Merges runs of siblings that render the same, in a parent whose
/// effective style is `effective`.
fn merge_siblings(policy: &TagPolicy, items: Vec<NodeSpec>, effective: &StyleMap) -> Vec<NodeSpec> {
    let mut out: Vec<NodeSpec> = Vec::with_capacity(items.len());
    for item in items {
        let rest = match out.last_mut() {
            Some(last) => absorb(policy, effective, last, item),
            None => Some(item),
        };
        if let Some(item) = rest {
            out.push(item);
        }
    }
    out
}

/// Folds `item` into `last` if they can be one node. Hands `item` back otherwise.
fn absorb(policy: &TagPolicy, effective: &StyleMap, last: &mut NodeSpec, item: NodeSpec) -> Option<NodeSpec> {
    match (last, item) {
        (NodeSpec::Text(prev), NodeSpec::Text(next)) => {
            prev.push_str(&next);
            None
        }
        (NodeSpec::Element { tag, children, .. }, NodeSpec::Break) if policy.is_plain_inline(tag) => {
            children.push(NodeSpec::Break);
            None
        }
        (
            NodeSpec::Element {
                tag,
                style,
                children,
            },
            NodeSpec::Element {
                tag: next_tag,
                style: next_style,
                children: next_children,
            },
        ) if *tag == next_tag
            && policy.is_plain_inline(&next_tag)
            && equal_styles(&merge_cascade(effective, style), &merge_cascade(effective, &next_style)) =>
        {
            let inner = merge_cascade(effective, style);
            children.extend(next_children);
            *children = merge_siblings(policy, std::mem::take(children), &inner);
            None
        }
        (_, item) => Some(item),
    }
}

fn wrap_bare_text(policy: &TagPolicy, children: Vec<NodeSpec>) -> Vec<NodeSpec> {
    children
        .into_iter()
        .map(|child| match child {
            NodeSpec::Text(_) => NodeSpec::el(policy.inline_tag.clone(), vec![child]),
            other => other,
        })
        .collect()
}

fn is_plain_inline_element(policy: &TagPolicy, spec: &NodeSpec) -> bool {
    matches!(spec, NodeSpec::Element { tag, .. } if policy.is_plain_inline(tag))
}
