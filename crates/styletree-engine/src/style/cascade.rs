use std::collections::BTreeMap;

use serde::Serialize;

use crate::editing::Selection;
use crate::style::{StyleMap, StyleProperty};
use crate::tree::{NodeId, Tree};

/// Value of a property across a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StyleValue {
    /// Every selected leaf agrees on this value.
    Uniform(String),
    /// Selected leaves disagree, or some set the property and some don't.
    Mixed,
}

/// Result of [`nested_style`]: one [`StyleValue`] per property seen in the range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComputedStyle(BTreeMap<StyleProperty, StyleValue>);

impl ComputedStyle {
    pub fn get(&self, prop: &StyleProperty) -> Option<&StyleValue> {
        self.0.get(prop)
    }

    /// The agreed value, or `None` if the property is mixed or absent.
    pub fn uniform(&self, prop: &StyleProperty) -> Option<&str> {
        match self.0.get(prop)? {
            StyleValue::Uniform(value) => Some(value),
            StyleValue::Mixed => None,
        }
    }

    pub fn is_mixed(&self, prop: &StyleProperty) -> bool {
        matches!(self.0.get(prop), Some(StyleValue::Mixed))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StyleProperty, &StyleValue)> {
        self.0.iter()
    }
}

impl From<&StyleMap> for ComputedStyle {
    fn from(style: &StyleMap) -> Self {
        Self(
            style
                .iter()
                .map(|(k, v)| (k.clone(), StyleValue::Uniform(v.to_string())))
                .collect(),
        )
    }
}

/// Properties set directly on `node`. Always empty for text and break leaves.
pub fn own_style(tree: &Tree, node: NodeId) -> StyleMap {
    tree.as_element(node)
        .map(|el| el.style.clone())
        .unwrap_or_default()
}

/// `node`'s own style folded over every ancestor's, from `root` down.
///
/// If `node` isn't below `root` the whole ancestor chain is used.
pub fn effective_style(tree: &Tree, node: NodeId, root: NodeId) -> StyleMap {
    let mut chain = vec![node];
    if node != root {
        for ancestor in tree.ancestors(node) {
            chain.push(ancestor);
            if ancestor == root {
                break;
            }
        }
    }
    chain
        .iter()
        .rev()
        .fold(StyleMap::new(), |acc, &n| merge_cascade(&acc, &own_style(tree, n)))
}

/// Child entries win; parent-only entries pass through.
pub fn merge_cascade(parent: &StyleMap, child: &StyleMap) -> StyleMap {
    let mut merged = parent.clone();
    merged.extend_from(child);
    merged
}

/// True if every property `child` sets already has the same value in `parent`.
pub fn is_subset_equal(parent: &StyleMap, child: &StyleMap) -> bool {
    child
        .iter()
        .all(|(prop, value)| parent.get(prop) == Some(value))
}

/// Same keys, same values.
pub fn equal_styles(a: &StyleMap, b: &StyleMap) -> bool {
    a == b
}

/// Drops entries of `own` that `inherited` already provides with the same value.
pub fn prune_redundant(own: &StyleMap, inherited: &StyleMap) -> StyleMap {
    own.iter()
        .filter(|(prop, value)| inherited.get(prop) != Some(*value))
        .collect()
}

/// Folds one more leaf style into an accumulated range style.
///
/// A property becomes [`StyleValue::Mixed`] as soon as two sides disagree,
/// including when only one side sets it.
pub fn combine(acc: &mut ComputedStyle, next: &StyleMap) {
    for (prop, value) in acc.0.iter_mut() {
        let agrees = matches!(
            (&*value, next.get(prop)),
            (StyleValue::Uniform(current), Some(incoming)) if current == incoming
        );
        if !agrees {
            *value = StyleValue::Mixed;
        }
    }
    for prop in next.keys() {
        acc.0.entry(prop.clone()).or_insert(StyleValue::Mixed);
    }
}

/// Style of everything a selection covers, with per-property mixed detection.
///
/// Carets report the effective style at the caret. Ranges seed from the first
/// selected leaf and combine every further leaf up to the end; a range with no
/// visible leaves reports the common ancestor's style.
pub fn nested_style(tree: &Tree, selection: &Selection) -> ComputedStyle {
    let root = tree.root();
    if selection.is_caret {
        return ComputedStyle::from(&effective_style(tree, selection.start.node, root));
    }

    let mut leaves = selected_leaves(tree, selection).into_iter();
    let Some(first) = leaves.next() else {
        return ComputedStyle::from(&effective_style(tree, selection.common_ancestor, root));
    };

    let mut acc = ComputedStyle::from(&effective_style(tree, first, root));
    for leaf in leaves {
        combine(&mut acc, &effective_style(tree, leaf, root));
    }
    log::trace!("nested style over {:?}: {acc:?}", selection.flat);
    acc
}

/// Non-empty text leaves that contribute at least one selected character.
fn selected_leaves(tree: &Tree, selection: &Selection) -> Vec<NodeId> {
    let (start, end) = (&selection.start, &selection.end);
    let mut leaves = Vec::new();
    let mut inside = false;
    for leaf in tree.text_leaves(selection.common_ancestor) {
        if leaf == start.node {
            inside = true;
        }
        if !inside {
            continue;
        }
        let len = tree.text_len(leaf);
        let untouched = len == 0
            || (leaf == start.node && leaf != end.node && start.offset >= len)
            || (leaf == end.node && leaf != start.node && end.offset == 0);
        if !untouched {
            leaves.push(leaf);
        }
        if leaf == end.node {
            break;
        }
    }
    leaves
}
