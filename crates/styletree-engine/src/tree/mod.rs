//! # Document Tree
//!
//! The tree is an arena: every node lives in a slot addressed by a [`NodeId`],
//! and the parent link is just another id. Nothing owns anything through a
//! pointer, so there are no reference cycles to manage and ids stay stable
//! across splits and wraps.
//!
//! Slots are never reused. A node that is removed from the hierarchy stays in
//! the arena as a *detached* node (no parent, unreachable from the root), which
//! is how stale [`Position`](crate::editing::Position)s are detected.
//!
//! Text lengths and offsets are counted in `char`s.

mod spec;
mod walk;

pub use spec::NodeSpec;
pub use walk::{Ancestors, Descendants};

use std::fmt;

use crate::error::EditError;
use crate::style::StyleMap;

/// Stable handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A styled container.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub style: StyleMap,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Leaf holding visible text.
    Text(String),
    /// Hard line separator. Contributes no text length.
    Break,
    /// Container with its own style map.
    Element(Element),
}

#[derive(Debug, Clone)]
struct Slot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree with a single root.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Tree {
    /// Creates a tree holding a single empty root element.
    pub fn new(tag: impl Into<String>, style: StyleMap) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.create(NodeKind::Element(Element {
            tag: tag.into(),
            style,
        }));
        tree
    }

    /// Builds a tree from an owned description whose top node becomes the root.
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.create(spec.node_kind());

        let mut stack = vec![(spec, tree.root)];
        while let Some((spec, id)) = stack.pop() {
            for child in spec.children() {
                let child_id = tree.create(child.node_kind());
                tree.attach(id, child_id);
                stack.push((child, child_id));
            }
        }
        tree
    }

    /// Owned copy of the subtree under `id`.
    pub fn to_spec(&self, id: NodeId) -> Option<NodeSpec> {
        let spec = match self.get(id)? {
            NodeKind::Text(text) => NodeSpec::Text(text.clone()),
            NodeKind::Break => NodeSpec::Break,
            NodeKind::Element(el) => NodeSpec::Element {
                tag: el.tag.clone(),
                style: el.style.clone(),
                children: self
                    .children(id)
                    .iter()
                    .filter_map(|&child| self.to_spec(child))
                    .collect(),
            },
        };
        Some(spec)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of slots ever allocated, detached ones included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// True if `id` was allocated by this tree (it may still be detached).
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.slots.len()
    }

    /// True if `id` is the root or hangs below it.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.root, id)
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeKind> {
        self.slots.get(id.index()).map(|slot| &slot.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.index()).and_then(|slot| slot.parent)
    }

    /// Children in document order. Empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.index())
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.get(id), Some(NodeKind::Text(_)))
    }

    pub fn is_break(&self, id: NodeId) -> bool {
        matches!(self.get(id), Some(NodeKind::Break))
    }

    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.get(id)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_element(&self, id: NodeId) -> Option<&Element> {
        match self.get(id)? {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.slots.get_mut(id.index()).map(|slot| &mut slot.kind)? {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Replaces the content of a text node. Returns false if `id` isn't text.
    pub fn set_text(&mut self, id: NodeId, content: String) -> bool {
        match self.slots.get_mut(id.index()).map(|slot| &mut slot.kind) {
            Some(NodeKind::Text(text)) => {
                *text = content;
                true
            }
            _ => false,
        }
    }

    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.create(NodeKind::Text(content.into()))
    }

    pub fn create_break(&mut self) -> NodeId {
        self.create(NodeKind::Break)
    }

    pub fn create_element(&mut self, tag: impl Into<String>, style: StyleMap) -> NodeId {
        self.create(NodeKind::Element(Element {
            tag: tag.into(),
            style,
        }))
    }

    /// Appends a detached node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), EditError> {
        self.check_insertable(parent, child)?;
        self.attach(parent, child);
        Ok(())
    }

    /// Inserts a detached node right after `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> Result<(), EditError> {
        let (parent, index) = self.locate(anchor)?;
        self.check_insertable(parent, node)?;
        self.attach_at(parent, index + 1, node);
        Ok(())
    }

    /// Inserts a detached node right before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> Result<(), EditError> {
        let (parent, index) = self.locate(anchor)?;
        self.check_insertable(parent, node)?;
        self.attach_at(parent, index, node);
        Ok(())
    }

    /// Puts a new element where `node` is and moves `node` inside it.
    ///
    /// The wrapped node keeps its id, so positions into it stay valid.
    pub fn wrap(
        &mut self,
        node: NodeId,
        tag: impl Into<String>,
        style: StyleMap,
    ) -> Result<NodeId, EditError> {
        let (parent, index) = self.locate(node)?;
        let wrapper = self.create_element(tag, style);
        self.slots[parent.index()].children[index] = wrapper;
        self.slots[wrapper.index()].parent = Some(parent);
        self.slots[node.index()].parent = Some(wrapper);
        self.slots[wrapper.index()].children.push(node);
        Ok(wrapper)
    }

    /// Unlinks `node` from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, node: NodeId) -> Result<(), EditError> {
        let (parent, index) = self.locate(node)?;
        self.slots[parent.index()].children.remove(index);
        self.slots[node.index()].parent = None;
        Ok(())
    }

    /// Position of `node` among its parent's children.
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Siblings after `node`, in document order.
    pub fn following_siblings(&self, node: NodeId) -> Vec<NodeId> {
        match (self.parent(node), self.index_in_parent(node)) {
            (Some(parent), Some(index)) => self.children(parent)[index + 1..].to_vec(),
            _ => Vec::new(),
        }
    }

    /// Siblings before `node`, nearest first.
    pub fn preceding_siblings(&self, node: NodeId) -> Vec<NodeId> {
        match (self.parent(node), self.index_in_parent(node)) {
            (Some(parent), Some(index)) => {
                self.children(parent)[..index].iter().rev().copied().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Total text length of the subtree under `id`.
    pub fn text_len(&self, id: NodeId) -> usize {
        self.descendants(id)
            .filter_map(|n| self.as_text(n))
            .map(|text| text.chars().count())
            .sum()
    }

    /// Concatenated visible text of the subtree under `id`.
    pub fn text(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| self.as_text(n))
            .collect()
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Chain from `root` down to `node`, both inclusive, or `None` if `node`
    /// isn't below `root`.
    pub fn path_from(&self, root: NodeId, node: NodeId) -> Option<Vec<NodeId>> {
        if !self.contains(node) {
            return None;
        }
        let mut path = vec![node];
        if node != root {
            for ancestor in self.ancestors(node) {
                path.push(ancestor);
                if ancestor == root {
                    break;
                }
            }
            if path.last() != Some(&root) {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }

    /// Deepest node that is an inclusive ancestor of both `a` and `b`.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let path_a = self.path_from(self.root, a)?;
        let path_b = self.path_from(self.root, b)?;
        path_a
            .iter()
            .zip(path_b.iter())
            .take_while(|(x, y)| x == y)
            .map(|(x, _)| *x)
            .last()
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let index = self.slots[parent.index()].children.len();
        self.attach_at(parent, index, child);
    }

    fn attach_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.slots[parent.index()].children.insert(index, child);
        self.slots[child.index()].parent = Some(parent);
    }

    fn locate(&self, node: NodeId) -> Result<(NodeId, usize), EditError> {
        if !self.contains(node) {
            return Err(EditError::UnknownNode(node));
        }
        let parent = self.parent(node).ok_or(EditError::Detached(node))?;
        let index = self
            .index_in_parent(node)
            .ok_or(EditError::Detached(node))?;
        Ok((parent, index))
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), EditError> {
        if !self.contains(child) {
            return Err(EditError::UnknownNode(child));
        }
        if self.as_element(parent).is_none() {
            return Err(EditError::UnknownNode(parent));
        }
        // a child that is already linked, or the root itself, would create a second owner
        if self.parent(child).is_some() || child == self.root {
            return Err(EditError::Detached(child));
        }
        // inserting an ancestor below itself would form a cycle
        if self.is_inclusive_ancestor(child, parent) {
            return Err(EditError::Detached(child));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Tree {
        Tree::from_spec(&NodeSpec::el(
            "span",
            vec![
                NodeSpec::styled(
                    "span",
                    StyleMap::from([("font-weight", "bold")]),
                    vec![NodeSpec::text("test1")],
                ),
                NodeSpec::text("test2"),
            ],
        ))
    }

    #[test]
    fn from_spec_preserves_order_and_parents() {
        let tree = sample();
        let root = tree.root();
        let kids = tree.children(root).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(tree.parent(kids[0]), Some(root));
        assert_eq!(tree.as_text(kids[1]), Some("test2"));
        let inner = tree.children(kids[0])[0];
        assert_eq!(tree.as_text(inner), Some("test1"));
        assert_eq!(tree.text(root), "test1test2");
        assert_eq!(tree.text_len(root), 10);
    }

    #[test]
    fn to_spec_round_trips() {
        let spec = NodeSpec::el(
            "p",
            vec![NodeSpec::text("a"), NodeSpec::Break, NodeSpec::text("b")],
        );
        let tree = Tree::from_spec(&spec);
        assert_eq!(tree.to_spec(tree.root()), Some(spec));
    }

    #[test]
    fn text_len_counts_chars_not_bytes() {
        let tree = Tree::from_spec(&NodeSpec::el("span", vec![NodeSpec::text("héllo→")]));
        assert_eq!(tree.text_len(tree.root()), 6);
    }

    #[test]
    fn insert_after_and_before() {
        let mut tree = sample();
        let first = tree.children(tree.root())[0];
        let second = tree.children(tree.root())[1];
        let after = tree.create_text("!");
        let before = tree.create_break();
        tree.insert_after(second, after).unwrap();
        tree.insert_before(second, before).unwrap();
        assert_eq!(tree.children(tree.root()).to_vec(), vec![first, before, second, after]);
        assert_eq!(tree.prev_sibling(second), Some(before));
        assert_eq!(tree.next_sibling(second), Some(after));
        assert_eq!(tree.next_sibling(after), None);
    }

    #[test]
    fn insert_next_to_root_is_detached_error() {
        let mut tree = sample();
        let node = tree.create_text("x");
        let root = tree.root();
        assert_eq!(tree.insert_after(root, node), Err(EditError::Detached(root)));
    }

    #[test]
    fn append_rejects_linked_child() {
        let mut tree = sample();
        let root = tree.root();
        let linked = tree.children(root)[1];
        assert_eq!(tree.append(root, linked), Err(EditError::Detached(linked)));
    }

    #[test]
    fn append_rejects_cycles() {
        let mut tree = sample();
        let orphan = tree.create_element("span", StyleMap::new());
        let leaf = tree.create_text("x");
        tree.append(orphan, leaf).unwrap();
        // leaf is linked now, and orphan can't go below its own child
        assert!(tree.append(leaf, orphan).is_err());
    }

    #[test]
    fn wrap_keeps_wrapped_id() {
        let mut tree = sample();
        let text = tree.children(tree.root())[1];
        let wrapper = tree
            .wrap(text, "em", StyleMap::from([("font-style", "italic")]))
            .unwrap();
        assert_eq!(tree.children(tree.root())[1], wrapper);
        assert_eq!(tree.parent(text), Some(wrapper));
        assert_eq!(tree.children(wrapper), &[text]);
        assert_eq!(tree.text(tree.root()), "test1test2");
    }

    #[test]
    fn detach_leaves_node_in_arena() {
        let mut tree = sample();
        let text = tree.children(tree.root())[1];
        tree.detach(text).unwrap();
        assert!(tree.contains(text));
        assert!(!tree.is_attached(text));
        assert_eq!(tree.text(tree.root()), "test1");
        assert_eq!(tree.detach(text), Err(EditError::Detached(text)));
    }

    #[test]
    fn path_and_common_ancestor() {
        let tree = sample();
        let root = tree.root();
        let bold = tree.children(root)[0];
        let t1 = tree.children(bold)[0];
        let t2 = tree.children(root)[1];
        assert_eq!(tree.path_from(root, t1), Some(vec![root, bold, t1]));
        assert_eq!(tree.path_from(bold, t2), None);
        assert_eq!(tree.common_ancestor(t1, t2), Some(root));
        assert_eq!(tree.common_ancestor(t1, t1), Some(t1));
        assert_eq!(tree.common_ancestor(t1, bold), Some(bold));
    }

    #[test]
    fn following_and_preceding_siblings() {
        let tree = Tree::from_spec(&NodeSpec::el(
            "span",
            vec![NodeSpec::text("a"), NodeSpec::text("b"), NodeSpec::text("c")],
        ));
        let kids = tree.children(tree.root()).to_vec();
        assert_eq!(tree.following_siblings(kids[0]), vec![kids[1], kids[2]]);
        assert_eq!(tree.preceding_siblings(kids[2]), vec![kids[1], kids[0]]);
        assert!(tree.following_siblings(tree.root()).is_empty());
    }
}
