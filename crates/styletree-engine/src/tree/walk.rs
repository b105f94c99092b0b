use crate::tree::{NodeId, Tree};

/// Pre-order walk over a subtree, driven by an explicit stack.
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Parent chain of a node, nearest first, excluding the node itself.
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

impl Tree {
    /// `id` followed by everything below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Text leaves under `id` in document order, empty ones included.
    pub fn text_leaves(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id).filter(|&n| self.is_text(n))
    }

    /// Left-most text leaf with visible content under `id`.
    pub fn first_text_leaf(&self, id: NodeId) -> Option<NodeId> {
        self.text_leaves(id).find(|&n| self.has_content(n))
    }

    /// Right-most text leaf with visible content under `id`.
    pub fn last_text_leaf(&self, id: NodeId) -> Option<NodeId> {
        // mirror of `descendants`: children pushed in order, so the last one pops first
        let mut stack = if self.contains(id) { vec![id] } else { Vec::new() };
        while let Some(n) = stack.pop() {
            if self.has_content(n) {
                return Some(n);
            }
            stack.extend(self.children(n).iter().copied());
        }
        None
    }

    /// Nearest non-empty text leaf before `node` in document order, not leaving `within`.
    ///
    /// Walks previous siblings first, then the previous siblings of each ancestor.
    pub fn prev_text_leaf(&self, node: NodeId, within: NodeId) -> Option<NodeId> {
        let mut cur = node;
        while cur != within {
            for sibling in self.preceding_siblings(cur) {
                if let Some(leaf) = self.last_text_leaf(sibling) {
                    return Some(leaf);
                }
            }
            cur = self.parent(cur)?;
        }
        None
    }

    /// Nearest non-empty text leaf after `node` in document order, not leaving `within`.
    pub fn next_text_leaf(&self, node: NodeId, within: NodeId) -> Option<NodeId> {
        let mut cur = node;
        while cur != within {
            for sibling in self.following_siblings(cur) {
                if let Some(leaf) = self.first_text_leaf(sibling) {
                    return Some(leaf);
                }
            }
            cur = self.parent(cur)?;
        }
        None
    }

    fn has_content(&self, id: NodeId) -> bool {
        self.as_text(id).is_some_and(|text| !text.is_empty())
    }
}
