use crate::tree::{NodeId, NodeKind, Tree};

/// A point in the tree: a node plus a char offset into its text.
///
/// The offset only means something on text nodes. Positions are invalidated
/// by any structural edit unless re-derived from a flat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Maps a flat char index over `root`'s text to a text position.
///
/// Children with no text are never landed on. An index sitting exactly on a
/// boundary belongs to the start of the following child, except past the last
/// child where it stays at that child's end. Indices beyond the text clamp to
/// the end.
pub fn position_at(tree: &Tree, root: NodeId, flat_index: usize) -> Position {
    let mut node = root;
    let mut index = flat_index;
    loop {
        match tree.get(node) {
            Some(NodeKind::Text(text)) => {
                return Position::new(node, index.min(text.chars().count()));
            }
            Some(NodeKind::Element(_)) => {}
            Some(NodeKind::Break) | None => return Position::new(node, 0),
        }

        let spans: Vec<(NodeId, usize)> = tree
            .children(node)
            .iter()
            .map(|&child| (child, tree.text_len(child)))
            .filter(|&(_, len)| len > 0)
            .collect();
        let Some(&(last, _)) = spans.last() else {
            // nothing to descend into; only happens for a tree without text
            return Position::new(node, 0);
        };

        for &(child, len) in &spans {
            if index < len || child == last {
                node = child;
                index = index.min(len);
                break;
            }
            index -= len;
        }
    }
}

/// Flat char index of `(node, offset)` within `root`.
///
/// Returns `None` when `node` isn't below `root`.
pub fn flat_index_of(tree: &Tree, node: NodeId, offset: usize, root: NodeId) -> Option<usize> {
    if !tree.contains(node) {
        return None;
    }
    let mut index = offset;
    let mut cur = node;
    while cur != root {
        let parent = tree.parent(cur)?;
        index += tree
            .preceding_siblings(cur)
            .iter()
            .map(|&sibling| tree.text_len(sibling))
            .sum::<usize>();
        cur = parent;
    }
    Some(index)
}
