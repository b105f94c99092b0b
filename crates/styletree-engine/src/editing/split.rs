use crate::error::EditError;
use crate::policy::TagPolicy;
use crate::style::StyleMap;
use crate::tree::{NodeId, Tree};

/// Splits a text node at `offset`, moving the suffix into a new unstyled
/// wrapper right after it. Returns the suffix text node.
///
/// Splitting at either end is a no-op returning `node`. Non-text and detached
/// targets are logged and also return `node` untouched.
pub fn split_at(tree: &mut Tree, policy: &TagPolicy, node: NodeId, offset: usize) -> NodeId {
    try_split_at(tree, policy, node, offset).unwrap_or_else(|err| {
        log::warn!("split_at({node}, {offset}) skipped: {err}");
        node
    })
}

/// Mirror of [`split_at`]: the prefix moves into a new wrapper right before
/// `node`. Returns the prefix text node.
pub fn split_before(tree: &mut Tree, policy: &TagPolicy, node: NodeId, offset: usize) -> NodeId {
    try_split_before(tree, policy, node, offset).unwrap_or_else(|err| {
        log::warn!("split_before({node}, {offset}) skipped: {err}");
        node
    })
}

pub fn try_split_at(
    tree: &mut Tree,
    policy: &TagPolicy,
    node: NodeId,
    offset: usize,
) -> Result<NodeId, EditError> {
    let Some((head, tail)) = checked_halves(tree, node, offset)? else {
        return Ok(node);
    };
    let suffix = wrapped_text(tree, policy, tail)?;
    let wrapper = tree.parent(suffix).ok_or(EditError::Detached(suffix))?;
    tree.insert_after(node, wrapper)?;
    tree.set_text(node, head);
    log::debug!("split {node} at {offset}; suffix is {suffix}");
    Ok(suffix)
}

pub fn try_split_before(
    tree: &mut Tree,
    policy: &TagPolicy,
    node: NodeId,
    offset: usize,
) -> Result<NodeId, EditError> {
    let Some((head, tail)) = checked_halves(tree, node, offset)? else {
        return Ok(node);
    };
    let prefix = wrapped_text(tree, policy, head)?;
    let wrapper = tree.parent(prefix).ok_or(EditError::Detached(prefix))?;
    tree.insert_before(node, wrapper)?;
    tree.set_text(node, tail);
    log::debug!("split {node} before {offset}; prefix is {prefix}");
    Ok(prefix)
}

/// Validates the target and cuts its text, or `None` if the split would be empty.
fn checked_halves(
    tree: &Tree,
    node: NodeId,
    offset: usize,
) -> Result<Option<(String, String)>, EditError> {
    if !tree.contains(node) {
        return Err(EditError::UnknownNode(node));
    }
    let text = tree.as_text(node).ok_or(EditError::InvalidSplitTarget(node))?;
    if tree.parent(node).is_none() {
        return Err(EditError::Detached(node));
    }
    let len = text.chars().count();
    if offset == 0 || offset >= len {
        return Ok(None);
    }
    let cut = text
        .char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    Ok(Some((text[..cut].to_string(), text[cut..].to_string())))
}

/// Detached `inline_tag` wrapper holding a single new text node.
fn wrapped_text(tree: &mut Tree, policy: &TagPolicy, content: String) -> Result<NodeId, EditError> {
    let wrapper = tree.create_element(policy.inline_tag.clone(), StyleMap::new());
    let text = tree.create_text(content);
    tree.append(wrapper, text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeSpec;
    use pretty_assertions::assert_eq;

    fn single(text: &str) -> (Tree, NodeId) {
        let tree = Tree::from_spec(&NodeSpec::el("p", vec![NodeSpec::text(text)]));
        let node = tree.children(tree.root())[0];
        (tree, node)
    }

    #[test]
    fn split_at_moves_suffix_into_following_wrapper() {
        let (mut tree, node) = single("test1");
        let suffix = split_at(&mut tree, &TagPolicy::default(), node, 2);
        assert_eq!(tree.as_text(node), Some("te"));
        assert_eq!(tree.as_text(suffix), Some("st1"));
        let wrapper = tree.parent(suffix).unwrap();
        assert_eq!(tree.as_element(wrapper).unwrap().tag, "span");
        assert!(tree.as_element(wrapper).unwrap().style.is_empty());
        assert_eq!(tree.next_sibling(node), Some(wrapper));
    }

    #[test]
    fn split_before_moves_prefix_into_preceding_wrapper() {
        let (mut tree, node) = single("test2");
        let prefix = split_before(&mut tree, &TagPolicy::default(), node, 3);
        assert_eq!(tree.as_text(prefix), Some("tes"));
        assert_eq!(tree.as_text(node), Some("t2"));
        assert_eq!(tree.prev_sibling(node), tree.parent(prefix));
    }

    #[test]
    fn split_round_trips_for_every_offset() {
        let content = "héllo wörld";
        let len = content.chars().count();
        for k in 1..len {
            let (mut tree, node) = single(content);
            let suffix = split_at(&mut tree, &TagPolicy::default(), node, k);
            assert_ne!(suffix, node);
            assert_eq!(tree.as_text(node).unwrap().chars().count(), k);
            assert_eq!(tree.text(tree.root()), content, "split at {k}");

            let (mut tree, node) = single(content);
            split_before(&mut tree, &TagPolicy::default(), node, k);
            assert_eq!(tree.text(tree.root()), content, "split before {k}");
        }
    }

    #[test]
    fn split_at_edges_is_a_no_op() {
        let (mut tree, node) = single("abc");
        let before = tree.capacity();
        assert_eq!(split_at(&mut tree, &TagPolicy::default(), node, 0), node);
        assert_eq!(split_at(&mut tree, &TagPolicy::default(), node, 3), node);
        assert_eq!(split_before(&mut tree, &TagPolicy::default(), node, 3), node);
        assert_eq!(tree.capacity(), before);
        assert_eq!(tree.children(tree.root()), &[node]);
    }

    #[test]
    fn split_on_element_is_rejected_and_harmless() {
        let (mut tree, _) = single("abc");
        let root = tree.root();
        assert_eq!(
            try_split_at(&mut tree, &TagPolicy::default(), root, 1),
            Err(EditError::InvalidSplitTarget(root))
        );
        assert_eq!(split_at(&mut tree, &TagPolicy::default(), root, 1), root);
        assert_eq!(tree.text(root), "abc");
    }

    #[test]
    fn split_on_detached_text_is_a_no_op() {
        let (mut tree, _) = single("abc");
        let orphan = tree.create_text("orphan");
        assert_eq!(
            try_split_before(&mut tree, &TagPolicy::default(), orphan, 2),
            Err(EditError::Detached(orphan))
        );
        assert_eq!(split_at(&mut tree, &TagPolicy::default(), orphan, 2), orphan);
        assert_eq!(tree.as_text(orphan), Some("orphan"));
    }

    #[test]
    fn custom_inline_tag_is_used_for_wrappers() {
        let (mut tree, node) = single("abcd");
        let policy = TagPolicy {
            inline_tag: "font".into(),
            ..TagPolicy::default()
        };
        let suffix = split_at(&mut tree, &policy, node, 1);
        let wrapper = tree.parent(suffix).unwrap();
        assert_eq!(tree.as_element(wrapper).unwrap().tag, "font");
    }
}
