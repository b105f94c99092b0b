//! Human-readable dumps of a tree, for snapshot tests and debug logging.

use crate::style::{StyleMap, effective_style};
use crate::tree::{NodeId, NodeKind, Tree};

/// Indented outline of the whole tree, one node per line.
///
/// ```text
/// span
///   span {font-weight: bold}
///     "te"
///   <br>
/// ```
pub fn format_tree(tree: &Tree) -> String {
    let mut lines = Vec::new();
    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        match tree.get(node) {
            Some(NodeKind::Text(text)) => lines.push(format!("{indent}{text:?}")),
            Some(NodeKind::Break) => lines.push(format!("{indent}<br>")),
            Some(NodeKind::Element(el)) if el.style.is_empty() => lines.push(format!("{indent}{}", el.tag)),
            Some(NodeKind::Element(el)) => lines.push(format!("{indent}{} {{{}}}", el.tag, el.style)),
            None => continue,
        }
        for &child in tree.children(node).iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    lines.join("\n")
}

/// Text paired with its effective style, adjacent equal styles merged.
///
/// Two trees that render the same produce the same runs. Breaks carry no
/// style and are left out.
pub fn styled_runs(tree: &Tree) -> Vec<(String, StyleMap)> {
    let root = tree.root();
    let mut runs: Vec<(String, StyleMap)> = Vec::new();
    let leaves: Vec<NodeId> = tree.text_leaves(root).collect();
    for leaf in leaves {
        let Some(text) = tree.as_text(leaf).filter(|t| !t.is_empty()) else {
            continue;
        };
        let style = effective_style(tree, leaf, root);
        match runs.last_mut() {
            Some((run, run_style)) if *run_style == style => run.push_str(text),
            _ => runs.push((text.to_string(), style)),
        }
    }
    runs
}
