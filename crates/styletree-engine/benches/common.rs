// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use styletree_engine::{NodeSpec, StyleMap};

/// `paragraphs` paragraphs, each holding `depth` levels of alternating
/// bold/normal wrappers around short text runs.
#[allow(dead_code)]
pub fn generate_styled_tree(paragraphs: usize, depth: usize) -> NodeSpec {
    let blocks = (0..paragraphs)
        .map(|i| NodeSpec::el("p", vec![nested_runs(i, depth)]))
        .collect();
    NodeSpec::el("div", blocks)
}

#[allow(dead_code)]
fn nested_runs(seed: usize, depth: usize) -> NodeSpec {
    let weight = if (seed + depth) % 2 == 0 { "bold" } else { "normal" };
    let mut children = vec![NodeSpec::text(format!("run {seed}.{depth} "))];
    if depth > 0 {
        children.push(nested_runs(seed, depth - 1));
        children.push(NodeSpec::Break);
        children.push(NodeSpec::text("tail "));
    }
    NodeSpec::styled("span", StyleMap::from([("font-weight", weight)]), children)
}
