use pretty_assertions::assert_eq;
use styletree_engine::editing::{flat_index_of, optimize, position_at};
use styletree_engine::outline::styled_runs;
use styletree_engine::style::merge_cascade;
use styletree_engine::{
    Cmd, Document, NodeSpec, Position, StyleMap, StyleProperty, StyleValue, TagPolicy, Tree, format_tree,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn style(pairs: &[(&str, &str)]) -> StyleMap {
    pairs.iter().copied().collect()
}

/// One effective style per visible char.
fn per_char(tree: &Tree) -> Vec<StyleMap> {
    styled_runs(tree)
        .into_iter()
        .flat_map(|(text, style)| std::iter::repeat_n(style, text.chars().count()))
        .collect()
}

fn select_flat(doc: &mut Document, start: usize, end: usize) {
    let root = doc.tree().root();
    let anchor = position_at(doc.tree(), root, start);
    let focus = position_at(doc.tree(), root, end);
    doc.select(anchor, focus);
}

fn mixed_tree() -> NodeSpec {
    NodeSpec::el(
        "div",
        vec![
            NodeSpec::el(
                "p",
                vec![
                    NodeSpec::text("ab"),
                    NodeSpec::styled(
                        "span",
                        style(&[("font-weight", "bold")]),
                        vec![
                            NodeSpec::text("cd"),
                            NodeSpec::styled("em", style(&[("font-style", "italic")]), vec![NodeSpec::text("ef")]),
                        ],
                    ),
                    NodeSpec::Break,
                    NodeSpec::text("gh"),
                ],
            ),
            NodeSpec::el(
                "p",
                vec![
                    NodeSpec::el("a", vec![NodeSpec::text("ij")]),
                    NodeSpec::styled("span", style(&[("color", "red")]), vec![NodeSpec::text("kl")]),
                ],
            ),
        ],
    )
}

#[test]
fn bold_fragment_is_normalised_and_merged() {
    init_logging();
    let mut doc = Document::from_spec(&NodeSpec::el(
        "span",
        vec![
            NodeSpec::styled("span", style(&[("font-weight", "bold")]), vec![NodeSpec::text("test1")]),
            NodeSpec::text("test2"),
        ],
    ));
    let root = doc.tree().root();
    let test2 = doc.tree().children(root)[1];
    assert_eq!(flat_index_of(doc.tree(), test2, 3, root), Some(8));
    assert_eq!(position_at(doc.tree(), root, 7), Position::new(test2, 2));

    let test1 = doc.tree().first_text_leaf(root).unwrap();
    doc.select(Position::new(test1, 2), Position::new(test2, 3));
    let patch = doc.apply(Cmd::ApplyStyle {
        patch: style(&[("font-weight", "normal")]),
    });

    assert_eq!(patch.new_selection, Some(2..8));
    insta::assert_snapshot!(format_tree(doc.tree()), @r#"
    span
      span {font-weight: bold}
        "te"
      span {font-weight: normal}
        "st1tes"
      "t2"
    "#);
}

#[test]
fn every_range_styles_exactly_its_chars() {
    init_logging();
    let patch = style(&[("font-weight", "normal")]);
    let original = Tree::from_spec(&mixed_tree());
    let total = original.text_len(original.root());
    let before = per_char(&original);
    assert_eq!(total, 12);

    for start in 0..total {
        for end in start + 1..=total {
            let mut doc = Document::from_spec(&mixed_tree());
            select_flat(&mut doc, start, end);
            let result = doc.apply(Cmd::ApplyStyle { patch: patch.clone() });

            assert_eq!(result.changed, vec![start..end], "range {start}..{end}");
            assert_eq!(result.new_selection, Some(start..end), "range {start}..{end}");
            assert_eq!(doc.text(), "abcdefghijkl");

            let after = per_char(doc.tree());
            for (index, (old, new)) in before.iter().zip(&after).enumerate() {
                let expected = if (start..end).contains(&index) {
                    merge_cascade(old, &patch)
                } else {
                    old.clone()
                };
                assert_eq!(new, &expected, "char {index} after styling {start}..{end}");
            }

            let again = optimize(doc.tree(), &TagPolicy::default()).unwrap();
            assert_eq!(
                again.to_spec(again.root()),
                doc.tree().to_spec(doc.tree().root()),
                "optimizer not stable after styling {start}..{end}"
            );
        }
    }
}

/// Same text as `mixed_tree`, with empty leaves scattered around the breaks
/// and element edges.
fn tree_with_empty_leaves() -> NodeSpec {
    NodeSpec::el(
        "div",
        vec![
            NodeSpec::el(
                "p",
                vec![
                    NodeSpec::text("ab"),
                    NodeSpec::styled(
                        "span",
                        style(&[("font-weight", "bold")]),
                        vec![
                            NodeSpec::text("cd"),
                            NodeSpec::styled("em", style(&[("font-style", "italic")]), vec![NodeSpec::text("ef")]),
                        ],
                    ),
                    NodeSpec::text(""),
                    NodeSpec::Break,
                    NodeSpec::text("gh"),
                ],
            ),
            NodeSpec::el(
                "p",
                vec![
                    NodeSpec::el("span", vec![NodeSpec::text(""), NodeSpec::text("ij")]),
                    NodeSpec::styled(
                        "span",
                        style(&[("color", "red")]),
                        vec![NodeSpec::text("kl"), NodeSpec::text("")],
                    ),
                ],
            ),
        ],
    )
}

#[test]
fn every_raw_text_endpoint_styles_exactly_its_chars() {
    init_logging();
    let patch = style(&[("color", "blue")]);
    let original = Tree::from_spec(&tree_with_empty_leaves());
    let before = per_char(&original);
    let positions: Vec<Position> = original
        .text_leaves(original.root())
        .flat_map(|leaf| (0..=original.text_len(leaf)).map(move |offset| Position::new(leaf, offset)))
        .collect();
    assert_eq!(positions.len(), 6 * 3 + 3);

    for (i, &anchor) in positions.iter().enumerate() {
        for &focus in &positions[i + 1..] {
            let mut doc = Document::from_spec(&tree_with_empty_leaves());
            let flat = doc
                .select(anchor, focus)
                .and_then(|selection| selection.flat.clone())
                .filter(|flat| !flat.is_empty());
            let result = doc.apply(Cmd::ApplyStyle { patch: patch.clone() });
            let after = per_char(doc.tree());
            assert_eq!(doc.text(), "abcdefghijkl");

            let Some(flat) = flat else {
                assert!(result.is_noop(), "{anchor:?}..{focus:?} selects nothing");
                assert_eq!(after, before, "{anchor:?}..{focus:?} selects nothing");
                continue;
            };
            assert_eq!(result.changed, vec![flat.clone()], "{anchor:?}..{focus:?}");
            assert_eq!(result.new_selection, Some(flat.clone()), "{anchor:?}..{focus:?}");
            for (index, (old, new)) in before.iter().zip(&after).enumerate() {
                let expected = if flat.contains(&index) {
                    merge_cascade(old, &patch)
                } else {
                    old.clone()
                };
                assert_eq!(new, &expected, "char {index} after styling {anchor:?}..{focus:?}");
            }
        }
    }
}

#[test]
fn restyling_the_restored_selection_changes_nothing() {
    init_logging();
    let mut doc = Document::from_spec(&mixed_tree());
    select_flat(&mut doc, 1, 9);
    let cmd = Cmd::ApplyStyle {
        patch: style(&[("text-decoration", "underline")]),
    };
    doc.apply(cmd.clone());
    let once = format_tree(doc.tree());

    let patch = doc.apply(cmd);
    assert_eq!(patch.new_selection, Some(1..9));
    assert_eq!(format_tree(doc.tree()), once);
    assert_eq!(
        doc.nested_style().unwrap().get(&StyleProperty::TextDecoration),
        Some(&StyleValue::Uniform("underline".into()))
    );
}

#[test]
fn mixed_selection_reports_mixed_values() {
    init_logging();
    let mut doc = Document::from_spec(&mixed_tree());
    select_flat(&mut doc, 1, 5);
    let nested = doc.nested_style().unwrap();
    assert!(nested.is_mixed(&StyleProperty::FontWeight));
    assert!(nested.is_mixed(&StyleProperty::FontStyle));
    assert_eq!(nested.get(&StyleProperty::Color), None);

    select_flat(&mut doc, 2, 4);
    let nested = doc.nested_style().unwrap();
    assert_eq!(nested.uniform(&StyleProperty::FontWeight), Some("bold"));
}

#[test]
fn blocks_survive_cross_paragraph_styling() {
    init_logging();
    let mut doc = Document::from_spec(&mixed_tree());
    select_flat(&mut doc, 7, 11);
    doc.apply(Cmd::ApplyStyle {
        patch: style(&[("color", "blue")]),
    });
    insta::assert_snapshot!(format_tree(doc.tree()), @r#"
    div
      p
        span
          "ab"
        span {font-weight: bold}
          "cd"
        em {font-weight: bold; font-style: italic}
          "ef"
          <br>
        span
          "g"
        span {color: blue}
          "h"
      p
        a {color: blue}
          "ij"
        span {color: blue}
          "k"
        span {color: red}
          "l"
    "#);
}
