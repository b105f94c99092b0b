/*!
 * # Editing Core Module
 *
 * Styling a selection in a tree of text, break and element nodes.
 *
 * ## Pipeline
 *
 * Every style command runs the same four steps:
 *
 * 1. **Resolve**: raw endpoints become an ordered, clamped [`Selection`]
 *    ([`selection`], built on the flat index mapping in [`position`])
 * 2. **Apply**: partially covered text is split ([`split`]) and the patch is
 *    written onto every covered node ([`apply`])
 * 3. **Optimize**: the tree is rebuilt into its smallest equivalent shape
 *    ([`optimize`]); node identities do not survive this step
 * 4. **Restore**: the selection is re-derived from its flat indices
 *    ([`restore`])
 *
 * Flat indices are the only coordinates that survive all four steps, which is
 * why [`Selection`] carries them and [`Patch`] reports them.
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, the session type that owns a tree and runs commands
 * - **`commands`**: the `Cmd` enum
 * - **`patch`**: edit result metadata including changed ranges and new selection
 * - **`position`**: flat index to position mapping and back
 * - **`selection`**: the selection resolver
 * - **`split`**: text node splitting
 * - **`apply`**: the style applicator and caret anchors
 * - **`optimize`**: the tree optimizer
 * - **`restore`**: selection restoration from flat indices
 *
 * ## Usage Pattern
 *
 * ```rust
 * use styletree_engine::editing::*;
 * use styletree_engine::{NodeSpec, StyleMap};
 *
 * let mut doc = Document::from_spec(&NodeSpec::el("span", vec![NodeSpec::text("abc")]));
 * let text = doc.tree().first_text_leaf(doc.tree().root()).unwrap();
 *
 * // 1. select, 2-4. apply runs the rest
 * doc.select(Position::new(text, 1), Position::new(text, 3));
 * let patch = doc.apply(Cmd::ApplyStyle { patch: StyleMap::from([("color", "red")]) });
 *
 * assert_eq!(patch.new_selection, Some(1..3));
 * assert_eq!(doc.text(), "abc");
 * ```
 */

// Module exports
pub mod apply;
pub mod commands;
pub mod document;
pub mod optimize;
pub mod patch;
pub mod position;
pub mod restore;
pub mod selection;
pub mod split;

// Public API re-exports
pub use apply::{anchor_caret, apply_style};
pub use commands::Cmd;
pub use document::Document;
pub use optimize::{optimize, optimize_node};
pub use patch::Patch;
pub use position::{Position, flat_index_of, position_at};
pub use restore::restore;
pub use selection::{
    RawSelection, Selection, compare_positions, correct_end, resolve_raw, resolve_selection,
};
pub use split::{split_at, split_before, try_split_at, try_split_before};
