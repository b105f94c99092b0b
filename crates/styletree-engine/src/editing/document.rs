use std::ops::Range;

use crate::editing::apply::{anchor_caret, apply_style};
use crate::editing::optimize::optimize;
use crate::editing::position::{Position, flat_index_of};
use crate::editing::restore::restore;
use crate::editing::selection::{RawSelection, Selection, resolve_raw, resolve_selection};
use crate::editing::{Cmd, Patch};
use crate::error::EditError;
use crate::policy::TagPolicy;
use crate::style::{ComputedStyle, StyleMap, effective_style, merge_cascade, nested_style};
use crate::tree::{NodeKind, NodeSpec, Tree};

/// An editing session over one tree.
///
/// Owns the live tree, the current selection and the style pending for the
/// next typed character. Every mutation goes through [`Document::apply`],
/// which works on a copy of the tree and only swaps it in once the whole
/// apply, optimize and restore pipeline has finished.
///
/// ```rust
/// use styletree_engine::{Cmd, Document, NodeSpec, Position, StyleMap};
///
/// let mut doc = Document::from_spec(&NodeSpec::el("p", vec![NodeSpec::text("hello world")]));
/// let text = doc.tree().first_text_leaf(doc.tree().root()).unwrap();
/// doc.select(Position::new(text, 0), Position::new(text, 5));
///
/// let patch = doc.apply(Cmd::ApplyStyle {
///     patch: StyleMap::from([("font-weight", "bold")]),
/// });
/// assert_eq!(patch.changed, vec![0..5]);
/// assert_eq!(patch.new_selection, Some(0..5));
/// assert_eq!(doc.text(), "hello world");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) tree: Tree,
    pub(crate) policy: TagPolicy,
    pub(crate) selection: Option<Selection>,
    /// Style recorded on a caret, applied to whatever is typed there next
    pub(crate) typing_style: StyleMap,
    /// Incremented on every edit that changes the tree
    pub(crate) version: u64,
}

impl Document {
    pub fn new(tree: Tree) -> Self {
        Self::with_policy(tree, TagPolicy::default())
    }

    pub fn with_policy(tree: Tree, policy: TagPolicy) -> Self {
        Self {
            tree,
            policy,
            selection: None,
            typing_style: StyleMap::new(),
            version: 0,
        }
    }

    pub fn from_spec(spec: &NodeSpec) -> Self {
        Self::new(Tree::from_spec(spec))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn policy(&self) -> &TagPolicy {
        &self.policy
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Visible text of the whole document.
    pub fn text(&self) -> String {
        self.tree.text(self.tree.root())
    }

    /// Resolves and stores a selection over the whole document.
    ///
    /// Any pending typing style is dropped when the selection moves.
    pub fn select(&mut self, anchor: Position, focus: Position) -> Option<&Selection> {
        let resolved = resolve_selection(&self.tree, anchor, focus, self.tree.root());
        self.set_selection(resolved)
    }

    /// Like [`Document::select`], for a surface that may report no selection.
    pub fn select_raw(&mut self, raw: Option<RawSelection>) -> Option<&Selection> {
        let resolved = resolve_raw(&self.tree, raw, self.tree.root());
        self.set_selection(resolved)
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    fn set_selection(&mut self, selection: Option<Selection>) -> Option<&Selection> {
        if self.selection != selection {
            self.typing_style = StyleMap::new();
        }
        self.selection = selection;
        self.selection.as_ref()
    }

    /// Style of the current selection, with mixed properties marked.
    pub fn nested_style(&self) -> Option<ComputedStyle> {
        self.selection
            .as_ref()
            .map(|selection| nested_style(&self.tree, selection))
    }

    /// Style the next typed character would get: the caret's effective
    /// style plus anything recorded with [`Cmd::ApplyStyle`] on the caret.
    pub fn typing_style(&self) -> Option<StyleMap> {
        let selection = self.selection.as_ref().filter(|s| s.is_caret)?;
        let at_caret = effective_style(&self.tree, selection.start.node, self.tree.root());
        Some(merge_cascade(&at_caret, &self.typing_style))
    }

    /// Apply command to document
    ///
    /// Commands that can't do anything (no selection, empty patch, a caret
    /// where a range is needed) return a patch with no changed ranges and
    /// the version untouched.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let result = match cmd {
            Cmd::ApplyStyle { patch } => self.apply_style(patch),
            Cmd::AnchorCaretStyle { patch } => self.anchor_caret_style(patch),
            Cmd::Optimize => self.reoptimize(),
        };
        match result {
            Ok(patch) => patch,
            Err(err) => {
                log::debug!("command had no effect: {err}");
                self.unchanged()
            }
        }
    }

    fn apply_style(&mut self, patch: StyleMap) -> Result<Patch, EditError> {
        let selection = self.selection.clone().ok_or(EditError::NoSelection)?;
        if patch.is_empty() {
            return Ok(self.unchanged());
        }
        if selection.is_caret {
            self.typing_style.extend_from(&patch);
            log::debug!("recorded typing style {}", self.typing_style);
            return Ok(self.unchanged());
        }

        let mut working = self.tree.clone();
        let Some(flat) = apply_style(&mut working, &self.policy, &selection, &patch) else {
            return Ok(self.unchanged());
        };
        Ok(self.commit(working, vec![flat.clone()], Some(flat)))
    }

    fn anchor_caret_style(&mut self, patch: StyleMap) -> Result<Patch, EditError> {
        let selection = self.selection.clone().ok_or(EditError::NoSelection)?;
        if patch.is_empty() || !selection.is_caret {
            return Ok(self.unchanged());
        }
        let mut working = self.tree.clone();
        let root = working.root();
        let placeholder = anchor_caret(&mut working, &self.policy, &selection, &patch)
            .ok_or(EditError::InvalidSplitTarget(selection.start.node))?;
        let caret = Position::new(placeholder, 0);
        let flat = flat_index_of(&working, placeholder, 0, root).ok_or(EditError::MappingMiss {
            node: placeholder,
            root,
        })?;

        self.selection = Some(Selection::from_ordered(&working, caret, caret, root));
        self.tree = working;
        self.typing_style = StyleMap::new();
        self.version += 1;
        Ok(Patch {
            changed: vec![flat..flat],
            new_selection: Some(flat..flat),
            version: self.version,
        })
    }

    fn reoptimize(&mut self) -> Result<Patch, EditError> {
        let before = self.tree.to_spec(self.tree.root());
        let optimized = optimize(&self.tree, &self.policy).unwrap_or_else(|| self.emptied());
        if optimized.to_spec(optimized.root()) == before {
            return Ok(self.unchanged());
        }
        let whole = 0..optimized.text_len(optimized.root());
        let flat = self.selection_flat();
        self.tree = optimized;
        self.selection = flat.map(|flat| restore(&self.tree, self.tree.root(), flat.start, flat.end));
        self.version += 1;
        Ok(Patch {
            changed: vec![whole],
            new_selection: flat_of(self.selection.as_ref(), &self.tree),
            version: self.version,
        })
    }

    /// Optimizes `working`, restores the selection over it and swaps it in.
    fn commit(&mut self, working: Tree, changed: Vec<Range<usize>>, flat: Option<Range<usize>>) -> Patch {
        let optimized = optimize(&working, &self.policy).unwrap_or_else(|| self.emptied());
        let root = optimized.root();
        let restored = flat.map(|flat| restore(&optimized, root, flat.start, flat.end));
        log::debug!(
            "restored selection {:?}",
            restored.as_ref().and_then(|s| s.flat.clone())
        );

        self.tree = optimized;
        self.selection = restored;
        self.version += 1;
        Patch {
            changed,
            new_selection: flat_of(self.selection.as_ref(), &self.tree),
            version: self.version,
        }
    }

    /// Current selection as flat indices; carets give an empty range.
    fn selection_flat(&self) -> Option<Range<usize>> {
        flat_of(self.selection.as_ref(), &self.tree)
    }

    /// Stand-in for a tree the optimizer dropped entirely: the old root, empty.
    fn emptied(&self) -> Tree {
        match self.tree.get(self.tree.root()) {
            Some(NodeKind::Element(el)) => Tree::new(el.tag.clone(), el.style.clone()),
            _ => Tree::new(self.policy.inline_tag.clone(), StyleMap::new()),
        }
    }

    fn unchanged(&self) -> Patch {
        Patch {
            changed: Vec::new(),
            new_selection: self.selection_flat(),
            version: self.version,
        }
    }
}

fn flat_of(selection: Option<&Selection>, tree: &Tree) -> Option<Range<usize>> {
    let selection = selection?;
    if let Some(flat) = &selection.flat {
        return Some(flat.clone());
    }
    let at = flat_index_of(tree, selection.start.node, selection.start.offset, selection.limit_root)?;
    Some(at..at)
}
