use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which tags the editing operations may create, merge, or remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagPolicy {
    /// Tag for wrappers created by splits, styling and caret anchors.
    pub inline_tag: String,
    /// Block-level containers. Never flattened, merged or inlined; their bare
    /// text children get wrapped in `inline_tag`.
    pub block_tags: BTreeSet<String>,
    /// Inline tags that mean more than their style (links and the like).
    /// Never flattened or merged.
    pub preserved_tags: BTreeSet<String>,
}

impl Default for TagPolicy {
    fn default() -> Self {
        let block_tags = [
            "p",
            "div",
            "li",
            "ul",
            "ol",
            "blockquote",
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
        ];
        Self {
            inline_tag: "span".to_string(),
            block_tags: block_tags.iter().map(|t| t.to_string()).collect(),
            preserved_tags: BTreeSet::from(["a".to_string()]),
        }
    }
}

impl TagPolicy {
    pub fn is_block(&self, tag: &str) -> bool {
        self.block_tags.contains(&tag.to_ascii_lowercase())
    }

    pub fn is_preserved(&self, tag: &str) -> bool {
        self.preserved_tags.contains(&tag.to_ascii_lowercase())
    }

    /// Purely presentational inline tag: free to flatten, merge and distribute.
    pub fn is_plain_inline(&self, tag: &str) -> bool {
        !self.is_block(tag) && !self.is_preserved(tag)
    }

    /// Whether a lone text child may push its style onto this parent.
    pub fn accepts_style(&self, tag: &str) -> bool {
        !self.is_block(tag)
    }
}
