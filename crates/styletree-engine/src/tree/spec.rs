use serde::{Deserialize, Serialize};

use crate::style::StyleMap;
use crate::tree::{Element, NodeKind};

/// Owned description of a subtree.
///
/// Used to build trees declaratively and as the output of the optimizer,
/// which rewrites into a fresh structure rather than editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeSpec {
    Text(String),
    Break,
    Element {
        tag: String,
        #[serde(default)]
        style: StyleMap,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
}

impl NodeSpec {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Unstyled element.
    pub fn el(tag: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        Self::styled(tag, StyleMap::new(), children)
    }

    pub fn styled(tag: impl Into<String>, style: StyleMap, children: Vec<NodeSpec>) -> Self {
        Self::Element {
            tag: tag.into(),
            style,
            children,
        }
    }

    pub fn children(&self) -> &[NodeSpec] {
        match self {
            Self::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Concatenated text of this subtree.
    pub fn flat_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Break => String::new(),
            Self::Element { children, .. } => children.iter().map(Self::flat_text).collect(),
        }
    }

    pub(crate) fn node_kind(&self) -> NodeKind {
        match self {
            Self::Text(text) => NodeKind::Text(text.clone()),
            Self::Break => NodeKind::Break,
            Self::Element { tag, style, .. } => NodeKind::Element(Element {
                tag: tag.clone(),
                style: style.clone(),
            }),
        }
    }
}
