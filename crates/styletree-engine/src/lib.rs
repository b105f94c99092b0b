pub mod editing;
pub mod error;
pub mod outline;
pub mod policy;
pub mod style;
pub mod tree;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, Patch, Position, RawSelection, Selection};
pub use error::EditError;
pub use outline::format_tree;
pub use policy::TagPolicy;
pub use style::{ComputedStyle, CustomProperty, StyleMap, StyleProperty, StyleValue};
pub use tree::{Element, NodeId, NodeKind, NodeSpec, Tree};
