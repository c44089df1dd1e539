//! Scene materials

use serde::{Deserialize, Serialize};

use crate::graph::NodeTree;
use crate::path::{last_segment, sanitize_file_stem};

/// Prefix every exported material name carries
pub const MATERIAL_PREFIX: &str = "materials/";

/// A scene material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Scene-unique name
    pub name: String,
    /// Node-based shading graph, absent for materials that don't use nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_tree: Option<NodeTree>,
}

impl Material {
    /// Material without a shading graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_tree: None,
        }
    }

    /// Material shaded by `tree`
    pub fn with_node_tree(name: impl Into<String>, tree: NodeTree) -> Self {
        Self {
            name: name.into(),
            node_tree: Some(tree),
        }
    }

    /// Whether the name already carries the material namespace
    pub fn is_prefixed(&self) -> bool {
        is_prefixed(&self.name)
    }

    /// File stem of the generated `.vmat`
    pub fn vmat_stem(&self) -> String {
        vmat_stem(&self.name)
    }
}

/// Whether `name` already carries [`MATERIAL_PREFIX`]
pub fn is_prefixed(name: &str) -> bool {
    name.starts_with(MATERIAL_PREFIX)
}

/// `name` with [`MATERIAL_PREFIX`] added once
///
/// Returns `None` when the name is already prefixed.
pub fn prefixed_name(name: &str) -> Option<String> {
    if is_prefixed(name) {
        None
    } else {
        Some(format!("{}{}", MATERIAL_PREFIX, name))
    }
}

/// File stem of the `.vmat` generated for material `name`
///
/// The last `/` segment of the name, made filesystem-safe.
pub fn vmat_stem(name: &str) -> String {
    sanitize_file_stem(last_segment(name))
}
