//! Shading graph structures
//!
//! A material's shading network is a directed graph of nodes connected
//! through named sockets. Export only ever walks one or two hops upstream
//! from the principled shader node, so the capability exposed to the
//! exporter is [`ShadingGraph`]: "which node feeds this input?".

use serde::{Deserialize, Serialize};

/// Input socket names the exporter reads
pub mod sockets {
    /// Principled shader base color input
    pub const BASE_COLOR: &str = "Base Color";
    /// Principled shader roughness input
    pub const ROUGHNESS: &str = "Roughness";
    /// Principled shader normal input
    pub const NORMAL: &str = "Normal";
    /// Normal-map adapter color input
    pub const COLOR: &str = "Color";
}

/// Shading node kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Image source node
    ImageTexture,
    /// Tangent-space normal-map adapter
    NormalMap,
    /// Principled shader (the material's root shading node)
    PrincipledBsdf,
    /// Any other node type, kept by its type name
    Other(String),
}

impl NodeKind {
    /// Parse a host node type name
    ///
    /// Accepts the host's identifiers (`TEX_IMAGE`, `NORMAL_MAP`,
    /// `BSDF_PRINCIPLED`) case-insensitively, plus the snake_case names
    /// produced by [`NodeKind::type_name`].
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "TEX_IMAGE" | "IMAGE_TEXTURE" => NodeKind::ImageTexture,
            "NORMAL_MAP" => NodeKind::NormalMap,
            "BSDF_PRINCIPLED" | "PRINCIPLED_BSDF" => NodeKind::PrincipledBsdf,
            _ => NodeKind::Other(name.trim().to_string()),
        }
    }

    /// Canonical type name
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::ImageTexture => "TEX_IMAGE",
            NodeKind::NormalMap => "NORMAL_MAP",
            NodeKind::PrincipledBsdf => "BSDF_PRINCIPLED",
            NodeKind::Other(name) => name,
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        NodeKind::from_type_name(&value)
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.type_name().to_string()
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A node in a material's shading graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadingNode {
    /// Node name, unique within its tree
    pub name: String,
    /// Node kind
    pub kind: NodeKind,
    /// Bound image name (image source nodes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ShadingNode {
    /// Create a node of the given kind
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            image: None,
        }
    }

    /// Create an image source node bound to `image`
    pub fn image_texture(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::ImageTexture,
            image: Some(image.into()),
        }
    }

    /// Create a principled shader node
    pub fn principled(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::PrincipledBsdf)
    }

    /// Create a normal-map adapter node
    pub fn normal_map(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::NormalMap)
    }

    /// Image bound to this node, if it is an image source with an image
    pub fn bound_image(&self) -> Option<&str> {
        match self.kind {
            NodeKind::ImageTexture => self.image.as_deref(),
            _ => None,
        }
    }
}

/// A link from one node's output socket to another node's input socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLink {
    /// Upstream node name
    #[serde(rename = "from")]
    pub from_node: String,
    /// Upstream output socket
    #[serde(default = "default_output_socket")]
    pub from_socket: String,
    /// Downstream node name
    #[serde(rename = "to")]
    pub to_node: String,
    /// Downstream input socket
    pub to_socket: String,
}

fn default_output_socket() -> String {
    sockets::COLOR.to_string()
}

impl NodeLink {
    /// Link `from_node.from_socket` to `to_node.to_socket`
    pub fn new(
        from_node: impl Into<String>,
        from_socket: impl Into<String>,
        to_node: impl Into<String>,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_socket: from_socket.into(),
            to_node: to_node.into(),
            to_socket: to_socket.into(),
        }
    }
}

/// Read-only capability over a material's shading graph
pub trait ShadingGraph {
    /// The first principled shader node, if any
    fn principled_node(&self) -> Option<&ShadingNode>;

    /// The node linked into `input` of `node`, if that input is linked
    fn linked_upstream(&self, node: &ShadingNode, input: &str) -> Option<&ShadingNode>;
}

/// Node-based shading graph owned by a material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTree {
    /// Nodes, unique by name
    #[serde(default)]
    pub nodes: Vec<ShadingNode>,
    /// Socket connections between nodes
    #[serde(default)]
    pub links: Vec<NodeLink>,
}

impl NodeTree {
    /// Empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its name for linking
    pub fn add_node(&mut self, node: ShadingNode) -> String {
        let name = node.name.clone();
        self.nodes.push(node);
        name
    }

    /// Link `from.from_socket` into `to.to_socket`
    ///
    /// An input accepts a single link; linking an already linked input
    /// replaces the previous link.
    pub fn link(&mut self, from: &str, from_socket: &str, to: &str, to_socket: &str) {
        self.links
            .retain(|l| !(l.to_node == to && l.to_socket == to_socket));
        self.links.push(NodeLink::new(from, from_socket, to, to_socket));
    }

    /// Look up a node by name
    pub fn node(&self, name: &str) -> Option<&ShadingNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Check that every link endpoint names a node in this tree and that
    /// no input is linked twice
    pub fn validate(&self) -> Result<(), String> {
        let mut seen_inputs = std::collections::HashSet::new();
        for link in &self.links {
            for end in [&link.from_node, &link.to_node] {
                if self.node(end).is_none() {
                    return Err(format!("link references unknown node '{}'", end));
                }
            }
            if !seen_inputs.insert((&link.to_node, &link.to_socket)) {
                return Err(format!(
                    "input '{}' of node '{}' is linked more than once",
                    link.to_socket, link.to_node
                ));
            }
        }
        Ok(())
    }

    /// Names of images bound to image source nodes in this tree
    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| n.bound_image())
    }
}

impl ShadingGraph for NodeTree {
    fn principled_node(&self) -> Option<&ShadingNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::PrincipledBsdf)
    }

    fn linked_upstream(&self, node: &ShadingNode, input: &str) -> Option<&ShadingNode> {
        let link = self
            .links
            .iter()
            .find(|l| l.to_node == node.name && l.to_socket == input)?;
        self.node(&link.from_node)
    }
}
