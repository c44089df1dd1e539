//! Host capabilities consumed by the exporter
//!
//! The exporter never touches a concrete scene type. It reads materials,
//! graphs and objects through [`SceneHost`], pixels through
//! [`ImageHost`], and hands geometry to a [`GeometryExporter`].

use std::path::Path;

use cs2forge_core::Result;

use crate::graph::ShadingGraph;
use crate::image::ImageHost;
use crate::object::SceneObject;

/// Read access to the scene plus the single mutation export performs
pub trait SceneHost: ImageHost {
    type Graph: ShadingGraph;

    /// Material names in scene order
    fn material_names(&self) -> Vec<String>;

    /// Node-based graph of a material; `None` if the material has none
    fn material_graph(&self, name: &str) -> Option<&Self::Graph>;

    /// Rename a material, keeping every reference to it intact
    fn rename_material(&mut self, from: &str, to: &str) -> Result<()>;

    /// Objects that carry mesh geometry, in scene order
    fn mesh_objects(&self) -> Vec<&SceneObject>;
}

/// Forward / up axis of an exported file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// +X
    X,
    /// +Y
    Y,
    /// +Z
    Z,
    /// -X
    NegX,
    /// -Y
    NegY,
    /// -Z
    NegZ,
}

impl Axis {
    /// Label as written in files and messages
    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::NegX => "-X",
            Axis::NegY => "-Y",
            Axis::NegZ => "-Z",
        }
    }
}

/// Normal smoothing written with the geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingMode {
    /// Flat, one normal per face
    Face,
    /// Smoothed per edge
    Edge,
    /// Normals only, no smoothing groups
    Off,
}

/// How object scale is mapped into the file's unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Apply scene units as FBX units
    FbxUnits,
    /// Write everything at scale 1
    All,
}

/// Geometry export configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryExportOptions {
    /// Axis the model faces
    pub axis_forward: Axis,
    /// Axis pointing up
    pub axis_up: Axis,
    /// Normal smoothing
    pub smoothing: SmoothingMode,
    /// Export evaluated geometry
    pub apply_modifiers: bool,
    /// Unit mapping
    pub scale_mode: ScaleMode,
    /// Bake the axis conversion into vertex data instead of the root transform
    pub bake_space_transform: bool,
    /// Append leaf bones to armatures
    pub add_leaf_bones: bool,
}

impl GeometryExportOptions {
    /// The fixed bundle used for Source 2 export
    pub const SOURCE2: Self = Self {
        axis_forward: Axis::NegZ,
        axis_up: Axis::Y,
        smoothing: SmoothingMode::Face,
        apply_modifiers: true,
        scale_mode: ScaleMode::FbxUnits,
        bake_space_transform: true,
        add_leaf_bones: false,
    };
}

impl Default for GeometryExportOptions {
    fn default() -> Self {
        Self::SOURCE2
    }
}

/// Host geometry exporter
pub trait GeometryExporter {
    /// Write `objects` into one file at `path`
    fn export_geometry(
        &mut self,
        objects: &[&SceneObject],
        path: &Path,
        options: &GeometryExportOptions,
    ) -> Result<()>;
}
