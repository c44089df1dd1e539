//! cs2forge scene layer
//!
//! Models the parts of a host 3D application the exporter depends on:
//! - [`host::SceneHost`], [`image::ImageHost`] and [`host::GeometryExporter`],
//!   the capabilities the exporter consumes
//! - [`graph::ShadingGraph`], the bounded view over a material's node network
//! - [`scene::Scene`], an in-memory host, loadable from a JSON/YAML
//!   [`manifest::SceneManifest`]
//!
//! # Example
//! ```no_run
//! use cs2forge_scene::{load_scene, SceneHost};
//!
//! let scene = load_scene("scene.yaml").unwrap();
//! for name in scene.material_names() {
//!     println!("{}", name);
//! }
//! ```

pub mod graph;
pub mod host;
pub mod image;
pub mod manifest;
pub mod material;
pub mod object;
pub mod path;
pub mod scene;

pub use graph::{NodeKind, NodeLink, NodeTree, ShadingGraph, ShadingNode, sockets};
pub use host::{Axis, GeometryExportOptions, GeometryExporter, ScaleMode, SceneHost, SmoothingMode};
pub use crate::image::{ImageFormat, ImageHost, SceneImage};
pub use manifest::{ImageEntry, ImageSource, ManifestError, SceneManifest, load_scene};
pub use material::{MATERIAL_PREFIX, Material};
pub use object::{Mesh, ObjectKind, SceneObject};
pub use scene::Scene;
