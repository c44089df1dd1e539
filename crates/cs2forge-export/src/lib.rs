//! cs2forge Export Pipeline
//!
//! Converts a scene into Counter-Strike 2 (Source 2) assets:
//! - `.vmat` materials with physics surfaces classified from material names
//! - TGA textures baked from the images feeding each material
//! - ASCII FBX geometry, per object and combined
//!
//! # Example
//! ```no_run
//! use cs2forge_export::{export_scene, ExportOptions, FbxExporter};
//! use cs2forge_scene::load_scene;
//!
//! let mut scene = load_scene("scene.yaml").unwrap();
//! let report = export_scene(&mut scene, &mut FbxExporter::new(), "out", ExportOptions::default()).unwrap();
//! println!("{}", report.summary());
//! ```

pub mod fbx;
pub mod logging;
pub mod orchestrator;
pub mod surface;
pub mod textures;
pub mod vmat;

pub use fbx::{FbxExportError, FbxExporter};
pub use orchestrator::{
    export_scene, ExportFailure, ExportOptions, ExportPhase, ExportProgress, ExportReport,
    ExportRun, MaterialExport, ProgressCallback,
};
pub use surface::{classify, classify_all, DEFAULT_SURFACE, SURFACE_TYPES};
pub use textures::{Channel, TextureNaming, TextureSet};
pub use vmat::VmatDocument;
