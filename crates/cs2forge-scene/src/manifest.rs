//! Scene manifests
//!
//! A manifest describes a scene in JSON or YAML: images (decoded from files
//! or generated), materials with their node trees, and objects.
//!
//! ```yaml
//! images:
//!   - name: wood_tex
//!     path: textures/wood.png
//!   - name: flat_normal
//!     generated: { width: 16, height: 16, color: [128, 128, 255, 255] }
//! materials:
//!   - name: Wood_Plank_02
//!     node_tree:
//!       nodes:
//!         - { name: Principled BSDF, kind: BSDF_PRINCIPLED }
//!         - { name: Image Texture, kind: TEX_IMAGE, image: wood_tex }
//!       links:
//!         - { from: Image Texture, to: Principled BSDF, to_socket: Base Color }
//! objects:
//!   - name: Plank
//!     mesh:
//!       vertices: [[0, 0, 0], [1, 0, 0], [1, 1, 0]]
//!       faces: [[0, 1, 2]]
//!       materials: [Wood_Plank_02]
//! ```

use std::path::{Path, PathBuf};

use cs2forge_core::{Color, ImageSize};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::image::SceneImage;
use crate::material::Material;
use crate::object::SceneObject;
use crate::scene::Scene;

/// Manifest loading errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON manifest
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML manifest
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Extension is neither JSON nor YAML
    #[error("Unsupported manifest extension: {0}")]
    UnsupportedExtension(String),

    /// Manifest content was rejected by the scene
    #[error("Scene error: {0}")]
    Scene(#[from] cs2forge_core::Error),
}

impl From<ManifestError> for cs2forge_core::Error {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::Io(e) => cs2forge_core::Error::Io(e),
            ManifestError::Scene(e) => e,
            other => cs2forge_core::Error::InvalidManifest {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for manifest loading
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Where an image's pixels come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Decode a file, relative to the manifest directory
    Path(PathBuf),
    /// Single-color image
    Generated {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Fill color, white when omitted
        #[serde(default)]
        color: Color,
    },
}

/// Image entry of a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Unique image name materials refer to
    pub name: String,
    /// File or generated pixels
    #[serde(flatten)]
    pub source: ImageSource,
}

/// A scene described on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Images, loaded before materials
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    /// Materials and their shading graphs
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Scene objects
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl SceneManifest {
    /// Parse a JSON manifest
    pub fn from_json_str(text: &str) -> ManifestResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a YAML manifest
    pub fn from_yaml_str(text: &str) -> ManifestResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read a manifest, choosing the format by extension
    pub fn from_path(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let text = std::fs::read_to_string(path)?;

        match ext.as_str() {
            "json" => Self::from_json_str(&text),
            "yaml" | "yml" => Self::from_yaml_str(&text),
            _ => Err(ManifestError::UnsupportedExtension(ext)),
        }
    }

    /// Build the in-memory scene, resolving image paths against `base_dir`
    pub fn into_scene(self, base_dir: impl AsRef<Path>) -> ManifestResult<Scene> {
        let base_dir = base_dir.as_ref();
        let mut scene = Scene::new();

        for entry in self.images {
            let image = match entry.source {
                ImageSource::Path(path) => {
                    let path = if path.is_absolute() { path } else { base_dir.join(path) };
                    debug!(image = %entry.name, path = %path.display(), "Decoding image");
                    SceneImage::load(entry.name, path)?
                }
                ImageSource::Generated { width, height, color } => {
                    SceneImage::solid(entry.name, ImageSize::new(width, height), color)?
                }
            };
            scene.add_image(image)?;
        }

        for material in self.materials {
            scene.add_material(material)?;
        }

        for object in self.objects {
            scene.add_object(object)?;
        }

        info!(
            materials = scene.materials().len(),
            images = scene.image_count(),
            objects = scene.objects().len(),
            "Scene loaded"
        );
        Ok(scene)
    }
}

/// Load a manifest file into a scene
pub fn load_scene(path: impl AsRef<Path>) -> ManifestResult<Scene> {
    let path = path.as_ref();
    let base_dir = path.parent().unwrap_or(Path::new("."));
    SceneManifest::from_path(path)?.into_scene(base_dir)
}
