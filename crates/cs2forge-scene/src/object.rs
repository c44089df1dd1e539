//! Scene objects and mesh data

use cs2forge_core::Vec3;
use serde::{Deserialize, Serialize};

/// Scene object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Polygon mesh
    #[default]
    Mesh,
    /// Camera
    Camera,
    /// Light
    Light,
    /// Transform-only empty
    Empty,
    /// Anything else the host knows about
    #[serde(other)]
    Other,
}

/// Polygon mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    #[serde(default)]
    pub vertices: Vec<Vec3>,
    /// Polygons as vertex index loops (three or more indices each)
    #[serde(default)]
    pub faces: Vec<Vec<u32>>,
    /// Material slots, by material name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    /// Material slot per face; empty means slot 0 for every face
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub face_materials: Vec<u32>,
}

impl Mesh {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of polygons
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Total number of polygon corners
    pub fn loop_count(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }

    /// Material slot of face `index`
    pub fn face_material(&self, index: usize) -> u32 {
        self.face_materials.get(index).copied().unwrap_or(0)
    }

    /// Newell normal of face `index`
    ///
    /// Works for non-planar and concave polygons; degenerate faces yield
    /// the zero vector.
    pub fn face_normal(&self, index: usize) -> Vec3 {
        let Some(face) = self.faces.get(index) else {
            return Vec3::ZERO;
        };
        let mut normal = Vec3::ZERO;
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            let (Some(va), Some(vb)) = (
                self.vertices.get(a as usize),
                self.vertices.get(b as usize),
            ) else {
                continue;
            };
            normal.x += (va.y - vb.y) * (va.z + vb.z);
            normal.y += (va.z - vb.z) * (va.x + vb.x);
            normal.z += (va.x - vb.x) * (va.y + vb.y);
        }
        normal.normalize()
    }

    /// Check index bounds and polygon sizes
    pub fn validate(&self) -> Result<(), String> {
        let count = self.vertices.len();
        for (i, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(format!("face {} has {} vertices, need at least 3", i, face.len()));
            }
            if let Some(&bad) = face.iter().find(|&&v| v as usize >= count) {
                return Err(format!("face {} references vertex {} of {}", i, bad, count));
            }
        }
        if !self.face_materials.is_empty() {
            if self.face_materials.len() != self.faces.len() {
                return Err(format!(
                    "{} face material entries for {} faces",
                    self.face_materials.len(),
                    self.faces.len()
                ));
            }
            let slots = self.materials.len().max(1) as u32;
            if let Some(&bad) = self.face_materials.iter().find(|&&m| m >= slots) {
                return Err(format!("face material slot {} out of {}", bad, slots));
            }
        }
        Ok(())
    }
}

/// An object placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Unique object name
    pub name: String,
    /// Object type; only meshes are exported
    #[serde(default, rename = "type")]
    pub kind: ObjectKind,
    /// World position
    #[serde(default)]
    pub location: Vec3,
    /// Per-axis scale
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// Geometry, for mesh objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Mesh>,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl SceneObject {
    /// Mesh object at the origin with unit scale
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Mesh,
            location: Vec3::ZERO,
            scale: Vec3::ONE,
            mesh: Some(mesh),
        }
    }

    /// Geometry of a mesh object
    pub fn mesh_data(&self) -> Option<&Mesh> {
        match self.kind {
            ObjectKind::Mesh => self.mesh.as_ref(),
            _ => None,
        }
    }

    /// Whether this object takes part in geometry export
    pub fn is_mesh(&self) -> bool {
        self.mesh_data().is_some()
    }
}
