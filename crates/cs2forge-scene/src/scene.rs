//! In-memory scene
//!
//! The concrete host used by the CLI and by tests: materials, images and
//! objects held in memory, usually built from a scene manifest.

use std::collections::HashMap;
use std::path::Path;

use cs2forge_core::{Error, ImageSize, Result};
use tracing::debug;

use crate::graph::NodeTree;
use crate::host::SceneHost;
use crate::image::{ImageFormat, ImageHost, SceneImage};
use crate::material::Material;
use crate::object::SceneObject;

/// In-memory scene graph
#[derive(Debug, Clone, Default)]
pub struct Scene {
    materials: Vec<Material>,
    images: HashMap<String, SceneImage>,
    objects: Vec<SceneObject>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material; names are unique within the scene
    pub fn add_material(&mut self, material: Material) -> Result<()> {
        if self.material(&material.name).is_some() {
            return Err(Error::DuplicateName {
                kind: "material",
                name: material.name,
            });
        }
        if let Some(tree) = &material.node_tree {
            tree.validate().map_err(|message| {
                Error::invalid_data(format!("material '{}': {}", material.name, message))
            })?;
        }
        self.materials.push(material);
        Ok(())
    }

    /// Add an image; names are unique within the scene
    pub fn add_image(&mut self, image: SceneImage) -> Result<()> {
        if self.images.contains_key(&image.name) {
            return Err(Error::DuplicateName {
                kind: "image",
                name: image.name,
            });
        }
        self.images.insert(image.name.clone(), image);
        Ok(())
    }

    /// Add an object; names are unique within the scene
    pub fn add_object(&mut self, object: SceneObject) -> Result<()> {
        if self.objects.iter().any(|o| o.name == object.name) {
            return Err(Error::DuplicateName {
                kind: "object",
                name: object.name,
            });
        }
        if let Some(mesh) = &object.mesh {
            mesh.validate().map_err(|message| {
                Error::invalid_data(format!("object '{}': {}", object.name, message))
            })?;
        }
        self.objects.push(object);
        Ok(())
    }

    /// Look up a material by name
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// All materials in insertion order
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Look up an image by name
    pub fn image(&self, name: &str) -> Option<&SceneImage> {
        self.images.get(name)
    }

    /// Number of images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// All objects, including non-mesh ones
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn image_mut(&mut self, name: &str) -> Result<&mut SceneImage> {
        self.images.get_mut(name).ok_or_else(|| Error::ImageNotFound {
            name: name.to_string(),
        })
    }
}

impl ImageHost for Scene {
    fn image_size(&self, name: &str) -> Option<ImageSize> {
        self.images.get(name).map(SceneImage::size)
    }

    fn scale_image(&mut self, name: &str, size: ImageSize) -> Result<()> {
        debug!(image = name, %size, "Scaling image");
        self.image_mut(name)?.scale(size)
    }

    fn save_image(&mut self, name: &str, path: &Path, format: ImageFormat) -> Result<()> {
        debug!(image = name, path = %path.display(), "Saving image");
        self.image_mut(name)?.save(path, format)
    }
}

impl SceneHost for Scene {
    type Graph = NodeTree;

    fn material_names(&self) -> Vec<String> {
        self.materials.iter().map(|m| m.name.clone()).collect()
    }

    fn material_graph(&self, name: &str) -> Option<&NodeTree> {
        self.material(name)?.node_tree.as_ref()
    }

    fn rename_material(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Ok(());
        }
        if self.material(to).is_some() {
            return Err(Error::DuplicateName {
                kind: "material",
                name: to.to_string(),
            });
        }
        let material = self
            .materials
            .iter_mut()
            .find(|m| m.name == from)
            .ok_or_else(|| Error::MaterialNotFound {
                name: from.to_string(),
            })?;
        material.name = to.to_string();

        // Slots reference materials by name
        for mesh in self.objects.iter_mut().filter_map(|o| o.mesh.as_mut()) {
            for slot in mesh.materials.iter_mut().filter(|s| s.as_str() == from) {
                *slot = to.to_string();
            }
        }
        Ok(())
    }

    fn mesh_objects(&self) -> Vec<&SceneObject> {
        self.objects.iter().filter(|o| o.is_mesh()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Mesh, ObjectKind};
    use cs2forge_core::{Color, Vec3};

    fn triangle() -> Mesh {
        Mesh {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![vec![0, 1, 2]],
            materials: vec!["Wood".to_string()],
            face_materials: vec![],
        }
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let mut scene = Scene::new();
        scene.add_material(Material::new("Wood")).unwrap();
        let err = scene.add_material(Material::new("Wood")).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { kind: "material", .. }));
    }

    #[test]
    fn test_rename_updates_slots() {
        let mut scene = Scene::new();
        scene.add_material(Material::new("Wood")).unwrap();
        scene.add_object(SceneObject::mesh("Tri", triangle())).unwrap();

        scene.rename_material("Wood", "materials/Wood").unwrap();

        assert!(scene.material("Wood").is_none());
        assert!(scene.material("materials/Wood").is_some());
        let mesh = scene.objects()[0].mesh.as_ref().unwrap();
        assert_eq!(mesh.materials, vec!["materials/Wood".to_string()]);
    }

    #[test]
    fn test_rename_missing_and_conflicting() {
        let mut scene = Scene::new();
        scene.add_material(Material::new("A")).unwrap();
        scene.add_material(Material::new("B")).unwrap();
        assert!(scene.rename_material("C", "D").unwrap_err().is_not_found());
        assert!(scene.rename_material("A", "B").is_err());
        assert!(scene.rename_material("A", "A").is_ok());
    }

    #[test]
    fn test_mesh_objects_skip_non_mesh() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::mesh("Tri", triangle())).unwrap();
        let mut camera = SceneObject::mesh("Cam", Mesh::default());
        camera.kind = ObjectKind::Camera;
        scene.add_object(camera).unwrap();

        let names: Vec<_> = scene.mesh_objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Tri"]);
    }

    #[test]
    fn test_image_host_scale() {
        let mut scene = Scene::new();
        scene
            .add_image(SceneImage::solid("wood_tex", ImageSize::new(257, 129), Color::WHITE).unwrap())
            .unwrap();
        scene.scale_image("wood_tex", ImageSize::new(256, 128)).unwrap();
        assert_eq!(scene.image_size("wood_tex"), Some(ImageSize::new(256, 128)));
        assert!(scene.scale_image("missing", ImageSize::new(4, 4)).is_err());
    }
}
