//! Loading scenes from manifest files on disk

use std::fs;

use cs2forge_core::{Error, ImageSize};
use cs2forge_scene::{load_scene, ImageHost, ManifestError, SceneHost, ShadingGraph};

const MANIFEST: &str = r#"
images:
  - name: wood_tex
    path: textures/wood.png
materials:
  - name: Wood_Plank_02
    node_tree:
      nodes:
        - { name: Principled BSDF, kind: BSDF_PRINCIPLED }
        - { name: Image Texture, kind: TEX_IMAGE, image: wood_tex }
      links:
        - { from: Image Texture, to: Principled BSDF, to_socket: Base Color }
objects:
  - name: Plank
    location: [1, 2, 3]
    mesh:
      vertices: [[0, 0, 0], [1, 0, 0], [1, 1, 0]]
      faces: [[0, 1, 2]]
      materials: [Wood_Plank_02]
  - name: Light
    type: light
"#;

#[test]
fn test_load_yaml_with_relative_image() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("textures")).unwrap();
    image::RgbaImage::from_pixel(10, 6, image::Rgba([200, 150, 100, 255]))
        .save(dir.path().join("textures/wood.png"))
        .unwrap();
    let path = dir.path().join("scene.yaml");
    fs::write(&path, MANIFEST).unwrap();

    let scene = load_scene(&path).unwrap();
    assert_eq!(scene.image_size("wood_tex"), Some(ImageSize::new(10, 6)));
    assert_eq!(scene.material_names(), vec!["Wood_Plank_02"]);

    let graph = scene.material_graph("Wood_Plank_02").unwrap();
    let bsdf = graph.principled_node().unwrap();
    let tex = graph.linked_upstream(bsdf, "Base Color").unwrap();
    assert_eq!(tex.bound_image(), Some("wood_tex"));

    let meshes = scene.mesh_objects();
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].name, "Plank");
    assert_eq!(meshes[0].location.z, 3.0);
}

#[test]
fn test_rename_round_trip_through_host() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("textures")).unwrap();
    image::RgbaImage::new(4, 4)
        .save(dir.path().join("textures/wood.png"))
        .unwrap();
    let path = dir.path().join("scene.yml");
    fs::write(&path, MANIFEST).unwrap();

    let mut scene = load_scene(&path).unwrap();
    scene
        .rename_material("Wood_Plank_02", "materials/Wood_Plank_02")
        .unwrap();
    assert!(scene.material_graph("materials/Wood_Plank_02").is_some());
    let objects = scene.mesh_objects();
    let slots = &objects[0].mesh.as_ref().unwrap().materials;
    assert_eq!(slots, &vec!["materials/Wood_Plank_02".to_string()]);
}

#[test]
fn test_missing_image_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.yaml");
    fs::write(&path, MANIFEST).unwrap();

    let err = load_scene(&path).unwrap_err();
    assert!(matches!(err, ManifestError::Scene(Error::FileNotFound(_))), "{:?}", err);
}

#[test]
fn test_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.toml");
    fs::write(&path, "").unwrap();
    let err = load_scene(&path).unwrap_err();
    assert!(matches!(err, ManifestError::UnsupportedExtension(ref ext) if ext == "toml"));
    assert!(matches!(Error::from(err), Error::InvalidManifest { .. }));
}
