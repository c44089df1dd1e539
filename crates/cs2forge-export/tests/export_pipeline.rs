//! End-to-end export tests against an in-memory scene and the FBX writer

use std::fs;
use std::path::Path;

use cs2forge_core::{Color, Error, ImageSize, Vec3};
use cs2forge_export::{export_scene, ExportOptions, FbxExporter};
use cs2forge_scene::{Material, Mesh, NodeTree, Scene, SceneImage, SceneObject, ShadingNode};

fn plank_mesh() -> Mesh {
    Mesh {
        vertices: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.5, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
        ],
        faces: vec![vec![0, 1, 2, 3]],
        materials: vec!["Wood_Plank_02".to_string()],
        face_materials: vec![],
    }
}

fn wood_scene() -> Scene {
    let mut tree = NodeTree::new();
    tree.add_node(ShadingNode::principled("Principled BSDF"));
    tree.add_node(ShadingNode::image_texture("Image Texture", "wood_tex"));
    tree.link("Image Texture", "Color", "Principled BSDF", "Base Color");

    let mut scene = Scene::new();
    scene
        .add_image(SceneImage::solid("wood_tex", ImageSize::new(257, 129), Color::rgb(140, 90, 40)).unwrap())
        .unwrap();
    scene
        .add_material(Material::with_node_tree("Wood_Plank_02", tree))
        .unwrap();
    scene.add_object(SceneObject::mesh("Plank", plank_mesh())).unwrap();
    scene
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_wood_plank_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = wood_scene();

    let report = export_scene(&mut scene, &mut FbxExporter::new(), dir.path(), ExportOptions::default()).unwrap();
    assert!(report.is_complete(), "{:?}", report);

    let vmat = read(dir.path().join("materials/Wood_Plank_02.vmat"));
    assert!(vmat.starts_with("// THIS FILE IS AUTO-GENERATED\n\nLayer0\n{\n"));
    assert!(vmat.contains("\tTextureColor \"materials/wood_tex.tga\"\n"));
    assert!(vmat.contains("\tTextureRoughness \"materials/default/default_rough.tga\"\n"));
    assert!(vmat.contains("\tTextureNormal \"materials/default/default_normal.tga\"\n"));
    assert!(vmat.contains("\t\tPhysicsSurfaceProperties \"wood\"\n"));

    let dims = image::image_dimensions(dir.path().join("materials/wood_tex.tga")).unwrap();
    assert_eq!(dims, (256, 128));

    // Material slot follows the rename
    let fbx = read(dir.path().join("models/Plank.fbx"));
    assert!(fbx.contains("Material::materials/Wood_Plank_02"));
    assert!(fbx.contains("Model::Plank"));
    assert!(dir.path().join("combined.fbx").is_file());
}

#[test]
fn test_second_run_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = wood_scene();
    let mut fbx = FbxExporter::new();

    let first = export_scene(&mut scene, &mut fbx, dir.path(), ExportOptions::default()).unwrap();
    let vmat_path = dir.path().join("materials/Wood_Plank_02.vmat");
    let vmat = fs::read(&vmat_path).unwrap();
    let combined = fs::read(dir.path().join("combined.fbx")).unwrap();

    let second = export_scene(&mut scene, &mut fbx, dir.path(), ExportOptions::default()).unwrap();
    assert_eq!(first.renamed, vec!["materials/Wood_Plank_02"]);
    assert!(second.renamed.is_empty());
    assert!(scene.material("materials/Wood_Plank_02").is_some());
    assert!(scene.material("materials/materials/Wood_Plank_02").is_none());

    assert_eq!(fs::read(&vmat_path).unwrap(), vmat);
    assert_eq!(fs::read(dir.path().join("combined.fbx")).unwrap(), combined);
}

#[test]
fn test_missing_destination_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("does/not/exist");
    let mut scene = wood_scene();

    let err = export_scene(&mut scene, &mut FbxExporter::new(), &dest, ExportOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidDestination(_)));
    assert!(err.to_string().starts_with("Please select a valid directory."));
    assert!(!dir.path().join("does").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_material_without_graph_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = Scene::new();
    scene.add_material(Material::new("unknown_prop")).unwrap();

    let report = export_scene(&mut scene, &mut FbxExporter::new(), dir.path(), ExportOptions::default()).unwrap();
    assert!(report.objects.is_empty());
    assert!(report.combined.is_none());

    let vmat = read(dir.path().join("materials/unknown_prop.vmat"));
    assert!(vmat.contains("\tTextureColor \"materials/default/default_color.tga\"\n"));
    assert!(vmat.contains("\tTextureRoughness \"materials/default/default_rough.tga\"\n"));
    assert!(vmat.contains("\tTextureNormal \"materials/default/default_normal.tga\"\n"));
    assert!(vmat.ends_with("\t\tPhysicsSurfaceProperties \"default\"\n\t}\n}"));
    assert!(!dir.path().join("models").exists());
}

#[test]
fn test_normal_through_adapter() {
    let dir = tempfile::tempdir().unwrap();
    let mut tree = NodeTree::new();
    tree.add_node(ShadingNode::principled("BSDF"));
    tree.add_node(ShadingNode::normal_map("Normal Map"));
    tree.add_node(ShadingNode::image_texture("Normals", "brick_n"));
    tree.link("Normals", "Color", "Normal Map", "Color");
    tree.link("Normal Map", "Normal", "BSDF", "Normal");

    let mut scene = Scene::new();
    scene
        .add_image(SceneImage::solid("brick_n", ImageSize::new(3, 3), Color::FLAT_NORMAL).unwrap())
        .unwrap();
    scene.add_material(Material::with_node_tree("old_brick_wall", tree)).unwrap();

    export_scene(&mut scene, &mut FbxExporter::new(), dir.path(), ExportOptions::default()).unwrap();
    let vmat = read(dir.path().join("materials/old_brick_wall.vmat"));
    assert!(vmat.contains("\tTextureNormal \"materials/brick_n.tga\"\n"));
    assert!(vmat.contains("PhysicsSurfaceProperties \"brick\""));

    // Smaller than one block: grown to the minimum
    let dims = image::image_dimensions(dir.path().join("materials/brick_n.tga")).unwrap();
    assert_eq!(dims, (4, 4));
}

#[test]
fn test_nested_material_name_uses_last_segment() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = Scene::new();
    scene.add_material(Material::new("materials/props/metal_box_01")).unwrap();

    let report = export_scene(&mut scene, &mut FbxExporter::new(), dir.path(), ExportOptions::default()).unwrap();
    assert!(report.renamed.is_empty());
    assert_eq!(report.materials[0].surface, "metal_box");
    assert!(dir.path().join("materials/metal_box_01.vmat").is_file());
}
