//! FBX exporter implementation

use std::path::Path;

use cs2forge_core::Vec3;
use cs2forge_scene::{
    Axis, GeometryExportOptions, GeometryExporter, Mesh, ScaleMode, SceneObject, SmoothingMode,
};
use tracing::debug;

use super::writer::{quote, FbxWriter};
use super::{FbxExportError, FbxResult, FBX_VERSION};

/// Scene axes: forward +Y, up +Z, right-handed
const SOURCE_FORWARD: Axis = Axis::Y;
const SOURCE_UP: Axis = Axis::Z;

/// First object id; ids are assigned sequentially so output is reproducible
const BASE_ID: u64 = 1_000_000;

fn axis_vector(axis: Axis) -> Vec3 {
    match axis {
        Axis::X => Vec3::new(1.0, 0.0, 0.0),
        Axis::Y => Vec3::new(0.0, 1.0, 0.0),
        Axis::Z => Vec3::new(0.0, 0.0, 1.0),
        Axis::NegX => Vec3::new(-1.0, 0.0, 0.0),
        Axis::NegY => Vec3::new(0.0, -1.0, 0.0),
        Axis::NegZ => Vec3::new(0.0, 0.0, -1.0),
    }
}

/// Rotation taking scene axes (forward +Y, up +Z) onto `forward` / `up`
///
/// Rows of the returned matrix; apply with [`transform`].
pub fn axis_matrix(forward: Axis, up: Axis) -> FbxResult<[Vec3; 3]> {
    let f = axis_vector(forward);
    let u = axis_vector(up);
    if f.dot(&u) != 0.0 {
        return Err(FbxExportError::InvalidAxes {
            forward: forward.label().to_string(),
            up: up.label().to_string(),
        });
    }
    let r = f.cross(&u);

    // Columns are the images of the scene's right (+X), forward and up axes
    Ok([
        Vec3::new(r.x, f.x, u.x),
        Vec3::new(r.y, f.y, u.y),
        Vec3::new(r.z, f.z, u.z),
    ])
}

fn transform(m: &[Vec3; 3], v: Vec3) -> Vec3 {
    Vec3::new(m[0].dot(&v), m[1].dot(&v), m[2].dot(&v))
}

/// Target axis index and sign for GlobalSettings
fn axis_setting(axis: Axis) -> (i32, i32) {
    match axis {
        Axis::X => (0, 1),
        Axis::Y => (1, 1),
        Axis::Z => (2, 1),
        Axis::NegX => (0, -1),
        Axis::NegY => (1, -1),
        Axis::NegZ => (2, -1),
    }
}

fn unit_scale_factor(mode: ScaleMode) -> f64 {
    match mode {
        // Scene units are meters; FBX units are centimeters
        ScaleMode::FbxUnits => 100.0,
        ScaleMode::All => 1.0,
    }
}

struct ObjectIds {
    model: u64,
    geometry: u64,
}

/// ASCII FBX geometry exporter
#[derive(Debug, Default)]
pub struct FbxExporter {
    /// Creator string written in the header
    pub creator: String,
}

impl FbxExporter {
    /// Exporter with the crate version as creator
    pub fn new() -> Self {
        Self {
            creator: format!("cs2forge {}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Render `objects` as FBX text
    pub fn render(&self, objects: &[&SceneObject], options: &GeometryExportOptions) -> FbxResult<String> {
        if options.smoothing == SmoothingMode::Edge {
            return Err(FbxExportError::Unsupported("per-edge smoothing".to_string()));
        }

        let meshes: Vec<(&SceneObject, &Mesh)> = objects
            .iter()
            .filter_map(|o| o.mesh_data().map(|m| (*o, m)))
            .collect();
        if meshes.is_empty() {
            return Err(FbxExportError::Empty);
        }
        for (object, mesh) in &meshes {
            mesh.validate().map_err(|message| FbxExportError::InvalidMeshData {
                object: object.name.clone(),
                message,
            })?;
        }

        let basis = if options.bake_space_transform {
            axis_matrix(options.axis_forward, options.axis_up)?
        } else {
            axis_matrix(SOURCE_FORWARD, SOURCE_UP)?
        };
        let (up_axis, up_sign) = if options.bake_space_transform {
            axis_setting(options.axis_up)
        } else {
            axis_setting(SOURCE_UP)
        };
        let (front_axis, front_sign) = if options.bake_space_transform {
            axis_setting(options.axis_forward)
        } else {
            axis_setting(SOURCE_FORWARD)
        };

        // Materials are shared across objects by name
        let mut material_names: Vec<&str> = Vec::new();
        for (_, mesh) in &meshes {
            for slot in &mesh.materials {
                if !material_names.contains(&slot.as_str()) {
                    material_names.push(slot);
                }
            }
        }

        let mut next_id = BASE_ID;
        let mut alloc = || {
            next_id += 1;
            next_id
        };
        let ids: Vec<ObjectIds> = meshes
            .iter()
            .map(|_| ObjectIds {
                model: alloc(),
                geometry: alloc(),
            })
            .collect();
        let material_ids: Vec<u64> = material_names.iter().map(|_| alloc()).collect();

        let mut w = FbxWriter::new();
        w.comment("FBX 7.4.0 project file");
        w.comment("----------------------------------------------------");
        w.blank();

        w.begin("FBXHeaderExtension", "");
        w.field("FBXHeaderVersion", 1003);
        w.field("FBXVersion", FBX_VERSION);
        w.string_field("Creator", &self.creator);
        w.end();

        w.begin("GlobalSettings", "");
        w.field("Version", 1000);
        w.begin("Properties70", "");
        let right = basis_right_axis(up_axis, front_axis);
        for (name, value) in [
            ("UpAxis", up_axis),
            ("UpAxisSign", up_sign),
            ("FrontAxis", front_axis),
            ("FrontAxisSign", front_sign),
            ("CoordAxis", right),
            ("CoordAxisSign", 1),
        ] {
            w.property(name, "int", "Integer", "", &[value.to_string()]);
        }
        w.property(
            "UnitScaleFactor",
            "double",
            "Number",
            "",
            &[unit_scale_factor(options.scale_mode).to_string()],
        );
        w.end();
        w.end();

        w.begin("Definitions", "");
        w.field("Version", 100);
        w.field("Count", meshes.len() * 2 + material_names.len());
        for (kind, count) in [
            ("Model", meshes.len()),
            ("Geometry", meshes.len()),
            ("Material", material_names.len()),
        ] {
            if count > 0 {
                w.begin("ObjectType", &format!("\"{}\"", kind));
                w.field("Count", count);
                w.end();
            }
        }
        w.end();

        w.begin("Objects", "");
        for ((object, mesh), id) in meshes.iter().zip(&ids) {
            debug!(object = %object.name, vertices = mesh.vertex_count(), faces = mesh.face_count(), "Writing FBX mesh");
            write_geometry(&mut w, id.geometry, object, mesh, &basis, options);
            write_model(&mut w, id.model, object, &basis);
        }
        for (name, id) in material_names.iter().zip(&material_ids) {
            w.begin("Material", &format!("{}, {}, \"\"", id, object_name("Material", name)));
            w.field("Version", 102);
            w.string_field("ShadingModel", "phong");
            w.field("MultiLayer", 0);
            w.end();
        }
        w.end();

        w.begin("Connections", "");
        for ((_, mesh), id) in meshes.iter().zip(&ids) {
            w.field("C", format!("\"OO\",{},0", id.model));
            w.field("C", format!("\"OO\",{},{}", id.geometry, id.model));
            for slot in &mesh.materials {
                if let Some(i) = material_names.iter().position(|n| n == slot) {
                    w.field("C", format!("\"OO\",{},{}", material_ids[i], id.model));
                }
            }
        }
        w.end();

        Ok(w.finish())
    }

    /// Render and write `objects` to `path`
    pub fn write(
        &self,
        objects: &[&SceneObject],
        path: &Path,
        options: &GeometryExportOptions,
    ) -> FbxResult<()> {
        let text = self.render(objects, options)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl GeometryExporter for FbxExporter {
    fn export_geometry(
        &mut self,
        objects: &[&SceneObject],
        path: &Path,
        options: &GeometryExportOptions,
    ) -> cs2forge_core::Result<()> {
        Ok(self.write(objects, path, options)?)
    }
}

fn basis_right_axis(up: i32, front: i32) -> i32 {
    3 - up - front
}

/// `Class::name` as a quoted FBX object name
fn object_name(class: &str, name: &str) -> String {
    quote(&format!("{}::{}", class, name))
}

fn write_geometry(
    w: &mut FbxWriter,
    id: u64,
    object: &SceneObject,
    mesh: &Mesh,
    basis: &[Vec3; 3],
    options: &GeometryExportOptions,
) {
    w.begin(
        "Geometry",
        &format!("{}, {}, \"Mesh\"", id, object_name("Geometry", &object.name)),
    );

    // Modifiers are already applied to scene meshes, so the stored mesh is
    // the evaluated one.
    let vertices: Vec<f64> = mesh
        .vertices
        .iter()
        .flat_map(|v| {
            let t = transform(basis, *v);
            [t.x as f64, t.y as f64, t.z as f64]
        })
        .collect();
    w.array("Vertices", &vertices);

    // The last index of each polygon is stored as -(index + 1)
    let indices: Vec<i64> = mesh
        .faces
        .iter()
        .flat_map(|face| {
            let last = face.len() - 1;
            face.iter().enumerate().map(move |(i, &v)| {
                if i == last {
                    -(v as i64) - 1
                } else {
                    v as i64
                }
            })
        })
        .collect();
    w.array("PolygonVertexIndex", &indices);
    w.field("GeometryVersion", 124);

    let normals: Vec<f64> = (0..mesh.face_count())
        .flat_map(|i| {
            let n = transform(basis, mesh.face_normal(i));
            let corner = [n.x as f64, n.y as f64, n.z as f64];
            std::iter::repeat(corner).take(mesh.faces[i].len()).flatten()
        })
        .collect();
    w.begin("LayerElementNormal", "0");
    w.field("Version", 102);
    w.string_field("Name", "");
    w.string_field("MappingInformationType", "ByPolygonVertex");
    w.string_field("ReferenceInformationType", "Direct");
    w.array("Normals", &normals);
    w.end();

    let write_smoothing = options.smoothing == SmoothingMode::Face;
    if write_smoothing {
        w.begin("LayerElementSmoothing", "0");
        w.field("Version", 102);
        w.string_field("Name", "");
        w.string_field("MappingInformationType", "ByPolygon");
        w.string_field("ReferenceInformationType", "Direct");
        w.array("Smoothing", &vec![0i32; mesh.face_count()]);
        w.end();
    }

    let write_materials = !mesh.materials.is_empty();
    if write_materials {
        let per_face: Vec<u32> = (0..mesh.face_count()).map(|i| mesh.face_material(i)).collect();
        w.begin("LayerElementMaterial", "0");
        w.field("Version", 101);
        w.string_field("Name", "");
        w.string_field("MappingInformationType", "ByPolygon");
        w.string_field("ReferenceInformationType", "IndexToDirect");
        w.array("Materials", &per_face);
        w.end();
    }

    w.begin("Layer", "0");
    w.field("Version", 100);
    let mut layer_elements = vec!["LayerElementNormal"];
    if write_smoothing {
        layer_elements.push("LayerElementSmoothing");
    }
    if write_materials {
        layer_elements.push("LayerElementMaterial");
    }
    for element in layer_elements {
        w.begin("LayerElement", "");
        w.string_field("Type", element);
        w.field("TypedIndex", 0);
        w.end();
    }
    w.end();

    w.end();
}

fn write_model(w: &mut FbxWriter, id: u64, object: &SceneObject, basis: &[Vec3; 3]) {
    w.begin(
        "Model",
        &format!("{}, {}, \"Mesh\"", id, object_name("Model", &object.name)),
    );
    w.field("Version", 232);
    w.begin("Properties70", "");

    let location = transform(basis, object.location);
    // Axis permutation of the scale; signs don't apply to magnitudes
    let scale = transform(basis, object.scale);
    let scale = Vec3::new(scale.x.abs(), scale.y.abs(), scale.z.abs());
    w.property(
        "Lcl Translation",
        "Lcl Translation",
        "",
        "A",
        &[location.x, location.y, location.z].map(|c| c.to_string()),
    );
    w.property(
        "Lcl Scaling",
        "Lcl Scaling",
        "",
        "A",
        &[scale.x, scale.y, scale.z].map(|c| c.to_string()),
    );
    w.end();
    w.string_field("Culling", "CullingOff");
    w.end();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_object(name: &str) -> SceneObject {
        let mesh = Mesh {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![vec![0, 1, 2, 3]],
            materials: vec!["materials/Wood".to_string()],
            face_materials: vec![],
        };
        SceneObject::mesh(name, mesh)
    }

    #[test]
    fn test_source2_axis_matrix() {
        let m = axis_matrix(Axis::NegZ, Axis::Y).unwrap();
        // Scene up (+Z) becomes +Y, scene forward (+Y) becomes -Z
        assert_eq!(transform(&m, Vec3::new(0.0, 0.0, 1.0)), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(transform(&m, Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(transform(&m, Vec3::new(1.0, 0.0, 0.0)), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_identity_axis_matrix() {
        let m = axis_matrix(Axis::Y, Axis::Z).unwrap();
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(transform(&m, v), v);
    }

    #[test]
    fn test_parallel_axes_rejected() {
        assert!(matches!(
            axis_matrix(Axis::Z, Axis::NegZ),
            Err(FbxExportError::InvalidAxes { .. })
        ));
    }

    #[test]
    fn test_render_quad() {
        let obj = quad_object("Plank");
        let text = FbxExporter::new()
            .render(&[&obj], &GeometryExportOptions::SOURCE2)
            .unwrap();

        assert!(text.starts_with("; FBX 7.4.0 project file\n"));
        assert!(text.contains("Geometry: 1000002, \"Geometry::Plank\", \"Mesh\" {"));
        assert!(text.contains("Model: 1000001, \"Model::Plank\", \"Mesh\" {"));
        assert!(text.contains("Material: 1000003, \"Material::materials/Wood\", \"\" {"));
        assert!(text.contains("PolygonVertexIndex: *4 {\n\t\t\ta: 0,1,2,-4\n"));
        // (x, y, z) -> (x, z, -y)
        assert!(text.contains("a: 0,0,0,1,0,0,1,0,-1,0,0,-1\n"));
        assert!(text.contains("P: \"UpAxis\", \"int\", \"Integer\", \"\",1\n"));
        assert!(text.contains("C: \"OO\",1000002,1000001\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = quad_object("A");
        let b = quad_object("B");
        let exporter = FbxExporter::new();
        let first = exporter.render(&[&a, &b], &GeometryExportOptions::SOURCE2).unwrap();
        let second = exporter.render(&[&a, &b], &GeometryExportOptions::SOURCE2).unwrap();
        assert_eq!(first, second);
        // One shared material
        assert_eq!(first.matches("Material::materials/Wood").count(), 1);
    }

    #[test]
    fn test_empty_export_rejected() {
        let result = FbxExporter::new().render(&[], &GeometryExportOptions::SOURCE2);
        assert!(matches!(result, Err(FbxExportError::Empty)));
    }

    #[test]
    fn test_invalid_mesh_rejected() {
        let mut obj = quad_object("Bad");
        obj.mesh.as_mut().unwrap().faces.push(vec![0, 9, 1]);
        let err = FbxExporter::new()
            .render(&[&obj], &GeometryExportOptions::SOURCE2)
            .unwrap_err();
        assert!(err.to_string().contains("Bad"));
    }

    #[test]
    fn test_export_geometry_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Plank.fbx");
        let obj = quad_object("Plank");
        FbxExporter::new()
            .export_geometry(&[&obj], &path, &GeometryExportOptions::SOURCE2)
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("FBXVersion: 7400"));
    }
}
