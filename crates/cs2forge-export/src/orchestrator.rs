//! Export orchestration
//!
//! One [`ExportRun`] turns a scene into the Source 2 asset layout:
//!
//! ```text
//! <dest>/
//!   materials/<material>.vmat, <texture>.tga
//!   models/<object>.fbx
//!   combined.fbx
//! ```
//!
//! Only a bad destination stops a run. Every later failure is logged,
//! recorded in the [`ExportReport`] and skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cs2forge_core::{Error, Result, ResultExt};
use cs2forge_scene::material::{prefixed_name, vmat_stem};
use cs2forge_scene::path::{sanitize_file_stem, MATERIALS_DIR};
use cs2forge_scene::{GeometryExportOptions, GeometryExporter, SceneHost, SceneObject};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::surface::classify;
use crate::textures::{materialize, resolve, Channel, TextureNaming, TextureSet};
use crate::vmat::{VmatDocument, DEFAULT_SHADER, EXTENSION};

/// Directory per-object geometry is written to
pub const MODELS_DIR: &str = "models";

/// File name of the all-objects geometry file
pub const COMBINED_FILE: &str = "combined.fbx";

/// Export configuration
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Write every mesh object into `combined.fbx`
    pub combined: bool,
    /// Write each mesh object into `models/<object>.fbx`
    pub per_object: bool,
    /// Baked texture file naming
    pub texture_naming: TextureNaming,
    /// Shader program of generated materials
    pub shader: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            combined: true,
            per_object: true,
            texture_naming: TextureNaming::default(),
            shader: DEFAULT_SHADER.to_string(),
        }
    }
}

/// Stages of an export run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    /// Not started
    Idle,
    /// Checking the destination directory
    ValidatingDestination,
    /// Adding the `materials/` prefix to material names
    PrefixingNames,
    /// Writing `.vmat` files and baking textures
    ExportingMaterials,
    /// Writing FBX files
    ExportingGeometry,
    /// Finished, possibly with per-item failures
    Done,
    /// Destination was rejected; nothing was written
    Failed,
}

/// Progress information during a run
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current phase
    pub phase: ExportPhase,
    /// Material or object being processed
    pub current_item: Option<String>,
    /// Items finished in the current phase
    pub items_processed: u64,
    /// Items in the current phase, if known
    pub total_items: Option<u64>,
}

impl ExportProgress {
    /// Fraction of the current phase done (0.0 - 1.0)
    pub fn percentage(&self) -> Option<f32> {
        self.total_items.map(|total| {
            if total == 0 {
                1.0
            } else {
                self.items_processed as f32 / total as f32
            }
        })
    }
}

/// Progress callback
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

fn emit(
    progress: Option<&ProgressCallback>,
    phase: ExportPhase,
    current_item: Option<&str>,
    items_processed: u64,
    total_items: Option<u64>,
) {
    if let Some(cb) = progress {
        cb(ExportProgress {
            phase,
            current_item: current_item.map(str::to_string),
            items_processed,
            total_items,
        });
    }
}

/// A material written by the run
#[derive(Debug, Clone, Serialize)]
pub struct MaterialExport {
    /// Material name after prefixing
    pub name: String,
    /// Written `.vmat` file
    pub path: PathBuf,
    /// Physics surface property
    pub surface: &'static str,
    /// Engine paths of baked textures; `None` channels use defaults
    pub textures: TextureSet<String>,
}

/// A material, texture or object that could not be written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportFailure {
    /// Material, image or object name
    pub item: String,
    /// What went wrong
    pub error: String,
}

impl ExportFailure {
    fn new(item: impl Into<String>, error: impl ToString) -> Self {
        Self {
            item: item.into(),
            error: error.to_string(),
        }
    }
}

/// Outcome of an export run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    /// Directory the run wrote into
    pub destination: PathBuf,
    /// Materials renamed to carry the `materials/` prefix
    pub renamed: Vec<String>,
    /// Written materials
    pub materials: Vec<MaterialExport>,
    /// Materials that could not be renamed or written
    pub material_failures: Vec<ExportFailure>,
    /// Textures that fell back to the engine default
    pub texture_failures: Vec<ExportFailure>,
    /// Per-object geometry files
    pub objects: Vec<PathBuf>,
    /// Objects whose geometry file could not be written
    pub object_failures: Vec<ExportFailure>,
    /// The all-objects geometry file, if written
    pub combined: Option<PathBuf>,
    /// Why `combined.fbx` could not be written
    pub combined_failure: Option<String>,
}

impl ExportReport {
    fn new(destination: &Path) -> Self {
        Self {
            destination: destination.to_path_buf(),
            ..Default::default()
        }
    }

    /// Whether every item was written
    pub fn is_complete(&self) -> bool {
        self.material_failures.is_empty()
            && self.texture_failures.is_empty()
            && self.object_failures.is_empty()
            && self.combined_failure.is_none()
    }

    /// Number of failed items across every phase
    pub fn failure_count(&self) -> usize {
        self.material_failures.len()
            + self.texture_failures.len()
            + self.object_failures.len()
            + usize::from(self.combined_failure.is_some())
    }

    /// User-facing completion message
    pub fn summary(&self) -> String {
        format!("Exported CS2 assets to {}", self.destination.display())
    }
}

/// One export of a scene into a destination directory
pub struct ExportRun<'a, H: SceneHost, G: GeometryExporter + ?Sized> {
    host: &'a mut H,
    geometry: &'a mut G,
    options: ExportOptions,
    phase: ExportPhase,
    progress: Option<ProgressCallback>,
    /// Baked textures keyed by (image, file stem)
    baked: HashMap<(String, String), Option<String>>,
    /// Image each texture file stem was claimed by
    texture_owners: HashMap<String, String>,
    /// Material each `.vmat` file was written for
    vmat_owners: HashMap<PathBuf, String>,
}

impl<'a, H: SceneHost, G: GeometryExporter + ?Sized> ExportRun<'a, H, G> {
    /// Run over `host`, writing geometry with `geometry`
    pub fn new(host: &'a mut H, geometry: &'a mut G, options: ExportOptions) -> Self {
        Self {
            host,
            geometry,
            options,
            phase: ExportPhase::Idle,
            progress: None,
            baked: HashMap::new(),
            texture_owners: HashMap::new(),
            vmat_owners: HashMap::new(),
        }
    }

    /// Report progress to `callback`
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Current phase
    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    fn enter(&mut self, phase: ExportPhase) {
        debug!(from = ?self.phase, to = ?phase, "Export phase");
        self.phase = phase;
        emit(self.progress.as_ref(), phase, None, 0, None);
    }

    /// Export into `dest`, which must be an existing directory
    pub fn run(&mut self, dest: impl AsRef<Path>) -> Result<ExportReport> {
        let dest = dest.as_ref();
        self.baked.clear();
        self.texture_owners.clear();
        self.vmat_owners.clear();

        self.enter(ExportPhase::ValidatingDestination);
        if !dest.is_dir() {
            self.enter(ExportPhase::Failed);
            error!(destination = %dest.display(), "Export destination is not a directory");
            return Err(Error::InvalidDestination(dest.to_path_buf()));
        }
        info!(destination = %dest.display(), "Starting CS2 export");

        let mut report = ExportReport::new(dest);

        self.enter(ExportPhase::PrefixingNames);
        self.prefix_names(&mut report);

        self.enter(ExportPhase::ExportingMaterials);
        self.export_materials(&dest.join(MATERIALS_DIR), &mut report);

        self.enter(ExportPhase::ExportingGeometry);
        self.export_geometry(dest, &mut report);

        self.enter(ExportPhase::Done);
        info!(
            materials = report.materials.len(),
            objects = report.objects.len(),
            failures = report.failure_count(),
            "{}",
            report.summary()
        );
        Ok(report)
    }

    fn prefix_names(&mut self, report: &mut ExportReport) {
        for name in self.host.material_names() {
            let Some(prefixed) = prefixed_name(&name) else {
                continue;
            };
            let target = self.free_material_name(&prefixed);
            if target != prefixed {
                warn!(material = %name, taken = %prefixed, to = %target, "Prefixed name is taken");
            }
            match self.host.rename_material(&name, &target) {
                Ok(()) => {
                    debug!(from = %name, to = %target, "Renamed material");
                    report.renamed.push(target);
                }
                Err(e) => {
                    warn!(material = %name, error = %e, "Failed to prefix material name");
                    report.material_failures.push(ExportFailure::new(name, e));
                }
            }
        }
        info!(count = report.renamed.len(), "Prefixed material names");
    }

    /// `wanted`, or the first free `wanted.001`, `wanted.002`, ...
    fn free_material_name(&self, wanted: &str) -> String {
        let taken = self.host.material_names();
        if !taken.iter().any(|n| n == wanted) {
            return wanted.to_string();
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{}.{:03}", wanted, n);
            if !taken.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn export_materials(&mut self, dir: &Path, report: &mut ExportReport) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            error!(dir = %dir.display(), error = %e, "Failed to create materials directory");
        }

        let names = self.host.material_names();
        let total = names.len() as u64;
        for (i, name) in names.iter().enumerate() {
            emit(self.progress.as_ref(), self.phase, Some(name.as_str()), i as u64, Some(total));
            match self.export_material(name, dir, report) {
                Ok(material) => report.materials.push(material),
                Err(e) => {
                    error!(material = %name, error = %e, "Failed to write material");
                    report.material_failures.push(ExportFailure::new(name.as_str(), e));
                }
            }
        }
        emit(self.progress.as_ref(), self.phase, None, total, Some(total));
        info!(count = report.materials.len(), "Exported materials");
    }

    fn export_material(
        &mut self,
        name: &str,
        dir: &Path,
        report: &mut ExportReport,
    ) -> Result<MaterialExport> {
        let surface = classify(name);
        let images = resolve(self.host.material_graph(name));
        let stem = vmat_stem(name);

        let path = dir.join(format!("{}.{}", sanitize_file_stem(&stem), EXTENSION));
        if let Some(owner) = self.vmat_owners.get(&path) {
            return Err(Error::DuplicateName {
                kind: "material file",
                name: format!("{} (already written for {})", path.display(), owner),
            });
        }

        let mut textures = TextureSet::empty();
        for channel in Channel::ALL {
            let Some(image) = images.get(channel) else {
                continue;
            };
            let path = self.bake(channel, &stem, image, dir);
            if path.is_none() {
                report
                    .texture_failures
                    .push(ExportFailure::new(image.as_str(), format!("{} of {}", channel, name)));
            }
            textures.set(channel, path);
        }

        let document = VmatDocument::new(textures.clone(), surface).with_shader(&self.options.shader);
        document
            .write_to(&path)
            .map_err(Error::from)
            .with_context(|| format!("writing {}", path.display()))?;
        self.vmat_owners.insert(path.clone(), name.to_string());
        debug!(material = %name, surface, path = %path.display(), "Wrote material");

        Ok(MaterialExport {
            name: name.to_string(),
            path,
            surface,
            textures,
        })
    }

    /// Bake an image once per file stem
    fn bake(&mut self, channel: Channel, stem: &str, image: &str, dir: &Path) -> Option<String> {
        let preferred = self.options.texture_naming.base_name(channel, stem, image);
        let base = self.claim_texture_stem(&preferred, image);
        let key = (image.to_string(), base);
        if let Some(path) = self.baked.get(&key) {
            return path.clone();
        }
        let path = materialize(&mut *self.host, image, dir, &key.1);
        self.baked.insert(key, path.clone());
        path
    }

    /// Reserve a texture file stem for `image`
    ///
    /// Distinct images never share a stem: when `preferred` belongs to
    /// another image, `preferred_1`, `preferred_2`, ... are tried in turn.
    fn claim_texture_stem(&mut self, preferred: &str, image: &str) -> String {
        let mut stem = preferred.to_string();
        let mut n = 1u32;
        loop {
            match self.texture_owners.get(&stem) {
                None => {
                    self.texture_owners.insert(stem.clone(), image.to_string());
                    break;
                }
                Some(owner) if owner == image => break,
                Some(owner) => {
                    debug!(stem = %stem, owner = %owner, image, "Texture stem is taken");
                    stem = format!("{}_{}", preferred, n);
                    n += 1;
                }
            }
        }
        if stem != preferred {
            warn!(image, taken = %preferred, stem = %stem, "Texture stem is taken by another image");
        }
        stem
    }

    fn export_geometry(&mut self, dest: &Path, report: &mut ExportReport) {
        let options = GeometryExportOptions::SOURCE2;
        let objects: Vec<&SceneObject> = self.host.mesh_objects();
        if objects.is_empty() {
            info!("No mesh objects to export");
            return;
        }

        if self.options.per_object {
            let dir = dest.join(MODELS_DIR);
            if let Err(e) = std::fs::create_dir_all(&dir) {
                error!(dir = %dir.display(), error = %e, "Failed to create models directory");
            }
            let total = objects.len() as u64;
            for (i, object) in objects.iter().enumerate() {
                let item = Some(object.name.as_str());
                emit(self.progress.as_ref(), self.phase, item, i as u64, Some(total));
                let path = dir.join(format!("{}.fbx", sanitize_file_stem(&object.name)));
                match self.geometry.export_geometry(&[*object], &path, &options) {
                    Ok(()) => {
                        debug!(object = %object.name, path = %path.display(), "Exported object");
                        report.objects.push(path);
                    }
                    Err(e) => {
                        error!(object = %object.name, error = %e, "Failed to export object");
                        report
                            .object_failures
                            .push(ExportFailure::new(object.name.as_str(), e));
                    }
                }
            }
        }

        if self.options.combined {
            let path = dest.join(COMBINED_FILE);
            match self.geometry.export_geometry(&objects, &path, &options) {
                Ok(()) => {
                    debug!(objects = objects.len(), path = %path.display(), "Exported combined geometry");
                    report.combined = Some(path);
                }
                Err(e) => {
                    error!(error = %e, "Failed to export combined geometry");
                    report.combined_failure = Some(e.to_string());
                }
            }
        }
        info!(
            objects = report.objects.len(),
            combined = report.combined.is_some(),
            "Exported geometry"
        );
    }
}

/// Export `host` into `dest` in one call
pub fn export_scene<H: SceneHost, G: GeometryExporter + ?Sized>(
    host: &mut H,
    geometry: &mut G,
    dest: impl AsRef<Path>,
    options: ExportOptions,
) -> Result<ExportReport> {
    ExportRun::new(host, geometry, options).run(dest)
}
