//! cs2forge CLI
//!
//! Exports a scene manifest as Counter-Strike 2 materials, textures and
//! FBX models, and inspects how its materials will be translated.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use cs2forge_export::logging::{init_with_config, TracingConfig};
use cs2forge_export::surface::classify_all;
use cs2forge_export::textures::resolve;
use cs2forge_export::{
    classify, export_scene, Channel, ExportOptions, ExportReport, FbxExporter, TextureNaming,
};
use cs2forge_scene::{load_scene, SceneHost};

/// cs2forge - Counter-Strike 2 asset exporter
#[derive(Parser)]
#[command(name = "cs2forge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format for reports
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene into a CS2 addon content directory
    Export(ExportArgs),

    /// Show each material's textures and physics surface
    Inspect(InspectArgs),

    /// Classify material names into physics surfaces
    Classify(ClassifyArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Scene manifest (.json, .yaml)
    manifest: PathBuf,

    /// Existing destination directory
    dest: PathBuf,

    /// Skip combined.fbx
    #[arg(long)]
    no_combined: bool,

    /// Skip models/<object>.fbx
    #[arg(long)]
    no_per_object: bool,

    /// Texture file naming (image, material)
    #[arg(long, default_value = "image")]
    texture_naming: TextureNaming,

    /// Shader of generated materials
    #[arg(long)]
    shader: Option<String>,
}

#[derive(Args)]
struct InspectArgs {
    /// Scene manifest (.json, .yaml)
    manifest: PathBuf,
}

#[derive(Args)]
struct ClassifyArgs {
    /// Material names
    #[arg(required = true)]
    names: Vec<String>,
}

fn setup_logging(verbosity: u8) {
    init_with_config(TracingConfig::from_verbosity(verbosity));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Export(args) => cmd_export(args, cli.format),
        Commands::Inspect(args) => cmd_inspect(args, cli.format),
        Commands::Classify(args) => cmd_classify(args, cli.format),
    }
}

fn cmd_export(args: ExportArgs, format: OutputFormat) -> Result<()> {
    info!("Loading scene: {:?}", args.manifest);
    let mut scene = load_scene(&args.manifest)
        .with_context(|| format!("Failed to load scene manifest {}", args.manifest.display()))?;

    let mut options = ExportOptions {
        combined: !args.no_combined,
        per_object: !args.no_per_object,
        texture_naming: args.texture_naming,
        ..Default::default()
    };
    if let Some(shader) = args.shader {
        options.shader = shader;
    }
    debug!(?options, "Export options");

    let report = export_scene(&mut scene, &mut FbxExporter::new(), &args.dest, options)
        .map_err(|e| {
            if e.is_precondition() {
                anyhow::anyhow!("{}", e)
            } else {
                anyhow::Error::new(e).context("Export failed")
            }
        })?;
    print_report(&report, format)
}

fn print_report(report: &ExportReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            for material in &report.materials {
                println!("  {:<40} {:<12} {}", material.name, material.surface, material.path.display());
            }
            for object in &report.objects {
                println!("  {}", object.display());
            }
            if let Some(combined) = &report.combined {
                println!("  {}", combined.display());
            }

            let failures = report
                .material_failures
                .iter()
                .chain(&report.texture_failures)
                .chain(&report.object_failures);
            for failure in failures {
                println!("  FAILED {}: {}", failure.item, failure.error);
            }
            if let Some(error) = &report.combined_failure {
                println!("  FAILED combined.fbx: {}", error);
            }

            println!();
            println!("{}", report.summary());
            if !report.is_complete() {
                println!("{} item(s) failed, see log for details", report.failure_count());
            }
        }
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs, format: OutputFormat) -> Result<()> {
    let scene = load_scene(&args.manifest)
        .with_context(|| format!("Failed to load scene manifest {}", args.manifest.display()))?;

    let materials: Vec<_> = scene
        .material_names()
        .into_iter()
        .map(|name| {
            let textures = resolve(scene.material_graph(&name));
            let matches = classify_all(&name);
            (name, textures, matches)
        })
        .collect();
    let objects: Vec<_> = scene.mesh_objects().iter().map(|o| o.name.clone()).collect();

    match format {
        OutputFormat::Json => {
            let json_materials: Vec<_> = materials
                .iter()
                .map(|(name, textures, matches)| {
                    serde_json::json!({
                        "name": name,
                        "surface": classify(name),
                        "surface_matches": matches,
                        "textures": textures,
                    })
                })
                .collect();
            let json = serde_json::json!({
                "manifest": args.manifest,
                "materials": json_materials,
                "mesh_objects": objects,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("Scene: {}", args.manifest.display());
            println!();
            println!("Materials ({}):", materials.len());
            for (name, textures, matches) in &materials {
                println!("  {}", name);
                println!("    surface: {}", classify(name));
                if matches.len() > 1 {
                    println!("    also matches: {}", matches[1..].join(", "));
                }
                for channel in Channel::ALL {
                    let image = textures.get(channel).map(String::as_str).unwrap_or("-");
                    println!("    {:<10} {}", channel.to_string(), image);
                }
            }
            println!();
            println!("Mesh objects ({}):", objects.len());
            for name in &objects {
                println!("  {}", name);
            }
        }
    }
    Ok(())
}

fn cmd_classify(args: ClassifyArgs, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json: Vec<_> = args
                .names
                .iter()
                .map(|name| {
                    serde_json::json!({
                        "name": name,
                        "surface": classify(name),
                        "matches": classify_all(name),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            for name in &args.names {
                println!("{:<40} {}", name, classify(name));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_export_args() {
        let cli = Cli::try_parse_from([
            "cs2forge",
            "-vv",
            "export",
            "scene.yaml",
            "out",
            "--no-combined",
            "--texture-naming",
            "material",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Export(args) => {
                assert!(args.no_combined);
                assert!(!args.no_per_object);
                assert_eq!(args.texture_naming, TextureNaming::MaterialSuffix);
                assert_eq!(args.dest, PathBuf::from("out"));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_classify_requires_names() {
        assert!(Cli::try_parse_from(["cs2forge", "classify"]).is_err());
        assert!(Cli::try_parse_from(["cs2forge", "--format", "json", "classify", "glass"]).is_ok());
    }
}
