//! m3d CLI
//!
//! Command-line interface for exporting scene descriptions to m3d XML files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

use m3d_core::Error;
use m3d_export::{ChildPolicy, ExportOptions, ExportPlan, MeshXmlExporter, PlanNode, TransformMode};
use m3d_scene::{ObjectId, Scene, SceneHost};

/// m3d - export scene meshes to m3d XML
#[derive(Parser)]
#[command(name = "m3d")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

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
    /// Export the selected meshes, one file per root
    Export(ExportArgs),

    /// Show the object tree, selection and export plan of a scene
    Info(InfoArgs),

    /// Load a scene and check every mesh
    Validate(ValidateArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Path to the JSON scene description
    #[arg(short, long)]
    scene: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Select objects by name (can be repeated); replaces the stored selection
    #[arg(long)]
    select: Vec<String>,

    /// Child transform mode: legacy, hierarchical
    #[arg(long, default_value = "legacy")]
    transform: TransformMode,

    /// Which mesh children to nest: selected, all
    #[arg(long, default_value = "selected")]
    children: ChildPolicy,

    /// Dry run - show what would be exported
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Path to the JSON scene description
    #[arg(short, long)]
    scene: PathBuf,

    /// Output format: text, json
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Which mesh children to nest: selected, all
    #[arg(long, default_value = "selected")]
    children: ChildPolicy,
}

#[derive(Args)]
struct ValidateArgs {
    /// Path to the JSON scene description
    #[arg(short, long)]
    scene: PathBuf,

    /// Which mesh children to nest: selected, all
    #[arg(long, default_value = "selected")]
    children: ChildPolicy,
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_thread_ids(verbosity >= 3)
        .with_file(verbosity >= 3)
        .with_line_number(verbosity >= 3)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Export(args) => cmd_export(args),
        Commands::Info(args) => cmd_info(args),
        Commands::Validate(args) => cmd_validate(args),
    }
}

fn load_scene(path: &Path) -> Result<Scene> {
    info!("Loading scene: {:?}", path);
    Scene::load(path).with_context(|| format!("Failed to load scene {}", path.display()))
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let mut scene = load_scene(&args.scene)?;

    if !args.select.is_empty() {
        scene
            .select_by_name(&args.select)
            .context("Failed to apply --select")?;
    }

    let exporter = MeshXmlExporter::new(ExportOptions {
        transform_mode: args.transform,
        child_policy: args.children,
        ..ExportOptions::default()
    });

    if args.dry_run {
        let plan = exporter.plan(&scene);
        if plan.nothing_selected {
            println!("Nothing selected");
            return Ok(());
        }
        println!("Dry run - would export {} files:", plan.roots.len());
        let mut failed = 0;
        for root in &plan.roots {
            match check_root(&exporter, &scene, root) {
                Ok(file_name) => {
                    println!("  ✓ {}", args.output.join(file_name).display());
                    print_plan_node(root, 2);
                }
                Err(e) => {
                    failed += 1;
                    println!("  ✗ {} [{}]: {}", root.name, failure_kind(&e), e);
                }
            }
        }
        if failed > 0 {
            bail!("{} of {} objects would fail to export", failed, plan.roots.len());
        }
        return Ok(());
    }

    fs::create_dir_all(&args.output).context("Failed to create output directory")?;

    let report = exporter.export_selection(&scene, &args.output);
    if report.nothing_selected {
        println!("Nothing selected");
        return Ok(());
    }

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(stats) => println!(
                "  ✓ {} ({} meshes, {} vertices, {} faces)",
                outcome.path.display(),
                stats.meshes,
                stats.vertices,
                stats.faces
            ),
            Err(e) => println!("  ✗ {} [{}]: {}", outcome.name, failure_kind(e), e),
        }
    }

    let totals = report.totals();
    let failed = report.failed().count();
    println!(
        "\nExported {} of {} objects ({} meshes, {} vertices, {} faces)",
        report.succeeded().count(),
        report.outcomes.len(),
        totals.meshes,
        totals.vertices,
        totals.faces
    );

    if failed > 0 {
        bail!("{} of {} objects failed to export", failed, report.outcomes.len());
    }
    Ok(())
}

fn cmd_info(args: InfoArgs) -> Result<()> {
    let scene = load_scene(&args.scene)?;
    let plan = ExportPlan::build(&scene, args.children);

    match args.format {
        OutputFormat::Json => {
            let objects: Vec<_> = scene
                .objects()
                .map(|(id, object)| {
                    serde_json::json!({
                        "id": id.index(),
                        "name": object.name,
                        "kind": object.kind.as_str(),
                        "parent": object.parent.and_then(|p| scene.object(p)).map(|p| p.name.clone()),
                        "selected": scene.is_selected(id),
                        "vertices": object.mesh.as_ref().map(|m| m.vertex_count()),
                        "faces": object.mesh.as_ref().map(|m| m.face_count()),
                    })
                })
                .collect();
            let selection: Vec<_> = scene
                .selected()
                .into_iter()
                .filter_map(|id| scene.object(id).map(|o| o.name.clone()))
                .collect();
            let roots: Vec<_> = plan.roots.iter().map(plan_json).collect();

            let info = serde_json::json!({
                "objects": objects,
                "images": scene.images().len(),
                "selection": selection,
                "plan": roots,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Text => {
            println!("Scene: {}", args.scene.display());
            println!("  Objects:   {}", scene.object_count());
            println!("  Images:    {}", scene.images().len());
            println!("  Selected:  {}", scene.selected().len());

            println!("\nObjects:");
            for root in scene.roots() {
                print_object_tree(&scene, root, 1);
            }

            println!("\nExport plan:");
            if plan.nothing_selected {
                println!("  Nothing selected");
            }
            for root in &plan.roots {
                print_plan_node(root, 1);
            }
        }
    }

    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> Result<()> {
    let scene = load_scene(&args.scene)?;

    let mut meshes = 0;
    let mut faces = 0;
    for (_, object) in scene.objects() {
        if let Some(mesh) = &object.mesh {
            meshes += 1;
            faces += mesh.face_count();
        }
    }

    let exporter = MeshXmlExporter::new(ExportOptions {
        child_policy: args.children,
        ..ExportOptions::default()
    });
    let plan = exporter.plan(&scene);
    if plan.nothing_selected {
        warn!("Scene has no selection; export would write nothing");
    }

    let mut failed = 0;
    for root in &plan.roots {
        if let Err(e) = check_root(&exporter, &scene, root) {
            failed += 1;
            println!("  ✗ {} [{}]: {}", root.name, failure_kind(&e), e);
        }
    }
    if failed > 0 {
        bail!("{} of {} export roots are not exportable", failed, plan.roots.len());
    }

    println!(
        "✓ {} is valid: {} objects, {} meshes, {} faces, {} export roots",
        args.scene.display(),
        scene.object_count(),
        meshes,
        faces,
        plan.roots.len()
    );
    Ok(())
}

/// Everything `export` would check for a root, without writing
fn check_root(exporter: &MeshXmlExporter, scene: &Scene, root: &PlanNode) -> Result<String, Error> {
    let file_name = exporter.file_name(&root.name)?;
    exporter.check(scene, root)?;
    Ok(file_name)
}

fn failure_kind(error: &Error) -> &'static str {
    if error.is_data_error() {
        "invalid data"
    } else if error.is_not_found() {
        "not found"
    } else if matches!(error, Error::Io(_) | Error::WithContext { .. }) {
        "i/o"
    } else {
        "export"
    }
}

fn print_object_tree(scene: &Scene, id: ObjectId, depth: usize) {
    let Some(object) = scene.object(id) else {
        return;
    };
    let marker = if scene.is_selected(id) { "*" } else { " " };
    let geometry = object
        .mesh
        .as_ref()
        .map(|m| format!(" ({} vertices, {} faces)", m.vertex_count(), m.face_count()))
        .unwrap_or_default();

    println!("{}{} {} [{}]{}", "  ".repeat(depth), marker, object.name, object.kind, geometry);
    for child in scene.children(id) {
        print_object_tree(scene, child, depth + 1);
    }
}

fn print_plan_node(node: &PlanNode, depth: usize) {
    println!("{}- {}", "  ".repeat(depth), node.name);
    for child in &node.children {
        print_plan_node(child, depth + 1);
    }
}

fn plan_json(node: &PlanNode) -> serde_json::Value {
    serde_json::json!({
        "name": node.name,
        "meshes": node.mesh_count(),
        "children": node.children.iter().map(plan_json).collect::<Vec<_>>(),
    })
}
