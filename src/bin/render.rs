use std::path::PathBuf;
use std::process::ExitCode;

use archview::config::{Config, PreviewStyle};
use archview::export::{svg_to_pdf, svg_to_png, ExportFormat};
use archview::fonts::CosmicTextMeasure;
use archview::preview::{render_preview, wrap_document};
use archview::{Result, Scene};
use clap::Parser;
use tracing::{error, info};

/// Static preview of an architecture diagram (SVG/PNG/PDF)
#[derive(Parser, Debug)]
#[command(name = "archview-render")]
#[command(version)]
#[command(about = "Render an architecture scene and its edges to SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Scene file, JSON or YAML (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Config file (TOML or YAML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Built-in preview preset (light, dark); overrides the config's preview section
    #[arg(short, long, value_name = "PRESET")]
    preset: Option<String>,

    /// Id of the selected edge
    #[arg(long, value_name = "EDGE_ID")]
    selected: Option<String>,

    /// Edge type: straight, step, smoothstep or default (bezier)
    #[arg(long, value_name = "TYPE")]
    edge_type: Option<String>,

    /// Draw every edge in black
    #[arg(long)]
    classic: bool,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    archview::logging::init(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    // Validate the target before doing any work
    let format = ExportFormat::from_path(&args.output)?;

    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(ref preset) = args.preset {
        config.preview = PreviewStyle::from_builtin(preset)?;
    }
    config.render.apply_overrides(
        args.edge_type.as_deref(),
        args.classic,
        args.selected.as_deref(),
    );

    let scene = Scene::load_or_stdin(&args.input)?;
    let edges = scene.derive_edges(&config.render);

    let mut measure = CosmicTextMeasure::new();
    let (inner, width, height) = render_preview(&scene, &edges, &config.preview, &mut measure);
    let svg = wrap_document(&inner, width, height, &config.preview.background);
    info!(nodes = scene.nodes.len(), edges = edges.len(), "rendered preview");

    match format {
        ExportFormat::Svg => {
            std::fs::write(&args.output, &svg)?;
            info!("SVG saved to: {}", args.output.display());
        }
        ExportFormat::Png => {
            std::fs::write(&args.output, svg_to_png(&svg, args.png_scale)?)?;
            info!("PNG saved to: {}", args.output.display());
        }
        ExportFormat::Pdf => {
            std::fs::write(&args.output, svg_to_pdf(&svg)?)?;
            info!("PDF saved to: {}", args.output.display());
        }
    }

    Ok(())
}
