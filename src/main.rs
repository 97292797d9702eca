use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use archview::config::Config;
use archview::{Result, Scene};
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// Derive the edges of an architecture diagram
#[derive(Parser, Debug)]
#[command(name = "archview")]
#[command(version)]
#[command(about = "Derive diagram edges from components, capabilities and origins", long_about = None)]
struct Args {
    /// Scene file, JSON or YAML (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Write edges here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Config file (TOML or YAML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Id of the selected edge
    #[arg(long, value_name = "EDGE_ID")]
    selected: Option<String>,

    /// Edge type token passed through to every edge
    #[arg(long, value_name = "TYPE")]
    edge_type: Option<String>,

    /// Draw every edge in black
    #[arg(long)]
    classic: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    archview::logging::init(&args.log_level);

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "archview", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    config.render.apply_overrides(
        args.edge_type.as_deref(),
        args.classic,
        args.selected.as_deref(),
    );

    let scene = match args.input.as_deref() {
        Some(path) => Scene::load_or_stdin(path)?,
        None => Scene::default(),
    };
    let edges = scene.derive_edges(&config.render);
    info!(edges = edges.len(), "derived edges");

    let mut rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&edges)?,
        OutputFormat::Yaml => serde_yaml::to_string(&edges)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match args.output {
        Some(ref path) => {
            std::fs::write(path, rendered)?;
            info!("Edges saved to: {}", path.display());
        }
        None => std::io::stdout().write_all(rendered.as_bytes())?,
    }

    Ok(())
}
