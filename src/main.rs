// Command-line entry point for shadergraph.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use shadergraph::application::DiscoverUsecase;
use shadergraph::config::DiscoveryConfig;
use shadergraph::domain::entry_point::EntryPointScanner;
use shadergraph::infrastructure::{concurrency, ProjectLoader, ShaderBody, SynSymbolResolver};
use shadergraph::ports::exporters::{DotExporter, ManifestExporter, TextExporter};
use shadergraph::ports::ShaderBackend;
use shadergraph::FunctionIdentity;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Dot,
    Text,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Discover and order the call graph of shader entry points", long_about = None)]
struct Cli {
    /// Input source file path, indexed as the crate root module (can specify multiple)
    #[arg(short, long)]
    input: Vec<PathBuf>,

    /// Input source folder(s), treated as a crate `src/` directory
    #[arg(short = 'd', long)]
    folder: Vec<PathBuf>,

    /// Workspace Cargo.toml
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Crate name used for --input and --folder module paths
    #[arg(long, default_value = "shaders")]
    crate_name: String,

    /// Entry point to discover, as `path::to::Type::function` (can specify multiple)
    #[arg(short, long)]
    entry: Vec<String>,

    /// Discover every marked entry point
    #[arg(long, conflicts_with = "entry")]
    all: bool,

    /// List marked entry points and exit
    #[arg(long)]
    list: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn load_sources(cli: &Cli) -> Result<Vec<(String, String, String)>> {
    let mut all_sources = Vec::new();

    for input_file in &cli.input {
        all_sources.push(ProjectLoader::load_file(input_file, &cli.crate_name)?);
    }
    for folder in &cli.folder {
        all_sources.extend(ProjectLoader::load_folder(folder, &cli.crate_name)?);
    }
    if let Some(manifest) = &cli.workspace {
        all_sources.extend(ProjectLoader::load_workspace(manifest)?);
    }

    if all_sources.is_empty() {
        bail!("Please provide at least one --input <file> or --folder <dir> or --workspace <Cargo.toml>");
    }
    Ok(all_sources)
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DiscoveryConfig::load(path)?,
        None => DiscoveryConfig::default(),
    };
    if config.parallel {
        concurrency::init_thread_pool(config.worker_ratio)?;
    }

    let sources = load_sources(&cli)?;
    let resolver = SynSymbolResolver::from_sources(&sources);
    let entries = EntryPointScanner::new(&resolver, &config.markers).scan(resolver.identities());

    if cli.list {
        for entry in &entries {
            let location = resolver.location(&entry.identity).unwrap_or_default();
            println!("{:<9} {}  ({})", entry.kind, entry.identity, location);
        }
        return Ok(());
    }

    let roots: Vec<FunctionIdentity> = if cli.all {
        entries.into_iter().map(|e| e.identity).collect()
    } else {
        cli.entry
            .iter()
            .map(|e| FunctionIdentity::parse(e).with_context(|| format!("Invalid entry point `{}`, expected `Type::function`", e)))
            .collect::<Result<_>>()?
    };
    if roots.is_empty() {
        bail!("No entry points to discover: pass --entry <Type::function> or --all");
    }

    let backend: &dyn ShaderBackend<ShaderBody> = match cli.format {
        OutputFormat::Json => &ManifestExporter,
        OutputFormat::Dot => &DotExporter,
        OutputFormat::Text => &TextExporter,
    };
    let usecase = DiscoverUsecase {
        resolver: &resolver,
        config: &config,
    };
    let rendered = usecase.run(&roots, backend)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Discovered {} entry point(s), output written to {}", roots.len(), path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
