//! formgen CLI entrypoint
//! Parses command-line arguments and dispatches to the registry and generator.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use formgen::{
    codegen::CppCodeGenerator, components::StandardLibrary, config::Config,
    registry::TypeRegistry,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Definitions directory, overrides the configuration
    #[arg(long, global = true)]
    definitions: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate C++ header and source files from a project document
    Generate {
        /// Project document (YAML)
        #[arg(long)]
        project: PathBuf,
        /// Output directory for generated code
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// First number assigned to generated IDs
        #[arg(long)]
        first_id: Option<i64>,
        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the classes available for projects, grouped by package
    Types {
        /// Print the palette as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path).context("Failed to load configuration")?,
        None => Config::default(),
    };
    let registry = load_registry(&config, cli.definitions.as_deref())?;

    match &cli.command {
        Commands::Generate {
            project,
            output_dir,
            first_id,
            json,
        } => {
            let output_dir = output_dir
                .clone()
                .or_else(|| config.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            generate(GenerateParams {
                registry: &registry,
                config: &config,
                project,
                output_dir: &output_dir,
                first_id: first_id.unwrap_or(config.first_id),
                json: *json,
            })
            .await?
        }
        Commands::Types { json } => list_types(&registry, *json)?,
    }
    Ok(())
}

fn load_registry(config: &Config, definitions: Option<&Path>) -> anyhow::Result<TypeRegistry> {
    let dir = match definitions {
        Some(dir) => dir.to_path_buf(),
        None => config
            .resolve_definitions_dir()
            .context("Failed to locate definitions")?,
    };
    let mut registry = TypeRegistry::new().with_language(config.language.clone());
    registry.register_library(Arc::new(StandardLibrary));
    registry
        .load_definitions(&dir)
        .with_context(|| format!("Failed to load definitions from {}", dir.display()))?;
    for name in registry.missing_macros() {
        warn!(name = %name, "Macro not provided by any component library");
    }
    Ok(registry)
}

/// Parameters for code generation
struct GenerateParams<'a> {
    registry: &'a TypeRegistry,
    config: &'a Config,
    project: &'a Path,
    output_dir: &'a Path,
    first_id: i64,
    json: bool,
}

async fn generate(params: GenerateParams<'_>) -> anyhow::Result<()> {
    info!(project = %params.project.display(), "Generating code");
    let text = tokio::fs::read_to_string(params.project)
        .await
        .with_context(|| format!("Failed to read {}", params.project.display()))?;
    let (tree, root) =
        formgen::registry::load_project(params.registry, &text).context("Failed to load project")?;

    let mut generator = CppCodeGenerator::new(params.registry)
        .with_first_id(params.first_id)
        .with_paths(&params.config.base_path, params.config.use_relative_paths)
        .with_bitmap_cache_size(params.config.bitmap_cache_size);
    let ok = generator.generate_code(&tree, root);

    let diagnostics = generator.diagnostics().snapshot();
    if params.json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        for diagnostic in &diagnostics {
            eprintln!("{diagnostic}");
        }
    }
    if !ok {
        error!("Code generation failed");
        anyhow::bail!("Code generation failed");
    }

    let file = CppCodeGenerator::file_name(&tree, root).unwrap_or_else(|| "noname".to_string());
    if !params.output_dir.exists() {
        info!(path = %params.output_dir.display(), "Creating output directory");
        tokio::fs::create_dir_all(params.output_dir)
            .await
            .context("Failed to create output directory")?;
    }
    let header_path = params.output_dir.join(format!("{file}.h"));
    let source_path = params.output_dir.join(format!("{file}.cpp"));
    tokio::fs::write(&header_path, generator.header())
        .await
        .with_context(|| format!("Failed to write {}", header_path.display()))?;
    tokio::fs::write(&source_path, generator.source())
        .await
        .with_context(|| format!("Failed to write {}", source_path.display()))?;

    info!(
        header = %header_path.display(),
        source = %source_path.display(),
        "Successfully generated code"
    );
    Ok(())
}

fn list_types(registry: &TypeRegistry, json: bool) -> anyhow::Result<()> {
    let palette = registry.palette();
    if json {
        let value: serde_json::Map<String, serde_json::Value> = palette
            .iter()
            .map(|(package, classes)| ((*package).to_string(), serde_json::json!(classes)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    for (package, classes) in palette {
        println!("{package}:");
        for class in classes {
            println!("  • {class}");
        }
    }
    Ok(())
}
