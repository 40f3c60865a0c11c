//! clientgen CLI entrypoint
//! Parses command-line arguments and dispatches to the client generator.
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use clientgen::core::config::{GenerateConfig, apply_overrides, load_options_file};
use clientgen::core::templates::TemplateDir;
use clientgen::generation::{self, Generator};
use clientgen::schema::load_schema;

#[derive(Parser)]
#[command(name = "clientgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a client library from a JSON hyper-schema
    Generate {
        /// Path to the schema document (JSON or YAML)
        #[arg(long)]
        schema: PathBuf,
        /// Template directory, or the name of a bundled template
        #[arg(long, default_value = "python")]
        template: String,
        /// Output directory for generated code
        #[arg(long)]
        output: PathBuf,
        /// Options file (JSON, YAML or TOML) merged into the template context
        #[arg(long)]
        options_file: Option<PathBuf>,
        /// Context option as key=value; values that parse as JSON keep their type
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Header sent by the generated client on every request, as Name=Value
        #[arg(long = "default-header", value_name = "NAME=VALUE")]
        default_header: Vec<String>,
    },
    /// List the bundled templates
    Templates,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            schema,
            template,
            output,
            options_file,
            set,
            default_header,
        } => {
            let config = build_config(
                schema,
                &template,
                output,
                options_file.as_deref(),
                &set,
                &default_header,
            )?;
            run_generate(&config)?
        }
        Commands::Templates => {
            let templates =
                TemplateDir::list_bundled().context("Failed to list bundled templates")?;
            for name in templates {
                println!("{name}");
            }
        }
    }
    Ok(())
}

/// Resolve command-line inputs into a [`GenerateConfig`]
fn build_config(
    schema_path: PathBuf,
    template: &str,
    output_dir: PathBuf,
    options_file: Option<&std::path::Path>,
    assignments: &[String],
    headers: &[String],
) -> anyhow::Result<GenerateConfig> {
    let template_dir = TemplateDir::resolve(template)
        .with_context(|| format!("Failed to resolve template '{template}'"))?;

    let options = match options_file {
        Some(path) => load_options_file(path)
            .with_context(|| format!("Failed to load options file {}", path.display()))?,
        None => generation::Context::new(),
    };
    let options =
        apply_overrides(options, assignments, headers).context("Invalid context option")?;

    Ok(GenerateConfig {
        schema_path,
        template_dir: template_dir.template_path().to_path_buf(),
        output_dir,
        options,
    })
}

fn run_generate(config: &GenerateConfig) -> anyhow::Result<()> {
    info!(
        schema = %config.schema_path.display(),
        template = %config.template_dir.display(),
        "Generating client"
    );

    let schema = load_schema(&config.schema_path).context("Failed to load schema")?;
    let summary = Generator::new(&config.template_dir, &config.output_dir)
        .generate(&schema, &config.options)
        .context("Failed to generate client")?;

    info!(
        output_path = %config.output_dir.display(),
        rendered = summary.rendered,
        copied = summary.copied,
        "Successfully generated client"
    );
    Ok(())
}
