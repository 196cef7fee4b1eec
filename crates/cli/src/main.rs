//! protodoc CLI
//!
//! Runs as a protoc plugin (`protoc --protodoc_out=docs ...`) when invoked
//! without a subcommand, or renders a `FileDescriptorSet` offline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use prost::Message;
use protodoc_common::{DocFormat, PluginOptions};
use protodoc_generator::{request_options, DocGenerator};
use protodoc_parser::RequestParser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "protoc-gen-protodoc")]
#[command(version, about = "Generate documentation from protobuf files", long_about = None)]
#[command(after_help = "EXAMPLES:\n  \
    # As a protoc plugin\n  \
    protoc --plugin=protoc-gen-protodoc --protodoc_out=docs --protodoc_opt=format=html api.proto\n\n  \
    # From a descriptor set written with --include_source_info\n  \
    protoc --include_source_info -o api.pb api.proto\n  \
    protoc-gen-protodoc render --descriptor-set api.pb --output docs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, env = "PROTODOC_FORMAT")]
    format: Option<FormatArg>,

    /// YAML file with plugin options
    #[arg(short, long, global = true, env = "PROTODOC_CONFIG")]
    config: Option<PathBuf>,

    /// Template replacing the built-in Markdown or HTML template
    #[arg(short, long, global = true, env = "PROTODOC_TEMPLATE")]
    template: Option<PathBuf>,

    /// Render type references as plain text
    #[arg(long, global = true)]
    no_links: bool,

    /// Also document google/* well-known files
    #[arg(long, global = true)]
    include_well_known: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render documentation from a FileDescriptorSet file
    Render {
        /// Path to the descriptor set (`protoc --include_source_info -o`)
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "./docs")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Markdown pages
    #[value(alias = "md")]
    Markdown,
    /// Standalone HTML pages
    Html,
    /// The document model as JSON
    Json,
}

impl From<FormatArg> for DocFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => DocFormat::Markdown,
            FormatArg::Html => DocFormat::Html,
            FormatArg::Json => DocFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = base_options(&cli)?;

    match &cli.command {
        None => plugin_command(options),
        Some(Commands::Render {
            descriptor_set,
            output,
        }) => render_command(descriptor_set, output, options),
    }
}

/// Log to stderr only; stdout carries the plugin response
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .init();
}

/// Defaults, then the config file, then flags and environment
fn base_options(cli: &Cli) -> Result<PluginOptions> {
    let mut options = match &cli.config {
        Some(path) => PluginOptions::load(path).context("Failed to load configuration")?,
        None => PluginOptions::default(),
    };

    if let Some(format) = cli.format {
        options.format = format.into();
    }
    if let Some(template) = &cli.template {
        options.template = Some(template.clone());
    }
    if cli.no_links {
        options.links = false;
    }
    if cli.include_well_known {
        options.include_well_known = true;
    }

    Ok(options)
}

fn plugin_command(options: PluginOptions) -> Result<()> {
    let mut bytes = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .context("Failed to read CodeGeneratorRequest from stdin")?;

    let parser = RequestParser::from_bytes(&bytes)
        .context("Failed to decode CodeGeneratorRequest; run this binary as a protoc plugin")?;

    let options = request_options(options, &parser).context("Invalid plugin parameter")?;
    debug!(?options, "plugin options");

    let generator = DocGenerator::new(options).context("Failed to create generator")?;
    let response = generator
        .generate(&parser)
        .context("Failed to generate documentation")?;

    io::stdout()
        .lock()
        .write_all(&response.encode_to_vec())
        .context("Failed to write CodeGeneratorResponse to stdout")?;

    Ok(())
}

fn render_command(descriptor_set: &Path, output: &Path, options: PluginOptions) -> Result<()> {
    println!(
        "{} Rendering documentation from: {}",
        "→".cyan(),
        descriptor_set.display()
    );

    let parser = RequestParser::from_file(descriptor_set)
        .context("Failed to load FileDescriptorSet")?;

    debug!(?options, "render options");
    let generator = DocGenerator::new(options).context("Failed to create generator")?;
    let written = generator
        .generate_to_directory(&parser, output)
        .context("Failed to generate documentation")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!(
        "  Format: {}",
        generator.options().format.to_string().yellow()
    );
    println!("\n{}", "Generated files:".bold());
    for path in &written {
        println!("  📄 {}", path.display());
    }

    if written.is_empty() {
        println!(
            "  {} no documented files (is every file a well-known one?)",
            "!".yellow()
        );
    }

    Ok(())
}
