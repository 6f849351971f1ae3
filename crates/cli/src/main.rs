//! protoc-gen-vkit
//!
//! Run by protoc as `protoc --vkit_out=. --vkit_opt=handler_path=./handler`,
//! or directly against a descriptor set for offline generation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use prost::Message;
use prost_types::compiler::{code_generator_response::Feature, CodeGeneratorResponse};
use protoc_gen_vkit_common::{GeneratorConfig, ProtoFile};
use protoc_gen_vkit_generator::{FileReport, HandlerGenerator, MergeOutcome, Registry};
use protoc_gen_vkit_parser::ProtobufParser;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protoc-gen-vkit")]
#[command(version, about = "Scaffold Go service handlers and a gateway endpoint table from proto services", long_about = None)]
struct Cli {
    /// Without a subcommand, run as a protoc plugin (stdin → stdout)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate handlers from a descriptor set without protoc
    #[command(after_help = "EXAMPLES:\n  \
        # Build a descriptor set, then generate\n  \
        protoc --include_imports --descriptor_set_out=order.pb order.proto\n  \
        protoc-gen-vkit generate --descriptor-set order.pb --handler-path ./handler\n\n  \
        # Only one file of the set\n  \
        protoc-gen-vkit generate --descriptor-set all.pb --file order/v1/order.proto")]
    Generate {
        /// Serialized FileDescriptorSet
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Handler output directory
        #[arg(long)]
        handler_path: Option<PathBuf>,

        /// Go module root import path (skips go.mod lookup)
        #[arg(long)]
        module: Option<String>,

        /// Import path of the generated protobuf package
        #[arg(long)]
        proto_import_path: Option<String>,

        /// Proto files to generate (defaults to every file in the set)
        #[arg(short, long)]
        file: Vec<String>,
    },

    /// Show the services and endpoint table a descriptor set would produce
    Parse {
        /// Serialized FileDescriptorSet
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => plugin_command(),
        Some(Commands::Generate {
            descriptor_set,
            config,
            handler_path,
            module,
            proto_import_path,
            file,
        }) => {
            let mut generator_config = match config {
                Some(path) => GeneratorConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => GeneratorConfig::default(),
            };
            generator_config.version = release();
            generator_config.work_dir = std::env::current_dir().context("Failed to read working directory")?;
            if let Some(handler_path) = handler_path {
                generator_config.handler_path = handler_path;
            }
            if module.is_some() {
                generator_config.module = module;
            }
            if proto_import_path.is_some() {
                generator_config.proto_import_path = proto_import_path;
            }

            generate_command(&descriptor_set, &file, generator_config, cli.verbose)
        }
        Some(Commands::Parse {
            descriptor_set,
            json,
        }) => parse_command(&descriptor_set, json),
    }
}

/// Logs go to stderr; stdout carries the plugin response
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn release() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

fn plugin_command() -> Result<()> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read CodeGeneratorRequest from stdin")?;

    let base = GeneratorConfig {
        version: release(),
        work_dir: std::env::current_dir().context("Failed to read working directory")?,
        ..Default::default()
    };
    let output = run_plugin(&input, base)?;

    std::io::stdout()
        .write_all(&output)
        .context("Failed to write CodeGeneratorResponse")?;
    Ok(())
}

/// Decode a request, generate, and encode the (file-less) response
fn run_plugin(input: &[u8], base: GeneratorConfig) -> Result<Vec<u8>> {
    let parser = ProtobufParser::from_code_generator_request(input)
        .context("Failed to parse CodeGeneratorRequest")?;

    let config = match parser.parameter() {
        Some(parameter) => base
            .apply_parameters(parameter)
            .context("Invalid plugin parameters")?,
        None => base,
    };

    let files = parser.parse().context("Failed to read proto descriptors")?;
    let generator = HandlerGenerator::new(config).context("Failed to create generator")?;
    let reports = generator
        .generate(&files)
        .context("Failed to generate handlers")?;

    info!(files = reports.len(), "generation finished");

    // Handlers are written straight to disk, so the response lists no files
    let response = CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    };
    Ok(response.encode_to_vec())
}

fn generate_command(
    descriptor_set: &Path,
    targets: &[String],
    config: GeneratorConfig,
    verbose: bool,
) -> Result<()> {
    println!(
        "{} Generating handlers from: {}",
        "→".cyan(),
        descriptor_set.display()
    );

    if verbose {
        println!("  Handler path: {}", config.handler_path.display());
        println!("  Package: {}", config.package_name);
        println!("  Version: {}", config.version);
    }

    let mut parser = ProtobufParser::from_file(descriptor_set)
        .context("Failed to load FileDescriptorSet")?;
    if !targets.is_empty() {
        parser = parser.with_targets(targets.iter().cloned());
    }
    let files = parser.parse().context("Failed to parse FileDescriptorSet")?;

    let generator = HandlerGenerator::new(config).context("Failed to create generator")?;
    let reports = generator
        .generate(&files)
        .context("Failed to generate handlers")?;

    if reports.is_empty() {
        println!("{} No services to generate", "⚠".yellow());
        return Ok(());
    }

    for report in &reports {
        print_report(report, verbose);
    }

    println!("\n{}", "✓ Generation complete!".green().bold());
    Ok(())
}

fn print_report(report: &FileReport, verbose: bool) {
    println!("\n{}", report.proto_file.bold());

    for outcome in &report.handlers {
        match outcome {
            MergeOutcome::Merged(summary) => {
                let state = if summary.created { "created" } else { "updated" };
                println!(
                    "  {} {} ({}, {} appended, {} kept)",
                    "✓".green(),
                    summary.path.display(),
                    state,
                    summary.appended.len(),
                    summary.preserved.len()
                );
                if verbose {
                    for method in &summary.appended {
                        println!("      + {}", method.cyan());
                    }
                }
            }
            MergeOutcome::Skipped { path, reason } => {
                eprintln!("  {} Skipping {}: {}", "⚠".yellow(), path.display(), reason);
            }
        }
    }

    println!(
        "  {} {} ({} endpoints)",
        "✓".green(),
        report.config_path.display(),
        report.registry.endpoints().len()
    );
}

#[derive(Serialize)]
struct FileSummary<'a> {
    proto_file: &'a str,
    package: &'a str,
    #[serde(flatten)]
    registry: Registry,
}

fn summarize(files: &[ProtoFile]) -> Vec<FileSummary<'_>> {
    files
        .iter()
        .filter(|f| f.generate && !f.services.is_empty())
        .map(|f| FileSummary {
            proto_file: &f.name,
            package: &f.package,
            registry: Registry::from_file(f),
        })
        .collect()
}

fn parse_command(descriptor_set: &Path, json: bool) -> Result<()> {
    let files = ProtobufParser::from_file(descriptor_set)
        .context("Failed to load FileDescriptorSet")?
        .parse()
        .context("Failed to parse FileDescriptorSet")?;
    let summaries = summarize(&files);

    if json {
        let rendered =
            serde_json::to_string_pretty(&summaries).context("Failed to serialize summary")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{}", "✓ Parse successful!".green().bold());
    for summary in &summaries {
        println!("\n{} ({})", summary.proto_file.bold(), summary.package.yellow());
        println!("  Services: {}", summary.registry.services().join(", "));
        for endpoint in summary.registry.endpoints() {
            let mode = match (endpoint.client_stream, endpoint.server_stream) {
                (false, false) => "unary",
                (true, false) => "client-stream",
                (false, true) => "server-stream",
                (true, true) => "bidi-stream",
            };
            println!(
                "  • {} {} [{}]",
                endpoint.method_key.cyan(),
                endpoint.url,
                mode
            );
        }
    }

    Ok(())
}
