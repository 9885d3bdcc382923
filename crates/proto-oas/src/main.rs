//! CLI for `proto-oas`.
//!
//! Standalone binary behind the `cli` feature.
//!
//! # Subcommands
//!
//! ```text
//! # Generate an OpenAPI document from a compiled descriptor set
//! proto-oas generate --descriptor descriptor.binpb --config api/proto-oas.yaml
//!
//! # Print the files, messages and routes found in a descriptor set
//! proto-oas inspect --descriptor descriptor.binpb
//! ```

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use prost::Message as _;
use proto_oas::GenConfig;
use proto_oas_core::descriptor::{extract_route, FileDescriptorSet};

/// `OpenAPI` 3.0 document generator for `oas.v1`-annotated proto services.
#[derive(Parser)]
#[command(name = "proto-oas", version, about)]
enum Cli {
    /// Generate an `OpenAPI` document from a compiled descriptor set.
    ///
    /// Reads the config file when given; every flag overrides the matching
    /// config field. The output lands in `--out-dir` under the configured
    /// filename (`openapi.yaml` by default, `.json` with `--json`).
    Generate(GenerateArgs),

    /// Print proto metadata extracted from a compiled descriptor set.
    Inspect(InspectArgs),
}

#[derive(Parser)]
struct GenerateArgs {
    /// Path to the compiled proto `FileDescriptorSet` (binary).
    #[arg(short, long)]
    descriptor: PathBuf,

    /// Path to a generation config YAML file.
    ///
    /// CLI flags override values from the config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// `info.title` of the generated document.
    #[arg(long)]
    title: Option<String>,

    /// `info.description` of the generated document.
    #[arg(long)]
    description: Option<String>,

    /// `info.version` of the generated document.
    #[arg(long)]
    version: Option<String>,

    /// Output filename stem (extension follows the output format).
    #[arg(long)]
    filename: Option<String>,

    /// Default media type for request and response content.
    #[arg(long)]
    content_type: Option<String>,

    /// Schema name backing the shared `default` response.
    #[arg(long)]
    default_response: Option<String>,

    /// Fallback host when no file/service/method host option applies.
    #[arg(long)]
    host: Option<String>,

    /// Pipe-separated proto packages to generate for (e.g. `shop.v1|shop.v2`).
    #[arg(long)]
    include: Option<String>,

    /// Pipe-separated proto packages to exclude. Wins over `--include`.
    #[arg(long)]
    ignore: Option<String>,

    /// Emit compact JSON instead of YAML.
    #[arg(long)]
    json: bool,

    /// Use camelCase field aliases as property names.
    #[arg(long)]
    json_names: bool,

    /// Directory to write the document into.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser)]
struct InspectArgs {
    /// Path to the compiled proto `FileDescriptorSet` (binary).
    #[arg(short, long)]
    descriptor: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli {
        Cli::Generate(args) => run_generate(&args),
        Cli::Inspect(args) => run_inspect(&args),
    }
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => {
            eprintln!("Loading config: {}", path.display());
            GenConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None => GenConfig::default(),
    };
    let config = apply_overrides(config, args);

    let descriptor = fs::read(&args.descriptor)
        .with_context(|| format!("Failed to read descriptor: {}", args.descriptor.display()))?;

    eprintln!("Generating OpenAPI document...");
    let output =
        proto_oas::generate(&descriptor, &config).context("Failed to generate document")?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create output dir: {}", args.out_dir.display()))?;
    let path = args.out_dir.join(config.output_filename());
    fs::write(&path, output).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Wrote {}", path.display());

    Ok(())
}

/// Apply CLI flags that override config file values.
///
/// Boolean flags are one-directional: they can only turn an option on.
fn apply_overrides(mut config: GenConfig, args: &GenerateArgs) -> GenConfig {
    if let Some(ref title) = args.title {
        config.title = title.clone();
    }
    if let Some(ref description) = args.description {
        config.description = description.clone();
    }
    if let Some(ref version) = args.version {
        config.version = version.clone();
    }
    if let Some(ref filename) = args.filename {
        config.filename = filename.clone();
    }
    if let Some(ref content_type) = args.content_type {
        config.content_type = content_type.clone();
    }
    if let Some(ref default_response) = args.default_response {
        config.default_response = Some(default_response.clone());
    }
    if let Some(ref host) = args.host {
        config.host = Some(host.clone());
    }
    if let Some(ref include) = args.include {
        config.include = proto_oas::parse_pipe_list(include);
    }
    if let Some(ref ignore) = args.ignore {
        config.ignore = proto_oas::parse_pipe_list(ignore);
    }
    if args.json {
        config.json_output = true;
    }
    if args.json_names {
        config.json_names = true;
    }

    config
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let bytes = fs::read(&args.descriptor)
        .with_context(|| format!("Failed to read descriptor: {}", args.descriptor.display()))?;
    let fdset =
        FileDescriptorSet::decode(bytes.as_slice()).context("Failed to decode descriptor set")?;

    for file in &fdset.file {
        if file.package.as_deref() == Some("google.protobuf") {
            continue;
        }
        println!(
            "{} ({} messages)",
            file.name.as_deref().unwrap_or("<unnamed>"),
            file.message_type.len()
        );
        for service in &file.service {
            println!(
                "  service {}",
                service.name.as_deref().unwrap_or("<unnamed>")
            );
            for method in &service.method {
                let name = method.name.as_deref().unwrap_or("<unnamed>");
                let route = method
                    .options
                    .as_ref()
                    .and_then(|options| options.oas.as_ref())
                    .and_then(extract_route);
                match route {
                    Some((verb, path)) => println!("    {name} {verb} {path}"),
                    None => println!("    {name} (no route)"),
                }
            }
        }
    }

    Ok(())
}
