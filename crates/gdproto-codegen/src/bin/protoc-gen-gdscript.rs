//! protoc plugin entry point.
//!
//! With no arguments this speaks the plugin protocol on stdin/stdout. With
//! `--descriptor-set` it generates from an encoded `FileDescriptorSet` on disk
//! (e.g. `buf build -o api.binpb`), which is handy outside protoc.

use anyhow::{Context, Result};
use clap::Parser;
use gdproto_binding::SchemaSet;
use gdproto_codegen::config::GeneratorConfig;
use gdproto_codegen::{generate, request, run_plugin};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protoc-gen-gdscript")]
#[command(
    author,
    version,
    about = "Generate GDScript classes and HTTP clients from protobuf schemas"
)]
struct Cli {
    /// Encoded `google.protobuf.FileDescriptorSet` to generate from instead of stdin.
    #[arg(long)]
    descriptor_set: Option<PathBuf>,

    /// Output directory for offline generation.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Files to generate (default: every file of the set).
    #[arg(long = "generate", requires = "descriptor_set")]
    generate: Vec<String>,

    /// Plugin parameter string, as protoc would pass it.
    #[arg(long, requires = "descriptor_set")]
    parameter: Option<String>,

    /// Print the planned call descriptors as JSON instead of writing files.
    #[arg(long, requires = "descriptor_set")]
    dump_descriptors: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    match cli.descriptor_set.clone() {
        Some(path) => cmd_offline(&cli, &path),
        None => cmd_plugin(),
    }
}

fn cmd_plugin() -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("failed to read CodeGeneratorRequest from stdin")?;

    let response = run_plugin(&input);

    io::stdout()
        .write_all(&request::encode_response(&response))
        .context("failed to write CodeGeneratorResponse to stdout")?;
    Ok(())
}

fn cmd_offline(cli: &Cli, descriptor_set: &Path) -> Result<()> {
    let bytes = fs::read(descriptor_set)
        .with_context(|| format!("failed to read {}", descriptor_set.display()))?;
    let schema = SchemaSet::from_file_descriptor_set(&bytes)
        .with_context(|| format!("failed to load {}", descriptor_set.display()))?;
    let config = GeneratorConfig::from_parameter(cli.parameter.as_deref())?;

    let targets = if cli.generate.is_empty() {
        schema.loaded_files().to_vec()
    } else {
        cli.generate.clone()
    };

    let plans = generate::plan(&schema, &targets, &config)?;

    if cli.dump_descriptors {
        let json = serde_json::to_string_pretty(&plans)?;
        println!("{json}");
        return Ok(());
    }

    for plan in &plans {
        for file in generate::render_plan(plan, &config)? {
            let path = cli.out.join(&file.name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&path, file.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("  → {}", path.display());
        }
    }
    Ok(())
}
