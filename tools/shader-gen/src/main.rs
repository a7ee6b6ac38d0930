//! shader-gen - C++ shader variant generator
//!
//! ```bash
//! # Writes out/basic.glsl.h and out/basic.glsl.cpp
//! shader-gen shaders/basic.glsl out
//!
//! # Fail if the checked-in outputs are stale
//! shader-gen --check shaders/basic.glsl out
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use shader_gen::{GeneratorConfig, ShaderGenError};
use tracing_subscriber::EnvFilter;

/// Exit code for missing or invalid arguments.
const USAGE_EXIT_CODE: u8 = 1;

#[derive(Parser)]
#[command(name = "shader-gen")]
#[command(about = "Generate C++ shader variant selectors from a combined shader file")]
#[command(version)]
struct Cli {
    /// Combined shader file with `#shader vertex` / `#shader fragment` sections
    input: PathBuf,

    /// Directory receiving <input>.h and <input>.cpp
    output_dir: PathBuf,

    /// C++ namespace for generated types (overrides config)
    #[arg(short, long)]
    namespace: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only verify that existing outputs are up to date
    #[arg(long)]
    check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            return if e.use_stderr() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            let code = err
                .downcast_ref::<ShaderGenError>()
                .map(ShaderGenError::exit_code)
                .unwrap_or(USAGE_EXIT_CODE);
            ExitCode::from(code)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(namespace) = &cli.namespace {
        config.namespace = namespace.clone();
        if let Err(message) = config.validate() {
            anyhow::bail!("Invalid --namespace: {}", message);
        }
    }

    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;

    if cli.check {
        tracing::info!("Checking {} against {}", cli.input.display(), cli.output_dir.display());
        shader_gen::check(&cli.input, &cli.output_dir, &config)
            .with_context(|| format!("Check failed for {}", cli.input.display()))?;
        tracing::info!("All outputs in sync");
    } else {
        tracing::info!("Generating from {}", cli.input.display());
        let paths = shader_gen::generate(&cli.input, &cli.output_dir, &config)
            .with_context(|| format!("Failed to generate from {}", cli.input.display()))?;
        tracing::debug!("Wrote {} and {}", paths.header.display(), paths.source.display());
    }

    Ok(())
}
