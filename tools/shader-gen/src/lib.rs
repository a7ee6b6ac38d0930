//! Shader variant generator library
//!
//! Turns a combined `#shader vertex` / `#shader fragment` source file into a
//! C++ header and source pair. Every `#ifdef SYMBOL` in the shader becomes a
//! bit in a `uint64_t` mask on a generated config class, and `Assemble()`
//! rebuilds both stage sources with a `#define` injected after the first
//! line for each enabled symbol.

pub mod config;
pub mod error;
pub mod generators;
pub mod model;
pub mod parser;
pub mod writer;

use std::path::{Path, PathBuf};

pub use config::GeneratorConfig;
pub use error::{GenerateError, ScanError, ShaderGenError};
pub use model::{AssembledSources, ShaderModel, Stage, VariantMask};

/// Generated text for one shader file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub model: ShaderModel,
    pub header: String,
    pub source: String,
}

/// Destination paths for the two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub header: PathBuf,
    pub source: PathBuf,
}

/// Name of the input file, used for output naming and type names.
pub fn input_file_name(input: &Path) -> Result<String, ShaderGenError> {
    input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            ShaderGenError::io(
                input,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "input has no file name"),
            )
        })
}

/// `<output_dir>/<X>.h` and `<output_dir>/<X>.cpp` for input file name `X`.
pub fn output_paths(input: &Path, output_dir: &Path) -> Result<OutputPaths, ShaderGenError> {
    let file_name = input_file_name(input)?;
    Ok(OutputPaths {
        header: output_dir.join(generators::header_file_name(&file_name)),
        source: output_dir.join(generators::source_file_name(&file_name)),
    })
}

/// Scan shader text and render both artifacts in memory.
pub fn generate_from_source(
    file_name: &str,
    shader_source: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedArtifacts, ShaderGenError> {
    let scanned = parser::scan_source(shader_source)?;
    let model = ShaderModel::new(file_name, &scanned)?;

    let header = generators::header::generate_header(&model, config)?;
    let source = generators::source::generate_source(&model, config)?;

    Ok(GeneratedArtifacts {
        model,
        header,
        source,
    })
}

fn generate_from_file(
    input: &Path,
    config: &GeneratorConfig,
) -> Result<GeneratedArtifacts, ShaderGenError> {
    let file_name = input_file_name(input)?;
    let shader_source =
        std::fs::read_to_string(input).map_err(|e| ShaderGenError::io(input, e))?;
    let artifacts = generate_from_source(&file_name, &shader_source, config)?;

    tracing::info!(
        "{}: {} symbols, {} vertex lines, {} fragment lines",
        file_name,
        artifacts.model.symbols.len(),
        artifacts.model.vertex.body.len() + 1,
        artifacts.model.fragment.body.len() + 1
    );
    for symbol in &artifacts.model.symbols {
        tracing::debug!("  bit {:2}: {} -> {}", symbol.bit, symbol.name, symbol.accessor);
    }

    Ok(artifacts)
}

/// Generate `X.h` and `X.cpp` for `input` into `output_dir`.
///
/// Nothing is written unless scanning and generation both succeed.
pub fn generate(
    input: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
) -> Result<OutputPaths, ShaderGenError> {
    let paths = output_paths(input, output_dir)?;
    let artifacts = generate_from_file(input, config)?;

    std::fs::create_dir_all(output_dir).map_err(|e| ShaderGenError::io(output_dir, e))?;
    writer::write_all_atomic(&[
        (paths.header.clone(), artifacts.header),
        (paths.source.clone(), artifacts.source),
    ])?;

    Ok(paths)
}

/// Check that existing outputs match what `generate` would write.
pub fn check(
    input: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
) -> Result<OutputPaths, ShaderGenError> {
    let paths = output_paths(input, output_dir)?;
    let artifacts = generate_from_file(input, config)?;

    let mut stale = Vec::new();
    for (path, fresh) in [
        (&paths.header, &artifacts.header),
        (&paths.source, &artifacts.source),
    ] {
        match std::fs::read_to_string(path) {
            Ok(existing) if existing == *fresh => {
                tracing::info!("In sync: {}", path.display());
            }
            Ok(_) => {
                tracing::warn!("Out of sync: {}", path.display());
                stale.push(path.clone());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Missing: {}", path.display());
                stale.push(path.clone());
            }
            Err(e) => return Err(ShaderGenError::io(path, e)),
        }
    }

    if stale.is_empty() {
        Ok(paths)
    } else {
        Err(ShaderGenError::OutOfSync { paths: stale })
    }
}
