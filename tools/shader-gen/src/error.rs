use std::path::PathBuf;

use crate::model::Stage;

/// Error raised while scanning a combined shader file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// A `#shader` marker named something other than `vertex` or `fragment`.
    #[error("Unsupported shader type '{value}' on line {line_number}: {line}")]
    UnsupportedStage {
        line_number: usize,
        value: String,
        line: String,
    },
}

/// Error raised while turning scanned input into generated code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("No lines captured for the {0} stage (missing '#shader {0}' or empty body)")]
    EmptyStage(Stage),

    #[error("{count} distinct symbols declared, but the mask holds at most {max}")]
    TooManySymbols { count: usize, max: usize },

    /// The name ends up inside `#include "..."`, which has no escape syntax.
    #[error("Input file name '{0}' cannot be used in an #include (contains '\"', '\\\\' or a control character)")]
    UnsupportedFileName(String),

    #[error("Failed to format generated code")]
    Format(#[from] std::fmt::Error),
}

/// Top-level error for a generator run.
#[derive(Debug, thiserror::Error)]
pub enum ShaderGenError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Generated files out of sync: {}", format_paths(paths))]
    OutOfSync { paths: Vec<PathBuf> },
}

impl ShaderGenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error. Code 1 is reserved for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            ShaderGenError::Scan(_) => 2,
            ShaderGenError::Generate(_) => 3,
            ShaderGenError::Io { .. } | ShaderGenError::Config { .. } => 4,
            ShaderGenError::OutOfSync { .. } => 5,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let scan = ShaderGenError::from(ScanError::UnsupportedStage {
            line_number: 3,
            value: "geometry".to_string(),
            line: "#shader geometry".to_string(),
        });
        assert_eq!(scan.exit_code(), 2);

        let empty = ShaderGenError::from(GenerateError::EmptyStage(Stage::Fragment));
        assert_eq!(empty.exit_code(), 3);

        let io = ShaderGenError::io(
            "missing.glsl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(io.exit_code(), 4);

        let sync = ShaderGenError::OutOfSync {
            paths: vec![PathBuf::from("a.h")],
        };
        assert_eq!(sync.exit_code(), 5);
    }

    #[test]
    fn test_empty_stage_message_names_stage() {
        let err = GenerateError::EmptyStage(Stage::Vertex);
        assert!(err.to_string().contains("vertex stage"));
    }
}
