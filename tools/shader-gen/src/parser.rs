//! Line scanner for combined `#shader` source files

use crate::error::ScanError;
use crate::model::{ParsingStage, ScannedShader, Stage};

const STAGE_MARKER: &str = "#shader ";
const IFDEF_DIRECTIVE: &str = "#ifdef ";

/// Classification of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `#shader vertex` / `#shader fragment`
    StageMarker(Stage),
    /// Anything else, routed to the active stage.
    Body(&'a str),
}

/// What the scanner does with a line after the state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Switched,
    Append(Stage),
    Preamble,
}

impl ParsingStage {
    fn apply(&mut self, kind: LineKind<'_>) -> Route {
        match (*self, kind) {
            (_, LineKind::StageMarker(stage)) => {
                *self = ParsingStage::Active(stage);
                Route::Switched
            }
            (ParsingStage::Active(stage), LineKind::Body(_)) => Route::Append(stage),
            (ParsingStage::None, LineKind::Body(_)) => Route::Preamble,
        }
    }
}

/// Classify a line. `line_number` is 1-based and only used for diagnostics.
///
/// A marker is `#shader ` at column 0 followed by a stage keyword prefix, so
/// `#shader vertex_main` selects the vertex stage. A bare `#shader` is body.
pub fn classify_line(line: &str, line_number: usize) -> Result<LineKind<'_>, ScanError> {
    let Some(rest) = line.strip_prefix(STAGE_MARKER) else {
        return Ok(LineKind::Body(line));
    };

    if let Some(stage) = Stage::from_marker_text(rest) {
        return Ok(LineKind::StageMarker(stage));
    }

    let value = rest.split_whitespace().next().unwrap_or("");
    Err(ScanError::UnsupportedStage {
        line_number,
        value: value.to_string(),
        line: line.trim_end().to_string(),
    })
}

/// Symbol declared by an `#ifdef SYMBOL` line, if any.
pub fn ifdef_symbol(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(IFDEF_DIRECTIVE)?
        .split_whitespace()
        .next()
}

/// Scan a combined shader source in a single pass.
///
/// Every line keeps its terminator. `#ifdef` symbols are harvested from all
/// lines, preamble included.
pub fn scan_source(source: &str) -> Result<ScannedShader, ScanError> {
    let mut scanned = ScannedShader::default();
    let mut stage = ParsingStage::default();
    let mut preamble_lines = 0usize;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let kind = classify_line(line, index + 1)?;

        match stage.apply(kind) {
            Route::Switched => {
                tracing::trace!("line {}: entering {:?}", index + 1, stage);
                continue;
            }
            Route::Append(target) => scanned.lines_mut(target).push(line.to_string()),
            Route::Preamble => preamble_lines += 1,
        }

        if let Some(symbol) = ifdef_symbol(line) {
            if scanned.symbols.insert(symbol) {
                tracing::debug!("line {}: symbol '{}'", index + 1, symbol);
            }
        } else if line.trim() == IFDEF_DIRECTIVE.trim_end() {
            tracing::warn!("line {}: '#ifdef' without a symbol", index + 1);
        }
    }

    tracing::debug!(
        "Scanned {} vertex lines, {} fragment lines, {} preamble lines, {} symbols",
        scanned.vertex.len(),
        scanned.fragment.len(),
        preamble_lines,
        scanned.symbols.len()
    );

    Ok(scanned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markers() {
        assert_eq!(
            classify_line("#shader vertex\n", 1),
            Ok(LineKind::StageMarker(Stage::Vertex))
        );
        assert_eq!(
            classify_line("#shader fragment\r\n", 1),
            Ok(LineKind::StageMarker(Stage::Fragment))
        );
        assert_eq!(
            classify_line("#shader vertex_main\n", 1),
            Ok(LineKind::StageMarker(Stage::Vertex))
        );
        assert_eq!(
            classify_line("#shader fragmentShader // lit\n", 1),
            Ok(LineKind::StageMarker(Stage::Fragment))
        );
    }

    #[test]
    fn test_classify_body() {
        assert_eq!(classify_line("void main() {}\n", 1), Ok(LineKind::Body("void main() {}\n")));
        assert_eq!(classify_line("#shaderx\n", 1), Ok(LineKind::Body("#shaderx\n")));
        assert_eq!(classify_line("  #shader vertex\n", 1), Ok(LineKind::Body("  #shader vertex\n")));
        // no space after the directive, so not a marker
        assert_eq!(classify_line("#shader\n", 1), Ok(LineKind::Body("#shader\n")));
        assert_eq!(classify_line("#shader", 1), Ok(LineKind::Body("#shader")));
        assert_eq!(classify_line("#shader\tvertex\n", 1), Ok(LineKind::Body("#shader\tvertex\n")));
    }

    #[test]
    fn test_classify_unsupported_stage() {
        assert_eq!(
            classify_line("#shader geometry\n", 7),
            Err(ScanError::UnsupportedStage {
                line_number: 7,
                value: "geometry".to_string(),
                line: "#shader geometry".to_string(),
            })
        );
        assert_eq!(
            classify_line("#shader  vertex\n", 2),
            Err(ScanError::UnsupportedStage {
                line_number: 2,
                value: "vertex".to_string(),
                line: "#shader  vertex".to_string(),
            })
        );
        assert!(classify_line("#shader \n", 1).is_err());
        assert!(classify_line("#shader vert\n", 1).is_err());
    }

    #[test]
    fn test_ifdef_symbol() {
        assert_eq!(ifdef_symbol("#ifdef FOO\n"), Some("FOO"));
        assert_eq!(ifdef_symbol("    #ifdef BAR // note\n"), Some("BAR"));
        assert_eq!(ifdef_symbol("#ifdef\n"), None);
        assert_eq!(ifdef_symbol("#ifndef FOO\n"), None);
        assert_eq!(ifdef_symbol("#if defined(FOO)\n"), None);
    }

    #[test]
    fn test_end_to_end_scan() {
        let scanned =
            scan_source("#shader vertex\na\n#ifdef X\nb\n#shader fragment\nc\n#ifdef Y\nd\n")
                .unwrap();

        assert_eq!(scanned.vertex, vec!["a\n", "#ifdef X\n", "b\n"]);
        assert_eq!(scanned.fragment, vec!["c\n", "#ifdef Y\n", "d\n"]);
        assert_eq!(scanned.symbols.iter().collect::<Vec<_>>(), vec!["X", "Y"]);
    }

    #[test]
    fn test_preamble_dropped_but_symbols_harvested() {
        let scanned = scan_source(
            "// preamble\n#ifdef EARLY\n#shader vertex\nv0\n#shader fragment\nf0\n",
        )
        .unwrap();

        assert_eq!(scanned.vertex, vec!["v0\n"]);
        assert_eq!(scanned.fragment, vec!["f0\n"]);
        assert!(scanned.symbols.contains("EARLY"));
        assert!(!scanned.vertex.iter().any(|l| l.contains("preamble")));
        assert!(!scanned.fragment.iter().any(|l| l.contains("preamble")));
    }

    #[test]
    fn test_repeated_symbols_deduplicated() {
        let scanned = scan_source(
            "#shader vertex\n#ifdef A\n#ifdef B\n#shader fragment\n  #ifdef A\n#ifdef B\n",
        )
        .unwrap();
        assert_eq!(scanned.symbols.iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(scanned.fragment, vec!["  #ifdef A\n", "#ifdef B\n"]);
    }

    #[test]
    fn test_stage_reentry_appends() {
        let scanned =
            scan_source("#shader vertex\nv0\n#shader fragment\nf0\n#shader vertex\nv1").unwrap();
        assert_eq!(scanned.vertex, vec!["v0\n", "v1"]);
        assert_eq!(scanned.fragment, vec!["f0\n"]);
    }

    #[test]
    fn test_unsupported_stage_aborts() {
        let err = scan_source("#shader vertex\nv0\n#shader geometry\ng0\n").unwrap_err();
        assert_eq!(
            err,
            ScanError::UnsupportedStage {
                line_number: 3,
                value: "geometry".to_string(),
                line: "#shader geometry".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_stage_is_empty() {
        let scanned = scan_source("#shader vertex\nv0\n").unwrap();
        assert!(scanned.fragment.is_empty());
    }
}
