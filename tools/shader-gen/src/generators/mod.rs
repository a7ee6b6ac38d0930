//! C++ code generators for the declaration (`.h`) and definition (`.cpp`) artifacts

pub mod header;
pub mod source;

use std::fmt::Write as FmtWrite;

use crate::config::GeneratorConfig;
use crate::model::ShaderModel;

pub const GENERATOR_NAME: &str = "shader-gen";

/// Header file name for an input file name: `basic.glsl` -> `basic.glsl.h`
pub fn header_file_name(file_name: &str) -> String {
    format!("{}.h", file_name)
}

/// Source file name for an input file name: `basic.glsl` -> `basic.glsl.cpp`
pub fn source_file_name(file_name: &str) -> String {
    format!("{}.cpp", file_name)
}

fn write_banner(
    output: &mut String,
    model: &ShaderModel,
    config: &GeneratorConfig,
) -> std::fmt::Result {
    if !config.banner {
        return Ok(());
    }
    writeln!(output, "// GENERATED FILE - DO NOT EDIT")?;
    writeln!(output, "// Source: {}", model.file_name)?;
    writeln!(output, "// Generator: {}", GENERATOR_NAME)?;
    writeln!(output)
}

fn open_namespace(output: &mut String, config: &GeneratorConfig) -> std::fmt::Result {
    if config.namespace.is_empty() {
        return Ok(());
    }
    writeln!(output, "namespace {} {{", config.namespace)?;
    writeln!(output)
}

fn close_namespace(output: &mut String, config: &GeneratorConfig) -> std::fmt::Result {
    if config.namespace.is_empty() {
        return Ok(());
    }
    writeln!(output)?;
    writeln!(output, "}} // namespace {}", config.namespace)
}

/// Quote `text` as a C++ string literal that reproduces it byte for byte.
///
/// Octal escapes are always three digits so the following character can
/// never be absorbed into the escape.
pub fn cpp_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_names() {
        assert_eq!(header_file_name("basic.glsl"), "basic.glsl.h");
        assert_eq!(source_file_name("basic.glsl"), "basic.glsl.cpp");
    }

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(cpp_string_literal("line0\n"), r#""line0\n""#);
        assert_eq!(
            cpp_string_literal("printf(\"%d\\n\");\r\n"),
            r#""printf(\"%d\\n\");\r\n""#
        );
        assert_eq!(cpp_string_literal("\tx\u{1}1"), r#""\tx\0011""#);
        assert_eq!(cpp_string_literal(""), r#""""#);
    }
}
