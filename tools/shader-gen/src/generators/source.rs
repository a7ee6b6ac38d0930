//! Definition artifact: the `Assemble()` implementation

use std::fmt::Write as FmtWrite;

use super::{close_namespace, cpp_string_literal, header_file_name, open_namespace, write_banner};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::model::{ShaderModel, Stage};

/// Raw bytes per `+=` statement. MSVC rejects a concatenated literal over
/// 65535 bytes, so escaped output must stay under that.
const STATEMENT_BYTES: usize = 16 * 1024;
/// Raw bytes per string literal (MSVC: 16380 per literal).
const LITERAL_BYTES: usize = 2 * 1024;

/// Generate the `.cpp` file for a shader model.
pub fn generate_source(
    model: &ShaderModel,
    config: &GeneratorConfig,
) -> Result<String, GenerateError> {
    let mut output = String::new();

    write_banner(&mut output, model, config)?;

    writeln!(output, "#include \"{}\"", header_file_name(&model.file_name))?;
    writeln!(output)?;

    open_namespace(&mut output, config)?;

    writeln!(
        output,
        "{} {}::Assemble() const",
        model.sources_type(),
        model.config_type()
    )?;
    writeln!(output, "{{")?;
    writeln!(output, "    {} sources {{}};", model.sources_type())?;

    for stage in Stage::ALL {
        writeln!(output)?;
        write_stage(&mut output, model, stage)?;
    }

    writeln!(output)?;
    writeln!(output, "    return sources;")?;
    writeln!(output, "}}")?;

    close_namespace(&mut output, config)?;

    Ok(output)
}

fn write_stage(output: &mut String, model: &ShaderModel, stage: Stage) -> std::fmt::Result {
    let source = model.stage(stage);
    let field = stage.as_str();

    writeln!(
        output,
        "    sources.{} = {};",
        field,
        cpp_string_literal(&source.prologue)
    )?;

    for symbol in &model.symbols {
        writeln!(output, "    if (Get{}()) {{", symbol.accessor)?;
        writeln!(
            output,
            "        sources.{} += {};",
            field,
            cpp_string_literal(&format!("#define {}\n", symbol.name))
        )?;
        writeln!(output, "    }}")?;
    }

    let mut statement: Vec<&str> = Vec::new();
    let mut statement_bytes = 0;
    for piece in source.body.iter().flat_map(|line| split_literal(line, LITERAL_BYTES)) {
        if !statement.is_empty() && statement_bytes + piece.len() > STATEMENT_BYTES {
            write_append(output, field, &statement)?;
            statement.clear();
            statement_bytes = 0;
        }
        statement_bytes += piece.len();
        statement.push(piece);
    }
    if !statement.is_empty() {
        write_append(output, field, &statement)?;
    }

    Ok(())
}

/// `sources.<field> +=` followed by adjacent literals, one per line.
fn write_append(output: &mut String, field: &str, pieces: &[&str]) -> std::fmt::Result {
    writeln!(output, "    sources.{} +=", field)?;
    let last = pieces.len() - 1;
    for (i, piece) in pieces.iter().enumerate() {
        let terminator = if i == last { ";" } else { "" };
        writeln!(output, "        {}{}", cpp_string_literal(piece), terminator)?;
    }
    Ok(())
}

/// Split `text` into pieces of at most `max` bytes on char boundaries.
fn split_literal(text: &str, max: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while rest.len() > max {
        let mut end = max;
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (head, tail) = rest.split_at(end);
        pieces.push(head);
        rest = tail;
    }
    pieces.push(rest);
    pieces
}
