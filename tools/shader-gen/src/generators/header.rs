//! Declaration artifact: sources holder + bit-mask configuration class

use std::fmt::Write as FmtWrite;

use super::{close_namespace, open_namespace, write_banner};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::model::{ShaderModel, Stage};

/// Generate the `.h` file for a shader model.
pub fn generate_header(
    model: &ShaderModel,
    config: &GeneratorConfig,
) -> Result<String, GenerateError> {
    let mut output = String::new();
    let sources_type = model.sources_type();
    let config_type = model.config_type();

    write_banner(&mut output, model, config)?;

    writeln!(output, "#pragma once")?;
    writeln!(output)?;
    writeln!(output, "#include <cstdint>")?;
    writeln!(output, "#include <string>")?;
    writeln!(output)?;

    open_namespace(&mut output, config)?;

    // Sources holder
    writeln!(output, "struct {} {{", sources_type)?;
    for stage in Stage::ALL {
        writeln!(output, "    std::string {} {{}};", stage.as_str())?;
    }
    writeln!(output, "}};")?;
    writeln!(output)?;

    // Configuration
    writeln!(output, "class {} {{", config_type)?;
    writeln!(output, "public:")?;

    for symbol in &model.symbols {
        writeln!(
            output,
            "    static constexpr std::uint64_t k{}Bit = std::uint64_t {{ 1 }} << {};",
            symbol.accessor, symbol.bit
        )?;
    }
    if !model.symbols.is_empty() {
        writeln!(output)?;
    }

    for symbol in &model.symbols {
        writeln!(output, "    /** Toggle `#define {}` */", symbol.name)?;
        writeln!(output, "    void Set{}(bool enabled)", symbol.accessor)?;
        writeln!(output, "    {{")?;
        writeln!(output, "        if (enabled) {{")?;
        writeln!(output, "            mask_ |= k{}Bit;", symbol.accessor)?;
        writeln!(output, "        }} else {{")?;
        writeln!(output, "            mask_ &= ~k{}Bit;", symbol.accessor)?;
        writeln!(output, "        }}")?;
        writeln!(output, "    }}")?;
        writeln!(
            output,
            "    bool Get{}() const {{ return (mask_ & k{}Bit) != 0; }}",
            symbol.accessor, symbol.accessor
        )?;
        writeln!(output)?;
    }

    writeln!(output, "    std::uint64_t GetMask() const {{ return mask_; }}")?;
    writeln!(output)?;

    for op in ["<", "==", "!="] {
        writeln!(
            output,
            "    bool operator{}(const {}& other) const {{ return mask_ {} other.mask_; }}",
            op, config_type, op
        )?;
    }
    writeln!(output)?;

    writeln!(output, "    {} Assemble() const;", sources_type)?;
    writeln!(output)?;
    writeln!(output, "private:")?;
    writeln!(output, "    std::uint64_t mask_ {{ 0 }};")?;
    writeln!(output, "}};")?;

    close_namespace(&mut output, config)?;

    Ok(output)
}
