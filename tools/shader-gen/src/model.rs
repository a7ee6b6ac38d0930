//! Intermediate representation between the scanner and the code generators

use std::fmt;

use hashbrown::HashSet;

use crate::error::GenerateError;

/// Width of the generated `uint64_t` mask.
pub const MAX_SYMBOLS: usize = 64;

/// A shader stage with its own assembled source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::Vertex, Stage::Fragment];

    /// Keyword used after `#shader`, also the generated field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        }
    }

    /// Stage whose keyword starts `text` (`vertex_main` -> `Vertex`).
    pub fn from_marker_text(text: &str) -> Option<Self> {
        Stage::ALL
            .into_iter()
            .find(|stage| text.starts_with(stage.as_str()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scanner state: which sequence body lines are routed to.
///
/// Starts at `None` and only stage markers move it. Once a stage has been
/// entered there is no way back to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsingStage {
    #[default]
    None,
    Active(Stage),
}

/// Distinct symbol names in first-seen order.
///
/// The position of a symbol is its bit index in the generated mask, so the
/// order must never depend on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the symbol was not present yet.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string());
        self.order.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = SymbolSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Raw scanner output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedShader {
    pub vertex: Vec<String>,
    pub fragment: Vec<String>,
    pub symbols: SymbolSet,
}

impl ScannedShader {
    pub fn lines(&self, stage: Stage) -> &[String] {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }

    pub(crate) fn lines_mut(&mut self, stage: Stage) -> &mut Vec<String> {
        match stage {
            Stage::Vertex => &mut self.vertex,
            Stage::Fragment => &mut self.fragment,
        }
    }
}

/// A stage's captured lines split into the prologue and everything after it.
///
/// The prologue (typically `#version`) is emitted before any injected
/// `#define`, the body after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSource {
    pub prologue: String,
    pub body: Vec<String>,
}

impl StageSource {
    pub fn split(stage: Stage, lines: &[String]) -> Result<Self, GenerateError> {
        let (prologue, body) = lines
            .split_first()
            .ok_or(GenerateError::EmptyStage(stage))?;
        Ok(Self {
            prologue: prologue.clone(),
            body: body.to_vec(),
        })
    }

    /// Prologue, then one `#define` per enabled symbol in bit order, then the body.
    pub fn assemble(&self, symbols: &[SymbolBinding], variant: VariantMask) -> String {
        let mut text = self.prologue.clone();
        for symbol in symbols {
            if variant.get(symbol) {
                text.push_str("#define ");
                text.push_str(&symbol.name);
                text.push('\n');
            }
        }
        for line in &self.body {
            text.push_str(line);
        }
        text
    }
}

/// A symbol with its bit index and generated accessor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolBinding {
    pub name: String,
    pub accessor: String,
    pub bit: u32,
}

impl SymbolBinding {
    pub fn mask(&self) -> u64 {
        1u64 << self.bit
    }
}

/// Rust mirror of the generated configuration class.
///
/// Comparison is purely by mask value, matching the generated `operator<`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantMask(u64);

impl VariantMask {
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn set(&mut self, symbol: &SymbolBinding, enabled: bool) {
        if enabled {
            self.0 |= symbol.mask();
        } else {
            self.0 &= !symbol.mask();
        }
    }

    pub fn get(self, symbol: &SymbolBinding) -> bool {
        self.0 & symbol.mask() != 0
    }
}

/// Assembled text for both stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledSources {
    pub vertex: String,
    pub fragment: String,
}

/// Everything the generators need for one shader file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderModel {
    /// Input file name, used for output naming and the `#include`.
    pub file_name: String,
    /// PascalCase prefix of the generated types.
    pub type_name: String,
    pub vertex: StageSource,
    pub fragment: StageSource,
    pub symbols: Vec<SymbolBinding>,
}

impl ShaderModel {
    pub fn new(file_name: &str, scanned: &ScannedShader) -> Result<Self, GenerateError> {
        if !is_includable_file_name(file_name) {
            return Err(GenerateError::UnsupportedFileName(file_name.to_string()));
        }
        let type_name = type_name_for_file(file_name);
        let vertex = StageSource::split(Stage::Vertex, scanned.lines(Stage::Vertex))?;
        let fragment = StageSource::split(Stage::Fragment, scanned.lines(Stage::Fragment))?;
        let symbols = bind_symbols(&scanned.symbols)?;

        Ok(Self {
            file_name: file_name.to_string(),
            type_name,
            vertex,
            fragment,
            symbols,
        })
    }

    pub fn stage(&self, stage: Stage) -> &StageSource {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }

    pub fn sources_type(&self) -> String {
        format!("{}ShaderSources", self.type_name)
    }

    pub fn config_type(&self) -> String {
        format!("{}ShaderConfig", self.type_name)
    }

    pub fn symbol(&self, name: &str) -> Option<&SymbolBinding> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Mask with every symbol enabled.
    pub fn all_enabled(&self) -> VariantMask {
        let mut variant = VariantMask::default();
        for symbol in &self.symbols {
            variant.set(symbol, true);
        }
        variant
    }

    /// Same algorithm as the generated `Assemble()`.
    pub fn assemble(&self, variant: VariantMask) -> AssembledSources {
        AssembledSources {
            vertex: self.vertex.assemble(&self.symbols, variant),
            fragment: self.fragment.assemble(&self.symbols, variant),
        }
    }
}

fn bind_symbols(symbols: &SymbolSet) -> Result<Vec<SymbolBinding>, GenerateError> {
    if symbols.len() > MAX_SYMBOLS {
        return Err(GenerateError::TooManySymbols {
            count: symbols.len(),
            max: MAX_SYMBOLS,
        });
    }

    let mut bindings: Vec<SymbolBinding> = Vec::with_capacity(symbols.len());
    for (bit, name) in symbols.iter().enumerate() {
        let mut accessor = identifier_with_prefix(to_pascal_case(name), "Sym");
        // PascalCase output never contains '_', so `<name>_<bit>` cannot clash
        if bindings.iter().any(|b| b.accessor == accessor) {
            accessor = format!("{}_{}", accessor, bit);
            tracing::warn!(
                "Symbol '{}' shares its accessor with an earlier symbol, using '{}'",
                name,
                accessor
            );
        }
        bindings.push(SymbolBinding {
            name: name.to_string(),
            accessor,
            bit: bit as u32,
        });
    }
    Ok(bindings)
}

/// Prefix `name` when it is empty or starts with a digit.
fn identifier_with_prefix(name: String, prefix: &str) -> String {
    if is_cpp_identifier(&name) {
        name
    } else {
        format!("{}{}", prefix, name)
    }
}

/// `basic_lit.glsl` -> `BasicLit`, `2d_sprite.glsl` -> `Shader2dSprite`
pub fn type_name_for_file(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    identifier_with_prefix(to_pascal_case(stem), "Shader")
}

/// File names that can be written verbatim inside `#include "..."`.
pub fn is_includable_file_name(file_name: &str) -> bool {
    !file_name
        .chars()
        .any(|c| c == '"' || c == '\\' || c.is_control())
}

/// Convert `USE_NORMAL_MAP`, `use-normal-map` or `useNormalMap` to `UseNormalMap`.
///
/// All-caps segments are lowercased after their first letter; mixed-case
/// segments keep their inner casing.
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for segment in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        out.push(first.to_ascii_uppercase());
        let rest = chars.as_str();
        if rest.chars().any(|c| c.is_ascii_lowercase()) {
            out.push_str(rest);
        } else {
            out.push_str(&rest.to_ascii_lowercase());
        }
    }
    out
}

pub fn is_cpp_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
