// src/models/mod.rs

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_INTERPRETER, DEFAULT_TAB_SIZE};

/// Qué artefactos se piden.
#[derive(Deserialize, Serialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Both,
    Source,
    Instructions,
}

impl DisplayMode {
    pub fn wants_source(&self) -> bool {
        matches!(self, DisplayMode::Both | DisplayMode::Source)
    }

    pub fn wants_instructions(&self) -> bool {
        matches!(self, DisplayMode::Both | DisplayMode::Instructions)
    }

    /// Combina los pares `--source/--no-source` e `--instructions/--no-instructions`.
    pub fn with_overrides(self, source: Option<bool>, instructions: Option<bool>) -> Self {
        let source = source.unwrap_or(self.wants_source());
        let instructions = instructions.unwrap_or(self.wants_instructions());
        match (source, instructions) {
            (true, false) => DisplayMode::Source,
            (false, true) => DisplayMode::Instructions,
            _ => DisplayMode::Both,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayMode::Both => "both",
            DisplayMode::Source => "source",
            DisplayMode::Instructions => "instructions",
        };
        f.write_str(name)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

// --- ARCHIVO DE CONFIGURACIÓN ---

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySection {
    pub mode: DisplayMode,
    pub color: ColorChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    pub line_numbers: bool,
    pub tab_size: usize,
    /// Paginador; si falta se usa `$PAGER` o `less -R`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pager: Option<String>,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Both,
            color: ColorChoice::Auto,
            width: None,
            line_numbers: true,
            tab_size: DEFAULT_TAB_SIZE,
            pager: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PythonSection {
    pub interpreter: String,
    /// Directorios extra para `sys.path`; admiten `~`.
    pub search_paths: Vec<String>,
}

impl Default for PythonSection {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            search_paths: Vec::new(),
        }
    }
}

/// Contenido de `config.toml`. Las secciones y campos ausentes toman su valor por defecto.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub display: DisplaySection,
    pub python: PythonSection,
}
