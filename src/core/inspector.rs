// src/core/inspector.rs

//! Puente con el intérprete de Python. Un solo subproceso por objetivo:
//! importa la ruta con la salida silenciada, pide la fuente a `inspect` y
//! las instrucciones a `dis`, y responde con una línea JSON.

use include_dir::{Dir, include_dir};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::bytecode::InstructionListing;
use crate::constants::INSPECTOR_SCRIPT;
use crate::core::extractor::SourceArtifact;
use crate::core::graph_display::OutlineNode;
use crate::core::resolver::{ImportSideEffectError, ResolutionError};
use crate::core::target_path::TargetPath;
use crate::system::executor::{self, ExecutionError};

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/data");

#[derive(Error, Debug)]
pub enum InspectError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    ImportSideEffect(#[from] ImportSideEffectError),
    #[error("No se pudo usar el intérprete '{interpreter}'.")]
    Interpreter {
        interpreter: String,
        #[source]
        source: ExecutionError,
    },
    #[error("Respuesta inesperada del intérprete: {0}")]
    Protocol(String),
    #[error("El script interno '{0}' no existe o no es UTF-8.")]
    MissingScript(&'static str),
}

pub type InspectResult<T> = Result<T, InspectError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fuente e instrucciones del objetivo.
    Inspect,
    /// Árbol de miembros del objetivo.
    Outline,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::Inspect => "inspect",
            Action::Outline => "outline",
        }
    }
}

// --- RESPUESTAS ---

/// Objetivo tal como lo describe el intérprete tras importarlo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetInfo {
    pub kind: String,
    pub type_name: String,
    pub dotted: String,
    /// Prefijo que se importó como módulo.
    pub module: String,
    /// Segmentos resueltos como atributos, en orden.
    #[serde(default)]
    pub attributes: Vec<String>,
    pub file: Option<String>,
}

/// Por qué falta un artefacto. No es fatal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "missing", rename_all = "snake_case")]
pub enum MissingReason {
    NoSource { detail: String },
    Module { suggestion: Option<String> },
    Class { suggestion: Option<String> },
    NotCode { type_name: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Fetched<T> {
    Missing(MissingReason),
    Found(T),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    Resolved {
        target: TargetInfo,
        source: Fetched<SourceArtifact>,
        instructions: Fetched<InstructionListing>,
    },
    Outline {
        target: TargetInfo,
        outline: OutlineNode,
    },
    ModuleNotFound {
        segment: String,
    },
    AttributeNotFound {
        segment: String,
        owner: String,
        owner_kind: String,
    },
    ImportFailed {
        module: String,
        traceback: String,
    },
}

impl Reply {
    /// Las respuestas de fallo pasan a ser errores.
    pub fn into_success(self) -> InspectResult<Reply> {
        match self {
            Reply::ModuleNotFound { segment } => {
                Err(ResolutionError::ModuleNotFound { segment }.into())
            }
            Reply::AttributeNotFound {
                segment,
                owner,
                owner_kind,
            } => Err(ResolutionError::AttributeNotFound {
                segment,
                owner,
                owner_kind,
            }
            .into()),
            Reply::ImportFailed { module, traceback } => {
                log::info!("La importación de '{}' lanzó una excepción.", module);
                Err(ImportSideEffectError { module, traceback }.into())
            }
            ok => Ok(ok),
        }
    }
}

/// La respuesta es la última línea no vacía de stdout.
pub fn parse_reply(stdout: &str) -> InspectResult<Reply> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| InspectError::Protocol("salida vacía".to_string()))?;
    serde_json::from_str(line).map_err(|e| InspectError::Protocol(e.to_string()))
}

// --- INTÉRPRETE ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    program: String,
    /// Directorios que se anteponen a `sys.path`.
    roots: Vec<PathBuf>,
    /// Pasa `-E` para que el intérprete ignore `PYTHONPATH` y compañía.
    isolated: bool,
}

impl Interpreter {
    pub fn new(program: impl Into<String>, roots: Vec<PathBuf>, isolated: bool) -> Self {
        Self {
            program: program.into(),
            roots,
            isolated,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn args(&self, script: &str, action: Action, path: &TargetPath) -> Vec<String> {
        let mut args = Vec::new();
        if self.isolated {
            args.push("-E".to_string());
        }
        args.push("-c".to_string());
        args.push(script.to_string());
        args.push(action.as_str().to_string());
        args.push(path.to_string());
        args.extend(self.roots.iter().map(|r| r.display().to_string()));
        args
    }

    /// Ejecuta el script embebido. Las respuestas de fallo vuelven como
    /// errores tipados.
    pub fn query(&self, action: Action, path: &TargetPath) -> InspectResult<Reply> {
        let script = DATA_DIR
            .get_file(INSPECTOR_SCRIPT)
            .and_then(|f| f.contents_utf8())
            .ok_or(InspectError::MissingScript(INSPECTOR_SCRIPT))?;
        let args = self.args(script, action, path);
        let borrowed: Vec<&str> = args.iter().map(String::as_str).collect();

        let stdout = executor::capture_output(&self.program, &borrowed).map_err(|source| {
            InspectError::Interpreter {
                interpreter: self.program.clone(),
                source,
            }
        })?;
        let reply = parse_reply(&stdout)?;
        log::debug!("Respuesta del intérprete para '{}' recibida.", path);
        reply.into_success()
    }
}
