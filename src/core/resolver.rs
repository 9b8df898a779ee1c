// src/core/resolver.rs

//! Resolución en dos fases de una ruta con puntos. El intérprete importa el
//! prefijo más largo que sea un módulo (fase 1) y recorre los atributos
//! restantes (fase 2); aquí sólo se tipan los resultados y los fallos.
//!
//! Importar un módulo ejecuta su código de nivel superior: la herramienta
//! ejecuta todo lo alcanzable por `import` desde la ruta pedida.

use std::fmt;
use thiserror::Error;

use crate::bytecode::InstructionListing;
use crate::core::extractor::SourceArtifact;
use crate::core::inspector::{Action, Fetched, InspectError, InspectResult, Interpreter, Reply, TargetInfo};
use crate::core::target_path::TargetPath;

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("La ruta objetivo está vacía.")]
    EmptyPath,
    #[error("La ruta '{path}' tiene un segmento vacío.")]
    EmptySegment { path: String },
    #[error("'{segment}' no es un identificador válido en la ruta '{path}'.")]
    InvalidSegment { path: String, segment: String },
    #[error("No se encontró ningún módulo llamado '{segment}'.")]
    ModuleNotFound { segment: String },
    #[error("No existe el atributo '{segment}' en {owner_kind} '{owner}'.")]
    AttributeNotFound {
        segment: String,
        owner: String,
        owner_kind: String,
    },
}

/// Excepción del propio código de nivel superior del módulo importado. Se
/// muestra tal cual, con su traceback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .traceback.trim_end())]
pub struct ImportSideEffectError {
    pub module: String,
    pub traceback: String,
}

// --- OBJETIVOS RESUELTOS ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Module,
    Class,
    Function,
    Method,
    /// Cualquier otro objeto; guarda el nombre de su tipo.
    Other { type_name: String },
}

/// Resultado de la primera fase: el módulo y la cadena de atributos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath {
    pub module: String,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub kind: TargetKind,
    pub split: SplitPath,
    /// `módulo.qualname` del objeto alcanzado.
    pub dotted: String,
    /// Archivo que lo define, relativo al directorio actual si está dentro.
    pub file: Option<String>,
}

impl ResolvedTarget {
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            TargetKind::Module => "module",
            TargetKind::Class => "class",
            TargetKind::Function => "function",
            TargetKind::Method => "method",
            TargetKind::Other { type_name } => type_name,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self.kind, TargetKind::Function | TargetKind::Method)
    }

    /// Módulos y clases: los que tienen miembros que recorrer.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, TargetKind::Module | TargetKind::Class)
    }
}

impl From<TargetInfo> for ResolvedTarget {
    fn from(info: TargetInfo) -> Self {
        let kind = match info.kind.as_str() {
            "module" => TargetKind::Module,
            "class" => TargetKind::Class,
            "function" => TargetKind::Function,
            "method" => TargetKind::Method,
            _ => TargetKind::Other {
                type_name: info.type_name,
            },
        };
        Self {
            kind,
            split: SplitPath {
                module: info.module,
                attributes: info.attributes,
            },
            dotted: info.dotted,
            file: info.file,
        }
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TargetKind::Module => write!(f, "el módulo '{}'", self.dotted),
            TargetKind::Class => write!(f, "la clase '{}'", self.dotted),
            TargetKind::Function => write!(f, "la función '{}'", self.dotted),
            TargetKind::Method => write!(f, "el método '{}'", self.dotted),
            TargetKind::Other { type_name } => write!(f, "el objeto {} '{}'", type_name, self.dotted),
        }
    }
}

/// Objetivo resuelto junto con lo que el intérprete pudo sacar de él.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub target: ResolvedTarget,
    pub source: Fetched<SourceArtifact>,
    pub instructions: Fetched<InstructionListing>,
}

pub fn resolve(path: &TargetPath, interpreter: &Interpreter) -> InspectResult<Inspection> {
    let reply = interpreter.query(Action::Inspect, path)?;
    let inspection = inspection_from(reply)?;
    log::info!("'{}' resuelto como {}", path, inspection.target);
    log::debug!(
        "Módulo importado '{}', atributos {:?}",
        inspection.target.split.module,
        inspection.target.split.attributes
    );
    Ok(inspection)
}

pub fn inspection_from(reply: Reply) -> InspectResult<Inspection> {
    match reply.into_success()? {
        Reply::Resolved {
            target,
            source,
            instructions,
        } => Ok(Inspection {
            target: target.into(),
            source,
            instructions,
        }),
        other => Err(InspectError::Protocol(format!(
            "se esperaba un objetivo resuelto: {:?}",
            other
        ))),
    }
}
