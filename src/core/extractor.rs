// src/core/extractor.rs

//! Convierte lo que devolvió el intérprete en los dos artefactos que se
//! muestran: las líneas de fuente y el listado de instrucciones. Un
//! artefacto ausente lleva su motivo, nunca aborta.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::bytecode::InstructionListing;
use crate::core::inspector::{Fetched, MissingReason};
use crate::core::resolver::Inspection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Source,
    Instructions,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Source => f.write_str("código fuente"),
            Artifact::Instructions => f.write_str("instrucciones"),
        }
    }
}

/// Un artefacto que no se puede mostrar. No es fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{artifact} no disponible: {reason}")]
pub struct Unavailable {
    pub artifact: Artifact,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceArtifact {
    pub path: PathBuf,
    /// Relativa al directorio actual si el archivo está dentro; si no, absoluta.
    pub display_path: String,
    pub first_line: u32,
    pub lines: Vec<String>,
}

impl SourceArtifact {
    pub fn last_line(&self) -> u32 {
        self.first_line + self.lines.len().saturating_sub(1) as u32
    }
}

/// `function json.dumps  —  json/__init__.py:183`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub kind: String,
    pub dotted: String,
    pub location: Option<String>,
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.dotted)?;
        if let Some(location) = &self.location {
            write!(f, "  —  {}", location)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Extraction {
    pub title: Title,
    pub source: Result<SourceArtifact, Unavailable>,
    pub instructions: Result<InstructionListing, Unavailable>,
}

pub fn extract(inspection: Inspection) -> Extraction {
    let Inspection {
        target,
        source,
        instructions,
    } = inspection;
    let source = artifact(Artifact::Source, source);
    let instructions = artifact(Artifact::Instructions, instructions);
    if let Err(missing) = &source {
        log::info!("{}", missing);
    }
    if let Err(missing) = &instructions {
        log::info!("{}", missing);
    }

    let location = match &source {
        Ok(found) => Some(format!("{}:{}", found.display_path, found.first_line)),
        Err(_) => target.file.clone(),
    };
    Extraction {
        title: Title {
            kind: target.kind_name().to_string(),
            dotted: target.dotted,
            location,
        },
        source,
        instructions,
    }
}

fn artifact<T>(artifact: Artifact, fetched: Fetched<T>) -> Result<T, Unavailable> {
    match fetched {
        Fetched::Found(value) => Ok(value),
        Fetched::Missing(missing) => Err(Unavailable {
            artifact,
            reason: reason(missing),
        }),
    }
}

fn reason(missing: MissingReason) -> String {
    match missing {
        MissingReason::NoSource { detail } => format!("no se pudo leer la fuente ({})", detail),
        MissingReason::Module { suggestion } => {
            with_suggestion("los módulos no tienen instrucciones propias", suggestion)
        }
        MissingReason::Class { suggestion } => {
            with_suggestion("las clases no tienen instrucciones propias", suggestion)
        }
        MissingReason::NotCode { type_name } => {
            format!("un objeto '{}' no tiene código Python", type_name)
        }
    }
}

fn with_suggestion(reason: &str, suggestion: Option<String>) -> String {
    match suggestion {
        Some(dotted) => format!("{}; prueba con `{}`", reason, dotted),
        None => reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::inspector::parse_reply;
    use crate::core::resolver::inspection_from;

    fn extraction_for(reply: &str) -> Extraction {
        let reply = parse_reply(reply).expect("respuesta");
        extract(inspection_from(reply).expect("resuelto"))
    }

    const FUNCTION: &str = r#"{"status": "resolved",
        "target": {"kind": "function", "type_name": "function", "dotted": "sample.cached", "module": "sample", "attributes": ["cached"], "file": "sample.py"},
        "source": {"path": "/w/sample.py", "display_path": "sample.py", "first_line": 8, "lines": ["@functools.cache", "def cached(n):", "    return n"]},
        "instructions": {"name": "cached", "qualname": "cached", "first_line": 8, "records": []}}"#;

    const MODULE: &str = r#"{"status": "resolved",
        "target": {"kind": "module", "type_name": "module", "dotted": "sample", "module": "sample", "attributes": [], "file": "sample.py"},
        "source": {"path": "/w/sample.py", "display_path": "sample.py", "first_line": 1, "lines": ["import functools"]},
        "instructions": {"missing": "module", "suggestion": "sample.helper"}}"#;

    const BUILTIN: &str = r#"{"status": "resolved",
        "target": {"kind": "other", "type_name": "builtin_function_or_method", "dotted": "math.floor", "module": "math", "attributes": ["floor"], "file": null},
        "source": {"missing": "no_source", "detail": "got builtin_function_or_method"},
        "instructions": {"missing": "not_code", "type_name": "builtin_function_or_method"}}"#;

    #[test]
    fn functions_carry_both_artifacts() {
        let extraction = extraction_for(FUNCTION);
        let source = extraction.source.expect("fuente");
        assert_eq!(source.first_line, 8);
        assert_eq!(source.lines.first().map(String::as_str), Some("@functools.cache"));
        assert_eq!(source.last_line(), 10);
        assert_eq!(extraction.instructions.expect("instrucciones").qualname, "cached");
        assert_eq!(extraction.title.to_string(), "function sample.cached  —  sample.py:8");
    }

    #[test]
    fn modules_suggest_a_member() {
        let extraction = extraction_for(MODULE);
        let missing = extraction.instructions.expect_err("sin instrucciones");
        assert_eq!(missing.artifact, Artifact::Instructions);
        assert!(missing.reason.contains("`sample.helper`"), "{}", missing.reason);
        assert_eq!(extraction.source.expect("fuente").first_line, 1);
    }

    #[test]
    fn builtins_have_nothing_and_no_location() {
        let floor = extraction_for(BUILTIN);
        assert_eq!(floor.title.kind, "builtin_function_or_method");
        assert_eq!(floor.title.location, None);
        let source = floor.source.expect_err("sin fuente");
        assert!(source.to_string().starts_with("código fuente no disponible"));
        assert!(floor.instructions.is_err());
    }

    #[test]
    fn missing_source_falls_back_to_the_file() {
        let reply = MODULE.replace(
            r#"{"path": "/w/sample.py", "display_path": "sample.py", "first_line": 1, "lines": ["import functools"]}"#,
            r#"{"missing": "no_source", "detail": "could not get source code"}"#,
        );
        let extraction = extraction_for(&reply);
        assert!(extraction.source.is_err());
        assert_eq!(extraction.title.location.as_deref(), Some("sample.py"));
    }
}
