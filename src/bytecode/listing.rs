// src/bytecode/listing.rs

//! Tabla de instrucciones desensamblada: lo único que el renderizador ve
//! de un objeto de código.

use std::collections::BTreeSet;

use serde::Deserialize;

/// Familia de un opcode; decide el color de su nombre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Load,
    Store,
    Call,
    Jump,
    Compare,
    Return,
    Other,
}

impl Category {
    pub fn of(opname: &str) -> Self {
        match opname {
            "COMPARE_OP" | "IS_OP" | "CONTAINS_OP" | "CHECK_EXC_MATCH" | "CHECK_EG_MATCH" => {
                Category::Compare
            }
            "RETURN_VALUE" | "RETURN_CONST" | "RETURN_GENERATOR" | "YIELD_VALUE"
            | "RAISE_VARARGS" | "RERAISE" => Category::Return,
            "FOR_ITER" | "SEND" => Category::Jump,
            "PRECALL" | "KW_NAMES" => Category::Call,
            name if name.contains("JUMP") => Category::Jump,
            name if name.starts_with("CALL") => Category::Call,
            name if name.starts_with("LOAD_") || name.starts_with("IMPORT_") => Category::Load,
            name if name.starts_with("STORE_") || name.starts_with("DELETE_") => Category::Store,
            _ => Category::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstructionRecord {
    pub offset: u32,
    pub opname: String,
    pub arg: Option<u32>,
    #[serde(default)]
    pub argrepr: String,
    pub jump_target: Option<u32>,
    pub line: Option<u32>,
    /// Primera instrucción de una línea de código fuente.
    #[serde(default)]
    pub starts_line: bool,
    #[serde(default)]
    pub is_jump_target: bool,
}

impl InstructionRecord {
    pub fn category(&self) -> Category {
        Category::of(&self.opname)
    }
}

/// Entrada de la tabla de excepciones; `end` es el último offset cubierto.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExceptionEntry {
    pub start: u32,
    pub end: u32,
    pub target: u32,
    pub depth: u32,
    pub lasti: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstructionListing {
    pub name: String,
    pub qualname: String,
    pub first_line: u32,
    pub records: Vec<InstructionRecord>,
    #[serde(default)]
    pub exception_table: Vec<ExceptionEntry>,
    /// Objetos de código anidados, en el orden de `co_consts`.
    #[serde(default)]
    pub nested: Vec<InstructionListing>,
}

impl InstructionListing {
    /// Este listado y todos los anidados, en profundidad.
    pub fn walk(&self) -> Vec<&InstructionListing> {
        let mut out = vec![self];
        for child in &self.nested {
            out.extend(child.walk());
        }
        out
    }

    /// Offsets que son destino de algún salto, en orden.
    pub fn jump_targets(&self) -> Vec<u32> {
        let targets: BTreeSet<u32> = self.records.iter().filter_map(|r| r.jump_target).collect();
        targets.into_iter().collect()
    }

    /// Cabecera al estilo de `dis.dis` para los objetos anidados.
    pub fn banner(&self) -> String {
        format!(
            "Disassembly of <code object {}, line {}>:",
            self.name, self.first_line
        )
    }
}
