// src/core/graph_display.rs

use serde::Deserialize;
use std::fmt::Write as _;

use crate::core::inspector::{Action, InspectError, InspectResult, Interpreter, Reply};
use crate::core::resolver::ResolvedTarget;
use crate::core::target_path::TargetPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberLabel {
    Module,
    Class,
    Function,
    Method,
    Other,
}

impl MemberLabel {
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            MemberLabel::Module => Some("import"),
            MemberLabel::Class => Some("class"),
            MemberLabel::Function | MemberLabel::Method => Some("def"),
            MemberLabel::Other => None,
        }
    }
}

/// Un miembro navegable de un módulo o clase, con sus propios miembros.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutlineNode {
    pub label: MemberLabel,
    pub name: String,
    /// Ruta con puntos que alcanza este miembro desde su módulo.
    pub path: String,
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn describe(&self) -> String {
        match self.label.keyword() {
            Some(keyword) => format!("{} {}", keyword, self.name),
            None => self.name.clone(),
        }
    }

    pub fn has_members(&self) -> bool {
        matches!(self.label, MemberLabel::Module | MemberLabel::Class)
    }
}

/// Árbol de miembros tal como existen tras importar: submódulos ya
/// importados, clases y funciones definidas en el módulo. Las clases se
/// expanden recursivamente.
pub fn outline(path: &TargetPath, interpreter: &Interpreter) -> InspectResult<(ResolvedTarget, OutlineNode)> {
    match interpreter.query(Action::Outline, path)? {
        Reply::Outline { target, outline } => Ok((target.into(), outline)),
        other => Err(InspectError::Protocol(format!(
            "se esperaba un árbol de miembros: {:?}",
            other
        ))),
    }
}

/// Dibuja el árbol con conectores `├─`/`└─`.
pub fn render_outline(target: &ResolvedTarget, root: &OutlineNode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", target.kind_name(), target.dotted);
    if root.children.is_empty() {
        let _ = writeln!(out, "└─ (sin miembros)");
    }
    for (i, child) in root.children.iter().enumerate() {
        let is_last = i == root.children.len() - 1;
        render_node(&mut out, child, "", is_last);
    }
    out
}

/// Función recursiva para un nodo del árbol y sus descendientes.
fn render_node(out: &mut String, node: &OutlineNode, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let _ = writeln!(out, "{}{} {}", prefix, connector, node.describe());

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(out, child, &child_prefix, is_last_child);
    }
}
