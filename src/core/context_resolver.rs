// src/core/context_resolver.rs

//! Selección interactiva (`--pick`): baja por el árbol de miembros de un
//! módulo o clase hasta llegar a algo que tenga instrucciones.

use dialoguer::{Error as DialoguerError, Select, theme::ColorfulTheme};
use thiserror::Error;

use crate::core::graph_display::OutlineNode;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Error de Interfaz de Usuario: {0}")]
    Dialoguer(#[from] DialoguerError),
    #[error("'{0}' no tiene miembros que elegir.")]
    NoMembers(String),
    #[error("Operación cancelada por el usuario.")]
    Cancelled,
}

type ContextResult<T> = Result<T, ContextError>;

const SHOW_CURRENT: &str = "· (mostrar este objetivo)";

/// Pregunta por un miembro mientras el nodo actual tenga miembros. Devuelve
/// la ruta con puntos del nodo elegido.
pub fn pick_target(root: &OutlineNode) -> ContextResult<String> {
    let mut current = root;
    while current.has_members() {
        if current.children.is_empty() {
            return Err(ContextError::NoMembers(current.path.clone()));
        }
        let items = pick_items(current);
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Miembros de {}:", current.path))
            .items(&items)
            .default(1)
            .interact_opt()?
            .ok_or(ContextError::Cancelled)?;

        match descend(current, selection) {
            Some(child) => current = child,
            None => break,
        }
    }
    log::debug!("Objetivo elegido: {}", current.path);
    Ok(current.path.clone())
}

/// Opciones del menú: primero la de quedarse en el objetivo actual.
pub fn pick_items(node: &OutlineNode) -> Vec<String> {
    std::iter::once(SHOW_CURRENT.to_string())
        .chain(node.children.iter().map(OutlineNode::describe))
        .collect()
}

/// Hijo que corresponde a una opción del menú; la opción 0 no baja.
pub fn descend(node: &OutlineNode, selection: usize) -> Option<&OutlineNode> {
    selection.checked_sub(1).and_then(|i| node.children.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> OutlineNode {
        serde_json::from_str(
            r#"{"label": "module", "name": "mod_a", "path": "mod_a", "children": [
                {"label": "class", "name": "K", "path": "mod_a.K", "children": [
                    {"label": "method", "name": "go", "path": "mod_a.K.go", "children": []}
                ]},
                {"label": "function", "name": "f", "path": "mod_a.f", "children": []}
            ]}"#,
        )
        .expect("árbol")
    }

    #[test]
    fn items_start_with_the_current_target() {
        let module = module();
        assert_eq!(pick_items(&module), vec![SHOW_CURRENT, "class K", "def f"]);

        let class = descend(&module, 1).expect("clase");
        assert_eq!(pick_items(class), vec![SHOW_CURRENT, "def go"]);
        let method = descend(class, 1).expect("método");
        assert_eq!(method.path, "mod_a.K.go");
        assert!(!method.has_members());
    }

    #[test]
    fn choosing_the_first_item_stays() {
        let module = module();
        assert!(descend(&module, 0).is_none());
        assert!(descend(&module, 9).is_none());
    }
}
