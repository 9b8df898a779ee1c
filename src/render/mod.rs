// src/render/mod.rs

//! Convierte los artefactos en texto para la terminal.

pub mod highlight;
pub mod instructions;
pub mod layout;
pub mod styled;
pub mod terminal;

pub use layout::{Layout, RenderError, RenderOptions, RenderPlan, render};
pub use styled::{StyleTag, StyledLine};
