// src/core/mod.rs

pub mod config;
pub mod context_resolver;
pub mod extractor;
pub mod graph_display;
pub mod inspector;
pub mod resolver;
pub mod target_path;
