// src/lib.rs

pub mod bytecode;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod render;
pub mod system;
