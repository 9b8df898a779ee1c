// src/bytecode/mod.rs

//! Listados de instrucciones tal como los entrega `dis` del intérprete.

pub mod listing;

pub use listing::{Category, ExceptionEntry, InstructionListing, InstructionRecord};
