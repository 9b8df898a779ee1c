// src/render/instructions.rs

use std::collections::BTreeMap;

use crate::bytecode::{InstructionListing, InstructionRecord};
use crate::constants::INSTRUCTION_HEADERS;
use crate::render::styled::{StyleTag, StyledLine};

const JUMP_MARKER: &str = ">>";
const GAP: &str = "  ";

/// Fila de la tabla, con la línea de fuente que la alinea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionRow {
    pub line: Option<u32>,
    pub starts_line: bool,
    pub text: StyledLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionBlock {
    pub header: StyledLine,
    pub rows: Vec<InstructionRow>,
    pub exception_table: Vec<StyledLine>,
}

/// Color de cada destino de salto: el n-ésimo destino en orden de offset
/// recibe el color `n`. Siempre el mismo para el mismo listado.
pub fn jump_colors(listing: &InstructionListing) -> BTreeMap<u32, usize> {
    listing
        .records
        .iter()
        .filter(|r| r.is_jump_target)
        .enumerate()
        .map(|(n, r)| (r.offset, n))
        .collect()
}

impl InstructionBlock {
    pub fn from_listing(listing: &InstructionListing) -> Self {
        let colors = jump_colors(listing);
        let offset_width = listing
            .records
            .iter()
            .map(|r| r.offset.to_string().len())
            .chain(std::iter::once(INSTRUCTION_HEADERS[0].len()))
            .max()
            .unwrap_or(0);
        let opname_width = listing
            .records
            .iter()
            .map(|r| r.opname.len())
            .chain(std::iter::once(INSTRUCTION_HEADERS[1].len()))
            .max()
            .unwrap_or(0);

        let mut header = StyledLine::new();
        header.push(" ".repeat(JUMP_MARKER.len() + 1), StyleTag::Plain);
        header.push(
            format!(
                "{:>ow$}{GAP}{:<pw$}{GAP}{}",
                INSTRUCTION_HEADERS[0],
                INSTRUCTION_HEADERS[1],
                INSTRUCTION_HEADERS[2],
                ow = offset_width,
                pw = opname_width,
            ),
            StyleTag::Header,
        );

        let rows = listing
            .records
            .iter()
            .map(|record| InstructionRow {
                line: record.line,
                starts_line: record.starts_line,
                text: row_text(record, &colors, offset_width, opname_width),
            })
            .collect();

        let exception_table = if listing.exception_table.is_empty() {
            Vec::new()
        } else {
            std::iter::once(StyledLine::tagged("ExceptionTable:", StyleTag::Header))
                .chain(listing.exception_table.iter().map(|entry| {
                    let mut line = StyledLine::plain(format!("  {} to {} -> ", entry.start, entry.end));
                    let tag = colors
                        .get(&entry.target)
                        .map(|n| StyleTag::Jump(*n))
                        .unwrap_or(StyleTag::Offset);
                    line.push(entry.target.to_string(), tag);
                    line.push(format!(" [{}]", entry.depth), StyleTag::Plain);
                    if entry.lasti {
                        line.push(" lasti", StyleTag::Plain);
                    }
                    line
                }))
                .collect()
        };

        Self {
            header,
            rows,
            exception_table,
        }
    }

    pub fn width(&self) -> usize {
        std::iter::once(&self.header)
            .chain(self.rows.iter().map(|r| &r.text))
            .chain(self.exception_table.iter())
            .map(StyledLine::width)
            .max()
            .unwrap_or(0)
    }

    /// Cabecera, filas y tabla de excepciones, una debajo de otra.
    pub fn lines(&self) -> Vec<StyledLine> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().map(|r| r.text.clone()))
            .chain(self.exception_table.iter().cloned())
            .collect()
    }
}

fn row_text(
    record: &InstructionRecord,
    colors: &BTreeMap<u32, usize>,
    offset_width: usize,
    opname_width: usize,
) -> StyledLine {
    let mut line = StyledLine::new();
    let target_color = colors.get(&record.offset).copied();
    match target_color {
        Some(n) => line.push(JUMP_MARKER, StyleTag::Jump(n)),
        None => line.push(" ".repeat(JUMP_MARKER.len()), StyleTag::Plain),
    }
    line.push(" ", StyleTag::Plain);
    line.push(
        format!("{:>w$}", record.offset, w = offset_width),
        target_color.map(StyleTag::Jump).unwrap_or(StyleTag::Offset),
    );
    line.push(GAP, StyleTag::Plain);
    line.push(
        format!("{:<w$}", record.opname, w = opname_width),
        StyleTag::Opname(record.category()),
    );

    let args = match (record.arg, record.argrepr.is_empty()) {
        (Some(arg), false) => format!("{} ({})", arg, record.argrepr),
        (Some(arg), true) => arg.to_string(),
        (None, false) => format!("({})", record.argrepr),
        (None, true) => String::new(),
    };
    if !args.is_empty() {
        line.push(GAP, StyleTag::Plain);
        let tag = record
            .jump_target
            .and_then(|target| colors.get(&target))
            .map(|n| StyleTag::Jump(*n))
            .unwrap_or(StyleTag::Argument);
        line.push(args, tag);
    }
    line
}
