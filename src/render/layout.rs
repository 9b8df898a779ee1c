// src/render/layout.rs

//! Decide qué se muestra y cómo: en columnas, apilado o un solo panel.

use thiserror::Error;

use crate::bytecode::InstructionListing;
use crate::constants::COLUMN_SEPARATOR;
use crate::core::extractor::{Extraction, SourceArtifact, Unavailable};
use crate::models::DisplayMode;
use crate::render::highlight::PythonHighlighter;
use crate::render::instructions::{InstructionBlock, InstructionRow};
use crate::render::styled::{StyleTag, StyledLine, dedent, expand_tabs};

use unicode_width::UnicodeWidthStr;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No hay nada que mostrar para '{target}': {source_reason}; {instructions_reason}.")]
    NothingToRender {
        target: String,
        source_reason: String,
        instructions_reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    SideBySide,
    Stacked,
    SourceOnly,
    InstructionsOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: DisplayMode,
    pub width: usize,
    pub line_numbers: bool,
    pub tab_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub layout: Layout,
    pub notices: Vec<Unavailable>,
}

/// Elige la disposición. Un artefacto ausente deja ver el otro aunque el
/// modo no lo pidiera; los ausentes que sí se pidieron generan un aviso.
pub fn plan(
    extraction: &Extraction,
    mode: DisplayMode,
    fits_side_by_side: bool,
) -> Result<RenderPlan, RenderError> {
    let mut notices = Vec::new();
    if let (true, Err(missing)) = (mode.wants_source(), &extraction.source) {
        notices.push(missing.clone());
    }
    if let (true, Err(missing)) = (mode.wants_instructions(), &extraction.instructions) {
        notices.push(missing.clone());
    }

    let layout = match (&extraction.source, &extraction.instructions) {
        (Err(source), Err(instructions)) => {
            return Err(RenderError::NothingToRender {
                target: extraction.title.dotted.clone(),
                source_reason: source.to_string(),
                instructions_reason: instructions.to_string(),
            });
        }
        (Ok(_), Err(_)) => Layout::SourceOnly,
        (Err(_), Ok(_)) => Layout::InstructionsOnly,
        (Ok(_), Ok(_)) => match mode {
            DisplayMode::Source => Layout::SourceOnly,
            DisplayMode::Instructions => Layout::InstructionsOnly,
            DisplayMode::Both if fits_side_by_side => Layout::SideBySide,
            DisplayMode::Both => Layout::Stacked,
        },
    };
    log::debug!("Disposición {:?} para '{}'", layout, extraction.title.dotted);
    Ok(RenderPlan { layout, notices })
}

// --- BLOQUE DE FUENTE ---

#[derive(Debug, Clone)]
struct SourceRow {
    number: Option<u32>,
    text: StyledLine,
}

#[derive(Debug, Clone)]
struct SourceBlock {
    rows: Vec<SourceRow>,
    first_line: u32,
    number_width: usize,
    line_numbers: bool,
}

impl SourceBlock {
    fn new(artifact: &SourceArtifact, options: &RenderOptions) -> Self {
        let expanded: Vec<String> = artifact
            .lines
            .iter()
            .map(|l| expand_tabs(l, options.tab_size))
            .collect();
        let lines = dedent(&expanded);
        let highlighted = PythonHighlighter::highlight_lines(&lines);
        let rows = lines
            .iter()
            .zip(highlighted)
            .enumerate()
            .map(|(i, (raw, text))| SourceRow {
                number: (!raw.trim().is_empty()).then_some(artifact.first_line + i as u32),
                text,
            })
            .collect();
        Self {
            rows,
            first_line: artifact.first_line,
            number_width: artifact.last_line().to_string().len(),
            line_numbers: options.line_numbers,
        }
    }

    fn line(&self, index: Option<usize>) -> StyledLine {
        let mut line = StyledLine::new();
        let row = index.and_then(|i| self.rows.get(i));
        if self.line_numbers {
            let number = row
                .and_then(|r| r.number)
                .map(|n| n.to_string())
                .unwrap_or_default();
            line.push(format!("{:>w$} ", number, w = self.number_width), StyleTag::LineNumber);
        }
        if let Some(row) = row {
            line.append(row.text.clone());
        }
        line
    }

    fn lines(&self) -> Vec<StyledLine> {
        (0..self.rows.len()).map(|i| self.line(Some(i))).collect()
    }

    fn width(&self) -> usize {
        self.lines().iter().map(StyledLine::width).max().unwrap_or(0)
    }
}

// --- ALINEACIÓN ---

/// Empareja filas de fuente (índices desde `first_line`) con filas de
/// instrucciones. Una instrucción que inicia una línea nueva se coloca junto
/// a esa línea; las que vuelven atrás o no tienen línea van con fuente vacía.
pub fn align(
    first_line: u32,
    source_len: usize,
    rows: &[InstructionRow],
) -> Vec<(Option<usize>, Option<usize>)> {
    let mut pairs = Vec::new();
    let mut next_source = 0usize;
    for (i, row) in rows.iter().enumerate() {
        let index = row
            .line
            .filter(|_| row.starts_line)
            .and_then(|line| line.checked_sub(first_line))
            .map(|offset| offset as usize)
            .filter(|index| *index >= next_source && *index < source_len);
        match index {
            Some(index) => {
                pairs.extend((next_source..index).map(|s| (Some(s), None)));
                pairs.push((Some(index), Some(i)));
                next_source = index + 1;
            }
            None => pairs.push((None, Some(i))),
        }
    }
    pairs.extend((next_source..source_len).map(|s| (Some(s), None)));
    pairs
}

// --- RENDER ---

pub fn render(extraction: &Extraction, options: &RenderOptions) -> Result<Vec<StyledLine>, RenderError> {
    let source = extraction
        .source
        .as_ref()
        .ok()
        .map(|artifact| SourceBlock::new(artifact, options));
    let listing = extraction.instructions.as_ref().ok();
    let block = listing.map(InstructionBlock::from_listing);

    let separator_width = COLUMN_SEPARATOR.width();
    let fits = match (&source, &block) {
        (Some(source), Some(block)) => source.width() + separator_width + block.width() <= options.width,
        _ => false,
    };
    let plan = plan(extraction, options.mode, fits)?;

    let mut out = Vec::new();
    out.push(title_line(extraction));
    out.push(StyledLine::tagged("─".repeat(options.width), StyleTag::Rule));
    for notice in &plan.notices {
        out.push(StyledLine::tagged(format!("! {}", notice), StyleTag::Notice));
    }

    match (plan.layout, &source, &block) {
        (Layout::SourceOnly, Some(source), _) => out.extend(source.lines()),
        (Layout::InstructionsOnly, _, Some(block)) => out.extend(block.lines()),
        (Layout::Stacked, Some(source), Some(block)) => {
            out.extend(source.lines());
            out.push(StyledLine::new());
            out.extend(block.lines());
        }
        (Layout::SideBySide, Some(source), Some(block)) => {
            out.extend(side_by_side(source, block));
        }
        _ => {}
    }

    if matches!(plan.layout, Layout::InstructionsOnly | Layout::Stacked | Layout::SideBySide) {
        if let Some(listing) = listing {
            out.extend(nested_listings(listing));
        }
    }
    Ok(out)
}

fn title_line(extraction: &Extraction) -> StyledLine {
    let title = &extraction.title;
    let mut line = StyledLine::new();
    line.push(format!("{} ", title.kind), StyleTag::Plain);
    line.push(title.dotted.clone(), StyleTag::Title);
    if let Some(location) = &title.location {
        line.push(format!("  —  {}", location), StyleTag::Plain);
    }
    line
}

fn side_by_side(source: &SourceBlock, block: &InstructionBlock) -> Vec<StyledLine> {
    let left_width = source.width();
    let joined = |left: StyledLine, right: StyledLine| {
        let mut line = left.fit(left_width);
        line.push(COLUMN_SEPARATOR, StyleTag::Separator);
        line.append(right);
        line
    };

    let mut out = vec![joined(source.line(None), block.header.clone())];
    for (source_index, row_index) in align(source.first_line, source.rows.len(), &block.rows) {
        let right = row_index
            .and_then(|i| block.rows.get(i))
            .map(|r| r.text.clone())
            .unwrap_or_default();
        out.push(joined(source.line(source_index), right));
    }
    for line in &block.exception_table {
        out.push(joined(StyledLine::new(), line.clone()));
    }
    out
}

/// Listados anidados con su cabecera, como `dis.dis`.
fn nested_listings(listing: &InstructionListing) -> Vec<StyledLine> {
    let mut out = Vec::new();
    for nested in listing.walk().into_iter().skip(1) {
        out.push(StyledLine::new());
        out.push(StyledLine::tagged(nested.banner(), StyleTag::Banner));
        out.extend(InstructionBlock::from_listing(nested).lines());
    }
    out
}
