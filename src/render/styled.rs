// src/render/styled.rs

//! Texto con estilo independiente de la terminal. Las secuencias de escape
//! sólo se generan en `terminal`.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::bytecode::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTag {
    Plain,
    // Fuente
    Keyword,
    Builtin,
    Definition,
    Decorator,
    Str,
    Number,
    Comment,
    Operator,
    LineNumber,
    // Instrucciones
    Header,
    Offset,
    Opname(Category),
    Argument,
    /// Color `n` de la paleta de saltos.
    Jump(usize),
    // Marco
    Title,
    Rule,
    Notice,
    Banner,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub tag: StyleTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::tagged(text, StyleTag::Plain)
    }

    pub fn tagged(text: impl Into<String>, tag: StyleTag) -> Self {
        let mut line = Self::new();
        line.push(text, tag);
        line
    }

    /// Añade un tramo; los vacíos se descartan y los contiguos del mismo
    /// estilo se funden.
    pub fn push(&mut self, text: impl Into<String>, tag: StyleTag) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(&text),
            _ => self.spans.push(StyledSpan { text, tag }),
        }
    }

    pub fn append(&mut self, other: StyledLine) {
        for span in other.spans {
            self.push(span.text, span.tag);
        }
    }

    /// Ancho en columnas de terminal.
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.width()).sum()
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }

    /// Rellena con espacios hasta `width` columnas. Si la línea ya es más
    /// ancha se recorta y termina en `…`.
    pub fn fit(mut self, width: usize) -> StyledLine {
        let current = self.width();
        if current <= width {
            self.push(" ".repeat(width - current), StyleTag::Plain);
            return self;
        }
        let mut out = StyledLine::new();
        let mut used = 0;
        let budget = width.saturating_sub(1);
        'outer: for span in self.spans {
            let mut text = String::new();
            for ch in span.text.chars() {
                let w = ch.width().unwrap_or(0);
                if used + w > budget {
                    out.push(text, span.tag);
                    break 'outer;
                }
                used += w;
                text.push(ch);
            }
            out.push(text, span.tag);
        }
        if width > 0 {
            out.push("…", StyleTag::Plain);
            used += 1;
        }
        out.push(" ".repeat(width.saturating_sub(used)), StyleTag::Plain);
        out
    }
}

/// Sustituye tabuladores por espacios hasta la siguiente parada.
pub fn expand_tabs(line: &str, tab_size: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let tab_size = tab_size.max(1);
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let fill = tab_size - column % tab_size;
            out.extend(std::iter::repeat_n(' ', fill));
            column += fill;
        } else {
            out.push(ch);
            column += ch.width().unwrap_or(0);
        }
    }
    out
}

/// Quita la sangría común de las líneas no vacías.
pub fn dedent(lines: &[String]) -> Vec<String> {
    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l[common..].trim_end().to_string()
            }
        })
        .collect()
}
