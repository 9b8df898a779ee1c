// src/render/terminal.rs

//! Frontera con la terminal: ancho disponible y secuencias de escape.

use crossterm::style::{Attribute, Color, ContentStyle, Stylize};
use std::io::IsTerminal;

use crate::bytecode::Category;
use crate::constants::{COLUMNS_ENV, DEFAULT_WIDTH};
use crate::render::styled::{StyleTag, StyledLine};

/// Paleta fija para los destinos de salto. Sin grises, negros ni blancos.
const JUMP_PALETTE: &[Color] = &[
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::DarkRed,
    Color::DarkGreen,
    Color::DarkYellow,
    Color::DarkBlue,
    Color::DarkMagenta,
    Color::DarkCyan,
    Color::AnsiValue(208),
    Color::AnsiValue(141),
    Color::AnsiValue(37),
    Color::AnsiValue(168),
];

/// Ancho explícito, luego el de la terminal, luego `COLUMNS` y por último 80.
pub fn detect_width(explicit: Option<usize>) -> usize {
    if let Some(width) = explicit.filter(|w| *w > 0) {
        return width;
    }
    if std::io::stdout().is_terminal() {
        match crossterm::terminal::size() {
            Ok((columns, _)) if columns > 0 => return columns as usize,
            Ok(_) => {}
            Err(e) => log::debug!("No se pudo leer el tamaño de la terminal: {}", e),
        }
    }
    columns_from_env(std::env::var(COLUMNS_ENV).ok().as_deref()).unwrap_or(DEFAULT_WIDTH)
}

/// Filas de la terminal, o `None` si stdout no es una terminal.
pub fn terminal_rows() -> Option<usize> {
    if !std::io::stdout().is_terminal() {
        return None;
    }
    match crossterm::terminal::size() {
        Ok((_, rows)) if rows > 0 => Some(rows as usize),
        Ok(_) => None,
        Err(e) => {
            log::debug!("No se pudo leer el tamaño de la terminal: {}", e);
            None
        }
    }
}

fn columns_from_env(value: Option<&str>) -> Option<usize> {
    value?.trim().parse::<usize>().ok().filter(|w| *w > 0)
}

pub fn style_for(tag: StyleTag) -> ContentStyle {
    let style = ContentStyle::new();
    match tag {
        StyleTag::Plain => style,
        StyleTag::Keyword => style.with(Color::Magenta).bold(),
        StyleTag::Builtin => style.with(Color::Cyan),
        StyleTag::Definition => style.with(Color::Green).bold(),
        StyleTag::Decorator => style.with(Color::Yellow),
        StyleTag::Str => style.with(Color::Yellow),
        StyleTag::Number => style.with(Color::AnsiValue(141)),
        StyleTag::Comment => style.with(Color::DarkGrey).italic(),
        StyleTag::Operator => style.with(Color::Red),
        StyleTag::LineNumber => style.with(Color::DarkGrey),
        StyleTag::Header => style.with(Color::White).bold().underlined(),
        StyleTag::Offset => style.with(Color::DarkGrey),
        StyleTag::Opname(category) => match category {
            Category::Load => style.with(Color::Cyan),
            Category::Store => style.with(Color::Yellow),
            Category::Call => style.with(Color::Green).bold(),
            Category::Jump => style.with(Color::Magenta),
            Category::Compare => style.with(Color::Blue),
            Category::Return => style.with(Color::Red).bold(),
            Category::Other => style.with(Color::White),
        },
        StyleTag::Argument => style.with(Color::White),
        StyleTag::Jump(n) => style.with(JUMP_PALETTE[n % JUMP_PALETTE.len()]),
        StyleTag::Title => style.attribute(Attribute::Bold),
        StyleTag::Rule => style.with(Color::DarkGrey),
        StyleTag::Notice => style.with(Color::Yellow).italic(),
        StyleTag::Banner => style.with(Color::Blue).bold(),
        StyleTag::Separator => style.with(Color::DarkGrey),
    }
}

/// Convierte una línea en texto final, con o sin color. Sin espacios al final.
pub fn paint(line: &StyledLine, color: bool) -> String {
    let mut out = String::new();
    let last_visible = line
        .spans
        .iter()
        .rposition(|s| !s.text.trim_end().is_empty());
    for (i, span) in line.spans.iter().enumerate() {
        let text = match last_visible {
            Some(last) if i > last => continue,
            Some(last) if i == last => span.text.trim_end(),
            None => continue,
            _ => span.text.as_str(),
        };
        if color && span.tag != StyleTag::Plain {
            out.push_str(&style_for(span.tag).apply(text).to_string());
        } else {
            out.push_str(text);
        }
    }
    out
}

pub fn paint_lines(lines: &[StyledLine], color: bool) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&paint(line, color));
        out.push('\n');
    }
    out
}
