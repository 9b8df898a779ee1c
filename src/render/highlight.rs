// src/render/highlight.rs

//! Resaltado léxico de Python línea a línea. Sólo guarda entre líneas el
//! estado de las cadenas triples abiertas.

use crate::render::styled::{StyleTag, StyledLine};

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Nombres del módulo `builtins` que se resaltan.
const BUILTINS: &[&str] = &[
    "__import__", "abs", "aiter", "all", "anext", "any", "ascii", "bin", "bool", "breakpoint",
    "bytearray", "bytes", "callable", "chr", "classmethod", "compile", "complex", "delattr",
    "dict", "dir", "divmod", "enumerate", "eval", "exec", "filter", "float", "format",
    "frozenset", "getattr", "globals", "hasattr", "hash", "help", "hex", "id", "input", "int",
    "isinstance", "issubclass", "iter", "len", "list", "locals", "map", "max", "memoryview",
    "min", "next", "object", "oct", "open", "ord", "pow", "print", "property", "range", "repr",
    "reversed", "round", "set", "setattr", "slice", "sorted", "staticmethod", "str", "sum",
    "super", "tuple", "type", "vars", "zip", "Ellipsis", "NotImplemented", "BaseException",
    "Exception", "ArithmeticError", "AssertionError", "AttributeError", "EOFError",
    "FileNotFoundError", "ImportError", "IndexError", "KeyError", "KeyboardInterrupt",
    "LookupError", "ModuleNotFoundError", "NameError", "NotImplementedError", "OSError",
    "OverflowError", "RecursionError", "RuntimeError", "StopIteration", "SyntaxError",
    "SystemExit", "TypeError", "UnicodeError", "ValueError", "ZeroDivisionError",
];

/// Palabras clave contextuales: sólo cuentan al principio de la sentencia.
const SOFT_KEYWORDS: &[&str] = &["match", "case", "type"];

const STRING_PREFIX_CHARS: &[char] = &['r', 'R', 'b', 'B', 'f', 'F', 'u', 'U'];

#[derive(Debug, Default)]
pub struct PythonHighlighter {
    /// Delimitador (`'''` o `"""`) de una cadena triple sin cerrar.
    open_triple: Option<&'static str>,
}

impl PythonHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlight_lines<S: AsRef<str>>(lines: &[S]) -> Vec<StyledLine> {
        let mut highlighter = Self::new();
        lines
            .iter()
            .map(|line| highlighter.highlight_line(line.as_ref()))
            .collect()
    }

    pub fn highlight_line(&mut self, line: &str) -> StyledLine {
        let mut out = StyledLine::new();
        let chars: Vec<(usize, char)> = line.char_indices().collect();
        let slice = |from: usize, to: usize| -> &str {
            let start = chars.get(from).map(|c| c.0).unwrap_or(line.len());
            let end = chars.get(to).map(|c| c.0).unwrap_or(line.len());
            &line[start..end]
        };
        let mut i = 0;

        if let Some(delimiter) = self.open_triple {
            match find_from(line, 0, delimiter) {
                Some(end) => {
                    let close = char_index(&chars, end + delimiter.len());
                    out.push(slice(0, close), StyleTag::Str);
                    self.open_triple = None;
                    i = close;
                }
                None => {
                    out.push(line, StyleTag::Str);
                    return out;
                }
            }
        }

        let first_code = chars.iter().position(|(_, c)| !c.is_whitespace());
        let mut after_def = false;

        while i < chars.len() {
            let ch = chars[i].1;

            if ch.is_whitespace() {
                let start = i;
                while i < chars.len() && chars[i].1.is_whitespace() {
                    i += 1;
                }
                out.push(slice(start, i), StyleTag::Plain);
                continue;
            }

            if ch == '#' {
                out.push(slice(i, chars.len()), StyleTag::Comment);
                break;
            }

            if ch == '@' && Some(i) == first_code {
                let start = i;
                i += 1;
                while i < chars.len() && (is_name_char(chars[i].1) || chars[i].1 == '.') {
                    i += 1;
                }
                out.push(slice(start, i), StyleTag::Decorator);
                continue;
            }

            if let Some(prefix_len) = string_start(&chars, i) {
                let quote_at = i + prefix_len;
                let quote = chars[quote_at].1;
                let triple = chars.get(quote_at + 1).map(|c| c.1) == Some(quote)
                    && chars.get(quote_at + 2).map(|c| c.1) == Some(quote);
                if triple {
                    let delimiter = if quote == '"' { "\"\"\"" } else { "'''" };
                    let body_from = chars[quote_at].0 + 3;
                    match find_from(line, body_from, delimiter) {
                        Some(end) => {
                            let close = char_index(&chars, end + 3);
                            out.push(slice(i, close), StyleTag::Str);
                            i = close;
                        }
                        None => {
                            out.push(slice(i, chars.len()), StyleTag::Str);
                            self.open_triple = Some(delimiter);
                            break;
                        }
                    }
                } else {
                    let start = i;
                    i = quote_at + 1;
                    while i < chars.len() && chars[i].1 != quote {
                        if chars[i].1 == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    i = (i + 1).min(chars.len());
                    out.push(slice(start, i), StyleTag::Str);
                }
                after_def = false;
                continue;
            }

            if ch.is_ascii_digit() || (ch == '.' && chars.get(i + 1).is_some_and(|c| c.1.is_ascii_digit())) {
                let start = i;
                while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_' || chars[i].1 == '.') {
                    // Exponente con signo: 1e-5
                    if matches!(chars[i].1, 'e' | 'E')
                        && chars.get(i + 1).is_some_and(|c| c.1 == '+' || c.1 == '-')
                        && !slice(start, i).starts_with("0x")
                    {
                        i += 1;
                    }
                    i += 1;
                }
                out.push(slice(start, i), StyleTag::Number);
                continue;
            }

            if is_name_start(ch) {
                let start = i;
                while i < chars.len() && is_name_char(chars[i].1) {
                    i += 1;
                }
                let word = slice(start, i);
                let tag = if after_def {
                    StyleTag::Definition
                } else if KEYWORDS.contains(&word)
                    || (SOFT_KEYWORDS.contains(&word) && Some(start) == first_code && next_is_name_or_paren(&chars, i))
                {
                    StyleTag::Keyword
                } else if is_builtin_name(word) {
                    StyleTag::Builtin
                } else {
                    StyleTag::Plain
                };
                after_def = matches!(word, "def" | "class");
                out.push(word, tag);
                continue;
            }

            let start = i;
            while i < chars.len() && is_operator_char(chars[i].1) {
                i += 1;
            }
            if i == start {
                i += 1;
                out.push(slice(start, i), StyleTag::Plain);
            } else {
                out.push(slice(start, i), StyleTag::Operator);
            }
            after_def = false;
        }
        out
    }
}

fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_name_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_operator_char(ch: char) -> bool {
    "+-*/%=<>!&|^~:,;.()[]{}".contains(ch)
}

fn is_builtin_name(word: &str) -> bool {
    BUILTINS.contains(&word)
}

/// Longitud del prefijo (`rb`, `f`, ...) si en `i` empieza una cadena.
fn string_start(chars: &[(usize, char)], i: usize) -> Option<usize> {
    let mut n = 0;
    while n < 2 && chars.get(i + n).is_some_and(|c| STRING_PREFIX_CHARS.contains(&c.1)) {
        n += 1;
    }
    for len in (0..=n).rev() {
        if chars.get(i + len).is_some_and(|c| c.1 == '\'' || c.1 == '"') {
            // Un nombre como `buf"` no es un prefijo: lo anterior no puede ser parte de un nombre.
            let preceded_by_name = i > 0 && is_name_char(chars[i - 1].1);
            return (!preceded_by_name || len == 0).then_some(len);
        }
    }
    None
}

fn next_is_name_or_paren(chars: &[(usize, char)], from: usize) -> bool {
    chars[from..]
        .iter()
        .map(|c| c.1)
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| is_name_start(c) || c == '(' || c == '[' || c == '-' || c.is_ascii_digit() || c == '\'' || c == '"')
}

fn find_from(line: &str, byte_from: usize, needle: &str) -> Option<usize> {
    line.get(byte_from..)?.find(needle).map(|p| p + byte_from)
}

fn char_index(chars: &[(usize, char)], byte: usize) -> usize {
    chars.iter().position(|c| c.0 >= byte).unwrap_or(chars.len())
}
