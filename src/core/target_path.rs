// src/core/target_path.rs

use std::fmt;
use std::str::FromStr;

use crate::core::resolver::ResolutionError;

/// Ruta con puntos que nombra lo que se quiere inspeccionar (`json.dumps`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    segments: Vec<String>,
}

/// Identificador de Python: letra o `_` seguida de letras, dígitos o `_`.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl TargetPath {
    pub fn parse(text: &str) -> Result<Self, ResolutionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ResolutionError::EmptyPath);
        }
        let segments: Vec<String> = text.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ResolutionError::EmptySegment {
                path: text.to_string(),
            });
        }
        if let Some(bad) = segments.iter().find(|s| !is_identifier(s)) {
            return Err(ResolutionError::InvalidSegment {
                path: text.to_string(),
                segment: bad.clone(),
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn first(&self) -> &str {
        &self.segments[0]
    }
}

impl FromStr for TargetPath {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetPath::parse(s)
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_paths() {
        assert!(matches!(TargetPath::parse(""), Err(ResolutionError::EmptyPath)));
        assert!(matches!(
            TargetPath::parse("a..b"),
            Err(ResolutionError::EmptySegment { .. })
        ));
        assert!(matches!(
            TargetPath::parse(".a"),
            Err(ResolutionError::EmptySegment { .. })
        ));
        assert!(matches!(
            TargetPath::parse("json.3d"),
            Err(ResolutionError::InvalidSegment { segment, .. }) if segment == "3d"
        ));
        assert!(matches!(
            TargetPath::parse("os.path-x"),
            Err(ResolutionError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn keeps_segments_in_order() {
        let path: TargetPath = " a.b._c ".parse().expect("ruta válida");
        assert_eq!(path.segments(), ["a", "b", "_c"]);
        assert_eq!(path.to_string(), "a.b._c");
        assert_eq!(path.first(), "a");
    }

    #[test]
    fn identifiers_accept_unicode_letters() {
        assert!(is_identifier("año"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier(""));
    }
}
