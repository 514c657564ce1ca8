//! Découpage d'un fichier shader multi-étages
//!
//! Un fichier contient un ou deux blocs de la forme :
//!
//! ```text
//! #type vertex
//! ...source GLSL...
//! #type fragment
//! ...source GLSL...
//! ```
//!
//! Chaque bloc s'étend jusqu'au marqueur suivant (ou la fin du texte) et son
//! contenu est conservé octet pour octet.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Marqueur introduisant un étage
pub const TYPE_TOKEN: &str = "#type";

/// Nombre maximal d'étages dans un même fichier
pub const MAX_STAGES: usize = 2;

const LINE_BREAKS: [char; 2] = ['\r', '\n'];

/// Types d'étages supportés
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    /// Résout le nom d'étage écrit après `#type`
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "vertex" => Some(StageKind::Vertex),
            "fragment" | "pixel" => Some(StageKind::Fragment),
            _ => None,
        }
    }

    /// Constante OpenGL correspondante
    pub fn gl_enum(self) -> u32 {
        match self {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

impl FromStr for StageKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ParseError::InvalidStageType(s.to_string()))
    }
}

/// Erreurs de découpage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("type d'étage invalide : '{0}'")]
    InvalidStageType(String),

    #[error("marqueur #type mal formé : fin de ligne manquante")]
    MissingLineTerminator,

    #[error("trop d'étages (maximum {})", MAX_STAGES)]
    TooManyStages,

    #[error("étage {0} déclaré deux fois")]
    DuplicateStage(StageKind),
}

/// Sources GLSL indexées par étage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    stages: BTreeMap<StageKind, String>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un étage ; refuse les doublons et un troisième étage
    pub fn insert(&mut self, kind: StageKind, source: impl Into<String>) -> Result<(), ParseError> {
        if self.stages.len() >= MAX_STAGES {
            return Err(ParseError::TooManyStages);
        }
        if self.stages.contains_key(&kind) {
            return Err(ParseError::DuplicateStage(kind));
        }
        self.stages.insert(kind, source.into());
        Ok(())
    }

    pub fn get(&self, kind: StageKind) -> Option<&str> {
        self.stages.get(&kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Parcourt les étages dans l'ordre vertex puis fragment
    pub fn iter(&self) -> impl Iterator<Item = (StageKind, &str)> {
        self.stages.iter().map(|(kind, src)| (*kind, src.as_str()))
    }
}

/// Découpe un texte balisé par `#type` en sources par étage
pub fn split_sources(text: &str) -> Result<SourceMap, ParseError> {
    let mut sources = SourceMap::new();
    let mut pos = text.find(TYPE_TOKEN);

    while let Some(marker) = pos {
        let eol = text[marker..]
            .find(LINE_BREAKS)
            .map(|offset| marker + offset)
            .ok_or(ParseError::MissingLineTerminator)?;

        // `#type` doit être suivi d'un blanc avant le nom d'étage
        let rest = &text[marker + TYPE_TOKEN.len()..eol];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return Err(ParseError::InvalidStageType(rest.trim().to_string()));
        }
        let tag = rest.trim();
        let kind: StageKind = tag.parse()?;

        // Premier caractère qui n'est pas un saut de ligne
        let body_start = text[eol..]
            .find(|c: char| !LINE_BREAKS.contains(&c))
            .map_or(text.len(), |offset| eol + offset);

        pos = text[body_start..]
            .find(TYPE_TOKEN)
            .map(|offset| body_start + offset);
        let body_end = pos.unwrap_or(text.len());

        sources.insert(kind, &text[body_start..body_end])?;
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_stages_verbatim() {
        let sources = split_sources("#type vertex\nA\n#type fragment\nB\n").unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources.get(StageKind::Vertex), Some("A\n"));
        assert_eq!(sources.get(StageKind::Fragment), Some("B\n"));
    }

    #[test]
    fn test_pixel_alias() {
        let sources = split_sources("#type pixel\nvoid main() {}\n").unwrap();
        assert_eq!(sources.get(StageKind::Fragment), Some("void main() {}\n"));
        assert_eq!(sources.get(StageKind::Vertex), None);
    }

    #[test]
    fn test_inner_blank_lines_kept() {
        let text = "#type vertex\n#version 410 core\n\n\nvoid main() {}\n\n#type fragment\nout vec4 c;\n";
        let sources = split_sources(text).unwrap();

        assert_eq!(
            sources.get(StageKind::Vertex),
            Some("#version 410 core\n\n\nvoid main() {}\n\n")
        );
        assert_eq!(sources.get(StageKind::Fragment), Some("out vec4 c;\n"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let sources = split_sources("#type vertex\r\nA\r\n#type fragment\r\nB\r\n").unwrap();
        assert_eq!(sources.get(StageKind::Vertex), Some("A\r\n"));
        assert_eq!(sources.get(StageKind::Fragment), Some("B\r\n"));
    }

    #[test]
    fn test_leading_text_ignored() {
        let sources = split_sources("// entête\n#type vertex\nA\n").unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources.get(StageKind::Vertex), Some("A\n"));
    }

    #[test]
    fn test_no_marker_gives_empty_map() {
        let sources = split_sources("void main() {}\n").unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn test_unknown_stage() {
        let err = split_sources("#type vertex\nA\n#type geometry\nB\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidStageType("geometry".to_string()));
    }

    #[test]
    fn test_empty_tag_is_invalid() {
        let err = split_sources("#type\nA\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidStageType(String::new()));
    }

    #[test]
    fn test_marker_glued_to_stage_name_is_invalid() {
        let err = split_sources("#typevertex\nA\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidStageType("vertex".to_string()));

        let sources = split_sources("#type\tvertex\nA\n").unwrap();
        assert_eq!(sources.get(StageKind::Vertex), Some("A\n"));
    }

    #[test]
    fn test_missing_line_terminator() {
        let err = split_sources("#type vertex\nA\n#type fragment").unwrap_err();
        assert_eq!(err, ParseError::MissingLineTerminator);
    }

    #[test]
    fn test_too_many_stages() {
        let err = split_sources("#type vertex\nA\n#type fragment\nB\n#type pixel\nC\n").unwrap_err();
        assert_eq!(err, ParseError::TooManyStages);
    }

    #[test]
    fn test_duplicate_stage() {
        let err = split_sources("#type fragment\nA\n#type pixel\nB\n").unwrap_err();
        assert_eq!(err, ParseError::DuplicateStage(StageKind::Fragment));
    }

    #[test]
    fn test_marker_at_end_of_file_gives_empty_body() {
        let sources = split_sources("#type vertex\n").unwrap();
        assert_eq!(sources.get(StageKind::Vertex), Some(""));
    }

    #[test]
    fn test_iteration_order() {
        let sources = split_sources("#type fragment\nB\n#type vertex\nA\n").unwrap();
        let kinds: Vec<_> = sources.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![StageKind::Vertex, StageKind::Fragment]);
    }
}
