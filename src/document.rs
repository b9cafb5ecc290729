//! # Song Documents
//!
//! A song as stored by the editor: optional YAML frontmatter followed by the
//! sheet body.
//!
//! ```text
//! ---
//! title: Amazing Grace
//! author: John Newton
//! key: G
//! parser-type: chords-above-words
//! ---
//! Verse 1:
//! G          D
//! Amazing grace, how sweet the sound
//! ```
//!
//! Every field is optional. `parser-type` accepts `chords-above-words`,
//! `inline`, `chordpro` and `onsong`; it defaults to chords above words.

use crate::ast::{Dialect, Song};
use crate::error::{Diagnostic, SheetError};
use crate::key::Key;
use crate::lexer::tokenize_with_diagnostics;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawMetadata {
    title: Option<String>,
    author: Option<String>,
    key: Option<String>,
    parser_type: Option<Dialect>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SongDocument {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Key the sheet is written in, as typed
    pub key: Option<String>,
    pub dialect: Dialect,
    pub body: String,
}

impl SongDocument {
    /// A document without metadata
    pub fn from_body(body: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            body: body.into(),
            dialect,
            ..Self::default()
        }
    }

    /// Split frontmatter from the body and read it.
    ///
    /// # Errors
    /// Returns [`SheetError::Metadata`] when the frontmatter is not valid YAML
    /// or names an unknown parser type. The body itself never fails.
    pub fn parse(source: &str) -> Result<Self, SheetError> {
        let (metadata, body) = extract_frontmatter(source);
        let raw = match metadata {
            Some(content) if !content.trim().is_empty() => serde_yaml::from_str::<RawMetadata>(&content)
                .map_err(|e| SheetError::Metadata(e.to_string()))?,
            _ => RawMetadata::default(),
        };

        Ok(Self {
            title: raw.title,
            author: raw.author,
            key: raw.key.filter(|k| !k.trim().is_empty()),
            dialect: raw.parser_type.unwrap_or_default(),
            body,
        })
    }

    /// The written key, if it names a real key
    pub fn parsed_key(&self) -> Option<Key> {
        self.key.as_deref().and_then(|k| k.parse().ok())
    }

    pub fn song(&self) -> Song {
        self.song_with_diagnostics().0
    }

    pub fn song_with_diagnostics(&self) -> (Song, Vec<Diagnostic>) {
        tokenize_with_diagnostics(&self.body, self.dialect)
    }
}

/// Frontmatter block between `---` lines at the top of the source.
/// Returns (metadata_content, body)
fn extract_frontmatter(source: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = source.lines().collect();

    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return (None, source.to_string());
    };
    if lines[start].trim() != "---" {
        return (None, source.to_string());
    }

    match lines[start + 1..].iter().position(|l| l.trim() == "---") {
        Some(offset) => {
            let end = start + 1 + offset;
            let metadata = lines[start + 1..end].join("\n");
            let body = lines[end + 1..].join("\n");
            (Some(metadata), body)
        }
        None => (None, source.to_string()),
    }
}
