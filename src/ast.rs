//! # Sheet Model Types
//!
//! The structured form of a chord sheet.
//!
//! ## Type Hierarchy
//! ```text
//! Song
//!   └── Vec<Line>
//!         ├── ChordLine { chords }          chords with no lyric below
//!         ├── ChordPair { chords, text }    chords anchored over a lyric line
//!         ├── PlainLine { text }            lyric only
//!         ├── Empty                         blank spacer
//!         └── Section { text }              raw heading ("Verse 1:")
//!
//! PlacedChord
//!   ├── column: usize        character offset into the lyric text
//!   └── token: ChordToken
//!         ├── Chord { root, quality, bass }
//!         └── Literal(String)  (N.C., |, x2, ...)
//! ```
//!
//! ## Key Concepts
//!
//! ### Columns
//! Columns count characters, not bytes, and are non-decreasing within a line.
//! Transposition relabels chords but never moves them.
//!
//! ### Immutability
//! A `Song` is never edited in place. Transposing produces a new `Song`.
//!
//! ## Related Modules
//! - `lexer` - Creates these types from sheet text
//! - `transpose` - Relabels the chords
//! - `section` - Classifies `Section` lines
//! - `render` - Turns lines back into text

use crate::chord::{Chord, ChordToken};
use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A chord token and the character column it starts at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedChord {
    pub column: usize,
    pub token: ChordToken,
}

impl PlacedChord {
    pub fn new(column: usize, token: ChordToken) -> Self {
        Self { column, token }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Line {
    ChordLine { chords: Vec<PlacedChord> },
    ChordPair { chords: Vec<PlacedChord>, text: String },
    PlainLine { text: String },
    Empty,
    Section { text: String },
}

impl Line {
    /// Placed chords of the line, empty for lines without chords
    pub fn chords(&self) -> &[PlacedChord] {
        match self {
            Line::ChordLine { chords } | Line::ChordPair { chords, .. } => chords,
            Line::PlainLine { .. } | Line::Empty | Line::Section { .. } => &[],
        }
    }

    /// Lyric or heading text, if the line has any
    pub fn text(&self) -> Option<&str> {
        match self {
            Line::ChordPair { text, .. } | Line::PlainLine { text } | Line::Section { text } => {
                Some(text)
            }
            Line::ChordLine { .. } | Line::Empty => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Line::Section { .. })
    }
}

/// A parsed sheet: lines in input order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Song {
    pub lines: Vec<Line>,
}

impl Song {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Every real chord in reading order
    pub fn chords(&self) -> impl Iterator<Item = &Chord> {
        self.lines
            .iter()
            .flat_map(|line| line.chords())
            .filter_map(|placed| placed.token.chord())
    }
}

/// Input convention of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    /// Chord tokens on their own line, positioned over the lyric below
    #[default]
    #[serde(rename = "chords-above-words")]
    ChordsAboveWords,
    /// Bracketed chords inside the lyric line: `[G]Amazing [D]grace`
    #[serde(rename = "inline", alias = "chordpro", alias = "onsong")]
    Inline,
}

impl FromStr for Dialect {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chords-above-words" => Ok(Dialect::ChordsAboveWords),
            "inline" | "chordpro" | "onsong" => Ok(Dialect::Inline),
            other => Err(SheetError::Metadata(format!("unknown parser type '{}'", other))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::ChordsAboveWords => write!(f, "chords-above-words"),
            Dialect::Inline => write!(f, "inline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::parse_chord;

    #[test]
    fn test_line_accessors() {
        let g = ChordToken::Chord(parse_chord("G").unwrap());
        let pair = Line::ChordPair {
            chords: vec![PlacedChord::new(0, g.clone())],
            text: "Amazing grace".to_string(),
        };
        assert_eq!(pair.chords().len(), 1);
        assert_eq!(pair.text(), Some("Amazing grace"));
        assert!(Line::Empty.chords().is_empty());
        assert_eq!(Line::ChordLine { chords: vec![] }.text(), None);
        assert!(Line::Section { text: "Verse 1:".to_string() }.is_section());
    }

    #[test]
    fn test_song_chords_skip_literals() {
        let song = Song::new(vec![Line::ChordLine {
            chords: vec![
                PlacedChord::new(0, ChordToken::Chord(parse_chord("C").unwrap())),
                PlacedChord::new(3, ChordToken::Literal("N.C.".to_string())),
                PlacedChord::new(9, ChordToken::Chord(parse_chord("F").unwrap())),
            ],
        }]);
        let names: Vec<String> = song.chords().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["C", "F"]);
    }

    #[test]
    fn test_dialect_names() {
        assert_eq!("chordpro".parse::<Dialect>().unwrap(), Dialect::Inline);
        assert_eq!(" Chords-Above-Words ".parse::<Dialect>().unwrap(), Dialect::ChordsAboveWords);
        assert!("tab".parse::<Dialect>().is_err());
        assert_eq!(Dialect::Inline.to_string(), "inline");
    }

    #[test]
    fn test_line_serializes_with_type_tag() {
        let json = serde_json::to_string(&Line::PlainLine { text: "hi".to_string() }).unwrap();
        assert_eq!(json, r#"{"type":"plain-line","text":"hi"}"#);
        assert_eq!(serde_json::to_string(&Line::Empty).unwrap(), r#"{"type":"empty"}"#);
    }
}
