//! # Section Classification
//!
//! Maps raw headings ("Verse 1:", "Prechorus", "Out") to canonical section
//! metadata and groups a song's lines into navigable blocks.
//!
//! ## Matching Order
//! 1. Case-insensitive exact match of the heading (trailing `:` removed)
//!    against the table titles. First entry wins.
//! 2. First entry whose pattern matches the trimmed heading.
//! 3. No match: empty abbreviation and color, raw heading kept as title.
//!
//! Entries overlap on purpose (`Verse 10` and `Verse 11` share `10`), so the
//! table order is part of the behavior.
//!
//! ## Indexes
//! `SectionMeta::index` counts headings in the order they appear in the song,
//! starting at 0. It is positional and backs the `section-N` anchors.

use crate::ast::{Line, Song};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

struct SectionDef {
    abbreviation: &'static str,
    color: &'static str,
    title: &'static str,
    pattern: Option<&'static str>,
}

const fn def(abbreviation: &'static str, color: &'static str, title: &'static str) -> SectionDef {
    SectionDef { abbreviation, color, title, pattern: None }
}

const fn def_pattern(
    abbreviation: &'static str,
    color: &'static str,
    title: &'static str,
    pattern: &'static str,
) -> SectionDef {
    SectionDef { abbreviation, color, title, pattern: Some(pattern) }
}

#[rustfmt::skip]
static SECTION_TABLE: [SectionDef; 34] = [
    def("BR", "#03a9f4", "Bridge"),
    def("BR1", "#03a9f4", "Bridge 1"),
    def("BR2", "#03a9f4", "Bridge 2"),
    def("CH", "#ff5252", "Chorus"),
    def("CH1", "#ff5252", "Chorus 1"),
    def("CH2", "#ff5252", "Chorus 2"),
    def("CH3", "#ff5252", "Chorus 3"),
    def("CH4", "#ff5252", "Chorus 4"),
    def_pattern("PC", "#ff9800", "Pre-chorus", r"(?i)^pre[-\s]?chorus:?$"),
    def_pattern("PC1", "#ff9800", "Pre-chorus 1", r"(?i)^pre[-\s]?chorus\s1:?$"),
    def_pattern("PC2", "#ff9800", "Pre-chorus 2", r"(?i)^pre[-\s]?chorus\s2:?$"),
    def("IN", "#00bcd4", "Intro"),
    def_pattern("OUT", "#444", "Outro", r"(?i)^out(ro|tro)?:?$"),
    def("END", "#444", "End"),
    def("INT", "silver", "Interlude"),
    def("INS1", "silver", "Interlude 1"),
    def("INS2", "silver", "Interlude 2"),
    def("INST", "silver", "Instrumental"),
    def("TAG", "#444", "Tag"),
    def("TAG1", "#444", "Tag 1"),
    def("TAG2", "#444", "Tag 2"),
    def("HOOK", "#444", "Hook"),
    def("V", "#444", "Verse"),
    def("1", "#444", "Verse 1"),
    def("2", "#444", "Verse 2"),
    def("3", "#444", "Verse 3"),
    def("4", "#444", "Verse 4"),
    def("5", "#444", "Verse 5"),
    def("6", "#444", "Verse 6"),
    def("7", "#444", "Verse 7"),
    def("8", "#444", "Verse 8"),
    def("9", "#444", "Verse 9"),
    def("10", "#444", "Verse 10"),
    def("10", "#444", "Verse 11"),
];

lazy_static! {
    /// Compiled patterns, paired with their table entry, in table order
    static ref SECTION_PATTERNS: Vec<(Regex, &'static SectionDef)> = SECTION_TABLE
        .iter()
        .filter_map(|d| d.pattern.map(|p| (Regex::new(p).unwrap(), d)))
        .collect();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMeta {
    pub abbreviation: String,
    pub title: String,
    pub color: String,
    pub index: usize,
}

impl SectionMeta {
    fn from_def(d: &SectionDef, index: usize) -> Self {
        Self {
            abbreviation: d.abbreviation.to_string(),
            title: d.title.to_string(),
            color: d.color.to_string(),
            index,
        }
    }

    /// True when the heading matched a canonical entry
    pub fn is_known(&self) -> bool {
        !self.abbreviation.is_empty()
    }
}

fn lookup(heading: &str) -> Option<&'static SectionDef> {
    let trimmed = heading.trim();
    let name = trimmed.strip_suffix(':').unwrap_or(trimmed).trim_end().to_lowercase();

    SECTION_TABLE
        .iter()
        .find(|d| d.title.to_lowercase() == name)
        .or_else(|| {
            SECTION_PATTERNS
                .iter()
                .find(|(re, _)| re.is_match(trimmed))
                .map(|(_, d)| *d)
        })
}

/// True if the heading names a canonical section
pub fn is_known_heading(heading: &str) -> bool {
    lookup(heading).is_some()
}

/// Classify a single heading; index 0.
pub fn classify(heading: &str) -> SectionMeta {
    classify_at(heading, 0)
}

/// Classify a heading that is the `index`-th section of its song.
pub fn classify_at(heading: &str, index: usize) -> SectionMeta {
    match lookup(heading) {
        Some(d) => SectionMeta::from_def(d, index),
        None => SectionMeta {
            abbreviation: String::new(),
            title: heading.trim().to_string(),
            color: String::new(),
            index,
        },
    }
}

/// Metadata for every heading of the song, in order
pub fn song_sections(song: &Song) -> Vec<SectionMeta> {
    song.lines
        .iter()
        .filter_map(|line| match line {
            Line::Section { text } => Some(text.as_str()),
            _ => None,
        })
        .enumerate()
        .map(|(index, text)| classify_at(text, index))
        .collect()
}

/// A heading and the lines under it, up to the next heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionBlock {
    pub heading: String,
    pub meta: SectionMeta,
    pub lines: Vec<Line>,
}

impl SectionBlock {
    /// In-page navigation target for the block
    pub fn anchor(&self) -> String {
        format!("section-{}", self.meta.index)
    }
}

/// A song split into navigable blocks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SongLayout {
    /// Lines before the first heading
    pub preamble: Vec<Line>,
    pub sections: Vec<SectionBlock>,
}

pub fn group_sections(song: &Song) -> SongLayout {
    let mut layout = SongLayout::default();

    for line in &song.lines {
        match line {
            Line::Section { text } => {
                let index = layout.sections.len();
                layout.sections.push(SectionBlock {
                    heading: text.clone(),
                    meta: classify_at(text, index),
                    lines: Vec::new(),
                });
            }
            Line::ChordLine { .. } | Line::ChordPair { .. } | Line::PlainLine { .. } | Line::Empty => {
                match layout.sections.last_mut() {
                    Some(block) => block.lines.push(line.clone()),
                    None => layout.preamble.push(line.clone()),
                }
            }
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_match_ignores_case_and_colon() {
        let meta = classify("Verse 1:");
        assert_eq!(
            meta,
            SectionMeta {
                abbreviation: "1".to_string(),
                title: "Verse 1".to_string(),
                color: "#444".to_string(),
                index: 0,
            }
        );
        assert_eq!(classify("CHORUS").abbreviation, "CH");
        assert_eq!(classify("  bridge 2 ").abbreviation, "BR2");
        assert_eq!(classify("Pre-Chorus 1:").abbreviation, "PC1");
    }

    #[test]
    fn test_pattern_match_variants() {
        assert_eq!(classify("Prechorus").abbreviation, "PC");
        assert_eq!(classify("pre chorus:").title, "Pre-chorus");
        assert_eq!(classify("Prechorus 2").abbreviation, "PC2");
        assert_eq!(classify("Out").abbreviation, "OUT");
        assert_eq!(classify("Outtro:").title, "Outro");
    }

    #[test]
    fn test_table_order_decides_collisions() {
        let verse_eleven = classify("Verse 11");
        assert_eq!(verse_eleven.abbreviation, "10");
        assert_eq!(verse_eleven.title, "Verse 11");
        assert_eq!(classify("Verse 10").title, "Verse 10");
    }

    #[test]
    fn test_unknown_heading_keeps_raw_title() {
        let meta = classify_at("Vamp (x4):", 3);
        assert_eq!(meta.abbreviation, "");
        assert_eq!(meta.color, "");
        assert_eq!(meta.title, "Vamp (x4):");
        assert_eq!(meta.index, 3);
        assert!(!meta.is_known());
        assert!(!is_known_heading("Vamp"));
        assert!(is_known_heading("Hook"));
    }

    #[test]
    fn test_song_sections_count_positionally() {
        let song = Song::new(vec![
            Line::Section { text: "Intro".to_string() },
            Line::PlainLine { text: "la la".to_string() },
            Line::Section { text: "Chorus:".to_string() },
            Line::Empty,
            Line::Section { text: "Chorus:".to_string() },
        ]);
        let sections = song_sections(&song);
        let summary: Vec<(&str, usize)> =
            sections.iter().map(|s| (s.abbreviation.as_str(), s.index)).collect();
        assert_eq!(summary, vec![("IN", 0), ("CH", 1), ("CH", 2)]);
    }

    #[test]
    fn test_group_sections() {
        let song = Song::new(vec![
            Line::PlainLine { text: "by John Newton".to_string() },
            Line::Section { text: "Verse 1:".to_string() },
            Line::PlainLine { text: "Amazing grace".to_string() },
            Line::Empty,
            Line::Section { text: "Chorus:".to_string() },
            Line::PlainLine { text: "My chains are gone".to_string() },
        ]);
        let layout = group_sections(&song);
        assert_eq!(layout.preamble, vec![Line::PlainLine { text: "by John Newton".to_string() }]);
        assert_eq!(layout.sections.len(), 2);
        assert_eq!(layout.sections[0].lines.len(), 2);
        assert_eq!(layout.sections[0].anchor(), "section-0");
        assert_eq!(layout.sections[1].heading, "Chorus:");
        assert_eq!(layout.sections[1].meta.abbreviation, "CH");
        assert_eq!(layout.sections[1].anchor(), "section-1");
    }
}
