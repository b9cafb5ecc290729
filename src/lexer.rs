//! # Sheet Tokenizer
//!
//! Splits raw sheet text into typed [`Line`]s.
//!
//! ## Dialects
//!
//! ### Chords above words
//! ```text
//! G          D
//! Amazing grace, how sweet the sound
//! ```
//! A line made only of chord tokens (plus chord-line literals like `N.C.`) is
//! chord-carrying. Each token keeps the character column it starts at. When
//! the next line is lyric text the two merge into a `ChordPair`, otherwise the
//! chords stand alone as a `ChordLine`.
//!
//! ### Inline
//! ```text
//! [G]Amazing grace, how [D]sweet the sound
//! ```
//! Bracketed chords are cut out of the lyric and placed at the offset they
//! occupied in the remaining text. `{c: Chorus}` and `{start_of_chorus}`
//! directives become headings; other directives become blank lines.
//!
//! ## Headings
//! A line ending in `:` with no chord on it, or a line that is exactly a known
//! section name (`Chorus`, `Pre-chorus`), is a `Section`.
//!
//! ## Failure Policy
//! Nothing here fails. Lines that cannot be classified become `PlainLine`s and
//! the problem is reported as a [`Diagnostic`].

use crate::ast::{Dialect, Line, PlacedChord, Song};
use crate::chord::{parse_chord_token, ChordToken};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::section::is_known_heading;
use tracing::debug;

/// One physical line before chord lines are paired with lyrics
#[derive(Debug, Clone, PartialEq)]
enum RawLine {
    Empty,
    Chords(Vec<PlacedChord>),
    Heading(String),
    Text(String),
    /// Inline lyric that already carries its chords
    Pair(Vec<PlacedChord>, String),
}

/// Tokenize sheet text, discarding diagnostics.
///
/// # Example
/// ```
/// use chordboard::{tokenize, Dialect, Line};
///
/// let song = tokenize("G          D\nAmazing grace, how sweet the sound", Dialect::ChordsAboveWords);
/// assert_eq!(song.len(), 1);
/// assert!(matches!(song.lines[0], Line::ChordPair { .. }));
/// ```
pub fn tokenize(text: &str, dialect: Dialect) -> Song {
    tokenize_with_diagnostics(text, dialect).0
}

pub fn tokenize_with_diagnostics(text: &str, dialect: Dialect) -> (Song, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(text, dialect);
    let song = lexer.tokenize();
    (song, lexer.into_diagnostics())
}

/// Line classifier for one sheet
pub struct Lexer<'a> {
    input: &'a str,
    dialect: Dialect,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, dialect: Dialect) -> Self {
        Self {
            input,
            dialect,
            diagnostics: Vec::new(),
        }
    }

    /// Warnings collected by [`Lexer::tokenize`]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn tokenize(&mut self) -> Song {
        if self.input.is_empty() {
            self.diagnostics.push(Diagnostic::new(0, DiagnosticKind::EmptyInput));
            return Song::default();
        }

        let input = self.input;
        let dialect = self.dialect;
        let raw: Vec<RawLine> = input
            .lines()
            .enumerate()
            .map(|(i, line)| match dialect {
                Dialect::ChordsAboveWords => self.classify_line(i + 1, line),
                Dialect::Inline => self.classify_inline(i + 1, line),
            })
            .collect();

        Song::new(pair_lines(raw))
    }

    fn warn(&mut self, line: usize, kind: DiagnosticKind) {
        debug!(line, ?kind, "sheet diagnostic");
        self.diagnostics.push(Diagnostic::new(line, kind));
    }

    /// Classify a physical line of the chords-above-words dialect
    fn classify_line(&mut self, line_no: usize, line: &str) -> RawLine {
        if line.trim().is_empty() {
            return RawLine::Empty;
        }

        let tokens = split_columns(line);
        let parsed: Vec<Option<ChordToken>> =
            tokens.iter().map(|(_, token)| parse_chord_token(token)).collect();
        let chord_count = parsed
            .iter()
            .filter(|t| matches!(t, Some(ChordToken::Chord(_))))
            .count();
        let unknown_count = parsed.iter().filter(|t| t.is_none()).count();

        if chord_count > 0 && unknown_count == 0 {
            let chords = tokens
                .iter()
                .zip(parsed)
                .filter_map(|((column, _), token)| token.map(|t| PlacedChord::new(*column, t)))
                .collect();
            return RawLine::Chords(chords);
        }

        if chord_count == 0 {
            if let Some(heading) = heading_text(line) {
                return RawLine::Heading(heading);
            }
        } else if chord_count >= unknown_count {
            // Mostly chords with a few stray words: keep it readable as text
            for ((_, token), parsed) in tokens.iter().zip(&parsed) {
                if parsed.is_none() {
                    self.warn(line_no, DiagnosticKind::UnrecognizedChordToken(token.to_string()));
                }
            }
            self.warn(line_no, DiagnosticKind::AmbiguousLineClassification);
        }

        RawLine::Text(line.trim_end().to_string())
    }

    /// Classify a physical line of the inline dialect
    fn classify_inline(&mut self, line_no: usize, line: &str) -> RawLine {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return RawLine::Empty;
        }
        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            return directive(&trimmed[1..trimmed.len() - 1]);
        }

        let mut text = String::new();
        let mut column = 0;
        let mut chords = Vec::new();
        let mut rest = line;

        while let Some(open) = rest.find('[') {
            let before = &rest[..open];
            text.push_str(before);
            column += before.chars().count();

            let after_open = &rest[open + 1..];
            let Some(close) = after_open.find(']') else {
                // Unclosed bracket is lyric text
                rest = &rest[open..];
                break;
            };

            let inner = &after_open[..close];
            match parse_chord_token(inner.trim()) {
                Some(token) => chords.push(PlacedChord::new(column, token)),
                None => {
                    self.warn(line_no, DiagnosticKind::UnrecognizedChordToken(inner.to_string()));
                    let literal = format!("[{}]", inner);
                    column += literal.chars().count();
                    text.push_str(&literal);
                }
            }
            rest = &after_open[close + 1..];
        }
        text.push_str(rest);

        if chords.is_empty() {
            return heading_text(&text)
                .map(RawLine::Heading)
                .unwrap_or_else(|| RawLine::Text(text.trim_end().to_string()));
        }

        if text.trim().is_empty() {
            RawLine::Chords(chords)
        } else {
            RawLine::Pair(chords, text.trim_end().to_string())
        }
    }
}

/// Whitespace-separated tokens with their starting character column
fn split_columns(line: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, usize)> = None;

    for (column, (byte, c)) in line.char_indices().enumerate() {
        match (c.is_whitespace(), start) {
            (true, Some((col, from))) => {
                tokens.push((col, &line[from..byte]));
                start = None;
            }
            (false, None) => start = Some((column, byte)),
            _ => {}
        }
    }
    if let Some((col, from)) = start {
        tokens.push((col, &line[from..]));
    }

    tokens
}

/// Heading text if the line is a section heading
fn heading_text(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let chordless = || {
        split_columns(trimmed)
            .iter()
            .all(|(_, token)| !matches!(parse_chord_token(token), Some(ChordToken::Chord(_))))
    };

    if (trimmed.ends_with(':') || is_known_heading(trimmed)) && chordless() {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Interpret a `{name: value}` directive of the inline dialect
fn directive(content: &str) -> RawLine {
    let (name, value) = match content.split_once(':') {
        Some((name, value)) => (name.trim().to_lowercase(), Some(value.trim())),
        None => (content.trim().to_lowercase(), None),
    };
    let label = value.filter(|v| !v.is_empty());

    let heading = match name.as_str() {
        "c" | "comment" | "ci" | "comment_italic" | "cb" | "comment_box" => label,
        "soc" | "start_of_chorus" => Some(label.unwrap_or("Chorus")),
        "sov" | "start_of_verse" => Some(label.unwrap_or("Verse")),
        "sob" | "start_of_bridge" => Some(label.unwrap_or("Bridge")),
        _ => None,
    };

    match heading {
        Some(text) => RawLine::Heading(text.to_string()),
        None => {
            debug!(directive = %name, "directive kept as blank line");
            RawLine::Empty
        }
    }
}

/// Merge chord lines with the lyric line directly below them
fn pair_lines(raw: Vec<RawLine>) -> Vec<Line> {
    let mut lines = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter().peekable();

    while let Some(line) = iter.next() {
        let logical = match line {
            RawLine::Chords(chords) => match iter.next_if(|next| matches!(next, RawLine::Text(_))) {
                Some(RawLine::Text(text)) => Line::ChordPair { chords, text },
                _ => Line::ChordLine { chords },
            },
            RawLine::Pair(chords, text) => Line::ChordPair { chords, text },
            RawLine::Text(text) => Line::PlainLine { text },
            RawLine::Heading(text) => Line::Section { text },
            RawLine::Empty => Line::Empty,
        };
        lines.push(logical);
    }

    lines
}
