//! Turn lines back into sheet text.
//!
//! Chords are written at their columns. A transposed label can be wider than
//! the original (`B` becoming `C#`), so a chord that would touch the previous
//! one is pushed one space past it instead.

use crate::ast::{Dialect, Line, PlacedChord, Song};

fn chord_row(chords: &[PlacedChord]) -> String {
    let mut row = String::new();
    let mut width = 0;

    for (i, placed) in chords.iter().enumerate() {
        let label = placed.token.to_string();
        let column = if i == 0 { placed.column } else { placed.column.max(width + 1) };
        row.extend(std::iter::repeat(' ').take(column - width));
        row.push_str(&label);
        width = column + label.chars().count();
    }

    row
}

/// `[X]` markers spliced into the lyric at each chord's column
fn inline_row(chords: &[PlacedChord], text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    if let Some(last) = chords.iter().map(|p| p.column).max() {
        if last > chars.len() {
            chars.resize(last, ' ');
        }
    }

    for placed in chords.iter().rev() {
        let marker = format!("[{}]", placed.token);
        chars.splice(placed.column..placed.column, marker.chars());
    }

    chars.into_iter().collect()
}

/// Chords-above-words text for one line (two physical lines for a pair)
pub fn render_line(line: &Line) -> String {
    match line {
        Line::ChordLine { chords } => chord_row(chords),
        Line::ChordPair { chords, text } => format!("{}\n{}", chord_row(chords), text),
        Line::PlainLine { text } | Line::Section { text } => text.clone(),
        Line::Empty => String::new(),
    }
}

pub fn render_inline_line(line: &Line) -> String {
    match line {
        Line::ChordLine { chords } => inline_row(chords, "").trim_end().to_string(),
        Line::ChordPair { chords, text } => inline_row(chords, text),
        Line::PlainLine { text } | Line::Section { text } => text.clone(),
        Line::Empty => String::new(),
    }
}

pub fn render_song(song: &Song, dialect: Dialect) -> String {
    let render = match dialect {
        Dialect::ChordsAboveWords => render_line,
        Dialect::Inline => render_inline_line,
    };
    song.lines.iter().map(render).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::transpose::transpose;
    use pretty_assertions::assert_eq;

    const SHEET: &str = "Verse 1:\nG          D\nAmazing grace, how sweet the sound\n\nC   G\nN.C.";

    #[test]
    fn test_render_round_trip() {
        let song = tokenize(SHEET, Dialect::ChordsAboveWords);
        assert_eq!(render_song(&song, Dialect::ChordsAboveWords), SHEET);
    }

    #[test]
    fn test_wider_labels_are_pushed_apart() {
        let song = tokenize("B C\nla la", Dialect::ChordsAboveWords);
        let up = transpose(&song, 1, None);
        assert_eq!(render_song(&up, Dialect::ChordsAboveWords), "C C#\nla la");
        let twice = transpose(&song, 2, None);
        assert_eq!(render_song(&twice, Dialect::ChordsAboveWords), "C# D\nla la");
    }

    #[test]
    fn test_leading_offset_is_kept() {
        let song = tokenize("    Em\n  and then", Dialect::ChordsAboveWords);
        assert_eq!(render_song(&song, Dialect::ChordsAboveWords), "    Em\n  and then");
    }

    #[test]
    fn test_render_inline() {
        let text = "[G]Amazing grace, how [D]sweet\n[C][D]Joy\n[G] [Em]\nChorus:";
        let song = tokenize(text, Dialect::Inline);
        assert_eq!(render_song(&song, Dialect::Inline), text);
    }

    #[test]
    fn test_inline_from_chords_above_words() {
        let song = tokenize("G          D\nAmazing grace, how sweet", Dialect::ChordsAboveWords);
        assert_eq!(render_song(&song, Dialect::Inline), "[G]Amazing gra[D]ce, how sweet");
    }
}
