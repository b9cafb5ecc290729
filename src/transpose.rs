use crate::ast::{Line, PlacedChord, Song};
use crate::chord::parse_chord;
use crate::key::Key;

fn transpose_chords(chords: &[PlacedChord], semitones: i32, target: Option<Key>) -> Vec<PlacedChord> {
    chords
        .iter()
        .map(|placed| PlacedChord::new(placed.column, placed.token.transposed(semitones, target)))
        .collect()
}

/// Transpose the chords of one line; lyrics and columns are kept
pub fn transpose_line(line: &Line, semitones: i32, target: Option<Key>) -> Line {
    match line {
        Line::ChordLine { chords } => Line::ChordLine {
            chords: transpose_chords(chords, semitones, target),
        },
        Line::ChordPair { chords, text } => Line::ChordPair {
            chords: transpose_chords(chords, semitones, target),
            text: text.clone(),
        },
        Line::PlainLine { text } => Line::PlainLine { text: text.clone() },
        Line::Section { text } => Line::Section { text: text.clone() },
        Line::Empty => Line::Empty,
    }
}

/// Shift every chord of a song by `semitones`, spelled for `target`.
///
/// Without a target key black keys are spelled with sharps. A shift of zero
/// returns the song unchanged, original spellings included.
///
/// # Example
/// ```
/// use chordboard::{tokenize, transpose, Dialect};
///
/// let song = tokenize("G          D\nAmazing grace", Dialect::ChordsAboveWords);
/// let up = transpose(&song, 2, "A".parse().ok());
/// let names: Vec<String> = up.chords().map(|c| c.to_string()).collect();
/// assert_eq!(names, vec!["A", "E"]);
/// ```
pub fn transpose(song: &Song, semitones: i32, target: Option<Key>) -> Song {
    if semitones == 0 {
        return song.clone();
    }

    Song::new(
        song.lines
            .iter()
            .map(|line| transpose_line(line, semitones, target))
            .collect(),
    )
}

/// Transpose a single chord name; tokens that are not chords come back as is.
pub fn transpose_chord_name(token: &str, semitones: i32, target: Option<Key>) -> String {
    match parse_chord(token) {
        Some(chord) if semitones != 0 => chord.transposed(semitones, target).to_string(),
        _ => token.to_string(),
    }
}

/// Move a key name up or down, spelled the way the new key prefers.
///
/// ```
/// use chordboard::transpose::transpose_key_name;
///
/// assert_eq!(transpose_key_name("G", 1).as_deref(), Some("Ab"));
/// assert_eq!(transpose_key_name("Am", -2).as_deref(), Some("Gm"));
/// assert_eq!(transpose_key_name("H", 1), None);
/// ```
pub fn transpose_key_name(key: &str, amount: i32) -> Option<String> {
    let key: Key = key.parse().ok()?;
    Some(key.transposed(amount).name())
}
