//! Chord symbol parsing
//!
//! Recognizes chord tokens (`G`, `Am7`, `F#m7b5`, `Csus4/G`, `C6/9`) and
//! splits them into root, quality and optional bass note.
//!
//! # Grammar
//! ```text
//! chord   = root quality? ("/" root)?
//! root    = [A-G] [#b]?
//! quality = item (item | # | b)*
//! item    = maj | Maj | min | mi | dim | aug | sus | add | alt | no | m | M
//!         | 6/9 | digit | + | - | ° | ø | Δ | ^ | ( | ) | ,
//! ```
//! The quality is kept verbatim; it is only checked against the chord
//! vocabulary so that ordinary words ("Amazing", "Bed") are not mistaken
//! for chords. A bare letter is a major chord.
//!
//! A quality never starts with `#` or `b`. Otherwise `Abb5` would print as
//! `Ab5` once its root becomes `A`, and read back as a different chord.

use crate::error::SheetError;
use crate::key::{Key, Note};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref CHORD_RE: Regex = Regex::new(
        r"^([A-G])([#b])?((?:(?:6/9|maj|Maj|min|mi|dim|aug|sus|add|alt|no|m|M|[0-9]|[+\-°øΔ^(),])(?:6/9|maj|Maj|min|mi|dim|aug|sus|add|alt|no|m|M|[0-9]|[#b+\-°øΔ^(),])*)?)(?:/([A-G])([#b])?)?$"
    )
    .unwrap();

    /// Non-chord tokens that still belong on a chord line
    static ref CHORD_LINE_LITERAL_RE: Regex = Regex::new(
        r"^(?:[Nn]\.?[Cc]\.?|\|{1,2}:?|:\|{1,2}|%|/+|-+|\.{2,}|\(?[xX][0-9]+\)?|\(?[0-9]+[xX]\)?|[()])$"
    )
    .unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Chord {
    pub root: Note,
    /// Everything between the root and the slash, verbatim (`m7b5`, `sus2`, ``)
    pub quality: String,
    pub bass: Option<Note>,
}

impl Chord {
    /// Roots moved by `semitones`, respelled for `context`; quality untouched.
    pub fn transposed(&self, semitones: i32, context: Option<Key>) -> Chord {
        Chord {
            root: self.root.transposed(semitones, context),
            quality: self.quality.clone(),
            bass: self.bass.map(|bass| bass.transposed(semitones, context)),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

impl FromStr for Chord {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_chord(s).ok_or_else(|| SheetError::UnrecognizedChord(s.to_string()))
    }
}

/// A token on a chord line: a real chord or literal text such as `N.C.`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ChordToken {
    Chord(Chord),
    Literal(String),
}

impl ChordToken {
    pub fn chord(&self) -> Option<&Chord> {
        match self {
            ChordToken::Chord(chord) => Some(chord),
            ChordToken::Literal(_) => None,
        }
    }

    pub fn transposed(&self, semitones: i32, context: Option<Key>) -> ChordToken {
        match self {
            ChordToken::Chord(chord) => ChordToken::Chord(chord.transposed(semitones, context)),
            ChordToken::Literal(text) => ChordToken::Literal(text.clone()),
        }
    }
}

impl fmt::Display for ChordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordToken::Chord(chord) => write!(f, "{}", chord),
            ChordToken::Literal(text) => write!(f, "{}", text),
        }
    }
}

/// Parse a chord symbol. Returns `None` for anything outside the grammar.
///
/// # Examples
/// ```
/// use chordboard::chord::parse_chord;
///
/// let chord = parse_chord("F#m7b5/C").unwrap();
/// assert_eq!(chord.root.name(), "F#");
/// assert_eq!(chord.quality, "m7b5");
/// assert_eq!(chord.bass.unwrap().name(), "C");
///
/// assert!(parse_chord("Amazing").is_none());
/// ```
pub fn parse_chord(token: &str) -> Option<Chord> {
    let caps = CHORD_RE.captures(token)?;

    let first_char = |group: usize| caps.get(group).and_then(|m| m.as_str().chars().next());

    let root = Note::from_parts(first_char(1)?, first_char(2))?;
    let quality = caps.get(3).map_or("", |m| m.as_str()).to_string();
    let bass = match first_char(4) {
        Some(letter) => Some(Note::from_parts(letter, first_char(5))?),
        None => None,
    };

    Some(Chord { root, quality, bass })
}

pub fn is_chord(token: &str) -> bool {
    CHORD_RE.is_match(token)
}

/// Recognize a token that may appear on a chord line.
pub fn parse_chord_token(token: &str) -> Option<ChordToken> {
    if let Some(chord) = parse_chord(token) {
        return Some(ChordToken::Chord(chord));
    }
    if CHORD_LINE_LITERAL_RE.is_match(token) {
        return Some(ChordToken::Literal(token.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{PitchClass, Spelling};

    #[test]
    fn test_chord_parsing() {
        let g = parse_chord("G").unwrap();
        assert_eq!(g.root.pitch, PitchClass::new(7));
        assert_eq!(g.root.spelling, Spelling::Natural);
        assert_eq!(g.quality, "");
        assert_eq!(g.bass, None);

        let bbm7 = parse_chord("Bbm7").unwrap();
        assert_eq!(bbm7.root.pitch, PitchClass::new(10));
        assert_eq!(bbm7.root.spelling, Spelling::Flat);
        assert_eq!(bbm7.quality, "m7");

        let slash = parse_chord("D/F#").unwrap();
        assert_eq!(slash.quality, "");
        assert_eq!(slash.bass.unwrap().pitch, PitchClass::new(6));
        assert_eq!(slash.bass.unwrap().spelling, Spelling::Sharp);
    }

    #[test]
    fn test_extensions_round_trip() {
        for token in [
            "Cmaj7", "Am7b5", "Dsus2", "Eadd9", "A(no3)", "C6/9", "G7#9", "Bdim7", "F+", "E-7",
            "Csus4/G", "Ebmaj9#11", "Cø7", "CΔ", "Gm(maj7)", "C#m7/G#", "A", "Cmi7", "Ami",
            "CMaj7", "Bbmi7b5",
        ] {
            let chord = parse_chord(token).unwrap_or_else(|| panic!("{} should parse", token));
            assert_eq!(chord.to_string(), token);
        }
    }

    #[test]
    fn test_six_nine_is_not_a_slash_chord() {
        let chord = parse_chord("C6/9").unwrap();
        assert_eq!(chord.quality, "6/9");
        assert_eq!(chord.bass, None);
    }

    #[test]
    fn test_words_are_not_chords() {
        for word in ["Amazing", "Bed", "Dad", "Add", "Go", "grace", "", "H7", "C/H", "a", "Be"] {
            assert!(parse_chord(word).is_none(), "{} should not parse", word);
            assert!(!is_chord(word));
        }
    }

    #[test]
    fn test_chord_line_literals() {
        assert_eq!(parse_chord_token("N.C."), Some(ChordToken::Literal("N.C.".to_string())));
        for token in ["NC", "|", "||", "|:", ":|", "%", "/", "-", "...", "x2", "(x3)", "2x", "(", ")"] {
            assert!(
                matches!(parse_chord_token(token), Some(ChordToken::Literal(_))),
                "{} should be a literal",
                token
            );
        }
        assert!(parse_chord_token("sweet").is_none());
        assert!(matches!(parse_chord_token("Em"), Some(ChordToken::Chord(_))));
    }

    #[test]
    fn test_from_str_error() {
        assert!("Cmaj7".parse::<Chord>().is_ok());
        let err = "word".parse::<Chord>().unwrap_err();
        assert_eq!(err.to_string(), "Not a chord: 'word'");
    }

    #[test]
    fn test_transposed_keeps_quality() {
        let chord = parse_chord("Am7/G").unwrap();
        let up = chord.transposed(1, Some("F".parse().unwrap()));
        assert_eq!(up.to_string(), "Bbm7/Ab");
        let sharp = chord.transposed(1, None);
        assert_eq!(sharp.to_string(), "A#m7/G#");
    }

    #[test]
    fn test_minor_spelled_mi() {
        assert!(is_chord("Cmi7"));
        let ami = parse_chord("Ami").unwrap();
        assert_eq!(ami.root.pitch, PitchClass::new(9));
        assert_eq!(ami.quality, "mi");
        assert_eq!(parse_chord("CMaj7").unwrap().quality, "Maj7");
    }

    #[test]
    fn test_quality_cannot_start_with_accidental() {
        assert!(parse_chord("Abb5").is_none());
        assert!(parse_chord("C#b9").is_none());
        assert!(parse_chord_token("Abb5").is_none());
        let flat_nine = parse_chord("C7b9").unwrap();
        assert_eq!(flat_nine.quality, "7b9");
    }

    #[test]
    fn test_transposed_text_reads_back() {
        let tokens = [
            "G", "Bbm7", "D/F#", "Cmaj7", "Am7b5", "Dsus2", "A(no3)", "C6/9", "G7#9", "Bdim7", "F+",
            "E-7", "Csus4/G", "Ebmaj9#11", "Cø7", "Gm(maj7)", "C#m7/G#", "Cmi7", "Ab(b5)", "Db7b9",
        ];
        let contexts = [None, Some("F".parse().unwrap()), Some("E".parse().unwrap())];
        for token in tokens {
            let chord = parse_chord(token).unwrap_or_else(|| panic!("{} should parse", token));
            for context in contexts {
                for n in -12..=12 {
                    let moved = chord.transposed(n, context);
                    assert_eq!(parse_chord(&moved.to_string()), Some(moved.clone()), "{} by {}", token, n);
                }
            }
        }
    }
}
