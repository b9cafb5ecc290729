//! # Key Model
//!
//! Pitch-class arithmetic and the spelling tables used everywhere else.
//!
//! ## Key Concepts
//!
//! ### Pitch class
//! A note with no fixed spelling: `0 = C`, `1 = C#/Db`, ... `11 = B`. A
//! [`PitchClass`] is always reduced into `0..12`.
//!
//! ### Spelling
//! The same pitch class is written differently depending on the key around it.
//! Keys on the sharp side of the circle of fifths (C G D A E B F#) spell black
//! keys with `#`; keys on the flat side (F Bb Eb Ab Db) use `b`. A minor key
//! spells like its relative major (`Am` like `C`, `Dm` like `F`).
//!
//! ### Distance
//! [`semitones_between`] picks the shorter way round the chromatic circle.
//! A tritone (6) is ambiguous and always resolves upward to `+6`.

use crate::error::SheetError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Accidental preference per major tonic, indexed by pitch class.
/// Pitch class 6 resolves to F# and 1 to Db.
const KEY_ACCIDENTALS: [Accidental; 12] = [
    Accidental::Sharp, // C
    Accidental::Flat,  // Db
    Accidental::Sharp, // D
    Accidental::Flat,  // Eb
    Accidental::Sharp, // E
    Accidental::Flat,  // F
    Accidental::Sharp, // F#
    Accidental::Sharp, // G
    Accidental::Flat,  // Ab
    Accidental::Sharp, // A
    Accidental::Flat,  // Bb
    Accidental::Sharp, // B
];

/// Letter for each natural pitch class
const NATURAL_LETTERS: [Option<char>; 12] = [
    Some('C'),
    None,
    Some('D'),
    None,
    Some('E'),
    Some('F'),
    None,
    Some('G'),
    None,
    Some('A'),
    None,
    Some('B'),
];

/// One of the 12 chromatic notes, spelling-agnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub fn new(value: i32) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Pitch class of a natural note letter (A-G, case-insensitive)
    pub fn from_letter(letter: char) -> Option<Self> {
        let value = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        Some(Self(value))
    }

    /// True for the five black keys
    pub fn is_altered(self) -> bool {
        NATURAL_LETTERS[self.0 as usize].is_none()
    }
}

/// How a single note is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Natural,
    Sharp,
    Flat,
}

/// A key's preferred accidental for black keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    Sharp,
    Flat,
}

impl From<Accidental> for Spelling {
    fn from(acc: Accidental) -> Self {
        match acc {
            Accidental::Sharp => Spelling::Sharp,
            Accidental::Flat => Spelling::Flat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// A tonal center: root plus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Key {
    pub root: PitchClass,
    pub mode: Mode,
}

impl Key {
    pub fn new(root: PitchClass, mode: Mode) -> Self {
        Self { root, mode }
    }

    pub fn major(root: PitchClass) -> Self {
        Self::new(root, Mode::Major)
    }

    pub fn minor(root: PitchClass) -> Self {
        Self::new(root, Mode::Minor)
    }

    /// Sharp or flat preference, from the table entry of the major tonic
    /// (the relative major for minor keys).
    pub fn accidental(self) -> Accidental {
        let tonic = match self.mode {
            Mode::Major => self.root,
            Mode::Minor => transpose_pitch(self.root, 3),
        };
        KEY_ACCIDENTALS[tonic.value() as usize]
    }

    /// Same mode, root moved by `semitones`
    pub fn transposed(self, semitones: i32) -> Self {
        Self::new(transpose_pitch(self.root, semitones), self.mode)
    }

    /// Name spelled with the key's own preference, e.g. `Bb`, `F#m`
    pub fn name(self) -> String {
        let root = Note::new(self.root, preferred_spelling(self.root, Some(self)));
        match self.mode {
            Mode::Major => root.name(),
            Mode::Minor => format!("{}m", root.name()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = SheetError;

    /// Parse a key name like "C", "F#", "Bb", "Am", "C#m", "Eb minor".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || SheetError::UnknownKey(s.to_string());
        let trimmed = s.trim();

        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(unknown)?;
        let natural = PitchClass::from_letter(letter).ok_or_else(unknown)?;
        let after_letter = chars.as_str();

        let (root, rest) = match chars.next() {
            Some('#' | '♯') => (transpose_pitch(natural, 1), chars.as_str()),
            Some('b' | '♭') => (transpose_pitch(natural, -1), chars.as_str()),
            _ => (natural, after_letter),
        };

        let suffix = rest.trim();
        let mode = if suffix == "M" {
            Mode::Major
        } else {
            match suffix.to_lowercase().as_str() {
                "" | "maj" | "major" => Mode::Major,
                "m" | "min" | "minor" | "-" => Mode::Minor,
                _ => return Err(unknown()),
            }
        };

        Ok(Key::new(root, mode))
    }
}

/// A written note: pitch class plus how it is spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Note {
    pub pitch: PitchClass,
    pub spelling: Spelling,
}

impl Note {
    pub fn new(pitch: PitchClass, spelling: Spelling) -> Self {
        Self { pitch, spelling }
    }

    /// Build from a letter and optional `#`/`b`, as written in a chord token
    pub fn from_parts(letter: char, accidental: Option<char>) -> Option<Self> {
        let natural = PitchClass::from_letter(letter)?;
        let note = match accidental {
            None => Self::new(natural, Spelling::Natural),
            Some('#') => Self::new(transpose_pitch(natural, 1), Spelling::Sharp),
            Some('b') => Self::new(transpose_pitch(natural, -1), Spelling::Flat),
            Some(_) => return None,
        };
        Some(note)
    }

    /// Note moved by `semitones` and respelled for `context`
    pub fn transposed(self, semitones: i32, context: Option<Key>) -> Self {
        let pitch = transpose_pitch(self.pitch, semitones);
        Self::new(pitch, preferred_spelling(pitch, context))
    }

    pub fn name(self) -> String {
        let index = self.pitch.value() as i32;
        let letter_at = |offset: i32| NATURAL_LETTERS[(index + offset).rem_euclid(12) as usize];

        // Explicit spellings keep their letter (E#, Cb) as long as it resolves
        let written = match self.spelling {
            Spelling::Natural => letter_at(0).map(|l| l.to_string()),
            Spelling::Sharp => letter_at(-1).map(|l| format!("{}#", l)),
            Spelling::Flat => letter_at(1).map(|l| format!("{}b", l)),
        };

        written.unwrap_or_else(|| match letter_at(0) {
            Some(l) => l.to_string(),
            None => format!("{}#", letter_at(-1).unwrap_or('C')),
        })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Signed distance from `a` to `b` in `-5..=6`; a tritone is always `+6`.
pub fn semitones_between(a: Key, b: Key) -> i32 {
    let up = (b.root.value() as i32 - a.root.value() as i32).rem_euclid(12);
    if up > 6 {
        up - 12
    } else {
        up
    }
}

/// Spelling for `root` in `context`; sharps when there is no context key.
pub fn preferred_spelling(root: PitchClass, context: Option<Key>) -> Spelling {
    if !root.is_altered() {
        return Spelling::Natural;
    }
    context.map_or(Spelling::Sharp, |key| key.accidental().into())
}

pub fn transpose_pitch(p: PitchClass, semitones: i32) -> PitchClass {
    PitchClass::new(p.value() as i32 + semitones)
}
