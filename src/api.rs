//! # Public API
//!
//! The derivation the song viewer runs on every key change.
//!
//! ## Pipeline
//! 1. Pick the display key: the performer's key, else the set key, else the
//!    song key
//! 2. `transpose_amount = distance(song key, display key)`
//! 3. `capo = distance(set key or song key, display key)`
//! 4. Tokenize the body, transpose it toward the display key
//! 5. Classify and group the sections
//!
//! Nothing is cached; the whole view is rebuilt from text each time.
//!
//! ## Example
//! ```rust
//! use chordboard::{view_song, SongDocument, ViewOptions};
//!
//! let doc = SongDocument::parse("---\nkey: G\n---\nVerse 1:\nG          D\nAmazing grace")?;
//! let options = ViewOptions {
//!     user_key: Some("A".to_string()),
//!     ..ViewOptions::default()
//! };
//! let view = view_song(&doc, &options);
//!
//! assert_eq!(view.transpose_amount, 2);
//! assert_eq!(view.display_key.as_deref(), Some("A"));
//! assert_eq!(view.sections[0].title, "Verse 1");
//! # Ok::<(), chordboard::SheetError>(())
//! ```

use crate::ast::Song;
use crate::distance::{parse_key_or_warn, resolve_display_key, Capo};
use crate::document::SongDocument;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::key::{semitones_between, Key};
use crate::section::{group_sections, song_sections, SectionMeta, SongLayout};
use crate::transpose::transpose;
use serde::Serialize;
use tracing::debug;

/// Per-view configuration supplied by the UI
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewOptions {
    /// The performer's own key for this song
    pub user_key: Option<String>,
    /// Key the song is scheduled in for the current set
    pub set_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongView {
    pub title: Option<String>,
    pub author: Option<String>,
    pub display_key: Option<String>,
    pub transpose_amount: i32,
    pub capo: Capo,
    pub song: Song,
    pub sections: Vec<SectionMeta>,
    pub layout: SongLayout,
    pub diagnostics: Vec<Diagnostic>,
}

/// Key names seen by one view, each parsed (and logged) once
#[derive(Debug, Default)]
struct KeyTable<'a> {
    entries: Vec<(&'a str, Option<Key>)>,
}

impl<'a> KeyTable<'a> {
    fn new(names: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut table = Self::default();
        for name in names.into_iter().flatten().map(str::trim) {
            if name.is_empty() || table.entries.iter().any(|(seen, _)| *seen == name) {
                continue;
            }
            table.entries.push((name, parse_key_or_warn(name)));
        }
        table
    }

    fn get(&self, name: Option<&str>) -> Option<Key> {
        let name = name?.trim();
        self.entries.iter().find(|(seen, _)| *seen == name).and_then(|(_, key)| *key)
    }

    fn unknown(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().filter(|(_, key)| key.is_none()).map(|(name, _)| *name)
    }
}

fn key_distance(from: Option<Key>, to: Option<Key>) -> i32 {
    match (from, to) {
        (Some(a), Some(b)) => semitones_between(a, b),
        _ => 0,
    }
}

/// Build everything the viewer shows for a document.
pub fn view_song(doc: &SongDocument, options: &ViewOptions) -> SongView {
    let song_key = doc.key.as_deref();
    let user_key = options.user_key.as_deref();
    let set_key = options.set_key.as_deref().filter(|k| !k.trim().is_empty());
    let display_key = resolve_display_key(user_key, set_key, song_key);

    let keys = KeyTable::new([song_key, user_key, set_key]);
    let target = keys.get(display_key);
    let transpose_amount = key_distance(keys.get(song_key), target);
    let capo = Capo {
        semitones: key_distance(keys.get(set_key.or(song_key)), target),
    };

    let (parsed, mut diagnostics) = doc.song_with_diagnostics();
    diagnostics.extend(
        keys.unknown()
            .map(|name| Diagnostic::new(0, DiagnosticKind::UnknownKey(name.to_string()))),
    );

    debug!(?display_key, transpose_amount, capo = capo.semitones, "song view");

    let song = transpose(&parsed, transpose_amount, target);
    let sections = song_sections(&song);
    let layout = group_sections(&song);

    SongView {
        title: doc.title.clone(),
        author: doc.author.clone(),
        display_key: display_key.map(str::to_string),
        transpose_amount,
        capo,
        song,
        sections,
        layout,
        diagnostics,
    }
}
