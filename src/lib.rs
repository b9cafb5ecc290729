pub mod api;
pub mod ast;
pub mod chord;
pub mod distance;
pub mod document;
pub mod error;
pub mod key;
pub mod lexer;
pub mod render;
pub mod section;
pub mod transpose;

pub use api::{view_song, SongView, ViewOptions};
pub use ast::*;
pub use chord::{parse_chord, Chord, ChordToken};
pub use distance::{capo, distance_between, resolve_display_key, Capo};
pub use document::SongDocument;
pub use error::*;
pub use key::{preferred_spelling, semitones_between, transpose_pitch, Key, Mode, Note, PitchClass, Spelling};
pub use lexer::{tokenize, tokenize_with_diagnostics};
pub use render::render_song;
pub use section::{classify, group_sections, song_sections, SectionMeta, SongLayout};
pub use transpose::transpose;

/// Parse a song document and render it in its own key.
pub fn render_document(source: &str) -> Result<String, SheetError> {
    let doc = SongDocument::parse(source)?;
    Ok(render_song(&doc.song(), doc.dialect))
}

/// Render a song document transposed to `display_key` (e.g. "A", "Bb").
pub fn render_transposed(source: &str, display_key: &str) -> Result<String, SheetError> {
    let doc = SongDocument::parse(source)?;
    display_key.parse::<Key>()?;

    let options = ViewOptions {
        user_key: Some(display_key.to_string()),
        ..ViewOptions::default()
    };
    let view = view_song(&doc, &options);
    Ok(render_song(&view.song, doc.dialect))
}
