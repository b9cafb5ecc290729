//! # Error Types
//!
//! Errors and diagnostics for the chordboard engine.
//!
//! Chord sheets are free-form user text, so the engine degrades instead of
//! failing: parsing a sheet never returns an error. Problems found while
//! tokenizing are reported as [`Diagnostic`]s next to a displayable result.
//! [`SheetError`] is reserved for the edges of the crate: parsing a key or
//! chord name on its own, reading YAML frontmatter, and file I/O in the CLI.
//!
//! ## Usage
//! ```rust
//! use chordboard::{Key, SheetError};
//!
//! match "H#".parse::<Key>() {
//!     Ok(key) => println!("key of {}", key),
//!     Err(SheetError::UnknownKey(name)) => eprintln!("no such key: {}", name),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    /// A key name that does not resolve to a [`crate::Key`].
    ///
    /// # Example
    /// ```
    /// # use chordboard::SheetError;
    /// let err = SheetError::UnknownKey("H".to_string());
    /// assert_eq!(err.to_string(), "Unknown key: 'H'");
    /// ```
    #[error("Unknown key: '{0}'")]
    UnknownKey(String),

    /// A token that does not pass the chord grammar.
    #[error("Not a chord: '{0}'")]
    UnrecognizedChord(String),

    /// Invalid YAML frontmatter in a song document.
    ///
    /// # Example
    /// ```
    /// # use chordboard::SheetError;
    /// let err = SheetError::Metadata("parser-type: unknown variant `abc`".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: parser-type: unknown variant `abc`");
    /// ```
    #[error("Invalid metadata: {0}")]
    Metadata(String),

    #[error("Error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal problem found while tokenizing a sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// 1-indexed physical line, 0 for problems not tied to a line.
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DiagnosticKind {
    /// Token kept as literal text because it is not a chord.
    UnrecognizedChordToken(String),
    /// Line mixes chords with other words; rendered as plain text.
    AmbiguousLineClassification,
    /// Key name fell back to sharp spelling and zero distance.
    UnknownKey(String),
    /// The sheet has no lines at all.
    EmptyInput,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }
}
