//! # Key Distance & Capo
//!
//! The viewer asks two questions whenever the display key changes:
//! - how far to transpose the body: `distance_between(song key, display key)`
//! - where the capo goes: `capo(set key, display key)`
//!
//! Both take key names as typed by users. Unknown names never fail; they
//! count as no distance.

use crate::key::{semitones_between, Key};
use serde::Serialize;
use tracing::warn;

/// Parse a key name, logging names that do not resolve.
pub fn parse_key_or_warn(name: &str) -> Option<Key> {
    match name.parse::<Key>() {
        Ok(key) => Some(key),
        Err(e) => {
            warn!(key = name, "{}, using sharp spelling", e);
            None
        }
    }
}

/// Signed semitones from one key name to another; 0 if either is unknown.
///
/// ```
/// use chordboard::distance_between;
///
/// assert_eq!(distance_between("G", "A"), 2);
/// assert_eq!(distance_between("C", "Bb"), -2);
/// assert_eq!(distance_between("C", "what"), 0);
/// ```
pub fn distance_between(from: &str, to: &str) -> i32 {
    match (parse_key_or_warn(from), parse_key_or_warn(to)) {
        (Some(a), Some(b)) => semitones_between(a, b),
        _ => 0,
    }
}

/// Capo suggestion for playing a set key with display-key shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capo {
    /// Signed key distance, as shown next to the song
    pub semitones: i32,
}

pub fn capo(set_key: &str, display_key: &str) -> Capo {
    Capo {
        semitones: distance_between(set_key, display_key),
    }
}

/// Key the song is shown in: the performer's own key, then the set's key,
/// then the song's key. Blank names are skipped.
pub fn resolve_display_key<'a>(
    user_key: Option<&'a str>,
    set_key: Option<&'a str>,
    song_key: Option<&'a str>,
) -> Option<&'a str> {
    [user_key, set_key, song_key]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_between_names() {
        assert_eq!(distance_between("C", "D"), 2);
        assert_eq!(distance_between("D", "C"), -2);
        assert_eq!(distance_between("F#", "Gb"), 0);
        assert_eq!(distance_between("Am", "C"), 3);
        assert_eq!(distance_between("C", "F#"), 6);
        assert_eq!(distance_between("F#", "C"), 6);
    }

    #[test]
    fn test_unknown_keys_have_no_distance() {
        assert_eq!(distance_between("", "G"), 0);
        assert_eq!(distance_between("G", "Z#"), 0);
    }

    #[test]
    fn test_capo() {
        let up = capo("A", "G");
        assert_eq!(up.semitones, -2);

        let c = capo("D", "C");
        assert_eq!(c.semitones, -2);

        let e = capo("G", "E");
        assert_eq!(e.semitones, -3);
        assert_eq!(capo("E", "G").semitones, 3);
        assert_eq!(capo("G", "G").semitones, 0);
        assert_eq!(capo("C", "F#").semitones, 6);
    }

    #[test]
    fn test_resolve_display_key() {
        assert_eq!(resolve_display_key(Some("A"), Some("G"), Some("C")), Some("A"));
        assert_eq!(resolve_display_key(None, Some("G"), Some("C")), Some("G"));
        assert_eq!(resolve_display_key(Some(" "), None, Some("C")), Some("C"));
        assert_eq!(resolve_display_key(None, None, None), None);
    }
}
