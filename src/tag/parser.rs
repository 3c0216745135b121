use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use super::{is_tag_char, Tag};
use crate::note::Note;

/// Hashtag token shape: `#` followed by ASCII alphanumerics and underscores.
/// Greedy matching guarantees the token is never followed by another word
/// character; the leading-boundary rule is enforced separately because a `#`
/// glued to the tail of an identifier (`word#nottag`) is not a tag.
const HASHTAG_PATTERN: &str = "#[A-Za-z0-9_]+";

fn hashtag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // Fixed pattern, compilation cannot fail at runtime.
    REGEX.get_or_init(|| Regex::new(HASHTAG_PATTERN).unwrap())
}

/// Stateless hashtag parsing over note text. All offsets and ranges in this
/// API are in characters, matching the editor's cursor model.
pub struct TagParser;

impl TagParser {
    /// Single-scan extractor returning the normalized→display mapping and the
    /// set of unique normalized tags. First-seen display case wins.
    pub fn extract_normalized_and_display(
        text: &str,
    ) -> (HashMap<String, String>, HashSet<String>) {
        let mut normalized_to_display = HashMap::new();
        let mut unique = HashSet::new();
        for m in hashtag_regex().find_iter(text) {
            if !starts_at_word_boundary(text, m.start()) {
                continue;
            }
            if let Some(tag) = Tag::from_hashtag(m.as_str()) {
                unique.insert(tag.id.clone());
                normalized_to_display
                    .entry(tag.id)
                    .or_insert(tag.display_name);
            }
        }
        (normalized_to_display, unique)
    }

    /// Extracts all unique tags from the given text, normalized to lowercase.
    pub fn extract_tags(text: &str) -> HashSet<String> {
        Self::extract_normalized_and_display(text).1
    }

    /// Extracts tags from both title and content of a note in one pass.
    pub fn extract_tags_from_note(note: &Note) -> HashSet<String> {
        let mut combined = String::with_capacity(note.title.len() + 1 + note.content.len());
        combined.push_str(&note.title);
        combined.push(' ');
        combined.push_str(&note.content);
        Self::extract_tags(&combined)
    }

    /// Finds the hashtag being typed at the given cursor position.
    ///
    /// Scans backward from the cursor to the nearest `#`; any intervening
    /// whitespace or invalid tag character means there is no hashtag in
    /// progress. The returned range covers the `#` and the partial token; the
    /// partial may be empty (a bare `#` is a valid trigger for suggestions).
    /// A cursor beyond the end of the text yields `None` rather than an
    /// out-of-bounds failure.
    pub fn find_hashtag_at_position(text: &str, position: usize) -> Option<(Range<usize>, String)> {
        let chars: Vec<char> = text.chars().collect();
        if position > chars.len() {
            return None;
        }

        let hash_pos = chars[..position].iter().rposition(|&c| c == '#')?;
        let partial: String = chars[hash_pos + 1..position].iter().collect();
        if !partial.chars().all(is_tag_char) {
            return None;
        }

        Some((hash_pos..position, partial))
    }

    /// Replaces the hashtag at `range` (in characters) with `#tag_name`.
    /// Caller is responsible for repositioning the cursor afterwards.
    pub fn replace_hashtag(text: &str, range: Range<usize>, tag_name: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        if range.start > range.end || range.end > chars.len() {
            return text.to_string();
        }
        let mut result: String = chars[..range.start].iter().collect();
        result.push('#');
        result.push_str(tag_name);
        result.extend(&chars[range.end..]);
        result
    }
}

/// True when the `#` at `start` is at the beginning of the text or preceded
/// by a non-word character.
fn starts_at_word_boundary(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !is_tag_char(c))
}
