pub mod index;
pub mod parser;

pub use index::{TagIndex, TagSnapshot};
pub use parser::TagParser;

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Local};

/// A hashtag derived from note text. Identity is the normalized (lowercase)
/// name; the display name keeps whatever case the tag was first seen with.
/// Tags are rebuilt wholesale on every index pass and never persisted.
#[derive(Debug, Clone)]
pub struct Tag {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Local>,
    pub usage_count: usize,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        let sanitized = name.trim();
        Self {
            id: sanitized.to_lowercase(),
            display_name: sanitized.to_string(),
            created_at: Local::now(),
            usage_count: 1,
        }
    }

    /// Builds a tag from a `#hashtag` string. Rejects empty names and names
    /// containing anything outside `[A-Za-z0-9_]`.
    pub fn from_hashtag(hashtag: &str) -> Option<Self> {
        let name = hashtag.strip_prefix('#').unwrap_or(hashtag);
        if name.is_empty() || !name.chars().all(is_tag_char) {
            return None;
        }
        Some(Self::new(name))
    }

    /// The `#displayName` rendering used in note text.
    pub fn hashtag(&self) -> String {
        format!("#{}", self.display_name)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub(crate) fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
