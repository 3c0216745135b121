use std::collections::HashSet;

use crate::note::{Note, DEFAULT_TITLE_TEMPLATE};

/// The note-collection surface the gesture and tag subsystems depend on.
/// Persistence lives behind this seam; the core only needs the operations
/// below.
pub trait NoteStore {
    fn current_note(&self) -> &Note;
    fn archived_notes(&self) -> &[Note];

    /// Moves the current draft into the archived collection and replaces it
    /// with a fresh blank draft. Returns the archived note, or `None` when
    /// the draft was blank (which makes a stray double-invocation harmless).
    fn archive_current_note(&mut self) -> Option<&Note>;

    /// Swaps a previously archived note into the editor. A non-blank current
    /// draft is archived first, never discarded. Returns false when no
    /// archived note has the given filename.
    fn load_archived_note_as_current(&mut self, filename: &str) -> bool;

    fn notes_with_tag(&self, tag: &str) -> Vec<&Note>;
    fn notes_with_any_tag(&self, tags: &HashSet<String>) -> Vec<&Note>;
    fn notes_with_all_tags(&self, tags: &HashSet<String>) -> Vec<&Note>;

    /// While the user is selecting text, tear/swipe gestures must not
    /// activate.
    fn text_selection_active(&self) -> bool;
}

/// In-memory implementation: one current draft plus the archived collection,
/// kept sorted by modification time descending.
#[derive(Debug, Clone)]
pub struct NoteCollection {
    current: Note,
    archived: Vec<Note>,
    title_template: String,
    text_selection_active: bool,
}

impl NoteCollection {
    pub fn new(title_template: &str) -> Self {
        Self {
            current: Note::blank(),
            archived: Vec::new(),
            title_template: title_template.to_string(),
            text_selection_active: false,
        }
    }

    pub fn with_notes(title_template: &str, current: Note, mut archived: Vec<Note>) -> Self {
        archived.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Self {
            current,
            archived,
            title_template: title_template.to_string(),
            text_selection_active: false,
        }
    }

    pub fn current_note_mut(&mut self) -> &mut Note {
        &mut self.current
    }

    pub fn title_template(&self) -> &str {
        &self.title_template
    }

    pub fn set_text_selection_active(&mut self, active: bool) {
        self.text_selection_active = active;
    }

    /// The full collection (current draft first) for tag-index scans.
    pub fn snapshot_notes(&self) -> Vec<Note> {
        let mut notes = Vec::with_capacity(1 + self.archived.len());
        notes.push(self.current.clone());
        notes.extend(self.archived.iter().cloned());
        notes
    }

    pub fn delete_archived_note(&mut self, filename: &str) -> bool {
        let before = self.archived.len();
        self.archived
            .retain(|n| n.filename.as_deref() != Some(filename));
        self.archived.len() != before
    }

    fn assign_filename(&self, note: &Note) -> String {
        let base = sanitize_filename(&note.display_title(&self.title_template));
        let mut candidate = format!("{}.md", base);
        let mut counter = 2;
        while self
            .archived
            .iter()
            .any(|n| n.filename.as_deref() == Some(candidate.as_str()))
        {
            candidate = format!("{}-{}.md", base, counter);
            counter += 1;
        }
        candidate
    }
}

impl Default for NoteCollection {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_TEMPLATE)
    }
}

impl NoteStore for NoteCollection {
    fn current_note(&self) -> &Note {
        &self.current
    }

    fn archived_notes(&self) -> &[Note] {
        &self.archived
    }

    fn archive_current_note(&mut self) -> Option<&Note> {
        if self.current.is_blank() {
            return None;
        }

        let mut note = std::mem::replace(&mut self.current, Note::blank());
        note.touch();
        if note.filename.is_none() {
            note.filename = Some(self.assign_filename(&note));
        }
        // Freshly archived notes carry the newest timestamp.
        self.archived.insert(0, note);
        self.archived.first()
    }

    fn load_archived_note_as_current(&mut self, filename: &str) -> bool {
        if !self
            .archived
            .iter()
            .any(|n| n.filename.as_deref() == Some(filename))
        {
            return false;
        }

        if !self.current.is_blank() {
            self.archive_current_note();
        }

        // Position may have shifted after archiving the draft.
        let pos = match self
            .archived
            .iter()
            .position(|n| n.filename.as_deref() == Some(filename))
        {
            Some(p) => p,
            None => return false,
        };
        self.current = self.archived.remove(pos);
        true
    }

    fn notes_with_tag(&self, tag: &str) -> Vec<&Note> {
        self.archived.iter().filter(|n| n.has_tag(tag)).collect()
    }

    fn notes_with_any_tag(&self, tags: &HashSet<String>) -> Vec<&Note> {
        self.archived
            .iter()
            .filter(|n| !n.extracted_tags().is_disjoint(tags))
            .collect()
    }

    fn notes_with_all_tags(&self, tags: &HashSet<String>) -> Vec<&Note> {
        self.archived
            .iter()
            .filter(|n| tags.is_subset(&n.extracted_tags()))
            .collect()
    }

    fn text_selection_active(&self) -> bool {
        self.text_selection_active
    }
}

fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("-");
    if joined.is_empty() {
        "note".to_string()
    } else {
        joined
    }
}
