use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{Result, ZettelError};
use zettel_core::{Note, NoteCollection};

const CURRENT_FILE: &str = "current.md";
const ARCHIVE_DIR: &str = "archive";

/// Folder-of-files persistence: the current draft lives at `current.md` and
/// each archived note is its own markdown file under `archive/`. Files are
/// the title on the first line, a blank separator, then the content.
#[derive(Debug, Clone)]
pub struct NoteStorage {
    root: PathBuf,
}

impl NoteStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn current_path(&self) -> PathBuf {
        self.root.join(CURRENT_FILE)
    }

    fn archive_path(&self, filename: &str) -> PathBuf {
        self.root.join(ARCHIVE_DIR).join(filename)
    }

    /// Loads the whole collection from disk, creating the directory layout on
    /// first run. Unreadable archive entries are skipped, not fatal.
    pub fn load(&self, title_template: &str) -> Result<NoteCollection> {
        fs::create_dir_all(self.root.join(ARCHIVE_DIR))?;

        let current = match read_note(&self.current_path()) {
            Ok(Some(note)) => note,
            Ok(None) => Note::blank(),
            Err(e) => {
                return Err(ZettelError::Storage(format!(
                    "failed to read current draft: {}",
                    e
                )))
            }
        };

        let mut archived = Vec::new();
        for entry in fs::read_dir(self.root.join(ARCHIVE_DIR))? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Ok(Some(mut note)) = read_note(&path) {
                note.filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string);
                archived.push(note);
            }
        }

        Ok(NoteCollection::with_notes(title_template, current, archived))
    }

    pub fn save_current(&self, note: &Note) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        write_note(&self.current_path(), note)
    }

    /// Writes an archived note to its file. The note must already carry a
    /// filename (assigned at archive time).
    pub fn persist_archived(&self, note: &Note) -> Result<()> {
        let filename = note.filename.as_deref().ok_or_else(|| {
            ZettelError::Storage("archived note has no filename".into())
        })?;
        fs::create_dir_all(self.root.join(ARCHIVE_DIR))?;
        write_note(&self.archive_path(filename), note)
    }

    pub fn delete_archived(&self, filename: &str) -> Result<()> {
        let path = self.archive_path(filename);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Removes an archive file after its note became the current draft.
    pub fn promote_archived(&self, note: &Note, previous_filename: &str) -> Result<()> {
        self.save_current(note)?;
        self.delete_archived(previous_filename)
    }
}

fn write_note(path: &Path, note: &Note) -> Result<()> {
    let mut body = String::with_capacity(note.title.len() + 2 + note.content.len());
    body.push_str(&note.title);
    body.push_str("\n\n");
    body.push_str(&note.content);
    fs::write(path, body)?;
    Ok(())
}

/// Reads a note file. `Ok(None)` when the file does not exist.
fn read_note(path: &Path) -> Result<Option<Note>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let (title, content) = match raw.split_once("\n\n") {
        Some((title, content)) => (title.to_string(), content.to_string()),
        // Legacy or hand-written file without a separator: all content.
        None => (String::new(), raw),
    };

    let mut note = Note::new(&title, &content);
    note.modified_at = file_modified_at(path);
    Ok(Some(note))
}

fn file_modified_at(path: &Path) -> DateTime<Local> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zettel_core::NoteStore;

    fn storage(tmp: &TempDir) -> NoteStorage {
        NoteStorage::new(tmp.path().join("notes"))
    }

    #[test]
    fn load_on_empty_dir_gives_blank_collection() {
        let tmp = TempDir::new().unwrap();
        let store = storage(&tmp).load("{{date}}").unwrap();
        assert!(store.current_note().is_blank());
        assert!(store.archived_notes().is_empty());
        assert!(tmp.path().join("notes").join("archive").is_dir());
    }

    #[test]
    fn current_draft_round_trips() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        let note = Note::new("Draft", "body with #tag");
        storage.save_current(&note).unwrap();

        let store = storage.load("{{date}}").unwrap();
        assert_eq!(store.current_note().title, "Draft");
        assert_eq!(store.current_note().content, "body with #tag");
    }

    #[test]
    fn archived_notes_round_trip_with_filenames() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        let mut note = Note::new("Kept", "#alpha");
        note.filename = Some("Kept.md".into());
        storage.persist_archived(&note).unwrap();

        let store = storage.load("{{date}}").unwrap();
        assert_eq!(store.archived_notes().len(), 1);
        assert_eq!(
            store.archived_notes()[0].filename.as_deref(),
            Some("Kept.md")
        );
        assert!(store.archived_notes()[0].has_tag("alpha"));
    }

    #[test]
    fn persist_without_filename_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let note = Note::new("No name", "x");
        let err = storage(&tmp).persist_archived(&note).unwrap_err();
        assert!(err.to_string().contains("filename"));
    }

    #[test]
    fn multiline_content_survives() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        let note = Note::new("T", "first\n\nsecond\nthird");
        storage.save_current(&note).unwrap();

        let store = storage.load("{{date}}").unwrap();
        assert_eq!(store.current_note().content, "first\n\nsecond\nthird");
    }

    #[test]
    fn file_without_separator_reads_as_untitled() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        fs::create_dir_all(storage.root()).unwrap();
        fs::write(storage.root().join(CURRENT_FILE), "just a line").unwrap();

        let store = storage.load("{{date}}").unwrap();
        assert_eq!(store.current_note().title, "");
        assert_eq!(store.current_note().content, "just a line");
    }

    #[test]
    fn non_markdown_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        fs::create_dir_all(storage.root().join(ARCHIVE_DIR)).unwrap();
        fs::write(storage.root().join(ARCHIVE_DIR).join(".DS_Store"), "junk").unwrap();

        let store = storage.load("{{date}}").unwrap();
        assert!(store.archived_notes().is_empty());
    }

    #[test]
    fn delete_archived_removes_the_file() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        let mut note = Note::new("Gone", "x");
        note.filename = Some("Gone.md".into());
        storage.persist_archived(&note).unwrap();
        storage.delete_archived("Gone.md").unwrap();

        assert!(storage.load("{{date}}").unwrap().archived_notes().is_empty());
        // Deleting again is a no-op.
        storage.delete_archived("Gone.md").unwrap();
    }

    #[test]
    fn promote_moves_archive_entry_into_draft() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        let mut note = Note::new("Restored", "body");
        note.filename = Some("Restored.md".into());
        storage.persist_archived(&note).unwrap();
        storage.promote_archived(&note, "Restored.md").unwrap();

        let store = storage.load("{{date}}").unwrap();
        assert_eq!(store.current_note().title, "Restored");
        assert!(store.archived_notes().is_empty());
    }
}
