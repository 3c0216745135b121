use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tempfile::TempDir;

use zettel_core::{GestureConfig, Note, NoteCollection, NoteStore, TagIndex};

use super::AppState;
use crate::storage::NoteStorage;

/// 100x40 cells at 8x16 px per cell: an 800px wide container, so the
/// gesture thresholds from the pixel-based tests carry over directly.
pub const TEST_VIEWPORT: (u16, u16) = (100, 40);

pub fn make_note(title: &str, content: &str) -> Note {
    Note::new(title, content)
}

pub fn test_state() -> AppState {
    test_state_with(Vec::new())
}

pub fn test_state_with(archived: Vec<Note>) -> AppState {
    let mut collection = NoteCollection::default();
    for mut note in archived {
        let current = collection.current_note_mut();
        current.title = std::mem::take(&mut note.title);
        current.content = std::mem::take(&mut note.content);
        collection.archive_current_note();
    }
    AppState::new(collection, GestureConfig::default(), TEST_VIEWPORT)
}

pub fn test_index() -> TagIndex {
    TagIndex::with_delay(Duration::from_millis(300))
}

/// State plus on-disk storage for tests that exercise persistence.
pub fn test_env() -> (AppState, TagIndex, NoteStorage, TempDir) {
    let tmp = TempDir::new().unwrap();
    let storage = NoteStorage::new(tmp.path().join("notes"));
    let store = storage.load("{{date}} - {{time}}").unwrap();
    let state = AppState::new(store, GestureConfig::default(), TEST_VIEWPORT);
    (state, test_index(), storage, tmp)
}

pub fn key_event(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
}

pub fn type_str(state: &mut AppState, index: &TagIndex, text: &str) {
    for c in text.chars() {
        let code = if c == '\n' {
            KeyCode::Enter
        } else {
            KeyCode::Char(c)
        };
        super::input::handle_editor_key(state, index, &key_event(code));
    }
}

pub fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

pub fn mouse_down(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

pub fn mouse_drag(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
}

pub fn mouse_up(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Up(MouseButton::Left), column, row)
}
