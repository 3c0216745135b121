use std::collections::HashSet;
use std::ops::Range;

use zettel_core::gesture::Haptic;
use zettel_core::{GestureConfig, GestureStateMachine, Note, NoteCollection, NoteStore, Tag};

use super::pointer::{PointerTracker, CELL_WIDTH_PX};
use crate::edit_buffer::EditBuffer;

/// Terminal row of the dotted tear strip inside the editor.
pub const TEAR_STRIP_ROW: u16 = 1;

/// Number of popular-tag filter chips shown in the overview.
pub const FILTER_CHIP_COUNT: usize = 5;

/// Ticks of the tear animation between commit and archive.
pub const TEAR_ANIMATION_TICKS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Editor,
    Overview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Title,
    Content,
}

/// Hashtag completion popup: the char range being replaced plus candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionState {
    pub range: Range<usize>,
    pub items: Vec<Tag>,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TearAnimation {
    pub ticks_left: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize(u16, u16),
    FocusLost,
    TagsChanged,
    Tick,
}

/// Deferred work a key handler asks the run loop to perform. Opening the
/// overview must await a tag-index flush, which handlers cannot do.
#[derive(Debug, Clone, PartialEq)]
pub enum UiRequest {
    OpenOverview,
    CloseOverview,
    LoadNote(String),
    DeleteNote(String),
}

pub struct AppState {
    pub store: NoteCollection,
    pub screen: Screen,
    pub edit_target: EditTarget,
    pub title_buffer: EditBuffer,
    pub content_buffer: EditBuffer,
    pub gesture: GestureStateMachine,
    pub pointer: PointerTracker,
    /// Visual rightward offset of the note card while tearing (px).
    pub tear_offset: f32,
    /// Visual horizontal offset of the frontmost screen while swiping (px).
    pub nav_offset: f32,
    pub tear_animation: Option<TearAnimation>,
    pub suggestions: Option<SuggestionState>,
    pub popular_tags: Vec<Tag>,
    pub active_filters: HashSet<String>,
    pub selected_note: usize,
    pub last_haptic: Option<Haptic>,
    /// Unique tag count from the latest published snapshot.
    pub tag_total: usize,
    pub status_message: Option<String>,
    pub dirty: bool,
    pub should_quit: bool,
    /// Terminal size in cells, kept current through resize events.
    pub viewport: (u16, u16),
}

impl AppState {
    pub fn new(store: NoteCollection, gesture_config: GestureConfig, viewport: (u16, u16)) -> Self {
        let mut state = Self {
            store,
            screen: Screen::Editor,
            edit_target: EditTarget::Content,
            title_buffer: EditBuffer::new_empty(),
            content_buffer: EditBuffer::new_empty(),
            gesture: GestureStateMachine::new(gesture_config),
            pointer: PointerTracker::new(),
            tear_offset: 0.0,
            nav_offset: 0.0,
            tear_animation: None,
            suggestions: None,
            popular_tags: Vec::new(),
            active_filters: HashSet::new(),
            selected_note: 0,
            last_haptic: None,
            tag_total: 0,
            status_message: None,
            dirty: false,
            should_quit: false,
            viewport,
        };
        state.load_draft_into_buffers();
        state
    }

    /// Copies the current draft into the edit buffers, cursor at the end.
    pub fn load_draft_into_buffers(&mut self) {
        self.title_buffer = EditBuffer::new(&self.store.current_note().title);
        self.content_buffer = EditBuffer::new(&self.store.current_note().content);
        self.suggestions = None;
    }

    /// Writes the edit buffers back into the draft and marks it dirty.
    pub fn sync_draft(&mut self) {
        let draft = self.store.current_note_mut();
        draft.title = self.title_buffer.to_string();
        draft.content = self.content_buffer.to_string();
        draft.touch();
        self.dirty = true;
    }

    pub fn active_buffer(&self) -> &EditBuffer {
        match self.edit_target {
            EditTarget::Title => &self.title_buffer,
            EditTarget::Content => &self.content_buffer,
        }
    }

    pub fn active_buffer_mut(&mut self) -> &mut EditBuffer {
        match self.edit_target {
            EditTarget::Title => &mut self.title_buffer,
            EditTarget::Content => &mut self.content_buffer,
        }
    }

    /// Archived notes passing the active filter chips. No filters means all.
    pub fn visible_notes(&self) -> Vec<&Note> {
        if self.active_filters.is_empty() {
            self.store.archived_notes().iter().collect()
        } else {
            self.store.notes_with_all_tags(&self.active_filters)
        }
    }

    pub fn clamp_selection(&mut self) {
        let count = self.visible_notes().len();
        if count == 0 {
            self.selected_note = 0;
        } else if self.selected_note >= count {
            self.selected_note = count - 1;
        }
    }

    pub fn container_width_px(&self) -> f32 {
        f32::from(self.viewport.0) * CELL_WIDTH_PX
    }

    pub fn reset_gesture_visuals(&mut self) {
        self.tear_offset = 0.0;
        self.nav_offset = 0.0;
        self.last_haptic = None;
    }
}
