use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use zettel_core::tag::parser::TagParser;
use zettel_core::TagIndex;

use super::state::{AppState, EditTarget, SuggestionState, UiRequest};

pub(super) fn handle_editor_key(
    state: &mut AppState,
    index: &TagIndex,
    key: &KeyEvent,
) -> Option<UiRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('q') {
        state.should_quit = true;
        return None;
    }
    if ctrl && key.code == KeyCode::Char('o') {
        return Some(UiRequest::OpenOverview);
    }

    // The completion popup owns navigation keys while open.
    if state.suggestions.is_some() {
        match key.code {
            KeyCode::Down => {
                if let Some(s) = state.suggestions.as_mut() {
                    if s.selected + 1 < s.items.len() {
                        s.selected += 1;
                    }
                }
                return None;
            }
            KeyCode::Up => {
                if let Some(s) = state.suggestions.as_mut() {
                    s.selected = s.selected.saturating_sub(1);
                }
                return None;
            }
            KeyCode::Enter | KeyCode::Tab => {
                accept_suggestion(state, index);
                return None;
            }
            KeyCode::Esc => {
                state.suggestions = None;
                return None;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab => {
            state.edit_target = match state.edit_target {
                EditTarget::Title => EditTarget::Content,
                EditTarget::Content => EditTarget::Title,
            };
            state.suggestions = None;
        }
        KeyCode::Enter => match state.edit_target {
            EditTarget::Title => {
                state.edit_target = EditTarget::Content;
                state.suggestions = None;
            }
            EditTarget::Content => {
                state.content_buffer.insert_char('\n');
                after_edit(state, index);
            }
        },
        KeyCode::Char(c) if !ctrl => {
            state.active_buffer_mut().insert_char(c);
            after_edit(state, index);
        }
        KeyCode::Backspace => {
            state.active_buffer_mut().delete_back();
            after_edit(state, index);
        }
        KeyCode::Delete => {
            state.active_buffer_mut().delete_forward();
            after_edit(state, index);
        }
        KeyCode::Left if ctrl => {
            state.active_buffer_mut().move_word_left();
            refresh_suggestions(state, index);
        }
        KeyCode::Right if ctrl => {
            state.active_buffer_mut().move_word_right();
            refresh_suggestions(state, index);
        }
        KeyCode::Left => {
            state.active_buffer_mut().move_left();
            refresh_suggestions(state, index);
        }
        KeyCode::Right => {
            state.active_buffer_mut().move_right();
            refresh_suggestions(state, index);
        }
        KeyCode::Up => {
            state.active_buffer_mut().move_up();
            refresh_suggestions(state, index);
        }
        KeyCode::Down => {
            state.active_buffer_mut().move_down();
            refresh_suggestions(state, index);
        }
        KeyCode::Char('a') if ctrl => state.active_buffer_mut().move_home(),
        KeyCode::Char('e') if ctrl => state.active_buffer_mut().move_end(),
        KeyCode::Home => state.active_buffer_mut().move_home(),
        KeyCode::End => state.active_buffer_mut().move_end(),
        _ => {}
    }
    None
}

pub(super) fn handle_overview_key(state: &mut AppState, key: &KeyEvent) -> Option<UiRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('q') {
        state.should_quit = true;
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(UiRequest::CloseOverview),
        KeyCode::Char('o') if ctrl => return Some(UiRequest::CloseOverview),
        KeyCode::Up => {
            state.selected_note = state.selected_note.saturating_sub(1);
        }
        KeyCode::Down => {
            state.selected_note += 1;
            state.clamp_selection();
        }
        KeyCode::Enter => {
            let filename = state
                .visible_notes()
                .get(state.selected_note)
                .and_then(|n| n.filename.clone());
            if let Some(filename) = filename {
                return Some(UiRequest::LoadNote(filename));
            }
        }
        KeyCode::Char('d') => {
            let filename = state
                .visible_notes()
                .get(state.selected_note)
                .and_then(|n| n.filename.clone());
            if let Some(filename) = filename {
                return Some(UiRequest::DeleteNote(filename));
            }
        }
        KeyCode::Char(c @ '1'..='5') => {
            let slot = c as usize - '1' as usize;
            if let Some(tag) = state.popular_tags.get(slot) {
                let id = tag.id.clone();
                if !state.active_filters.remove(&id) {
                    state.active_filters.insert(id);
                }
                state.selected_note = 0;
                state.clamp_selection();
            }
        }
        KeyCode::Char('c') => {
            state.active_filters.clear();
            state.clamp_selection();
        }
        _ => {}
    }
    None
}

fn after_edit(state: &mut AppState, index: &TagIndex) {
    state.sync_draft();
    index.schedule_update(&state.store.snapshot_notes());
    refresh_suggestions(state, index);
}

/// Recomputes the completion popup from the cursor position. A bare `#`
/// offers the most-used tags; a partial narrows them by prefix, never
/// suggesting the exact tag being typed back to itself.
pub(super) fn refresh_suggestions(state: &mut AppState, index: &TagIndex) {
    let buffer = state.active_buffer();
    let text = buffer.to_string();
    state.suggestions = TagParser::find_hashtag_at_position(&text, buffer.cursor)
        .map(|(range, partial)| SuggestionState {
            items: index.get_matching_tags(&partial, Some(&partial)),
            range,
            selected: 0,
        })
        .filter(|s| !s.items.is_empty());
}

/// Replaces the partial hashtag with the selected tag and re-syncs the draft.
pub(super) fn accept_suggestion(state: &mut AppState, index: &TagIndex) {
    let Some(suggestion) = state.suggestions.take() else {
        return;
    };
    let Some(tag) = suggestion.items.get(suggestion.selected) else {
        return;
    };
    let completed = format!("#{}", tag.display_name);
    state
        .active_buffer_mut()
        .replace_range(suggestion.range.start, suggestion.range.end, &completed);
    state.sync_draft();
    index.schedule_update(&state.store.snapshot_notes());
}
