mod input;
pub(crate) mod pointer;
mod state;
pub use state::*;

use input::{handle_editor_key, handle_overview_key};

#[cfg(test)]
pub(crate) mod test_helpers;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use zettel_core::gesture::{ActiveView, Direction, GestureContext, GestureOutcome};
use zettel_core::{NoteStore, TagIndex};

use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::NoteStorage;

fn handle_mouse(state: &mut AppState, mouse: &MouseEvent, now: Instant) -> Option<UiRequest> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if state.tear_animation.is_some() {
                return None;
            }
            let start = state.pointer.press(mouse.column, mouse.row, now);
            let view = match state.screen {
                Screen::Editor => ActiveView::Main,
                Screen::Overview => ActiveView::Overview,
            };
            state.gesture.begin(GestureContext {
                view,
                container_width: state.container_width_px(),
                in_tear_strip: state.screen == Screen::Editor && mouse.row == TEAR_STRIP_ROW,
                text_selection_active: state.store.text_selection_active(),
                start_location: start,
            });
            None
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some((dx, dy)) = state.pointer.drag(mouse.column, mouse.row, now) {
                let feedback = state.gesture.handle_move(dx, dy);
                match feedback.direction {
                    Some(Direction::TearToArchive) => state.tear_offset = feedback.offset,
                    Some(Direction::ToOverview) | Some(Direction::ToMain) => {
                        state.nav_offset = feedback.offset
                    }
                    None => {
                        state.tear_offset = 0.0;
                        state.nav_offset = 0.0;
                    }
                }
                if feedback.haptic.is_some() {
                    state.last_haptic = feedback.haptic;
                }
            }
            None
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let (dx, dy, velocity) = state.pointer.release(mouse.column, mouse.row, now)?;
            let outcome = state.gesture.handle_end(dx, dy, velocity);
            apply_outcome(state, outcome)
        }
        _ => None,
    }
}

fn apply_outcome(state: &mut AppState, outcome: GestureOutcome) -> Option<UiRequest> {
    match outcome {
        GestureOutcome::Cancelled => {
            state.reset_gesture_visuals();
            None
        }
        GestureOutcome::Committed {
            direction: Direction::TearToArchive,
            haptic,
        } => {
            state.last_haptic = haptic;
            state.tear_animation = Some(TearAnimation {
                ticks_left: TEAR_ANIMATION_TICKS,
            });
            None
        }
        GestureOutcome::Committed {
            direction: Direction::ToOverview,
            ..
        } => Some(UiRequest::OpenOverview),
        GestureOutcome::Committed {
            direction: Direction::ToMain,
            ..
        } => Some(UiRequest::CloseOverview),
    }
}

fn handle_tick(state: &mut AppState, storage: &NoteStorage, index: &TagIndex) -> Result<()> {
    let width = state.container_width_px();
    if let Some(animation) = state.tear_animation.as_mut() {
        animation.ticks_left = animation.ticks_left.saturating_sub(1);
        state.tear_offset += width / f32::from(TEAR_ANIMATION_TICKS);
        if animation.ticks_left == 0 {
            finish_tear(state, storage, index)?;
        }
    } else if state.dirty {
        storage.save_current(state.store.current_note())?;
        state.dirty = false;
    }
    Ok(())
}

/// Completes a committed tear: the note leaves the collection only after the
/// animation has run its course.
fn finish_tear(state: &mut AppState, storage: &NoteStorage, index: &TagIndex) -> Result<()> {
    state.tear_animation = None;
    state.reset_gesture_visuals();

    if let Some(note) = state.store.archive_current_note().cloned() {
        storage.persist_archived(&note)?;
    }
    storage.save_current(state.store.current_note())?;
    state.dirty = false;
    state.load_draft_into_buffers();
    state.edit_target = EditTarget::Content;
    index.schedule_update(&state.store.snapshot_notes());
    Ok(())
}

/// Flushes any pending tag recompute before the overview becomes visible, so
/// its chips and counts never show stale data.
pub(crate) async fn open_overview(state: &mut AppState, index: &TagIndex) {
    index.flush().await;
    state.popular_tags = index.get_most_popular_tags(FILTER_CHIP_COUNT);
    state.tag_total = index.snapshot().sorted_tags.len();
    state.suggestions = None;
    state.screen = Screen::Overview;
    state.selected_note = 0;
    state.clamp_selection();
    state.reset_gesture_visuals();
}

pub(crate) fn close_overview(state: &mut AppState) {
    state.screen = Screen::Editor;
    state.reset_gesture_visuals();
}

/// Swaps an archived note into the editor. A non-blank draft is archived and
/// persisted first.
pub(crate) fn load_note(
    state: &mut AppState,
    storage: &NoteStorage,
    index: &TagIndex,
    filename: &str,
) -> Result<bool> {
    let had_draft = !state.store.current_note().is_blank();
    if !state.store.load_archived_note_as_current(filename) {
        return Ok(false);
    }

    if had_draft {
        // The displaced draft landed at the front of the archive.
        if let Some(auto_archived) = state.store.archived_notes().first() {
            storage.persist_archived(auto_archived)?;
        }
    }
    storage.promote_archived(state.store.current_note(), filename)?;

    state.load_draft_into_buffers();
    state.edit_target = EditTarget::Content;
    state.screen = Screen::Editor;
    state.dirty = false;
    index.schedule_update(&state.store.snapshot_notes());
    Ok(true)
}

pub(crate) fn delete_note(
    state: &mut AppState,
    storage: &NoteStorage,
    index: &TagIndex,
    filename: &str,
) -> Result<()> {
    if state.store.delete_archived_note(filename) {
        storage.delete_archived(filename)?;
        state.clamp_selection();
        index.schedule_update(&state.store.snapshot_notes());
    }
    Ok(())
}

/// Scene interruptions abandon any in-flight gesture. A tear animation that
/// already committed keeps running; only uncommitted drags are dropped.
fn interrupt_gesture(state: &mut AppState) {
    state.gesture.interrupt();
    state.pointer.reset();
    if state.tear_animation.is_none() {
        state.reset_gesture_visuals();
    }
}

async fn dispatch(
    state: &mut AppState,
    request: UiRequest,
    storage: &NoteStorage,
    index: &TagIndex,
) -> Result<()> {
    match request {
        UiRequest::OpenOverview => open_overview(state, index).await,
        UiRequest::CloseOverview => close_overview(state),
        UiRequest::LoadNote(filename) => {
            load_note(state, storage, index, &filename)?;
        }
        UiRequest::DeleteNote(filename) => {
            delete_note(state, storage, index, &filename)?;
        }
    }
    Ok(())
}

pub async fn run(config: &AppConfig, terminal: &mut DefaultTerminal) -> Result<()> {
    let storage = NoteStorage::new(config.notes_dir());
    let store = storage.load(&config.notes.title_template)?;

    let index = TagIndex::with_delay(Duration::from_millis(config.tags.update_delay_ms));
    index.update_immediately(&store.snapshot_notes()).await;

    let size = terminal.size()?;
    let mut state = AppState::new(store, config.gesture_config(), (size.width, size.height));
    state.tag_total = index.snapshot().sorted_tags.len();

    let (tx, mut rx) = mpsc::unbounded_channel::<AppMessage>();

    // Spawn event reader task
    let event_tx = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            let forwarded = match reader.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    Some(AppMessage::Key(key))
                }
                Some(Ok(Event::Mouse(mouse))) => Some(AppMessage::Mouse(mouse)),
                Some(Ok(Event::Resize(w, h))) => Some(AppMessage::Resize(w, h)),
                Some(Ok(Event::FocusLost)) => Some(AppMessage::FocusLost),
                Some(Err(_)) | None => break,
                _ => None,
            };
            if let Some(msg) = forwarded {
                if event_tx.send(msg).is_err() {
                    break;
                }
            }
        }
    });

    // Spawn tick timer
    let tick_tx = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(100));
        loop {
            interval.tick().await;
            if tick_tx.send(AppMessage::Tick).is_err() {
                break;
            }
        }
    });

    // Forward snapshot publications so the UI redraws with fresh counts
    let tags_tx = tx.clone();
    let mut snapshots = index.subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            if tags_tx.send(AppMessage::TagsChanged).is_err() {
                break;
            }
        }
    });

    // Main loop
    loop {
        terminal.draw(|frame| crate::ui::render(frame, &state))?;

        if let Some(msg) = rx.recv().await {
            let request = match msg {
                AppMessage::Key(key) => match state.screen {
                    Screen::Editor => handle_editor_key(&mut state, &index, &key),
                    Screen::Overview => handle_overview_key(&mut state, &key),
                },
                AppMessage::Mouse(mouse) => handle_mouse(&mut state, &mouse, Instant::now()),
                AppMessage::Resize(w, h) => {
                    state.viewport = (w, h);
                    interrupt_gesture(&mut state);
                    None
                }
                AppMessage::FocusLost => {
                    interrupt_gesture(&mut state);
                    None
                }
                AppMessage::TagsChanged => {
                    state.tag_total = index.snapshot().sorted_tags.len();
                    if state.screen == Screen::Overview {
                        state.popular_tags = index.get_most_popular_tags(FILTER_CHIP_COUNT);
                    }
                    None
                }
                AppMessage::Tick => {
                    handle_tick(&mut state, &storage, &index)?;
                    None
                }
            };

            if let Some(request) = request {
                dispatch(&mut state, request, &storage, &index).await?;
            }
        }

        if state.should_quit {
            break;
        }
    }

    storage.save_current(state.store.current_note())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::input::{handle_editor_key, handle_overview_key};
    use super::test_helpers::*;
    use super::*;
    use crossterm::event::KeyCode;
    use zettel_core::gesture::{Haptic, Phase};

    fn drag_sequence(state: &mut AppState, from: (u16, u16), to: (u16, u16)) -> Option<UiRequest> {
        let t0 = Instant::now();
        handle_mouse(state, &mouse_down(from.0, from.1), t0);
        handle_mouse(
            state,
            &mouse_drag(to.0, to.1),
            t0 + Duration::from_millis(80),
        );
        handle_mouse(state, &mouse_up(to.0, to.1), t0 + Duration::from_millis(160))
    }

    // --- editing and the tag pipeline ---

    #[tokio::test(start_paused = true)]
    async fn typing_flows_into_draft_and_debounced_index() {
        let mut state = test_state();
        let index = test_index();
        let mut snapshots = index.subscribe();

        type_str(&mut state, &index, "standup #team notes");
        assert_eq!(state.store.current_note().content, "standup #team notes");
        assert!(state.dirty);
        // Still inside the debounce window.
        assert_eq!(index.recompute_count(), 0);

        snapshots.changed().await.unwrap();
        assert_eq!(index.recompute_count(), 1);
        assert!(index.tag_exists("team"));
    }

    #[tokio::test]
    async fn tab_switches_between_title_and_content() {
        let mut state = test_state();
        let index = test_index();

        assert_eq!(state.edit_target, EditTarget::Content);
        handle_editor_key(&mut state, &index, &key_event(KeyCode::Tab));
        assert_eq!(state.edit_target, EditTarget::Title);

        type_str(&mut state, &index, "My title");
        handle_editor_key(&mut state, &index, &key_event(KeyCode::Enter));
        assert_eq!(state.edit_target, EditTarget::Content);
        assert_eq!(state.store.current_note().title, "My title");
    }

    #[tokio::test]
    async fn fully_typed_tag_does_not_suggest_itself() {
        let mut state = test_state();
        let index = test_index();
        index
            .update_immediately(&[make_note("", "#work #workshop")])
            .await;

        type_str(&mut state, &index, "today #work");
        let suggestions = state.suggestions.as_ref().expect("suggestions open");
        let names: Vec<&str> = suggestions.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(names, vec!["workshop"]);
    }

    #[tokio::test]
    async fn partial_hashtag_opens_prefix_suggestions() {
        let mut state = test_state();
        let index = test_index();
        index
            .update_immediately(&[
                make_note("", "#work #workshop"),
                make_note("", "#play"),
            ])
            .await;

        type_str(&mut state, &index, "today #w");
        let suggestions = state.suggestions.as_ref().expect("suggestions open");
        let names: Vec<&str> = suggestions.items.iter().map(|t| t.id.as_str()).collect();
        assert!(names.contains(&"work"));
        assert!(names.contains(&"workshop"));
        assert!(!names.contains(&"play"));
    }

    #[tokio::test]
    async fn bare_hash_offers_popular_tags() {
        let mut state = test_state();
        let index = test_index();
        index
            .update_immediately(&[make_note("", "#alpha #alpha?"), make_note("", "#alpha #beta")])
            .await;

        type_str(&mut state, &index, "#");
        let suggestions = state.suggestions.as_ref().expect("suggestions open");
        assert_eq!(suggestions.items[0].id, "alpha");
    }

    #[tokio::test]
    async fn accepting_suggestion_completes_the_hashtag() {
        let mut state = test_state();
        let index = test_index();
        index
            .update_immediately(&[make_note("", "#Meeting notes")])
            .await;

        type_str(&mut state, &index, "weekly #me");
        assert!(state.suggestions.is_some());
        handle_editor_key(&mut state, &index, &key_event(KeyCode::Enter));

        assert_eq!(state.content_buffer.to_string(), "weekly #Meeting");
        assert_eq!(state.content_buffer.cursor, 15);
        assert!(state.suggestions.is_none());
        assert_eq!(state.store.current_note().content, "weekly #Meeting");
    }

    #[tokio::test]
    async fn escape_dismisses_suggestions_without_editing() {
        let mut state = test_state();
        let index = test_index();
        index.update_immediately(&[make_note("", "#todo")]).await;

        type_str(&mut state, &index, "#to");
        assert!(state.suggestions.is_some());
        handle_editor_key(&mut state, &index, &key_event(KeyCode::Esc));
        assert!(state.suggestions.is_none());
        assert_eq!(state.content_buffer.to_string(), "#to");
    }

    // --- tear gesture through the mouse adapter ---

    #[tokio::test]
    async fn committed_tear_animates_before_archiving() {
        let (mut state, index, storage, _tmp) = test_env();
        type_str(&mut state, &index, "tear me #done");

        // 30 cells = 240px of rightward travel, past the 190px commit point.
        let request = drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        assert_eq!(request, None);
        assert_eq!(state.last_haptic, Some(Haptic::Heavy));
        assert!(state.tear_animation.is_some());
        // Not archived until the animation finishes.
        assert!(state.store.archived_notes().is_empty());

        for _ in 0..TEAR_ANIMATION_TICKS {
            handle_tick(&mut state, &storage, &index).unwrap();
        }

        assert!(state.tear_animation.is_none());
        assert_eq!(state.store.archived_notes().len(), 1);
        assert!(state.store.current_note().is_blank());
        assert_eq!(state.content_buffer.to_string(), "");

        let archived = &state.store.archived_notes()[0];
        let filename = archived.filename.clone().unwrap();
        assert!(storage.root().join("archive").join(filename).exists());
    }

    #[tokio::test]
    async fn tear_animation_slides_card_across_each_tick() {
        let (mut state, index, storage, _tmp) = test_env();
        type_str(&mut state, &index, "animate me");
        drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));

        let mut last_offset = state.tear_offset;
        for _ in 0..TEAR_ANIMATION_TICKS - 1 {
            handle_tick(&mut state, &storage, &index).unwrap();
            assert!(state.tear_offset > last_offset);
            last_offset = state.tear_offset;
        }
        handle_tick(&mut state, &storage, &index).unwrap();
        assert!(state.tear_animation.is_none());
        assert_eq!(state.tear_offset, 0.0);
    }

    #[tokio::test]
    async fn short_tear_springs_back() {
        let (mut state, index, _storage, _tmp) = test_env();
        type_str(&mut state, &index, "keep me");

        let request = drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (15, TEAR_STRIP_ROW));
        assert_eq!(request, None);
        assert!(state.tear_animation.is_none());
        assert_eq!(state.tear_offset, 0.0);
        assert!(state.store.archived_notes().is_empty());
        assert_eq!(state.store.current_note().content, "keep me");
    }

    #[tokio::test]
    async fn tear_drag_emits_medium_haptics() {
        let (mut state, index, _storage, _tmp) = test_env();
        type_str(&mut state, &index, "x");

        let t0 = Instant::now();
        handle_mouse(&mut state, &mouse_down(5, TEAR_STRIP_ROW), t0);
        // 8 cells = 64px, past the 5% dead zone of the 800px container.
        handle_mouse(
            &mut state,
            &mouse_drag(13, TEAR_STRIP_ROW),
            t0 + Duration::from_millis(50),
        );
        assert_eq!(state.last_haptic, Some(Haptic::Medium));
        assert!(state.tear_offset > 0.0);
    }

    #[tokio::test]
    async fn blank_draft_tear_archives_nothing() {
        let (mut state, index, storage, _tmp) = test_env();

        drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        for _ in 0..TEAR_ANIMATION_TICKS {
            handle_tick(&mut state, &storage, &index).unwrap();
        }
        assert!(state.store.archived_notes().is_empty());
    }

    // --- swipe navigation through the mouse adapter ---

    #[tokio::test]
    async fn long_left_swipe_requests_overview() {
        let mut state = test_state();
        // Content area, far below the tear strip. 40 cells = 320px > 224px.
        let request = drag_sequence(&mut state, (60, 10), (20, 10));
        assert_eq!(request, Some(UiRequest::OpenOverview));
    }

    #[tokio::test]
    async fn fast_flick_commits_without_distance() {
        let mut state = test_state();
        let t0 = Instant::now();
        handle_mouse(&mut state, &mouse_down(60, 10), t0);
        handle_mouse(&mut state, &mouse_drag(55, 10), t0 + Duration::from_millis(20));
        // Final leg: 5 cells = 40px in 20ms, about -2000 px/s.
        let request = handle_mouse(&mut state, &mouse_up(50, 10), t0 + Duration::from_millis(40));
        assert_eq!(request, Some(UiRequest::OpenOverview));
    }

    #[tokio::test]
    async fn right_swipe_on_overview_requests_editor() {
        let mut state = test_state();
        state.screen = Screen::Overview;
        // Start below the top exclusion strip (108px = row 7 and up).
        let request = drag_sequence(&mut state, (20, 12), (60, 12));
        assert_eq!(request, Some(UiRequest::CloseOverview));
    }

    #[tokio::test]
    async fn overview_top_strip_drag_is_ignored() {
        let mut state = test_state();
        state.screen = Screen::Overview;
        let request = drag_sequence(&mut state, (20, 3), (60, 3));
        assert_eq!(request, None);
    }

    #[tokio::test]
    async fn text_selection_suppresses_tear() {
        let mut state = test_state();
        state.store.set_text_selection_active(true);
        let request = drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        assert_eq!(request, None);
        assert!(state.tear_animation.is_none());
    }

    #[tokio::test]
    async fn focus_loss_interrupts_active_drag() {
        let mut state = test_state();
        let t0 = Instant::now();
        handle_mouse(&mut state, &mouse_down(5, TEAR_STRIP_ROW), t0);
        handle_mouse(
            &mut state,
            &mouse_drag(25, TEAR_STRIP_ROW),
            t0 + Duration::from_millis(50),
        );
        assert!(state.tear_offset > 0.0);

        interrupt_gesture(&mut state);
        assert_eq!(state.gesture.phase(), Phase::Idle);
        assert_eq!(state.tear_offset, 0.0);
        assert!(!state.pointer.active());
    }

    #[tokio::test]
    async fn interrupt_keeps_committed_tear_animation() {
        let (mut state, index, storage, _tmp) = test_env();
        type_str(&mut state, &index, "committed");
        drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        assert!(state.tear_animation.is_some());

        interrupt_gesture(&mut state);
        assert!(state.tear_animation.is_some());
        for _ in 0..TEAR_ANIMATION_TICKS {
            handle_tick(&mut state, &storage, &index).unwrap();
        }
        assert_eq!(state.store.archived_notes().len(), 1);
    }

    #[tokio::test]
    async fn ctrl_q_quits_from_either_screen() {
        let mut state = test_state();
        let index = test_index();

        handle_editor_key(&mut state, &index, &ctrl_key(KeyCode::Char('q')));
        assert!(state.should_quit);

        let mut state = test_state();
        state.screen = Screen::Overview;
        handle_overview_key(&mut state, &ctrl_key(KeyCode::Char('q')));
        assert!(state.should_quit);
    }

    // --- overview behaviors ---

    #[tokio::test(start_paused = true)]
    async fn opening_overview_flushes_pending_recompute() {
        let mut state = test_state();
        let index = test_index();

        type_str(&mut state, &index, "#fresh");
        assert_eq!(index.recompute_count(), 0);

        // No timer advance: the flush itself must force the recompute.
        open_overview(&mut state, &index).await;
        assert_eq!(index.recompute_count(), 1);
        assert_eq!(state.screen, Screen::Overview);
        assert_eq!(state.popular_tags.len(), 1);
        assert_eq!(state.popular_tags[0].id, "fresh");
        assert_eq!(state.tag_total, 1);
    }

    #[tokio::test]
    async fn opening_overview_dismisses_suggestion_popup() {
        let mut state = test_state();
        let index = test_index();
        index.update_immediately(&[make_note("", "#todo")]).await;

        type_str(&mut state, &index, "#to");
        assert!(state.suggestions.is_some());

        open_overview(&mut state, &index).await;
        assert!(state.suggestions.is_none());
        // Returning to the editor must not resurface the stale popup.
        close_overview(&mut state);
        assert!(state.suggestions.is_none());
    }

    #[tokio::test]
    async fn filter_chips_toggle_and_narrow_notes() {
        let mut state = test_state_with(vec![
            make_note("", "#alpha #beta"),
            make_note("", "#alpha"),
            make_note("", "#gamma"),
        ]);
        let index = test_index();
        index.update_immediately(&state.store.snapshot_notes()).await;
        open_overview(&mut state, &index).await;

        assert_eq!(state.visible_notes().len(), 3);
        // Chip 1 is the most used tag: alpha.
        handle_overview_key(&mut state, &key_event(KeyCode::Char('1')));
        assert!(state.active_filters.contains("alpha"));
        assert_eq!(state.visible_notes().len(), 2);

        // Adding a second chip intersects.
        let beta_slot = state
            .popular_tags
            .iter()
            .position(|t| t.id == "beta")
            .unwrap();
        let chip = char::from_digit(beta_slot as u32 + 1, 10).unwrap();
        handle_overview_key(&mut state, &key_event(KeyCode::Char(chip)));
        assert_eq!(state.visible_notes().len(), 1);

        // Toggling off restores.
        handle_overview_key(&mut state, &key_event(KeyCode::Char('1')));
        handle_overview_key(&mut state, &key_event(KeyCode::Char(chip)));
        assert_eq!(state.visible_notes().len(), 3);
    }

    #[tokio::test]
    async fn selection_clamps_to_filtered_list() {
        let mut state = test_state_with(vec![
            make_note("", "#a"),
            make_note("", "#a"),
            make_note("", "#b"),
        ]);
        let index = test_index();
        index.update_immediately(&state.store.snapshot_notes()).await;
        open_overview(&mut state, &index).await;

        handle_overview_key(&mut state, &key_event(KeyCode::Down));
        handle_overview_key(&mut state, &key_event(KeyCode::Down));
        assert_eq!(state.selected_note, 2);
        // Filtering to #a leaves two notes; the selection follows.
        let a_slot = state
            .popular_tags
            .iter()
            .position(|t| t.id == "a")
            .unwrap();
        let chip = char::from_digit(a_slot as u32 + 1, 10).unwrap();
        handle_overview_key(&mut state, &key_event(KeyCode::Char(chip)));
        assert!(state.selected_note < 2);
    }

    #[tokio::test]
    async fn enter_loads_selected_note_into_editor() {
        let (mut state, index, storage, _tmp) = test_env();
        type_str(&mut state, &index, "first note #one");
        drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        for _ in 0..TEAR_ANIMATION_TICKS {
            handle_tick(&mut state, &storage, &index).unwrap();
        }

        open_overview(&mut state, &index).await;
        let request = handle_overview_key(&mut state, &key_event(KeyCode::Enter));
        let Some(UiRequest::LoadNote(filename)) = request else {
            panic!("expected a load request");
        };

        assert!(load_note(&mut state, &storage, &index, &filename).unwrap());
        assert_eq!(state.screen, Screen::Editor);
        assert_eq!(state.content_buffer.to_string(), "first note #one");
        assert!(state.store.archived_notes().is_empty());
        // The archive file moved into the draft slot.
        assert!(!storage.root().join("archive").join(&filename).exists());
    }

    #[tokio::test]
    async fn loading_over_a_draft_archives_it_first() {
        let (mut state, index, storage, _tmp) = test_env();
        type_str(&mut state, &index, "old note");
        drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        for _ in 0..TEAR_ANIMATION_TICKS {
            handle_tick(&mut state, &storage, &index).unwrap();
        }
        let filename = state.store.archived_notes()[0].filename.clone().unwrap();

        type_str(&mut state, &index, "in-progress draft");
        assert!(load_note(&mut state, &storage, &index, &filename).unwrap());

        assert_eq!(state.content_buffer.to_string(), "old note");
        assert_eq!(state.store.archived_notes().len(), 1);
        let displaced = &state.store.archived_notes()[0];
        assert_eq!(displaced.content, "in-progress draft");
        let displaced_file = displaced.filename.clone().unwrap();
        assert!(storage.root().join("archive").join(displaced_file).exists());
    }

    #[tokio::test]
    async fn delete_removes_note_and_file() {
        let (mut state, index, storage, _tmp) = test_env();
        type_str(&mut state, &index, "short lived");
        drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        for _ in 0..TEAR_ANIMATION_TICKS {
            handle_tick(&mut state, &storage, &index).unwrap();
        }
        let filename = state.store.archived_notes()[0].filename.clone().unwrap();

        delete_note(&mut state, &storage, &index, &filename).unwrap();
        assert!(state.store.archived_notes().is_empty());
        assert!(!storage.root().join("archive").join(filename).exists());
    }

    #[tokio::test]
    async fn dirty_draft_autosaves_on_tick() {
        let (mut state, index, storage, _tmp) = test_env();
        type_str(&mut state, &index, "autosaved");
        assert!(state.dirty);

        handle_tick(&mut state, &storage, &index).unwrap();
        assert!(!state.dirty);
        let reloaded = storage.load("{{date}}").unwrap();
        assert_eq!(reloaded.current_note().content, "autosaved");
    }

    // --- full lifecycle ---

    #[tokio::test]
    async fn tear_archive_overview_reflects_new_tags() {
        let (mut state, index, storage, _tmp) = test_env();

        type_str(&mut state, &index, "standup notes #meeting #team");
        drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        for _ in 0..TEAR_ANIMATION_TICKS {
            handle_tick(&mut state, &storage, &index).unwrap();
        }

        type_str(&mut state, &index, "retro #meeting");
        drag_sequence(&mut state, (5, TEAR_STRIP_ROW), (35, TEAR_STRIP_ROW));
        for _ in 0..TEAR_ANIMATION_TICKS {
            handle_tick(&mut state, &storage, &index).unwrap();
        }

        open_overview(&mut state, &index).await;
        assert_eq!(state.popular_tags[0].id, "meeting");
        assert_eq!(state.popular_tags[0].usage_count, 2);
        assert_eq!(index.usage_count("team"), 1);
        assert_eq!(state.visible_notes().len(), 2);

        // Filter down to the #team note only.
        let team_slot = state
            .popular_tags
            .iter()
            .position(|t| t.id == "team")
            .unwrap();
        let chip = char::from_digit(team_slot as u32 + 1, 10).unwrap();
        handle_overview_key(&mut state, &key_event(KeyCode::Char(chip)));
        assert_eq!(state.visible_notes().len(), 1);
        assert!(state.visible_notes()[0].has_tag("team"));
    }
}
