pub mod header;
pub mod main_area;
pub mod status_bar;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear};
use ratatui::Frame;

use crate::app::{AppState, Screen, SuggestionState};
use zettel_core::NoteStore;

use header::Header;
use main_area::{EditorArea, OverviewArea};
use status_bar::StatusBar;

pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let note_title = state
        .store
        .current_note()
        .display_title(state.store.title_template());
    let header = Header {
        note_title: &note_title,
        tag_total: state.tag_total,
        archived_count: state.store.archived_notes().len(),
        screen: state.screen,
    };
    frame.render_widget(header, chunks[0]);

    match state.screen {
        Screen::Editor => {
            let editor = EditorArea {
                title: &state.title_buffer,
                content: &state.content_buffer,
                edit_target: state.edit_target,
                tear_offset_px: state.tear_offset,
                nav_offset_px: state.nav_offset,
                container_width_px: state.container_width_px(),
            };
            frame.render_widget(editor, chunks[1]);

            if let Some(suggestions) = &state.suggestions {
                render_suggestions_popup(frame, suggestions, chunks[1]);
            }
        }
        Screen::Overview => {
            let overview = OverviewArea {
                notes: state.visible_notes(),
                popular_tags: &state.popular_tags,
                active_filters: &state.active_filters,
                selected: state.selected_note,
                title_template: state.store.title_template(),
            };
            frame.render_widget(overview, chunks[1]);
        }
    }

    let status = StatusBar {
        screen: state.screen,
        message: state.status_message.as_deref(),
        dirty: state.dirty,
    };
    frame.render_widget(status, chunks[2]);
}

fn render_suggestions_popup(frame: &mut Frame, suggestions: &SuggestionState, area: Rect) {
    let items = suggestions.items.len().min(10);
    let popup_height = (items + 2) as u16;
    let popup_width = (area.width / 3).clamp(20, area.width);
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.y + 2).min(area.y + area.height.saturating_sub(popup_height));

    let popup_area = Rect::new(x, y, popup_width, popup_height);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray))
        .title(" Tags ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    for (i, tag) in suggestions.items.iter().take(items).enumerate() {
        let selected = i == suggestions.selected;
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let line = Line::from(vec![
            Span::styled(format!(" {}", tag.hashtag()), style),
            Span::styled(
                format!("  {}", tag.usage_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let line_area = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        frame.render_widget(line, line_area);
    }
}
