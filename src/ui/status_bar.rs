use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::Screen;

const EDITOR_HINTS: &[(&str, &str)] = &[
    ("Tab", "title/body"),
    ("drag→", "tear off"),
    ("swipe←", "archive view"),
    ("Ctrl+O", "overview"),
    ("Ctrl+Q", "quit"),
];

const OVERVIEW_HINTS: &[(&str, &str)] = &[
    ("↑↓", "select"),
    ("Enter", "open"),
    ("1-5", "filter"),
    ("c", "clear"),
    ("d", "delete"),
    ("Esc", "back"),
];

pub struct StatusBar<'a> {
    pub screen: Screen,
    pub message: Option<&'a str>,
    pub dirty: bool,
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.message {
            let line = Line::from(Span::styled(
                format!(" {} ", msg),
                Style::default().fg(Color::Yellow),
            ));
            line.render(area, buf);
            return;
        }

        let mut spans = Vec::new();
        spans.push(match (self.screen, self.dirty) {
            (Screen::Editor, true) => {
                Span::styled(" ● ", Style::default().fg(Color::Yellow))
            }
            (Screen::Editor, false) => {
                Span::styled(" ○ ", Style::default().fg(Color::DarkGray))
            }
            (Screen::Overview, _) => Span::raw("   "),
        });

        let hints = match self.screen {
            Screen::Editor => EDITOR_HINTS,
            Screen::Overview => OVERVIEW_HINTS,
        };
        for (i, (key, action)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!("[{}]", key),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::styled(
                (*action).to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ));
        }

        let line = Line::from(spans);
        line.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, area: Rect) -> String {
        (0..area.width)
            .map(|x| {
                buf.cell((x, 0))
                    .unwrap()
                    .symbol()
                    .chars()
                    .next()
                    .unwrap_or(' ')
            })
            .collect()
    }

    #[test]
    fn editor_hints_include_tear_and_overview() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);

        StatusBar {
            screen: Screen::Editor,
            message: None,
            dirty: false,
        }
        .render(area, &mut buf);

        let content = row_text(&buf, area);
        assert!(content.contains("tear off"));
        assert!(content.contains("[Ctrl+O]"));
        assert!(content.contains("○"));
    }

    #[test]
    fn dirty_draft_shows_unsaved_marker() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);

        StatusBar {
            screen: Screen::Editor,
            message: None,
            dirty: true,
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, area).contains("●"));
    }

    #[test]
    fn overview_hints_include_filters() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);

        StatusBar {
            screen: Screen::Overview,
            message: None,
            dirty: false,
        }
        .render(area, &mut buf);

        let content = row_text(&buf, area);
        assert!(content.contains("[1-5]"));
        assert!(content.contains("filter"));
        assert!(content.contains("[Esc]"));
    }

    #[test]
    fn message_overrides_hints() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);

        StatusBar {
            screen: Screen::Editor,
            message: Some("saved"),
            dirty: false,
        }
        .render(area, &mut buf);

        let content = row_text(&buf, area);
        assert!(content.contains("saved"));
        assert!(!content.contains("[Ctrl+O]"));
    }
}
