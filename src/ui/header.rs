use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::Screen;

pub struct Header<'a> {
    pub note_title: &'a str,
    pub tag_total: usize,
    pub archived_count: usize,
    pub screen: Screen,
}

impl<'a> Widget for Header<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let context = match self.screen {
            Screen::Editor => self.note_title,
            Screen::Overview => "archive",
        };

        let left = format!(" zettel │ {}", context);
        let right = format!("{} tags · {} notes ", self.tag_total, self.archived_count);

        let left_width = left.chars().count();
        let right_width = right.chars().count();
        let padding = (area.width as usize).saturating_sub(left_width + right_width);

        let line = Line::from(vec![
            Span::styled(
                " zettel ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("│ ", Style::default().fg(Color::DarkGray)),
            Span::raw(context.to_string()),
            Span::raw(" ".repeat(padding)),
            Span::styled(right, Style::default().fg(Color::DarkGray)),
        ]);
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
    fn header_shows_title_and_counts() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);

        let header = Header {
            note_title: "Feb 21, 2026 - 09:05",
            tag_total: 4,
            archived_count: 7,
            screen: Screen::Editor,
        };
        header.render(area, &mut buf);

        let content = row_text(&buf, area);
        assert!(content.contains("zettel"));
        assert!(content.contains("Feb 21, 2026 - 09:05"));
        assert!(content.contains("4 tags"));
        assert!(content.contains("7 notes"));
    }

    #[test]
    fn header_labels_overview_as_archive() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);

        let header = Header {
            note_title: "ignored",
            tag_total: 0,
            archived_count: 0,
            screen: Screen::Overview,
        };
        header.render(area, &mut buf);

        let content = row_text(&buf, area);
        assert!(content.contains("archive"));
        assert!(!content.contains("ignored"));
    }
}
