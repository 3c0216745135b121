use std::collections::HashSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use zettel_core::{Note, Tag};

use crate::app::pointer::CELL_WIDTH_PX;
use crate::app::EditTarget;
use crate::edit_buffer::EditBuffer;

const PREVIEW_LIMIT: usize = 60;

/// The note card: dotted tear strip on top, then title and content. The whole
/// card shifts right while tearing and left while swiping toward the
/// overview.
pub struct EditorArea<'a> {
    pub title: &'a EditBuffer,
    pub content: &'a EditBuffer,
    pub edit_target: EditTarget,
    pub tear_offset_px: f32,
    pub nav_offset_px: f32,
    pub container_width_px: f32,
}

impl<'a> Widget for EditorArea<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let shift = ((self.tear_offset_px + self.nav_offset_px) / CELL_WIDTH_PX).round() as i32;

        // Tear strip: cells already torn go blank, the edge is marked.
        let torn = if self.container_width_px > 0.0 {
            let progress = (self.tear_offset_px / self.container_width_px).clamp(0.0, 1.0);
            (progress * f32::from(area.width)) as u16
        } else {
            0
        };
        let strip: String = (0..area.width)
            .map(|x| {
                if x < torn {
                    ' '
                } else if x == torn && torn > 0 {
                    '✂'
                } else {
                    '╌'
                }
            })
            .collect();
        Line::from(Span::styled(strip, Style::default().fg(Color::DarkGray))).render(
            Rect::new(area.x, area.y, area.width, 1),
            buf,
        );

        // Title line.
        if area.height > 1 {
            let title_text = self.title.to_string();
            let title_style = if self.edit_target == EditTarget::Title {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let (text, style) = if title_text.is_empty() {
                (
                    "untitled".to_string(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
            } else {
                (title_text, title_style)
            };
            Line::from(Span::styled(shifted(&text, shift, area.width), style)).render(
                Rect::new(area.x, area.y + 1, area.width, 1),
                buf,
            );
        }

        // Content lines below the title.
        let content_text = self.content.to_string();
        for (i, line_text) in content_text.split('\n').enumerate() {
            let y = 2 + i as u16;
            if y >= area.height {
                break;
            }
            Line::from(Span::raw(shifted(line_text, shift, area.width))).render(
                Rect::new(area.x, area.y + y, area.width, 1),
                buf,
            );
        }

        self.render_cursor(area, buf, shift);
    }
}

impl<'a> EditorArea<'a> {
    fn render_cursor(&self, area: Rect, buf: &mut Buffer, shift: i32) {
        let (buffer, base_row) = match self.edit_target {
            EditTarget::Title => (self.title, 1u16),
            EditTarget::Content => (self.content, 2u16),
        };
        let (line, col) = cursor_position(buffer);

        let x = col as i32 + shift;
        let y = base_row as i32 + line as i32;
        if x < 0 || y < 0 || x >= i32::from(area.width) || y >= i32::from(area.height) {
            return;
        }
        if let Some(cell) = buf.cell_mut((area.x + x as u16, area.y + y as u16)) {
            cell.set_style(Style::default().add_modifier(Modifier::REVERSED));
        }
    }
}

/// Line and column of the cursor within a buffer, in characters.
fn cursor_position(buffer: &EditBuffer) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for &c in &buffer.chars[..buffer.cursor] {
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn shifted(text: &str, shift: i32, width: u16) -> String {
    let shifted: String = if shift >= 0 {
        let mut s = " ".repeat(shift as usize);
        s.push_str(text);
        s
    } else {
        text.chars().skip((-shift) as usize).collect()
    };
    shifted.chars().take(width as usize).collect()
}

/// Archived-note list with popular-tag filter chips at the top.
pub struct OverviewArea<'a> {
    pub notes: Vec<&'a Note>,
    pub popular_tags: &'a [Tag],
    pub active_filters: &'a HashSet<String>,
    pub selected: usize,
    pub title_template: &'a str,
}

impl<'a> Widget for OverviewArea<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Filter chips.
        let mut spans = vec![Span::raw(" ")];
        for (i, tag) in self.popular_tags.iter().enumerate() {
            let active = self.active_filters.contains(&tag.id);
            let style = if active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            spans.push(Span::styled(
                format!("[{}] {} {}", i + 1, tag.hashtag(), tag.usage_count),
                style,
            ));
            spans.push(Span::raw("  "));
        }
        Line::from(spans).render(Rect::new(area.x, area.y, area.width, 1), buf);

        if self.notes.is_empty() {
            if area.height > 2 {
                Line::from(Span::styled(
                    " no notes yet",
                    Style::default().fg(Color::DarkGray),
                ))
                .render(Rect::new(area.x, area.y + 2, area.width, 1), buf);
            }
            return;
        }

        for (i, note) in self.notes.iter().enumerate() {
            let y = 2 + i as u16;
            if y >= area.height {
                break;
            }
            let selected = i == self.selected;
            let marker = if selected { "▌ " } else { "  " };
            let title_style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let line = Line::from(vec![
                Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
                Span::styled(note.display_title(self.title_template), title_style),
                Span::styled(
                    format!("  {}", note.preview(PREVIEW_LIMIT)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            line.render(Rect::new(area.x, area.y + y, area.width, 1), buf);
        }
    }
}
