use std::collections::HashSet;

use chrono::{DateTime, Local};

use crate::tag::parser::TagParser;

/// Default template for auto-generated titles.
pub const DEFAULT_TITLE_TEMPLATE: &str = "{{date}} - {{time}}";

/// A single note. The current draft has no filename; one is assigned when the
/// note is archived. `extracted_tags` is always derived from the live text so
/// it can never drift from a stale cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub title: String,
    pub content: String,
    pub filename: Option<String>,
    pub modified_at: DateTime<Local>,
}

impl Note {
    pub fn blank() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            filename: None,
            modified_at: Local::now(),
        }
    }

    pub fn new(title: &str, content: &str) -> Self {
        let mut note = Self::blank();
        note.title = title.to_string();
        note.content = content.to_string();
        note
    }

    /// Normalized tag ids present in title or content.
    pub fn extracted_tags(&self) -> HashSet<String> {
        TagParser::extract_tags_from_note(self)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.extracted_tags().contains(&name.to_lowercase())
    }

    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }

    /// The typed title, or a template-rendered fallback when none is set.
    pub fn display_title(&self, template: &str) -> String {
        if self.title.trim().is_empty() {
            render_title_template(template, self.modified_at)
        } else {
            self.title.clone()
        }
    }

    /// Whitespace-collapsed content excerpt for list views.
    pub fn preview(&self, limit: usize) -> String {
        let collapsed: String = self.content.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= limit {
            collapsed
        } else {
            let truncated: String = collapsed.chars().take(limit).collect();
            format!("{}…", truncated)
        }
    }

    pub fn touch(&mut self) {
        self.modified_at = Local::now();
    }
}

/// Renders a title template for a point in time. Supported tokens:
/// `{{time}}`, `{{date}}`, `{{shortDate}}`, `{{weekday}}`. Unknown tokens are
/// left as-is.
pub fn render_title_template(template: &str, when: DateTime<Local>) -> String {
    template
        .replace("{{time}}", &when.format("%H:%M").to_string())
        .replace("{{date}}", &when.format("%b %d, %Y").to_string())
        .replace("{{shortDate}}", &when.format("%Y-%m-%d").to_string())
        .replace("{{weekday}}", &when.format("%A").to_string())
}
