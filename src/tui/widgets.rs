//! Custom widgets for the dashboard

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::dashboard::{snippet, CategoryFilter};
use crate::memory::MemoryDocument;

pub const TAGLINE: &str =
    "Search across daily notes, brain dumps, conversations, and extracted docs.";
pub const LOADING_TEXT: &str = "Loading memory index...";
pub const EMPTY_TEXT: &str = "No results found. Try broader keywords.";

/// Wrap a long string into multiple lines, respecting unicode width
pub fn wrap_text(text: &str, max_width: usize, indent: &str) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let content_width = max_width.saturating_sub(indent.width());
    if content_width == 0 || text.width() <= content_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_width = word.width();
        let sep = usize::from(!current_line.is_empty());

        if current_width + sep + word_width <= content_width {
            if sep == 1 {
                current_line.push(' ');
            }
            current_line.push_str(word);
            current_width += sep + word_width;
            continue;
        }

        if !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        // Words wider than a line are split by char
        for c in word.chars() {
            let char_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
            if current_width + char_width > content_width && !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            current_line.push(c);
            current_width += char_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Header bar with title and generation time
pub struct HeaderBar<'a> {
    pub title: &'a str,
    pub generated_at: Option<&'a str>,
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let title_line = Line::from(vec![
            Span::styled("◆ ", Theme::title()),
            Span::styled(self.title, Theme::title()),
        ]);
        buf.set_line(area.x + 1, area.y, &title_line, area.width.saturating_sub(2));

        if let Some(generated_at) = self.generated_at {
            let stamp = format!("generated {} ", generated_at);
            let stamp_len = stamp.width() as u16;
            let stamp_x = area.x + area.width.saturating_sub(stamp_len + 1);
            buf.set_span(stamp_x, area.y, &Span::styled(stamp, Theme::muted()), stamp_len + 1);
        }

        if area.height > 1 {
            let tagline = Line::from(Span::styled(TAGLINE, Theme::muted()));
            buf.set_line(area.x + 1, area.y + 1, &tagline, area.width.saturating_sub(2));
        }
    }
}

/// Search box widget
pub struct SearchBox<'a> {
    pub content: &'a str,
    pub focused: bool,
}

impl Widget for SearchBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(" Search ", Theme::muted()));

        let inner = block.inner(area);
        block.render(area, buf);

        let (display_text, style) = if self.content.is_empty() {
            ("Search all memories...", Theme::muted())
        } else {
            (self.content, Theme::text())
        };
        Paragraph::new(display_text).style(style).render(inner, buf);
    }
}

/// One line of category chips with counts
pub struct CategoryChips<'a> {
    pub chips: &'a [(CategoryFilter, usize)],
    pub active: CategoryFilter,
}

impl Widget for CategoryChips<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (i, (filter, count)) in self.chips.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if *filter == self.active {
                Theme::chip_active()
            } else {
                Theme::chip()
            };
            spans.push(Span::styled(format!(" {} ({}) ", filter.label(), count), style));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// Two side-by-side stat tiles
pub struct StatTiles<'a> {
    pub total_documents: usize,
    pub viewport_target: &'a str,
}

impl StatTiles<'_> {
    fn tile(label: &str, value: String, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(format!(" {} ", label), Theme::muted()));
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(Span::styled(value, Theme::stat_value())).render(inner, buf);
    }
}

impl Widget for StatTiles<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);
        Self::tile("Total Docs", self.total_documents.to_string(), left, buf);
        Self::tile("Viewport Target", self.viewport_target.to_string(), right, buf);
    }
}

/// Help bar showing key bindings
pub struct HelpBar;

impl Widget for HelpBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bindings = [
            ("Type", "Search"),
            ("Tab/S-Tab", "Category"),
            ("↑↓/PgUp/PgDn", "Scroll"),
            ("Esc", "Clear"),
            ("Ctrl+C", "Quit"),
        ];

        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Theme::muted()));
            }
            spans.push(Span::styled(*key, Theme::key()));
            spans.push(Span::styled(format!(" {}", desc), Theme::key_desc()));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// "source • date", or just the source for undated documents
pub fn source_line(doc: &MemoryDocument) -> String {
    match &doc.date {
        Some(date) => format!("{} • {}", doc.source, date),
        None => doc.source.clone(),
    }
}

/// Render one result card to lines for display
/// max_width: terminal width for text wrapping (0 = no wrapping)
pub fn render_result_lines(doc: &MemoryDocument, query: &str, max_width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let content_width = max_width.saturating_sub(2);

    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(doc.title.clone(), Theme::bold()),
        Span::raw("  "),
        Span::styled(format!(" {} ", doc.category.label()), Theme::badge(doc.category)),
    ]));
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(source_line(doc), Theme::muted()),
    ]));

    for wrapped in wrap_text(&snippet(doc, query), content_width, " ") {
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(wrapped, Theme::text()),
        ]));
    }

    lines.push(Line::from(""));
    lines
}

/// Single muted notice line (loading, empty results, load errors)
pub fn notice_line(text: &str, style: Style) -> Line<'static> {
    Line::from(vec![Span::raw(" "), Span::styled(text.to_string(), style)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCategory;

    #[test]
    fn test_wrap_text_by_words() {
        let lines = wrap_text("one two three four", 10, "");
        assert_eq!(lines, vec!["one two", "three four"]);
    }

    #[test]
    fn test_wrap_text_short_and_zero() {
        assert_eq!(wrap_text("short", 20, " "), vec!["short"]);
        assert_eq!(wrap_text("anything", 0, ""), vec!["anything"]);
    }

    #[test]
    fn test_wrap_text_long_word() {
        let lines = wrap_text("abcdefghij", 4, "");
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_text_wide_chars() {
        let lines = wrap_text("\u{4f60}\u{597d}\u{4e16}\u{754c}", 4, "");
        assert_eq!(lines, vec!["\u{4f60}\u{597d}", "\u{4e16}\u{754c}"]);
    }

    #[test]
    fn test_result_card_lines() {
        let doc = MemoryDocument {
            id: "conversation-logs-chat-md".to_string(),
            category: MemoryCategory::ConversationLogs,
            title: "chat.md".to_string(),
            source: "logs/chat.md".to_string(),
            date: Some("2024-01-02".to_string()),
            tags: vec!["conversation".to_string(), "log".to_string()],
            summary: "we talked".to_string(),
            content: "we talked".to_string(),
        };
        let lines = render_result_lines(&doc, "", 80);
        assert_eq!(lines.len(), 4);
        assert_eq!(source_line(&doc), "logs/chat.md • 2024-01-02");
        let text: String = lines[2].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " we talked");
    }
}
