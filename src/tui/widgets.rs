//! Custom TUI widgets

use crate::classify::Category;
use crate::tui::App;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// A category badge
pub struct CategoryBadge {
    category: Category,
}

impl CategoryBadge {
    pub fn new(category: Category) -> Self {
        Self { category }
    }

    pub fn to_span(&self) -> Span<'static> {
        Span::styled(
            format!(" {} {} ", self.category.icon(), self.category.label()),
            Style::default()
                .fg(Color::Black)
                .bg(App::category_color(self.category))
                .add_modifier(Modifier::BOLD),
        )
    }
}

/// A key hint widget for showing keyboard shortcuts
pub struct KeyHints<'a> {
    hints: Vec<(&'a str, &'a str)>,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: Vec<(&'a str, &'a str)>) -> Self {
        Self { hints }
    }

    fn line(&self) -> Line<'a> {
        let spans: Vec<Span> = self
            .hints
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!("[{}]", key),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(" {} ", desc)),
                ]
            })
            .collect();
        Line::from(spans)
    }
}

impl<'a> Widget for KeyHints<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line())
            .style(Style::default().fg(Color::DarkGray))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_badge() {
        let span = CategoryBadge::new(Category::Rune).to_span();
        assert!(span.content.contains("rune"));
        assert_eq!(span.style.bg, Some(Color::Magenta));
    }

    #[test]
    fn test_key_hints_line() {
        let hints = KeyHints::new(vec![("Enter", "open"), ("Esc", "quit")]);
        let text: String = hints
            .line()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "[Enter] open [Esc] quit ");
    }
}
