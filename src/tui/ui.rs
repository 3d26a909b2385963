//! TUI rendering

use super::app::{App, View};
use super::widgets::{CategoryBadge, KeyHints};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Draw the UI
pub fn draw(f: &mut Frame, app: &App) {
    match app.state.view {
        View::Search => draw_search(f, app),
        View::Detail => draw_detail(f, app),
        View::Help => {
            draw_search(f, app);
            draw_help(f);
        }
    }

    if let Some(ref msg) = app.state.status_message {
        draw_status(f, msg);
    }
}

/// Draw the query box, result list and preview
fn draw_search(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = format!(
        "Search ({} of {} sections, {})",
        app.hits.len(),
        app.session.sections().len(),
        app.session.strategy().name()
    );
    let input = Paragraph::new(Line::from(vec![
        Span::styled("› ", Style::default().fg(Color::Cyan)),
        Span::raw(app.state.query.as_str()),
    ]))
    .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(input, chunks[0]);

    // Cursor after the query text
    let cursor_x = chunks[0].x + 3 + app.state.query.chars().count() as u16;
    f.set_cursor_position((cursor_x.min(chunks[0].right().saturating_sub(2)), chunks[0].y + 1));

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let items: Vec<ListItem> = app
        .results()
        .enumerate()
        .map(|(i, section)| {
            let style = if i == app.state.selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", section.category.icon()),
                    Style::default().fg(App::category_color(section.category)),
                ),
                Span::raw(section.title.as_str()),
            ]))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().title("Results").borders(Borders::ALL));
    let mut list_state = ListState::default().with_selected(
        (!app.hits.is_empty()).then_some(app.state.selected),
    );
    f.render_stateful_widget(list, body[0], &mut list_state);

    draw_preview(f, app, body[1]);

    let hints = KeyHints::new(vec![
        ("↑↓", "select"),
        ("Enter", "open"),
        ("^F", "fuzzy"),
        ("^R", "refresh"),
        ("F1", "help"),
        ("Esc", "clear/quit"),
    ]);
    f.render_widget(hints, chunks[2]);
}

/// Draw the preview of the selected section
fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let Some(section) = app.selected_section() else {
        let empty = Paragraph::new("No sections match.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Preview").borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            CategoryBadge::new(section.category).to_span(),
            Span::raw(" "),
            Span::styled(
                section.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            section.doc_url(&app.docs_base_url),
            Style::default().fg(Color::Blue),
        )),
    ];

    if !section.keywords.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Keywords: ", Style::default().fg(Color::DarkGray)),
            Span::raw(section.keywords.join(", ")),
        ]));
    }
    lines.push(Line::from(""));
    lines.extend(section.body.lines().map(Line::from));

    let preview = Paragraph::new(lines)
        .block(Block::default().title("Preview").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(preview, area);
}

/// Draw the selected section full-screen
fn draw_detail(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let Some(section) = app.selected_section() else {
        return;
    };

    let title = format!(
        "{} {}  (line {})",
        section.category.icon(),
        section.title,
        section.line
    );

    let body = Paragraph::new(section.body.as_str())
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(App::category_color(section.category))),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll, 0));
    f.render_widget(body, chunks[0]);

    let hints = KeyHints::new(vec![("↑↓/jk", "scroll"), ("PgUp/PgDn", "page"), ("Esc", "back")]);
    f.render_widget(hints, chunks[1]);
}

/// Draw help overlay
fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    f.render_widget(Clear, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Typing        Edit the query; results update live"),
        Line::from("Backspace     Delete last character"),
        Line::from("Ctrl+U        Clear the query"),
        Line::from("↑/↓           Move selection"),
        Line::from("Enter         Open section"),
        Line::from("Ctrl+F        Toggle substring/fuzzy ranking"),
        Line::from("Ctrl+R        Refetch the documentation"),
        Line::from("Esc           Clear query, or quit when empty"),
        Line::from("Ctrl+C        Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default().title("Help").borders(Borders::ALL));
    f.render_widget(help, area);
}

/// Draw status bar
fn draw_status(f: &mut Frame, message: &str) {
    let area = Rect {
        x: 0,
        y: f.area().height.saturating_sub(1),
        width: f.area().width,
        height: 1,
    };

    let status =
        Paragraph::new(message).style(Style::default().fg(Color::Yellow).bg(Color::DarkGray));

    f.render_widget(status, area);
}

/// Create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
