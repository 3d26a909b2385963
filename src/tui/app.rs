//! TUI application state and logic

use crate::classify::Category;
use crate::config::AppConfig;
use crate::extract::Section;
use crate::search::{Hit, RankStrategy};
use crate::session::{Provenance, SearchSession};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Current view in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Query box, result list and preview
    Search,
    /// Full-screen section body
    Detail,
    /// Help screen
    Help,
}

/// Application state
pub struct AppState {
    /// Current view
    pub view: View,
    /// Live query text
    pub query: String,
    /// Selected result index
    pub selected: usize,
    /// Scroll offset of the detail view
    pub scroll: u16,
    /// Status message
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Search,
            query: String::new(),
            selected: 0,
            scroll: 0,
            status_message: None,
        }
    }
}

/// Main TUI application
pub struct App {
    /// Loaded search session
    pub session: SearchSession,
    /// Base URL for section links
    pub docs_base_url: String,
    /// Strategy that Ctrl+F switches to from substring ranking
    pub fuzzy: RankStrategy,
    /// Application state
    pub state: AppState,
    /// Ranked results for the current query
    pub hits: Vec<Hit>,
}

impl App {
    /// Create an app over a loaded session
    pub fn new(session: SearchSession, config: &AppConfig, query: &str) -> Self {
        let mut app = Self {
            session,
            docs_base_url: config.docs_base_url.clone(),
            fuzzy: config.fuzzy_strategy(),
            state: AppState {
                query: query.to_string(),
                ..AppState::default()
            },
            hits: Vec::new(),
        };

        if let Some(report) = app.session.last_load() {
            if report.provenance == Provenance::Stale {
                app.state.status_message =
                    Some(format!("Offline: showing cached copy of {}", report.origin));
            }
        }

        app.rerank();
        app
    }

    /// Handle a key event; returns true when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match self.state.view {
            View::Search => self.handle_search_key(key),
            View::Detail => self.handle_detail_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    /// Handle keys in search view
    fn handle_search_key(&mut self, key: KeyEvent) -> Result<bool> {
        // A status message lasts until the next key press
        self.state.status_message = None;

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => self.refresh()?,
            (KeyModifiers::CONTROL, KeyCode::Char('f')) => self.toggle_strategy(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                self.state.query.clear();
                self.rerank();
            }
            (_, KeyCode::Esc) => {
                if self.state.query.is_empty() {
                    return Ok(true);
                }
                self.state.query.clear();
                self.rerank();
            }
            (_, KeyCode::Up) => {
                self.state.selected = self.state.selected.saturating_sub(1);
            }
            (_, KeyCode::Down) => {
                if self.state.selected + 1 < self.hits.len() {
                    self.state.selected += 1;
                }
            }
            (_, KeyCode::Enter) => {
                if !self.hits.is_empty() {
                    self.state.scroll = 0;
                    self.state.view = View::Detail;
                }
            }
            (_, KeyCode::F(1)) => {
                self.state.view = View::Help;
            }
            (_, KeyCode::Backspace) => {
                self.state.query.pop();
                self.rerank();
            }
            (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.query.push(c);
                self.rerank();
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keys in detail view
    fn handle_detail_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => {
                self.state.view = View::Search;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.scroll = self.state.scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.scroll = self.state.scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                self.state.scroll = self.state.scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.state.scroll = self.state.scroll.saturating_add(10);
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keys in help view
    fn handle_help_key(&mut self, _key: KeyEvent) -> Result<bool> {
        self.state.view = View::Search;
        Ok(false)
    }

    /// Re-rank against the current query, keeping the selection in range
    pub fn rerank(&mut self) {
        self.hits = self.session.search(&self.state.query);
        self.state.selected = 0;
    }

    /// Refetch the corpus; failures become a status message
    fn refresh(&mut self) -> Result<()> {
        let result = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(self.session.refresh())
        });

        self.state.status_message = Some(match result {
            Ok(report) => format!("Refreshed: {} sections", report.sections),
            Err(e) => {
                tracing::warn!("Refresh failed: {:#}", e);
                format!("Refresh failed: {}", e)
            }
        });

        self.rerank();
        Ok(())
    }

    fn toggle_strategy(&mut self) {
        let next = match self.session.strategy() {
            RankStrategy::Substring => self.fuzzy,
            RankStrategy::Fuzzy { .. } => RankStrategy::Substring,
        };
        self.session.set_strategy(next);
        self.state.status_message = Some(format!("Ranking: {}", next.name()));
        self.rerank();
    }

    /// Section behind the current selection
    pub fn selected_section(&self) -> Option<&Section> {
        self.hits
            .get(self.state.selected)
            .and_then(|hit| self.session.section(hit))
    }

    /// Sections for the current hits, in rank order
    pub fn results(&self) -> impl Iterator<Item = &Section> {
        self.hits.iter().filter_map(|hit| self.session.section(hit))
    }

    /// Get category color
    pub fn category_color(category: Category) -> ratatui::style::Color {
        use ratatui::style::Color;
        match category {
            Category::Rune => Color::Magenta,
            Category::Directive | Category::Block | Category::Element => Color::LightBlue,
            Category::Module | Category::Api => Color::Cyan,
            Category::Config | Category::Typescript => Color::Blue,
            Category::Migration | Category::Legacy => Color::DarkGray,
            Category::Error => Color::Red,
            Category::Styling => Color::LightMagenta,
            Category::Testing => Color::Green,
            Category::Stores | Category::Context | Category::Lifecycle => Color::Yellow,
            Category::Concept => Color::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::session::SessionOptions;
    use crate::source::FileSource;
    use tempfile::TempDir;

    async fn app(query: &str) -> (App, TempDir) {
        app_with(&AppConfig::default(), query).await
    }

    async fn app_with(config: &AppConfig, query: &str) -> (App, TempDir) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs.md");
        std::fs::write(&path, "# Foo\nHello world\n# Bar\nuse:clickOutside here\n# Baz\nfoo again").unwrap();

        let mut session = SearchSession::new(
            Box::new(MemoryCache::new()),
            Box::new(FileSource::new(&path)),
            SessionOptions {
                strategy: config.rank_strategy(),
                ..SessionOptions::default()
            },
        );
        session.load().await.unwrap();
        (App::new(session, config, query), tmp)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_typing_reranks() {
        let (mut app, _tmp) = app("").await;
        assert_eq!(app.hits.len(), 3);

        for c in "foo".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        let titles: Vec<&str> = app.results().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Foo", "Baz"]);

        app.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.state.query, "fo");
    }

    #[tokio::test]
    async fn test_navigation_and_detail() {
        let (mut app, _tmp) = app("").await;

        app.handle_key(key(KeyCode::Down)).unwrap();
        app.handle_key(key(KeyCode::Down)).unwrap();
        app.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(app.state.selected, 2);
        assert_eq!(app.selected_section().unwrap().title, "Baz");

        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.state.view, View::Detail);
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.state.view, View::Search);
    }

    #[tokio::test]
    async fn test_escape_clears_then_quits() {
        let (mut app, _tmp) = app("bar").await;
        assert_eq!(app.hits.len(), 1);

        assert!(!app.handle_key(key(KeyCode::Esc)).unwrap());
        assert!(app.state.query.is_empty());
        assert!(app.handle_key(key(KeyCode::Esc)).unwrap());
    }

    #[tokio::test]
    async fn test_toggle_strategy() {
        let (mut app, _tmp) = app("").await;
        app.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(app.session.strategy().name(), "fuzzy");
        assert!(app.state.query.is_empty());
        assert_eq!(app.state.status_message.as_deref(), Some("Ranking: fuzzy"));
    }

    #[tokio::test]
    async fn test_toggle_keeps_configured_threshold() {
        let config = AppConfig {
            strategy: crate::config::StrategyKind::Fuzzy,
            fuzzy_threshold: 0.5,
            ..AppConfig::default()
        };
        let (mut app, _tmp) = app_with(&config, "").await;
        let ctrl_f = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL);

        app.handle_key(ctrl_f).unwrap();
        assert_eq!(app.session.strategy(), RankStrategy::Substring);
        app.handle_key(ctrl_f).unwrap();
        assert_eq!(app.session.strategy(), RankStrategy::Fuzzy { threshold: 0.5 });
    }

    #[tokio::test]
    async fn test_status_cleared_by_next_key() {
        let (mut app, _tmp) = app("").await;
        app.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(app.state.status_message.is_some());

        app.handle_key(key(KeyCode::Down)).unwrap();
        assert!(app.state.status_message.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_refresh_sets_status() {
        let (mut app, _tmp) = app("").await;
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(
            app.state.status_message.as_deref(),
            Some("Refreshed: 3 sections")
        );
    }
}
