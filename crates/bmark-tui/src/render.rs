//! Palette overlay rendering.
//!
//! Three content modes, chosen by state: a closed palette renders nothing at
//! all; an open palette with no query and no results shows the placeholder
//! prompt; otherwise the result list renders as a "Bookmarks" group plus the
//! trailing synthetic "Web Search" entry whenever the query is non-empty.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, Row};
use crate::colors;

pub fn ui(f: &mut Frame, app: &App) {
    if !app.open {
        return;
    }

    let area = palette_rect(f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" bmark ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::OUTLINE))
        .style(Style::default().bg(colors::SURFACE).fg(colors::ON_SURFACE));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    render_input(f, app, chunks[0]);
    render_separator(f, chunks[1]);
    render_list(f, app, chunks[2]);
}

/// The overlay rectangle: centered horizontally, upper third of the screen.
#[must_use]
pub fn palette_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(4).min(68);
    let height = area.height.saturating_sub(2).min(17);

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height / 6;
    let height = height.min(area.height.saturating_sub(y - area.y));

    Rect::new(x, y, width, height)
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.input.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(colors::ACCENT)),
            Span::styled(
                "Search bookmarks or type to search the web...",
                Style::default().fg(colors::SUBTEXT),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(colors::ACCENT)),
            Span::styled(app.input.clone(), Style::default().fg(colors::ON_SURFACE)),
            Span::styled("\u{2588}", Style::default().fg(colors::ACCENT)),
        ])
    };

    f.render_widget(Paragraph::new(line), area);
}

fn render_separator(f: &mut Frame, area: Rect) {
    let rule = "\u{2500}".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(rule).style(Style::default().fg(colors::OUTLINE)),
        area,
    );
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    if app.input.is_empty() && app.results.is_empty() {
        let prompt = Paragraph::new("Type to search your bookmarks...")
            .style(Style::default().fg(colors::SUBTEXT))
            .alignment(Alignment::Center);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(1)])
            .split(area);
        f.render_widget(prompt, chunks[1]);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();

    for (i, row) in app.rows().iter().enumerate() {
        match row {
            Row::Bookmark(entry) => {
                if i == 0 {
                    lines.push(group_header("Bookmarks"));
                }
                lines.push(bookmark_line(entry, i == app.selected));
            }
            Row::WebSearch(query) => {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                lines.push(group_header("Web Search"));
                lines.push(web_search_line(query, i == app.selected));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn group_header(label: &str) -> Line<'_> {
    Line::from(Span::styled(
        label,
        Style::default()
            .fg(colors::SUBTEXT)
            .add_modifier(Modifier::BOLD),
    ))
}

fn selection_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .bg(colors::SURFACE_HIGH)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn bookmark_line(entry: &bmark_types::BookmarkEntry, selected: bool) -> Line<'_> {
    let marker = if selected { "\u{258c} " } else { "  " };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(colors::ACCENT)),
        Span::styled(
            entry.title.clone(),
            selection_style(selected).fg(colors::ON_SURFACE),
        ),
        Span::styled(
            format!("  {}", entry.url),
            Style::default().fg(colors::SUBTEXT),
        ),
    ])
}

fn web_search_line(query: &str, selected: bool) -> Line<'_> {
    let marker = if selected { "\u{258c} " } else { "  " };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(colors::WEB_SEARCH)),
        Span::styled(
            format!("Search the web for \"{query}\""),
            selection_style(selected).fg(colors::ON_SURFACE),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmark_types::BookmarkEntry;
    use ratatui::{Terminal, backend::TestBackend};

    fn render_to_text(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn entry(id: &str, title: &str, url: &str) -> BookmarkEntry {
        BookmarkEntry {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_palette_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = palette_rect(area);

        assert!(rect.x >= area.x);
        assert!(rect.y >= area.y);
        assert!(rect.right() <= area.right());
        assert!(rect.bottom() <= area.bottom());
    }

    #[test]
    fn test_palette_rect_survives_tiny_terminal() {
        let rect = palette_rect(Rect::new(0, 0, 5, 2));
        assert!(rect.width <= 5);
        assert!(rect.height <= 2);
    }

    #[test]
    fn test_closed_palette_renders_nothing() {
        let app = App::new();
        let text = render_to_text(&app);
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_open_empty_palette_shows_placeholder() {
        let mut app = App::new();
        app.toggle();

        let text = render_to_text(&app);
        assert!(text.contains("Type to search your bookmarks..."));
        assert!(!text.contains("Search the web"));
    }

    #[test]
    fn test_fetched_bookmarks_render_in_group_without_web_search() {
        let mut app = App::new();
        let spec = app.toggle().unwrap();
        app.apply_outcome(
            spec.seq,
            vec![
                entry("1", "Rust Book", "https://doc.rust-lang.org/book/"),
                entry("2", "crates.io", "https://crates.io"),
                entry("3", "docs.rs", "https://docs.rs"),
            ],
        );

        let text = render_to_text(&app);
        assert!(text.contains("Bookmarks"));
        assert!(text.contains("Rust Book"));
        assert!(text.contains("crates.io"));
        assert!(text.contains("docs.rs"));
        assert!(!text.contains("Search the web for"));
    }

    #[test]
    fn test_query_without_results_renders_only_web_search() {
        let mut app = App::new();
        app.toggle();
        for c in "foo".chars() {
            app.push_char(c);
        }

        let text = render_to_text(&app);
        assert!(text.contains("Search the web for \"foo\""));
        assert!(!text.contains("Bookmarks"));
        assert!(!text.contains("No results"));
    }
}
