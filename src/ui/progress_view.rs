// Progress View
// Main layout: header, progress gauge, moved-file list and footer

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

use crate::constants::APP_TITLE;
use crate::core::{App, RunStatus};
use super::Styles;

/// Render the entire application
pub fn render_app(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Gauge
            Constraint::Min(0),    // Moved files
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_gauge(f, app, chunks[1]);
    render_moves(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let text = format!(
        "{}: {} folder(s) → {}",
        APP_TITLE,
        app.source_count,
        app.target.display()
    );
    let header = Paragraph::new(text)
        .style(Styles::header())
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_gauge(f: &mut Frame, app: &App, area: Rect) {
    let label = format!("{}% ({})", app.progress.percent(), app.progress.status_text());
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Styles::gauge())
        .ratio(app.progress.ratio())
        .label(label);
    f.render_widget(gauge, area);
}

/// Window of moves to show: `scroll_offset` lines up from the newest
fn visible_range(len: usize, height: usize, scroll_offset: usize) -> (usize, usize) {
    let end = len.saturating_sub(scroll_offset);
    let start = end.saturating_sub(height);
    (start, end)
}

fn render_moves(f: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_range(app.recent_moves.len(), height, app.scroll_offset);

    let items: Vec<ListItem> = app
        .recent_moves
        .range(start..end)
        .map(|record| {
            let destination_style = if record.renamed() {
                Styles::move_renamed()
            } else {
                Styles::move_destination()
            };
            ListItem::new(Line::from(vec![
                Span::styled(record.source.display().to_string(), Styles::move_source()),
                Span::styled(" → ", Styles::arrow()),
                Span::styled(record.destination.display().to_string(), destination_style),
            ]))
        })
        .collect();

    let mut title = format!("Moved files ({})", app.progress.processed);
    if !app.deleted_folders.is_empty() {
        title.push_str(&format!(" | Deleted folders: {}", app.deleted_folders.len()));
    }
    if app.scroll_offset > 0 {
        title.push_str(" | scrolled (End: follow)");
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .title(Span::styled(title, Styles::title())),
    );
    f.render_widget(list, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let keys = match app.status {
        RunStatus::Running => "c/Esc: Cancel | ↑/↓: Scroll | PgUp/PgDn: Scroll | End: Follow",
        RunStatus::Cancelling => "↑/↓: Scroll | PgUp/PgDn: Scroll",
        _ => "q: Quit | ↑/↓: Scroll | PgUp/PgDn: Scroll",
    };

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(app.status_text(), Styles::status(&app.status)),
        Span::styled(format!("  |  {}", keys), Styles::footer()),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AppConfig, MergeConfig, MergeEvent, MergeProgress, MoveRecord};
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    #[test]
    fn test_visible_range() {
        assert_eq!(visible_range(0, 5, 0), (0, 0));
        assert_eq!(visible_range(3, 5, 0), (0, 3));
        assert_eq!(visible_range(20, 5, 0), (15, 20));
        assert_eq!(visible_range(20, 5, 4), (11, 16));
    }

    #[test]
    fn test_render_shows_progress_and_moves() {
        let mut app = App::new(AppConfig::default(), &MergeConfig::new(["/a"], "/out"));
        app.apply(MergeEvent::Progress(MergeProgress::new(1, 2)));
        app.apply(MergeEvent::Moved(MoveRecord {
            source: PathBuf::from("/a/f1.txt"),
            destination: PathBuf::from("/out/f1_1.txt"),
        }));

        let mut terminal = Terminal::new(TestBackend::new(80, 14)).unwrap();
        terminal.draw(|f| render_app(f, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("50% (Processing: 1/2 files)"));
        assert!(text.contains("/out/f1_1.txt"));
        assert!(text.contains("Moved files (1)"));
    }
}
