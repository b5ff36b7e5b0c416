// UI module
// Terminal progress view for a running merge

pub mod progress_view;
pub mod styles;

use anyhow::Result;
use crossterm::event;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Stdout;

use crate::core::{App, AppEvent, EventHandler};
use crate::operations::MergeHandle;

pub use progress_view::render_app;
pub use styles::Styles;

/// Run the progress view until the merge is over and the user quits
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    merge: &mut MergeHandle,
) -> Result<()> {
    let tick_rate = app.config.ui.tick_rate;

    loop {
        // Pull in everything the worker sent since the last frame
        while let Some(merge_event) = merge.try_next_event() {
            app.apply(merge_event);
        }

        terminal.draw(|f| render_app(f, app))?;

        if event::poll(tick_rate)? {
            let app_event = EventHandler::handle(event::read()?);
            handle_event(app, merge, app_event);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Handle an application event
fn handle_event(app: &mut App, merge: &MergeHandle, event: AppEvent) {
    match event {
        AppEvent::Quit => {
            if app.status.is_done() {
                app.quit();
            } else if app.request_cancel() {
                merge.cancel();
            }
        }
        AppEvent::Cancel => {
            if app.request_cancel() {
                merge.cancel();
            }
        }
        AppEvent::ScrollUp(amount) => app.scroll_up(amount),
        AppEvent::ScrollDown(amount) => app.scroll_down(amount),
        AppEvent::FollowTail => app.follow_tail(),
        AppEvent::None => {}
    }
}
