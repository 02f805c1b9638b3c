use std::{
    io::{self, Stdout},
    time::Duration,
};

use aeolus_core::WeatherService;
use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    app::{Action, App},
    theme::Theme,
    ui,
};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Runs the window until the user quits. The terminal is restored even when
/// the loop fails.
pub async fn run<S: WeatherService>(mut app: App<S>, city: Option<String>) -> Result<()> {
    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    let result = event_loop(&mut terminal, &mut app, city).await;
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;
    result
}

async fn event_loop<S: WeatherService>(
    terminal: &mut Term,
    app: &mut App<S>,
    city: Option<String>,
) -> Result<()> {
    draw(terminal, app)?;
    app.start(city).await;

    loop {
        draw(terminal, app)?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => break,
            Action::Search(query) => {
                // Show the loading state before blocking on the round trip.
                draw(terminal, app)?;
                app.search(&query).await;
            }
        }
    }

    Ok(())
}

fn draw<S: WeatherService>(terminal: &mut Term, app: &App<S>) -> Result<()> {
    let state = app.state();
    let theme = Theme::for_mode(state.mode);
    let today = Local::now().date_naive();

    terminal.draw(|f| ui::draw(f, state, &theme, today))?;
    Ok(())
}

fn setup_terminal() -> Result<Term> {
    terminal::enable_raw_mode()?;

    let entered = enter_screen();
    if entered.is_err() {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
    entered
}

fn enter_screen() -> Result<Term> {
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(term: &mut Term) -> Result<()> {
    let mut out = io::stdout();
    execute!(out, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    term.show_cursor()?;
    Ok(())
}
