//! Live search screen: one logical timeline of keystrokes, debounce expiry
//! and fetch completion, multiplexed with `tokio::select!`.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use forecast_core::{ForecastController, ForecastSource, OpenWeatherClient};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::view;

/// What the event loop should do after a keystroke.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
    /// Explicit submit: fetch immediately.
    Fetch,
}

/// Run the interactive screen until Esc or Ctrl-C.
pub async fn run(client: OpenWeatherClient, initial_city: &str) -> Result<()> {
    let mut controller = ForecastController::new(client, initial_city);

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Hide)?;

    let result = event_loop(&mut controller).await;

    // Restore the terminal even when the loop errored.
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;

    result
}

async fn event_loop(controller: &mut ForecastController<OpenWeatherClient>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Keystrokes come from a dedicated reader thread; the loop below is the
    // single place state is mutated.
    std::thread::spawn(move || loop {
        match crossterm::event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    draw(controller, controller.is_loading())?;

    loop {
        let deadline = controller.next_deadline();
        // The sleep future is only polled when a deadline is pending; the
        // fallback instant just keeps it constructible.
        let fallback = Instant::now() + Duration::from_secs(3600);

        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match handle_event(controller, event) {
                    Step::Continue => {}
                    Step::Quit => break,
                    Step::Fetch => {
                        // Show the spinner before the request starts.
                        draw(controller, true)?;
                        controller.fetch_forecast().await;
                    }
                }
            }
            _ = sleep_until(deadline.unwrap_or(fallback)), if deadline.is_some() => {
                draw(controller, true)?;
                controller.on_deadline().await;
            }
        }

        draw(controller, controller.is_loading())?;
    }

    Ok(())
}

fn handle_event<S: ForecastSource>(controller: &mut ForecastController<S>, event: Event) -> Step {
    let Event::Key(key) = event else {
        return Step::Continue;
    };
    if key.kind == KeyEventKind::Release {
        return Step::Continue;
    }

    match key.code {
        KeyCode::Esc => Step::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Step::Quit,
        KeyCode::Enter => Step::Fetch,
        KeyCode::Backspace => {
            let mut query = controller.query().to_string();
            query.pop();
            controller.update_query(query);
            Step::Continue
        }
        KeyCode::Char(c) => {
            let mut query = controller.query().to_string();
            query.push(c);
            controller.update_query(query);
            Step::Continue
        }
        _ => Step::Continue,
    }
}

fn draw(controller: &ForecastController<OpenWeatherClient>, loading: bool) -> Result<()> {
    let text = view::screen_text(controller.query(), loading, controller.entries());

    let mut stdout = io::stdout();
    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    for line in text.lines() {
        queue!(stdout, Print(line), MoveToNextLine(1))?;
    }
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use crossterm::event::KeyEvent;
    use forecast_core::{ClientError, ForecastEntry};

    use super::*;

    struct NullSource;

    #[async_trait]
    impl ForecastSource for NullSource {
        async fn fetch(&self, _city: &str) -> Result<Vec<ForecastEntry>, ClientError> {
            Ok(Vec::new())
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn typing_edits_the_query_without_fetching() {
        let mut controller = ForecastController::new(NullSource, "Be");

        let step = handle_event(&mut controller, key(KeyCode::Char('r')));

        assert_eq!(step, Step::Continue);
        assert_eq!(controller.query(), "Ber");
        assert!(controller.next_deadline().is_some());
    }

    #[tokio::test]
    async fn backspace_drops_the_last_char() {
        let mut controller = ForecastController::new(NullSource, "Ber");

        let step = handle_event(&mut controller, key(KeyCode::Backspace));

        assert_eq!(step, Step::Continue);
        assert_eq!(controller.query(), "Be");
    }

    #[tokio::test]
    async fn enter_requests_a_fetch_without_running_it() {
        let mut controller = ForecastController::new(NullSource, "Berlin");

        // The loop draws a loading frame between this step and the await.
        let step = handle_event(&mut controller, key(KeyCode::Enter));

        assert_eq!(step, Step::Fetch);
        assert!(controller.entries().is_empty());
    }

    #[tokio::test]
    async fn esc_and_ctrl_c_quit() {
        let mut controller = ForecastController::new(NullSource, "Berlin");

        assert_eq!(handle_event(&mut controller, key(KeyCode::Esc)), Step::Quit);

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(handle_event(&mut controller, ctrl_c), Step::Quit);
    }
}
