use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{error, info};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use super::app::App;
use super::helpers::draw_confirm_dialog;
use crate::nav::Dialogs;

/// Dialog capabilities backed by the live terminal. Confirmation runs its own
/// small input loop and returns only once the user has answered.
pub(crate) struct TerminalDialogs<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    errors: Vec<String>,
}

impl<'a, B: Backend> TerminalDialogs<'a, B> {
    pub(crate) fn new(terminal: &'a mut Terminal<B>) -> Self {
        Self {
            terminal,
            errors: Vec::new(),
        }
    }

    pub(crate) fn into_errors(self) -> Vec<String> {
        self.errors
    }

    fn ask(&mut self, prompt: &str) -> Result<bool> {
        loop {
            self.terminal
                .draw(|frame| draw_confirm_dialog(frame, prompt))
                .context("failed to draw confirmation")?;

            if let Event::Key(key_event) = event::read().context("failed to read event")? {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                match key_event.code {
                    KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(true),
                    KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => return Ok(false),
                    _ => {}
                }
            }
        }
    }
}

impl<B: Backend> Dialogs for TerminalDialogs<'_, B> {
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.ask(prompt) {
            Ok(answer) => {
                info!("confirmation '{prompt}' answered {answer}");
                answer
            }
            Err(err) => {
                error!("confirmation failed, treating as cancelled: {err:#}");
                false
            }
        }
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    let result = event_loop(app, &mut terminal);

    cleanup_terminal(&mut terminal)?;
    result
}

fn event_loop(app: &mut App, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
            continue;
        }
        let Event::Key(key_event) = event::read().context("failed to read event")? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return Ok(());
        }

        let mut dialogs = TerminalDialogs::new(&mut *terminal);
        let exit = app.handle_key(key_event.code, &mut dialogs);
        app.show_errors(dialogs.into_errors());
        if exit {
            return Ok(());
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
