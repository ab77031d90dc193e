//! TUI application state and event loop.
//!
//! Design: the controller's worker thread does the polling; the UI loop
//! only redraws from snapshots and translates keys into controller calls.
//! A slow or failed fetch never blocks a frame — the snapshot simply
//! still holds the previous data.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use verdant_core::{INTERVAL_PRESETS, PollController};

/// Cadence bounds reachable with the +/- keys.
const FASTEST_INTERVAL: Duration = Duration::from_secs(1);
const SLOWEST_INTERVAL: Duration = Duration::from_secs(60);

pub struct App {
    controller: PollController,
    running: bool,
    paused: bool,
}

impl App {
    pub fn new(controller: PollController) -> Self {
        Self {
            controller,
            running: true,
            paused: false,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        self.controller.start();
        let result = self.run_loop(&mut terminal);
        self.controller.stop();

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            let snapshot = self.controller.snapshot();
            terminal.draw(|f| super::ui::draw(f, &snapshot, self.paused))?;

            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            // Manual fetch works whether or not the schedule is paused.
            KeyCode::Char('f') | KeyCode::Char(' ') => self.controller.poll_once(),
            KeyCode::Char('p') => {
                if self.paused {
                    self.controller.start();
                } else {
                    self.controller.stop();
                }
                self.paused = !self.paused;
            }
            KeyCode::Char('m') => {
                let use_mock = !self.controller.config().use_mock;
                self.controller.set_use_mock(use_mock);
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => {
                let interval = (self.controller.config().poll_interval / 2).max(FASTEST_INTERVAL);
                self.controller.set_interval(interval);
            }
            KeyCode::Char('-') | KeyCode::Char('[') => {
                let interval = (self.controller.config().poll_interval * 2).min(SLOWEST_INTERVAL);
                self.controller.set_interval(interval);
            }
            // Cycle the stock cadences (2 s / 5 s / 10 s).
            KeyCode::Char('i') => {
                let current = self.controller.config().poll_interval;
                let next = match INTERVAL_PRESETS.iter().position(|&p| p == current) {
                    Some(idx) => INTERVAL_PRESETS[(idx + 1) % INTERVAL_PRESETS.len()],
                    None => INTERVAL_PRESETS[0],
                };
                self.controller.set_interval(next);
            }
            _ => {}
        }
    }
}
