//! Bottom status bar component

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use roster_client::ClientState;

use super::Component;
use crate::tui::action::Action;

/// Activity indicator, time of the last sync or error, and key hints.
#[derive(Debug, Default)]
pub struct StatusBar {
    synced_at: Option<DateTime<Local>>,
    error_at: Option<DateTime<Local>>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record when an operation finished, judged by whether it left an error.
    pub fn operation_finished(&mut self, state: &ClientState, at: DateTime<Local>) {
        if state.last_error.is_empty() {
            self.synced_at = Some(at);
            self.error_at = None;
        } else {
            self.error_at = Some(at);
        }
    }

    fn activity(state: &ClientState) -> (String, Color) {
        if !state.busy.is_idle() {
            (state.busy.label().to_string(), Color::Yellow)
        } else if state.loading {
            ("Refreshing…".to_string(), Color::Yellow)
        } else {
            ("Ready".to_string(), Color::Green)
        }
    }
}

impl Component for StatusBar {
    fn handle_key_event(&mut self, _key: KeyEvent) -> Option<Action> {
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &ClientState) {
        let [left_area, center_area, right_area] = Layout::horizontal([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ])
        .areas(area);

        let (activity, color) = Self::activity(state);
        frame.render_widget(
            Paragraph::new(Span::styled(activity, Style::default().fg(color))),
            left_area,
        );

        let format = |ts: &DateTime<Local>| ts.format("%H:%M:%S").to_string();
        let (when, color) = match (&self.error_at, &self.synced_at) {
            (Some(ts), _) => (format!("Failed at {}", format(ts)), Color::Red),
            (None, Some(ts)) => (format!("Synced {}", format(ts)), Color::White),
            (None, None) => ("Not synced".to_string(), Color::DarkGray),
        };
        frame.render_widget(
            Paragraph::new(when)
                .style(Style::default().fg(color))
                .centered(),
            center_area,
        );

        let hints = Paragraph::new("q: Quit  r: Refresh  /: Search  a/u/x: Forms")
            .style(Style::default().fg(Color::DarkGray))
            .right_aligned();
        frame.render_widget(hints, right_area);
    }
}
