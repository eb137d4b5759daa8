//! Custom TUI widgets

use super::app::LogEntry;
use super::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Status of a result line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Ok,
    Warning,
    Error,
    Info,
}

/// A single labelled value shown in the results panel
#[derive(Debug, Clone)]
pub struct ResultLine {
    pub label: String,
    pub value: String,
    pub status: ResultStatus,
}

impl ResultLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>, status: ResultStatus) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            status,
        }
    }

    pub fn ok(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Ok)
    }

    pub fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Warning)
    }

    pub fn error(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Error)
    }

    pub fn info(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Info)
    }
}

/// Widget for displaying the measurement
pub struct ResultsPanel<'a> {
    results: &'a [ResultLine],
    title: &'a str,
    colors: ThemeColors,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(results: &'a [ResultLine], title: &'a str, colors: ThemeColors) -> Self {
        Self {
            results,
            title,
            colors,
        }
    }

    fn status_color(&self, status: ResultStatus) -> Color {
        match status {
            ResultStatus::Ok => self.colors.green,
            ResultStatus::Warning => self.colors.yellow,
            ResultStatus::Error => self.colors.red,
            ResultStatus::Info => self.colors.accent,
        }
    }

    fn status_symbol(status: ResultStatus) -> &'static str {
        match status {
            ResultStatus::Ok => "[OK]",
            ResultStatus::Warning => "[!!]",
            ResultStatus::Error => "[XX]",
            ResultStatus::Info => "[--]",
        }
    }
}

impl<'a> Widget for ResultsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.accent));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;
        for result in self.results {
            if y >= inner.y + inner.height {
                break;
            }

            let color = self.status_color(result.status);
            let line = Line::from(vec![
                Span::styled(
                    format!("{} ", Self::status_symbol(result.status)),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("{}: ", result.label),
                    Style::default()
                        .fg(self.colors.fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(&result.value, Style::default().fg(color)),
            ]);

            buf.set_line(inner.x, y, &line, inner.width);
            y += 1;
        }
    }
}

/// Scrolling list of dispatched events, newest first
pub struct EventLog<'a> {
    entries: &'a [LogEntry],
    colors: ThemeColors,
}

impl<'a> EventLog<'a> {
    pub fn new(entries: &'a [LogEntry], colors: ThemeColors) -> Self {
        Self { entries, colors }
    }
}

impl<'a> Widget for EventLog<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Events ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.dim));

        let inner = block.inner(area);
        block.render(area, buf);

        for (row, entry) in self.entries.iter().rev().enumerate() {
            if row as u16 >= inner.height {
                break;
            }
            // Events no listener saw arrived after teardown.
            let style = if entry.listeners == 0 {
                Style::default().fg(self.colors.dim)
            } else {
                Style::default().fg(self.colors.fg)
            };
            let pointer = entry
                .pointer_id
                .map(|id| format!(" #{}", id))
                .unwrap_or_default();
            let text = format!(
                "{:>10.1}ms  {:<14}{}{}  listeners: {}",
                entry.time_stamp,
                entry.kind.name(),
                if entry.cancelable { "" } else { " (passive)" },
                pointer,
                entry.listeners
            );
            buf.set_string(inner.x, inner.y + row as u16, text, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    state: &'a str,
    elapsed: &'a str,
    events: u64,
    message: Option<&'a str>,
    colors: ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a str, elapsed: &'a str, events: u64, colors: ThemeColors) -> Self {
        Self {
            state,
            elapsed,
            events,
            message: None,
            colors,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.colors.bar_bg).fg(self.colors.fg);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        let left = format!(" {} ", self.state);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        if let Some(msg) = self.message {
            let msg_style = bg_style.fg(self.colors.yellow);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        let right = format!(" {} | Events: {} ", self.elapsed, self.events);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}
