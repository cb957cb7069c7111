//! Terminal progress bar driven by merge percentages.

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 40;

/// Single-line progress bar for a merge run.
#[derive(Debug)]
pub struct ProgressBar {
    percent: f64,
    message: Option<String>,
    start_time: Instant,
    last_update: Option<Instant>,
    update_interval: Duration,
    enabled: bool,
}

impl ProgressBar {
    /// Create a bar that draws only when stdout is a terminal.
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            message: None,
            start_time: Instant::now(),
            last_update: None,
            update_interval: Duration::from_millis(100),
            enabled: io::stdout().is_terminal(),
        }
    }

    /// Create a bar that never draws.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Set the label shown before the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Move the bar to `percent`, redrawing at most every 100ms.
    pub fn set_percent(&mut self, percent: f64) {
        self.percent = percent.clamp(0.0, 100.0);

        let due = self
            .last_update
            .is_none_or(|last| last.elapsed() >= self.update_interval);
        if due || self.percent >= 100.0 {
            self.last_update = Some(Instant::now());
            self.render();
        }
    }

    /// Current value.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Draw the final state and end the line.
    pub fn finish(&mut self) {
        if self.enabled {
            self.render();
            println!();
        }
    }

    /// Erase the bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if self.enabled {
            print!("\r{}", self.line());
            io::stdout().flush().ok();
        }
    }

    fn line(&self) -> String {
        let filled = ((self.percent / 100.0) * BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "=".repeat(filled),
            " ".repeat(BAR_WIDTH.saturating_sub(filled))
        );

        let elapsed = format_duration(self.start_time.elapsed());
        match &self.message {
            Some(msg) => format!("{msg} {bar} {:>3.0}% {elapsed}", self.percent),
            None => format!("{bar} {:>3.0}% {elapsed}", self.percent),
        }
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
