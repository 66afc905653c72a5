//! Terminal progress sink.
//!
//! Boot progress drives an `indicatif` bar; stop stages drive a spinner.
//! Whenever an operation finishes, the bar is cleared and the final panel
//! is printed in its place.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mcctl_core::{
    Panel, ProgressSink, ProgressSnapshot, ProgressUpdate, StopStage, format_duration,
    format_seconds,
};

const BOOT_TEMPLATE: &str = "{spinner:.green} {bar:25.green/white} {percent:>3}% {msg}";
const STOP_TEMPLATE: &str = "{spinner:.yellow} {msg}";

enum Indicator {
    Boot(ProgressBar),
    Stop(ProgressBar),
}

impl Indicator {
    fn clear(self) {
        match self {
            Self::Boot(bar) | Self::Stop(bar) => bar.finish_and_clear(),
        }
    }
}

/// Sink rendering progress on the terminal.
pub struct TerminalSink {
    target: fn() -> ProgressDrawTarget,
    indicator: Mutex<Option<Indicator>>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalSink {
    /// Bars on stdout, panels on stdout.
    pub fn stdout() -> Self {
        Self::with_output(ProgressDrawTarget::stdout, Box::new(io::stdout()))
    }

    /// Custom draw target and panel writer.
    pub fn with_output(target: fn() -> ProgressDrawTarget, out: Box<dyn Write + Send>) -> Self {
        Self {
            target,
            indicator: Mutex::new(None),
            out: Mutex::new(out),
        }
    }

    /// Print a panel, clearing any active bar first.
    pub fn panel(&self, panel: &Panel) {
        self.clear();
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{panel}");
        let _ = out.flush();
    }

    /// Print raw text such as an archive's content.
    pub fn text(&self, text: &str) {
        self.clear();
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = out.write_all(text.as_bytes());
        if !text.ends_with('\n') {
            let _ = out.write_all(b"\n");
        }
        let _ = out.flush();
    }

    /// Remove the active bar or spinner, if any.
    pub fn clear(&self) {
        if let Some(indicator) = self
            .indicator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            indicator.clear();
        }
    }

    fn boot_bar(&self) -> ProgressBar {
        let mut guard = self
            .indicator
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(Indicator::Boot(bar)) = guard.as_ref() {
            return bar.clone();
        }
        if let Some(other) = guard.take() {
            other.clear();
        }
        let bar = ProgressBar::with_draw_target(Some(100), (self.target)());
        if let Ok(style) = ProgressStyle::with_template(BOOT_TEMPLATE) {
            bar.set_style(style.progress_chars("█▓░"));
        }
        *guard = Some(Indicator::Boot(bar.clone()));
        bar
    }

    fn stop_spinner(&self) -> ProgressBar {
        let mut guard = self
            .indicator
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(Indicator::Stop(bar)) = guard.as_ref() {
            return bar.clone();
        }
        if let Some(other) = guard.take() {
            other.clear();
        }
        let bar = ProgressBar::with_draw_target(None, (self.target)());
        if let Ok(style) = ProgressStyle::with_template(STOP_TEMPLATE) {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        *guard = Some(Indicator::Stop(bar.clone()));
        bar
    }

    fn boot_tick(&self, snapshot: &ProgressSnapshot) {
        if snapshot.is_online() {
            self.panel(&snapshot.panel());
            return;
        }
        let bar = self.boot_bar();
        bar.set_position(snapshot.percentage.clamp(0.0, 100.0) as u64);
        let average = snapshot
            .average
            .map_or_else(|| "first boot".to_string(), |avg| format!("avg {}", format_seconds(avg)));
        bar.set_message(format!(
            "booting {} ({average})",
            format_duration(snapshot.elapsed)
        ));
    }
}

impl ProgressSink for TerminalSink {
    fn update(&self, update: &ProgressUpdate) {
        match update {
            ProgressUpdate::Boot(snapshot) => self.boot_tick(snapshot),
            ProgressUpdate::BootFailed { .. } | ProgressUpdate::Stop(StopStage::Off { .. }) => {
                self.panel(&update.panel());
            }
            ProgressUpdate::Stop(StopStage::Requested) => {
                self.stop_spinner().set_message("Stopping server");
            }
            ProgressUpdate::Stop(StopStage::Waiting {
                attempt,
                max_attempts,
            }) => {
                self.stop_spinner().set_message(format!(
                    "Waiting for shutdown confirmation ({attempt}/{max_attempts})"
                ));
            }
        }
    }
}
