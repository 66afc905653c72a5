//! Boot progress estimation and status rendering.
//!
//! Progress is a pure function of elapsed time, the historical average boot
//! time and the current state. Nothing here is stored; a fresh snapshot is
//! computed on every tick.

use std::fmt;
use std::time::Duration;

use crate::domain::ServerState;
use crate::panel::Panel;

/// Number of cells in the rendered loading bar.
pub const BAR_WIDTH: usize = 25;

const FILLED_CELL: char = '█';
const EMPTY_CELL: char = '░';

/// Stateless boot progress calculator.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEstimator;

impl ProgressEstimator {
    /// Percentage of the expected boot that has elapsed.
    ///
    /// Fixed at 100 once the server is ON. Before that the elapsed time is
    /// compared against the historical average. The divisor switches to
    /// `elapsed + 1` as soon as elapsed *reaches* the average, not only once
    /// it exceeds it: a boot landing exactly on the average reads just under
    /// 100% instead of a false 100%, and an empty history (average 0) never
    /// divides by zero.
    pub fn percentage(elapsed: Duration, average: Option<f64>, state: ServerState) -> f64 {
        if state == ServerState::On {
            return 100.0;
        }
        let elapsed = elapsed.as_secs_f64();
        let average = average.unwrap_or(0.0);
        let effective = if elapsed >= average {
            elapsed + 1.0
        } else {
            average
        };
        if effective <= 0.0 {
            return 0.0;
        }
        elapsed * 100.0 / effective
    }

    /// Render a fixed-width bar with `floor(percentage / 4)` filled cells.
    pub fn render_bar(percentage: f64) -> String {
        let filled = if percentage.is_finite() && percentage > 0.0 {
            ((percentage / 4.0).floor() as usize).min(BAR_WIDTH)
        } else {
            0
        };
        let mut bar = String::with_capacity(BAR_WIDTH * FILLED_CELL.len_utf8());
        bar.extend(std::iter::repeat_n(FILLED_CELL, filled));
        bar.extend(std::iter::repeat_n(EMPTY_CELL, BAR_WIDTH - filled));
        bar
    }

    /// Build a full snapshot for one tick.
    pub fn estimate(
        elapsed: Duration,
        average: Option<f64>,
        state: ServerState,
    ) -> ProgressSnapshot {
        let percentage = Self::percentage(elapsed, average, state);
        ProgressSnapshot {
            state,
            elapsed,
            average,
            percentage,
            bar: Self::render_bar(percentage),
            access_point: None,
        }
    }
}

/// Format seconds as `Ns` below a minute, `Mm Ss` otherwise.
pub fn format_duration(duration: Duration) -> String {
    format_seconds(duration.as_secs_f64())
}

/// Same as [`format_duration`] for a raw seconds value.
pub fn format_seconds(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    if seconds < 60.0 {
        format!("{}s", seconds as u64)
    } else {
        let whole = seconds as u64;
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// One rendered progress tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub state: ServerState,
    pub elapsed: Duration,
    /// Historical average in seconds, `None` on the first boot.
    pub average: Option<f64>,
    /// 0..=100 while booting, exactly 100 when ON.
    pub percentage: f64,
    pub bar: String,
    /// Shown once the server is ON.
    pub access_point: Option<String>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn with_access_point(mut self, access_point: impl Into<String>) -> Self {
        self.access_point = Some(access_point.into());
        self
    }

    pub fn is_online(&self) -> bool {
        self.state == ServerState::On
    }

    /// Framed status text for this snapshot.
    pub fn panel(&self) -> Panel {
        let average = self.average.map_or_else(
            || "First time boot. No previous data to work with.".to_string(),
            format_seconds,
        );
        let title = if self.is_online() {
            "Server is Online"
        } else {
            "Server is Booting up"
        };
        let gauge = if self.is_online() {
            format!("{} │ 100%", self.bar)
        } else {
            format!("{} │ {:.2}%", self.bar, self.percentage)
        };
        let panel = Panel::new(title)
            .row(format!("Average Boot time: {average}"))
            .row(format!("Elapsed Time: {}", format_duration(self.elapsed)))
            .row(gauge);
        match (&self.access_point, self.is_online()) {
            (Some(access), true) => panel.row(format!("Server is online at: {access}")),
            _ => panel,
        }
    }
}

/// Why a boot watch ended without the server coming online.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootFailure {
    /// Output closed before the readiness marker.
    Crashed,
    /// The boot deadline passed; the process is still running.
    TimedOut,
    /// The server left the boot path some other way (killed, stopped).
    Abandoned,
}

/// Stage of an operator stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopStage {
    /// Stop command written to the server.
    Requested,
    /// Waiting for the shutdown marker.
    Waiting { attempt: u32, max_attempts: u32 },
    /// Shutdown finished; `forced` when confirmation never arrived.
    Off {
        archive: Option<String>,
        forced: bool,
    },
}

/// Update pushed to a [`crate::ports::ProgressSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    Boot(ProgressSnapshot),
    BootFailed {
        reason: BootFailure,
        elapsed: Duration,
    },
    Stop(StopStage),
}

impl ProgressUpdate {
    /// Framed status text for this update.
    pub fn panel(&self) -> Panel {
        match self {
            Self::Boot(snapshot) => snapshot.panel(),
            Self::BootFailed { reason, elapsed } => {
                let row = match reason {
                    BootFailure::Crashed => "The server exited before it finished booting.",
                    BootFailure::TimedOut => {
                        "The server did not come online in time. It is still running; use [kill] to end it."
                    }
                    BootFailure::Abandoned => "The boot was interrupted.",
                };
                Panel::new("Server Boot Failed")
                    .row(format!("Elapsed Time: {}", format_duration(*elapsed)))
                    .row(row)
            }
            Self::Stop(stage) => {
                let panel = Panel::new("Server is Shutting down").row("Stopping server");
                match stage {
                    StopStage::Requested => panel,
                    StopStage::Waiting {
                        attempt,
                        max_attempts,
                    } => panel.row(format!(
                        "Waiting for shutdown confirmation ({attempt}/{max_attempts})"
                    )),
                    StopStage::Off { archive, forced } => {
                        let panel = if *forced {
                            panel.row("Shutdown was not confirmed, process was terminated")
                        } else {
                            panel.row("Ending Process")
                        };
                        match archive {
                            Some(name) => panel.row(format!(
                                "Server is off. You can find this session's logs at: {name}"
                            )),
                            None => panel.row("Server is off."),
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.panel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_zero_elapsed_is_zero_percent() {
        let pct = ProgressEstimator::percentage(Duration::ZERO, Some(110.0), ServerState::Starting);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_zero_elapsed_without_history() {
        let pct = ProgressEstimator::percentage(Duration::ZERO, None, ServerState::Starting);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_online_is_always_full() {
        for elapsed in [0, 1, 59, 10_000] {
            let pct = ProgressEstimator::percentage(secs(elapsed), Some(110.0), ServerState::On);
            assert_eq!(pct, 100.0);
        }
    }

    #[test]
    fn test_overdue_boot_stays_below_full() {
        for elapsed in [110, 111, 500, 100_000] {
            let pct =
                ProgressEstimator::percentage(secs(elapsed), Some(110.0), ServerState::Starting);
            assert!(pct < 100.0, "elapsed {elapsed} gave {pct}");
        }
    }

    #[test]
    fn test_exactly_at_average_is_not_complete() {
        let pct = ProgressEstimator::percentage(secs(110), Some(110.0), ServerState::Starting);
        assert!((pct - 110.0 * 100.0 / 111.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_boot_never_completes_early() {
        let pct = ProgressEstimator::percentage(secs(45), None, ServerState::Starting);
        assert!((pct - 45.0 * 100.0 / 46.0).abs() < 1e-9);
    }

    #[test]
    fn test_history_scenario_at_sixty_seconds() {
        // history [100, 120] averages 110
        let snapshot = ProgressEstimator::estimate(secs(60), Some(110.0), ServerState::Starting);
        assert!((snapshot.percentage - 54.545_454).abs() < 1e-3);
        assert_eq!(snapshot.bar.chars().filter(|c| *c == FILLED_CELL).count(), 13);
    }

    #[test]
    fn test_bar_is_clamped() {
        let bar = ProgressEstimator::render_bar(180.0);
        assert_eq!(bar.chars().count(), BAR_WIDTH);
        assert!(bar.chars().all(|c| c == FILLED_CELL));

        let empty = ProgressEstimator::render_bar(3.9);
        assert!(empty.chars().all(|c| c == EMPTY_CELL));

        let nan = ProgressEstimator::render_bar(f64::NAN);
        assert_eq!(nan.chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(59_900)), "59s");
        assert_eq!(format_duration(secs(60)), "1m 0s");
        assert_eq!(format_duration(secs(115)), "1m 55s");
        assert_eq!(format_duration(secs(3_725)), "62m 5s");
    }

    #[test]
    fn test_online_panel_shows_access_point() {
        let text = ProgressEstimator::estimate(secs(115), Some(110.0), ServerState::On)
            .with_access_point("203.0.113.7:25565")
            .panel()
            .to_string();
        assert!(text.contains("Server is Online"));
        assert!(text.contains("│ 100%"));
        assert!(text.contains("Server is online at: 203.0.113.7:25565"));
    }

    #[test]
    fn test_booting_panel_hides_access_point() {
        let text = ProgressEstimator::estimate(secs(5), None, ServerState::Starting)
            .with_access_point("203.0.113.7:25565")
            .panel()
            .to_string();
        assert!(text.contains("First time boot"));
        assert!(!text.contains("203.0.113.7"));
    }

    #[test]
    fn test_stop_panel_names_archive() {
        let update = ProgressUpdate::Stop(StopStage::Off {
            archive: Some("01-02-2025_10-00-00.log".into()),
            forced: false,
        });
        let text = update.to_string();
        assert!(text.contains("Ending Process"));
        assert!(text.ends_with("logs at: 01-02-2025_10-00-00.log"));
    }
}
