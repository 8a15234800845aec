//! Console progress lines.
//!
//! ```text
//! 14:02:11 --- Program execution begun
//! 14:02:12 --- Pop initialised in: 00:00:01, best distance: 39721
//! 14:05:40 --- Gen 37/100 complete in: 00:00:05, best distance: 36502,
//!     est. remaining time: 00:05:15
//! 14:11:03 --- Program complete in: 00:08:52, best distance: 35119
//! ```
//!
//! Generation lines start with `\r` and overwrite each other on a
//! terminal. Write errors are ignored: progress output is best effort.

use std::io::Write;
use std::time::{Duration, Instant};

use time::OffsetDateTime;

use crate::ga::{GenerationReport, SearchObserver, SearchResult};
use crate::models::BestRecord;

/// Formats a duration as `HH:MM:SS`, truncating fractions of a second.
/// Hours are not wrapped at 24.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Local wall-clock time as `HH:MM:SS`; UTC if the offset is unknown.
pub fn wall_clock() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
}

/// Writes progress lines for a search run.
pub struct ProgressReporter<W: Write> {
    out: W,
    started: Instant,
    clock: fn() -> String,
}

impl<W: Write> ProgressReporter<W> {
    /// Creates a reporter stamped with [`wall_clock`].
    pub fn new(out: W) -> Self {
        Self::with_clock(out, wall_clock)
    }

    /// Creates a reporter with a custom timestamp source.
    pub fn with_clock(out: W, clock: fn() -> String) -> Self {
        Self {
            out,
            started: Instant::now(),
            clock,
        }
    }

    /// Prints the start line and resets the run timer.
    pub fn begin(&mut self) {
        self.started = Instant::now();
        let _ = writeln!(self.out, "{} --- Program execution begun", (self.clock)());
    }

    /// Prints the closing line.
    pub fn finish(&mut self, result: &SearchResult) {
        let _ = writeln!(
            self.out,
            "\n{} --- Program complete in: {}, best distance: {}",
            (self.clock)(),
            format_hms(self.started.elapsed()),
            result.best.distance
        );
        let _ = self.out.flush();
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SearchObserver for ProgressReporter<W> {
    fn on_initialized(&mut self, _population: usize, best: &BestRecord) {
        let _ = writeln!(
            self.out,
            "{} --- Pop initialised in: {}, best distance: {}",
            (self.clock)(),
            format_hms(self.started.elapsed()),
            best.distance
        );
    }

    fn on_generation(&mut self, report: &GenerationReport) {
        let _ = write!(
            self.out,
            "\r{} --- Gen {}/{} complete in: {}, best distance: {}, est. remaining time: {}",
            (self.clock)(),
            report.generation,
            report.total,
            format_hms(report.elapsed),
            report.best_distance,
            format_hms(report.estimated_remaining)
        );
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::four_team_schedule;

    fn noon() -> String {
        "12:00:00".to_string()
    }

    fn report(generation: usize) -> GenerationReport {
        GenerationReport {
            generation,
            total: 100,
            best_distance: 4321,
            population_best: 4400,
            accepted_children: 9,
            improved: false,
            elapsed: Duration::from_millis(5_400),
            estimated_remaining: Duration::from_secs(3 * 3600 + 7 * 60 + 9),
        }
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::ZERO), "00:00:00");
        assert_eq!(format_hms(Duration::from_millis(61_999)), "00:01:01");
        assert_eq!(format_hms(Duration::from_secs(3661)), "01:01:01");
        assert_eq!(format_hms(Duration::from_secs(100 * 3600)), "100:00:00");
    }

    #[test]
    fn test_wall_clock_shape() {
        let t = wall_clock();
        assert_eq!(t.len(), 8);
        assert_eq!(t.as_bytes()[2], b':');
        assert_eq!(t.as_bytes()[5], b':');
    }

    #[test]
    fn test_generation_line() {
        let mut reporter = ProgressReporter::with_clock(Vec::new(), noon);
        reporter.on_generation(&report(37));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "\r12:00:00 --- Gen 37/100 complete in: 00:00:05, best distance: 4321, \
             est. remaining time: 03:07:09"
        );
    }

    #[test]
    fn test_full_run_output() {
        let mut reporter = ProgressReporter::with_clock(Vec::new(), noon);
        let best = BestRecord {
            schedule: four_team_schedule(),
            distance: 4500,
        };
        reporter.begin();
        reporter.on_initialized(11, &best);
        reporter.on_generation(&report(1));
        reporter.finish(&SearchResult {
            best,
            history: vec![4321],
            generations: 1,
            improvements: 1,
        });
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "12:00:00 --- Program execution begun");
        assert!(lines[1].starts_with("12:00:00 --- Pop initialised in: 00:00:0"));
        assert!(lines[1].ends_with("best distance: 4500"));
        assert!(lines[2].starts_with("\r12:00:00 --- Gen 1/100"));
        assert!(lines[3].starts_with("12:00:00 --- Program complete in: "));
    }
}
