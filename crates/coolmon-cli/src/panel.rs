//! Text panel
//!
//! Terminal rendition of one [`Frame`]: title, time span, dual-unit axis
//! limits, latest value per channel, the newest annotation and the T1 metric
//! report.

use coolmon_core::logbook::Channel;
use coolmon_core::view::{metric_report, Frame, CELSIUS, FAHRENHEIT, PLOTTED_CHANNELS};
use std::fmt::Write as _;

const TIME_FORMAT: &str = "%H:%M:%S";

/// Render `frame` under `title`
pub fn render_panel(frame: &Frame, title: &str) -> String {
    let mut out = String::new();
    let rule = "=".repeat(title.chars().count().max(40));
    let _ = writeln!(out, "{rule}\n{title}\n{rule}");

    if let Some((first, last)) = frame.span {
        let _ = writeln!(
            out,
            "Time ({}): {} - {}",
            first.date(),
            first.format(TIME_FORMAT),
            last.format(TIME_FORMAT)
        );
    }

    if let Some(limits) = frame.limits {
        let f = limits.fahrenheit();
        let _ = writeln!(
            out,
            "Temperature ({CELSIUS}): {:.1} .. {:.1}   ({FAHRENHEIT}): {:.1} .. {:.1}",
            limits.min, limits.max, f.min, f.max
        );
    }

    for channel in PLOTTED_CHANNELS {
        let _ = writeln!(out, "{}", channel_line(frame, channel));
    }

    if let Some(note) = frame.log.other.last() {
        let _ = writeln!(
            out,
            "Last note [{}]: {}",
            note.timestamp.format(TIME_FORMAT),
            note.value
        );
    }

    if let Some(summary) = &frame.t1_summary {
        let _ = writeln!(out, "{}", metric_report(summary, CELSIUS));
    }

    out.truncate(out.trim_end().len());
    out
}

fn channel_line(frame: &Frame, channel: Channel) -> String {
    let series = frame.log.channel(channel);
    match series.last() {
        Some(latest) => format!(
            "{:<3} {:>8.1}{CELSIUS}  ({} samples)",
            channel.name(),
            latest.value,
            series.len()
        ),
        None => format!("{:<3} {:>8}", channel.name(), "--"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use coolmon_core::logbook::ParsedLog;

    fn at(seconds: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 13)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap()
            + TimeDelta::seconds(seconds)
    }

    #[test]
    fn test_render_panel() {
        let mut log = ParsedLog::default();
        log.t1 = [(at(0), -10.0), (at(60), -12.0)].into_iter().collect();
        log.s1 = [(at(30), -40.25)].into_iter().collect();
        log.other = [(at(45), "SET T1 -150".to_string())].into_iter().collect();

        let panel = render_panel(&Frame::new(log), "Log File: log/test.log");
        assert!(panel.contains("Log File: log/test.log"));
        assert!(panel.contains("Time (2025-06-13): 11:00:00 - 11:01:00"));
        assert!(panel.contains("T1     -12.0\u{2103}  (2 samples)"));
        assert!(panel.contains("C1        --"));
        assert!(panel.contains("Last note [11:00:45]: SET T1 -150"));
        assert!(panel.contains("Current Temp: -12.0\u{2103}"));
        assert!(!panel.ends_with('\n'));
    }

    #[test]
    fn test_single_sample_has_no_report() {
        let mut log = ParsedLog::default();
        log.t1 = [(at(0), -10.0)].into_iter().collect();

        let panel = render_panel(&Frame::new(log), "Log File: x.log");
        assert!(panel.contains("T1"));
        assert!(!panel.contains("Current Temp"));
    }
}
