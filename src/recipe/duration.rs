//! Duration detection in step instructions.
//!
//! Step text like "Bake for 10 minutes or until golden" carries an implicit
//! timer. [`StepDuration::detect`] finds the first such span so a host
//! application can offer one; actual timer scheduling is out of scope here.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

// Matches "2 hours 30 minutes 10 seconds", "45 min", "1 h 20 m", each
// component optional but at least one required (enforced after matching).
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:(\d+)\s*(?:hours?|hrs?|h))?\s*(?:(\d+)\s*(?:minutes?|mins?|m))?\s*(?:(\d+)\s*(?:seconds?|secs?|s))?",
    )
    .expect("duration pattern compiles")
});

/// A duration span detected in step instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDuration {
    /// Hours component.
    pub hours: u32,
    /// Minutes component.
    pub minutes: u32,
    /// Seconds component.
    pub seconds: u32,
    /// The matched text, trimmed.
    pub text: String,
    /// Byte range of the matched text within the input.
    pub range: Range<usize>,
}

impl StepDuration {
    /// Find the first duration mentioned in `text`.
    ///
    /// Returns `None` when no hour/minute/second component is present.
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        for caps in DURATION.captures_iter(text) {
            let hours = component(&caps, 1);
            let minutes = component(&caps, 2);
            let seconds = component(&caps, 3);
            if hours == 0 && minutes == 0 && seconds == 0 {
                // The pattern is all-optional, so empty matches are expected.
                continue;
            }

            let whole = caps.get(0)?;
            let raw = whole.as_str();
            let lead = raw.len() - raw.trim_start().len();
            let trimmed = raw.trim();
            let start = whole.start() + lead;

            return Some(Self {
                hours,
                minutes,
                seconds,
                text: trimmed.to_string(),
                range: start..start + trimmed.len(),
            });
        }
        None
    }

    /// Total duration in seconds.
    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// Compact rendering, e.g. "1h 30m".
    #[must_use]
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.hours > 0 {
            parts.push(format!("{}h", self.hours));
        }
        if self.minutes > 0 {
            parts.push(format!("{}m", self.minutes));
        }
        if self.seconds > 0 {
            parts.push(format!("{}s", self.seconds));
        }
        parts.join(" ")
    }
}

fn component(caps: &Captures<'_>, index: usize) -> u32 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_minutes() {
        let duration = StepDuration::detect("Bake for 10 minutes or until browned").unwrap();
        assert_eq!(duration.minutes, 10);
        assert_eq!(duration.total_seconds(), 600);
        assert_eq!(duration.text, "10 minutes");
    }

    #[test]
    fn test_detect_hours_and_minutes() {
        let duration = StepDuration::detect("Let the dough rise for 1 hour 30 min").unwrap();
        assert_eq!(duration.hours, 1);
        assert_eq!(duration.minutes, 30);
        assert_eq!(duration.total_seconds(), 5400);
    }

    #[test]
    fn test_detect_seconds_only() {
        let duration = StepDuration::detect("Microwave for 90 seconds").unwrap();
        assert_eq!(duration.seconds, 90);
        assert_eq!(duration.total_seconds(), 90);
    }

    #[test]
    fn test_detect_short_forms() {
        let duration = StepDuration::detect("Simmer 2h 15m").unwrap();
        assert_eq!(duration.hours, 2);
        assert_eq!(duration.minutes, 15);
        assert_eq!(duration.total_seconds(), 8100);
    }

    #[test]
    fn test_detect_none_without_duration() {
        assert_eq!(StepDuration::detect("Mix well and set aside"), None);
        assert_eq!(StepDuration::detect(""), None);
    }

    #[test]
    fn test_detect_range_points_at_match() {
        let text = "Cream the butter for 3 minutes until fluffy";
        let duration = StepDuration::detect(text).unwrap();
        assert_eq!(&text[duration.range.clone()], "3 minutes");
    }

    #[test]
    fn test_format() {
        let duration = StepDuration::detect("cook 1 hour 30 minutes").unwrap();
        assert_eq!(duration.format(), "1h 30m");

        let duration = StepDuration::detect("rest 45 sec").unwrap();
        assert_eq!(duration.format(), "45s");
    }

    #[test]
    fn test_detect_first_of_several() {
        let duration = StepDuration::detect("Boil 5 minutes, then rest 10 minutes").unwrap();
        assert_eq!(duration.minutes, 5);
    }
}
