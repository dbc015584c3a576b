//! Small formatting helpers shared by the table rows

use crate::shared::duration::humanize;
use chrono::{DateTime, Utc};

const BYTE_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Binary byte size, e.g. `10 GiB` or `1.5 MiB`.
pub fn bytes(size: u64) -> String {
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        return format!("{} B", size);
    }
    let formatted = format!("{:.1}", value);
    let formatted = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{} {}", formatted, BYTE_UNITS[unit])
}

/// Time elapsed since `at`, e.g. `3d4h`.
pub fn age(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| humanize((Utc::now() - t).to_std().unwrap_or_default()))
        .unwrap_or_default()
}

pub fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default()
}

/// Shorten `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_bytes() {
        assert_eq!(bytes(0), "0 B");
        assert_eq!(bytes(512), "512 B");
        assert_eq!(bytes(1536), "1.5 KiB");
        assert_eq!(bytes(10 * 1024 * 1024 * 1024), "10 GiB");
    }

    #[test]
    fn test_age() {
        assert_eq!(age(None), "");
        let created = Utc::now() - Duration::hours(50);
        assert!(age(Some(created)).starts_with("2d"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a rather long description", 10), "a rathe...");
    }
}
