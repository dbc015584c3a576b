// Copyright 2025 metalstack.cloud Team.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Human duration parsing (`1h30m`, `8h`, `90s`, `2d`) and protojson duration encoding

use crate::shared::error::{CliError, Result};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

fn component_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)(d|h|m|s)").expect("static regex"))
}

/// Parse a duration such as `1h30m`. A bare number is interpreted as seconds.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::invalid_argument("duration must not be empty"));
    }

    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total: u64 = 0;
    let mut consumed = 0;
    for cap in component_regex().captures_iter(input) {
        let whole = cap.get(0).map(|m| m.as_str().len()).unwrap_or(0);
        let value: u64 = cap[1]
            .parse()
            .map_err(|_| CliError::invalid_argument(format!("invalid duration: {}", input)))?;
        let unit = match &cap[2] {
            "d" => 86_400,
            "h" => 3_600,
            "m" => 60,
            _ => 1,
        };
        total = total.saturating_add(value.saturating_mul(unit));
        consumed += whole;
    }

    if consumed != input.len() {
        return Err(CliError::invalid_argument(format!(
            "invalid duration: '{}' (expected e.g. 8h, 1h30m, 90s, 2d)",
            input
        )));
    }

    Ok(Duration::from_secs(total))
}

/// Protojson encoding of `google.protobuf.Duration`.
pub fn to_proto_duration(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}

/// Parse a protojson duration such as `"3600s"` or `"1.5s"`.
pub fn from_proto_duration(value: &str) -> Option<Duration> {
    let secs = value.strip_suffix('s')?;
    let secs = secs.parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Compact rendering like `1d2h`, `45m`, `30s`.
pub fn humanize(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }

    // two most significant components are enough for tables
    let mut out = String::new();
    let mut components = 0;
    for (unit, size) in [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)] {
        if components == 2 {
            break;
        }
        if secs >= size {
            out.push_str(&format!("{}{}", secs / size, unit));
            secs %= size;
            components += 1;
        } else if components > 0 {
            components += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("8h").unwrap(), Duration::from_secs(8 * 3600));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("2d").unwrap(), Duration::from_secs(172_800));
        assert_eq!(parse_duration("120").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("8x").is_err());
        assert!(parse_duration("1h foo").is_err());
        assert!(parse_duration("h").is_err());
    }

    #[test]
    fn test_proto_duration() {
        assert_eq!(to_proto_duration(Duration::from_secs(3600)), "3600s");
        assert_eq!(from_proto_duration("3600s"), Some(Duration::from_secs(3600)));
        assert_eq!(from_proto_duration("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(from_proto_duration("3600"), None);
        assert_eq!(from_proto_duration("-5s"), None);
        assert_eq!(from_proto_duration("1e400s"), None);
        assert_eq!(from_proto_duration("NaNs"), None);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize(Duration::from_secs(0)), "0s");
        assert_eq!(humanize(Duration::from_secs(45)), "45s");
        assert_eq!(humanize(Duration::from_secs(3600 + 120)), "1h2m");
        assert_eq!(humanize(Duration::from_secs(86_400 * 3 + 3600 * 5 + 7)), "3d5h");
    }
}
