//! `{{ .path }}` templates evaluated against the JSON form of an entity

use crate::shared::error::{CliError, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const NO_VALUE: &str = "<no value>";

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").expect("valid placeholder regex"))
}

fn path_expression() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\.(?:[A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)?$")
            .expect("valid path regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Path(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut last = 0;

        for caps in placeholder().captures_iter(source) {
            let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_text(&mut parts, &source[last..whole.start()])?;

            let expr = expr.as_str();
            if !path_expression().is_match(expr) {
                return Err(CliError::Template(format!(
                    "unsupported expression '{}', expected a field path like .name",
                    expr
                )));
            }
            let segments = expr
                .trim_start_matches('.')
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            parts.push(Part::Path(segments));
            last = whole.end();
        }
        push_text(&mut parts, &source[last..])?;

        Ok(Self { parts })
    }

    pub fn render(&self, value: &Value) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Path(path) => out.push_str(&render_value(lookup(value, path))),
            }
        }
        out
    }
}

fn push_text(parts: &mut Vec<Part>, text: &str) -> Result<()> {
    if text.contains("{{") || text.contains("}}") {
        return Err(CliError::Template(format!("unbalanced braces in '{}'", text)));
    }
    if !text.is_empty() {
        parts.push(Part::Text(text.to_string()));
    }
    Ok(())
}

fn lookup<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NO_VALUE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity() -> Value {
        json!({
            "uuid": "c-1",
            "name": "prod",
            "kubernetes": {"version": "1.30.2"},
            "workers": [{"name": "group-0", "minsize": 1}],
            "status": null,
        })
    }

    #[test]
    fn test_nested_paths_and_indexes() {
        let t = Template::parse("{{ .name }} {{.kubernetes.version}} {{ .workers.0.name }}").unwrap();
        assert_eq!(t.render(&entity()), "prod 1.30.2 group-0");
    }

    #[test]
    fn test_missing_and_null_values() {
        let t = Template::parse("{{ .purpose }}|{{ .status }}|{{ .workers.7.name }}").unwrap();
        assert_eq!(t.render(&entity()), "<no value>|<no value>|<no value>");
    }

    #[test]
    fn test_non_string_values_render_as_json() {
        let t = Template::parse("{{ .workers.0.minsize }} {{ .kubernetes }}").unwrap();
        assert_eq!(t.render(&entity()), r#"1 {"version":"1.30.2"}"#);
    }

    #[test]
    fn test_dot_renders_whole_value() {
        let t = Template::parse("{{ . }}").unwrap();
        assert_eq!(t.render(&json!("x")), "x");
    }

    #[test]
    fn test_invalid_templates() {
        assert!(Template::parse("{{ .name ").is_err());
        assert!(Template::parse("name }}").is_err());
        assert!(Template::parse("{{ range .workers }}").is_err());
    }
}
