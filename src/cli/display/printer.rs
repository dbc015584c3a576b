//! Output format selection and rendering of entities

use super::rows::TableRow;
use super::table::{ColorMode, TableRenderer, TableStyle};
use super::template::Template;
use super::ColorTheme;
use crate::shared::error::{CliError, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Wide,
    Markdown,
    Json,
    Yaml,
    Template,
}

/// Renders lists and single entities in the format chosen on the command line.
///
/// Lists default to `table`, single entities (describe, create, update, delete)
/// default to `yaml`.
#[derive(Debug, Clone)]
pub struct Printer {
    format: Option<OutputFormat>,
    template: Option<Template>,
    color: ColorMode,
    theme: ColorTheme,
}

impl Printer {
    pub fn new(
        format: Option<OutputFormat>,
        template: Option<&str>,
        color: ColorMode,
    ) -> Result<Self> {
        let template = template.map(Template::parse).transpose()?;

        let format = match (format, &template) {
            (Some(OutputFormat::Template), None) => {
                return Err(CliError::invalid_argument(
                    "output format template requires --template",
                ))
            }
            (None, Some(_)) => Some(OutputFormat::Template),
            (format, _) => format,
        };

        Ok(Self {
            format,
            template,
            color,
            theme: ColorTheme::default(),
        })
    }

    pub fn list_format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Table)
    }

    pub fn describe_format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Yaml)
    }

    pub fn render_list<T: Serialize + TableRow>(&self, items: &[T]) -> Result<String> {
        self.render(self.list_format(), items)
    }

    pub fn render_describe<T: Serialize + TableRow>(&self, item: &T) -> Result<String> {
        match self.describe_format() {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(item)?),
            format => self.render(format, std::slice::from_ref(item)),
        }
    }

    /// Render a value without table columns; table formats fall back to YAML.
    pub fn render_value<T: Serialize>(&self, item: &T) -> Result<String> {
        match self.describe_format() {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
            OutputFormat::Template => self.render_template(item),
            _ => Ok(serde_yaml::to_string(item)?),
        }
    }

    pub fn print_list<T: Serialize + TableRow>(&self, items: &[T]) -> Result<()> {
        emit(&self.render_list(items)?)
    }

    pub fn print_describe<T: Serialize + TableRow>(&self, item: &T) -> Result<()> {
        emit(&self.render_describe(item)?)
    }

    pub fn print_value<T: Serialize>(&self, item: &T) -> Result<()> {
        emit(&self.render_value(item)?)
    }

    fn render<T: Serialize + TableRow>(&self, format: OutputFormat, items: &[T]) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.render_table(items, false, TableStyle::Plain)),
            OutputFormat::Wide => Ok(self.render_table(items, true, TableStyle::Plain)),
            OutputFormat::Markdown => Ok(self.render_table(items, false, TableStyle::Markdown)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(items)?),
            OutputFormat::Template => {
                let lines = items
                    .iter()
                    .map(|item| self.render_template(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(lines.join("\n"))
            }
        }
    }

    fn render_table<T: TableRow>(&self, items: &[T], wide: bool, style: TableStyle) -> String {
        let rows = items.iter().map(|i| i.row(wide, &self.theme)).collect();
        TableRenderer::new(style, self.color).render(&T::header(wide), rows)
    }

    fn render_template<T: Serialize>(&self, item: &T) -> Result<String> {
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| CliError::invalid_argument("no --template given"))?;
        Ok(template.render(&serde_json::to_value(item)?))
    }
}

fn emit(text: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if text.is_empty() {
        return Ok(());
    }
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::Project;

    fn projects() -> Vec<Project> {
        vec![
            Project {
                uuid: "p-1".to_string(),
                name: "alpha".to_string(),
                tenant: "acme".to_string(),
                ..Default::default()
            },
            Project {
                uuid: "p-2".to_string(),
                name: "beta".to_string(),
                tenant: "acme".to_string(),
                ..Default::default()
            },
        ]
    }

    fn printer(format: Option<OutputFormat>, template: Option<&str>) -> Printer {
        Printer::new(format, template, ColorMode::Never).unwrap()
    }

    #[test]
    fn test_defaults() {
        let p = printer(None, None);
        assert_eq!(p.list_format(), OutputFormat::Table);
        assert_eq!(p.describe_format(), OutputFormat::Yaml);

        let described = p.render_describe(&projects()[0]).unwrap();
        assert!(described.contains("uuid: p-1"));

        let listed = p.render_list(&projects()).unwrap();
        assert!(listed.contains("TENANT"));
        assert!(listed.contains("alpha"));
    }

    #[test]
    fn test_explicit_format_applies_to_describe() {
        let p = printer(Some(OutputFormat::Table), None);
        let described = p.render_describe(&projects()[0]).unwrap();
        assert!(described.contains("NAME"));
        assert!(described.contains("alpha"));
    }

    #[test]
    fn test_empty_lists() {
        let empty: Vec<Project> = vec![];
        let table = printer(None, None).render_list(&empty).unwrap();
        assert_eq!(table.lines().count(), 1);
        assert!(table.contains("ID"));

        let json = printer(Some(OutputFormat::Json), None).render_list(&empty).unwrap();
        assert_eq!(json, "[]");

        let yaml = printer(Some(OutputFormat::Yaml), None).render_list(&empty).unwrap();
        assert_eq!(yaml.trim(), "[]");
    }

    #[test]
    fn test_template_per_entity() {
        let p = printer(None, Some("{{ .uuid }}:{{ .name }}"));
        assert_eq!(p.list_format(), OutputFormat::Template);
        assert_eq!(p.render_list(&projects()).unwrap(), "p-1:alpha\np-2:beta");
    }

    #[test]
    fn test_template_format_requires_template() {
        assert!(Printer::new(Some(OutputFormat::Template), None, ColorMode::Auto).is_err());
        assert!(Printer::new(None, Some("{{ .name"), ColorMode::Auto).is_err());
    }

    #[test]
    fn test_markdown() {
        let out = printer(Some(OutputFormat::Markdown), None)
            .render_list(&projects())
            .unwrap();
        assert!(out.lines().all(|l| l.starts_with('|')));
    }
}
