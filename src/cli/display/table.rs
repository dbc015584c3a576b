//! Table rendering for CLI output

use comfy_table::presets::{ASCII_MARKDOWN, NOTHING};
use comfy_table::{Cell, ContentArrangement, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Borderless columns, for terminals
    Plain,
    /// GitHub flavored markdown
    Markdown,
}

/// Whether status cells are styled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Style only when stdout is a terminal
    #[default]
    Auto,
    Never,
    Always,
}

/// Table renderer for formatted output
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    style: TableStyle,
    color: ColorMode,
}

impl TableRenderer {
    pub fn new(style: TableStyle, color: ColorMode) -> Self {
        Self { style, color }
    }

    /// Render a header and its rows. An empty `rows` yields the header only.
    pub fn render(&self, header: &[&str], rows: Vec<Vec<Cell>>) -> String {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Disabled);

        match self.style {
            TableStyle::Plain => {
                table.load_preset(NOTHING);
            }
            TableStyle::Markdown => {
                table.load_preset(ASCII_MARKDOWN);
            }
        }

        // escape codes have no place in a markdown document
        if self.style == TableStyle::Markdown || self.color == ColorMode::Never {
            table.force_no_tty();
        } else if self.color == ColorMode::Always {
            table.enforce_styling();
        }

        table.set_header(header.iter().map(|h| Cell::new(*h)));
        for row in rows {
            table.add_row(row);
        }

        table.to_string()
    }
}
