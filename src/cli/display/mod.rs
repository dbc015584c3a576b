//! Display module for formatted CLI output

pub mod colors;
pub mod format;
pub mod icons;
pub mod printer;
pub mod rows;
pub mod table;
pub mod template;

pub use colors::ColorTheme;
pub use icons::StatusIcon;
pub use printer::{OutputFormat, Printer};
pub use rows::TableRow;
pub use table::{ColorMode, TableRenderer, TableStyle};
pub use template::Template;
