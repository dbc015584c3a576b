//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Color of a state string reported by the API (cluster, volume, snapshot).
    pub fn state_color(&self, state: &str) -> TableColor {
        match state.to_ascii_lowercase().as_str() {
            "succeeded" | "ready" | "available" | "healthy" | "true" => self.success,
            "processing" | "pending" | "creating" | "reconciling" | "progressing"
            | "degraded" | "unknown" => self.warning,
            "failed" | "error" | "aborted" | "false" | "unhealthy" => self.error,
            "" => self.muted,
            _ => self.info,
        }
    }

    /// Color for a "done / total" counter such as an operation's progress.
    pub fn ratio_color(&self, ready: u32, total: u32) -> TableColor {
        if total == 0 {
            self.muted
        } else if ready == total {
            self.success
        } else if ready > 0 {
            self.warning
        } else {
            self.error
        }
    }

    pub fn bool_color(&self, value: bool) -> TableColor {
        if value {
            self.success
        } else {
            self.muted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_state_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.state_color("Succeeded"), TableColor::Green);
        assert_eq!(theme.state_color("Processing"), TableColor::Yellow);
        assert_eq!(theme.state_color("Failed"), TableColor::Red);
        assert_eq!(theme.state_color(""), TableColor::DarkGrey);
        assert_eq!(theme.state_color("Attached"), TableColor::Cyan);
    }

    #[test]
    fn test_ratio_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.ratio_color(3, 3), TableColor::Green);
        assert_eq!(theme.ratio_color(2, 3), TableColor::Yellow);
        assert_eq!(theme.ratio_color(0, 3), TableColor::Red);
        assert_eq!(theme.ratio_color(0, 0), TableColor::DarkGrey);
    }
}
