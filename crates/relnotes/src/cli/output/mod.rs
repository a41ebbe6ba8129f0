//! Output formatting utilities

use console::{style, Style};

/// Print a success message
pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    eprintln!("{} {}", style("→").blue(), message);
}

/// Style for tags
pub fn tag_style() -> Style {
    Style::new().yellow()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}
