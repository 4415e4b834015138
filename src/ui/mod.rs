//! Terminal output: progress bars and colored listings.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};
use std::io::IsTerminal;

use crate::models::Publication;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Progress bar on stderr; hidden when disabled or stderr is not a terminal
pub fn progress_bar(len: usize, message: &str, enabled: bool) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg} {wide_bar:.cyan/blue} {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

fn style(color: bool, style: Style) -> Style {
    if color {
        style
    } else {
        Style::new()
    }
}

/// Print the details of a matched publication to stdout
pub fn print_publication(publication: &Publication) {
    let color = is_terminal();
    let label = style(color, Style::new().dimmed());

    println!();
    println!(
        "{}",
        publication.title.style(style(color, Style::new().bold().cyan()))
    );
    println!("{} {}", "Authors:".style(label), publication.authors);
    println!("{} {}", "DOI:".style(label), publication.doi);
    println!("{} {}", "Date:".style(label), publication.date);
    println!("{} {}", "Abstract:".style(label), publication.r#abstract);
}

/// One-line green success message
pub fn success(message: &str) {
    let color = is_terminal();
    println!(
        "{} {}",
        "✓".style(style(color, Style::new().green().bold())),
        message
    );
}

/// One-line yellow warning message
pub fn warning(message: &str) {
    let color = is_terminal();
    println!(
        "{} {}",
        "!".style(style(color, Style::new().yellow().bold())),
        message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_bar_is_hidden() {
        let pb = progress_bar(10, "Working", false);
        assert!(pb.is_hidden());
        pb.inc(1);
        pb.finish_and_clear();
    }
}
