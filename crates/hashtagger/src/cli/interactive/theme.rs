//! Dialoguer theme and banner for the interactive prompt.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// `ColorfulTheme` in magenta, with hashtag-green answers and red errors.
pub fn hashtagger_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("#".to_string()).for_stderr().magenta().bold(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().dim(),
        active_item_prefix: style("›".to_string()).for_stderr().magenta(),
        active_item_style: Style::new().for_stderr().magenta().bold(),
        inactive_item_prefix: style(" ".to_string()).for_stderr(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().dim(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        hint_style: Style::new().for_stderr().dim(),
        ..ColorfulTheme::default()
    }
}

/// Prints the version banner to stderr.
pub fn print_banner() {
    let version_line = format!("Hashtagger v{}", hashtagger_core::VERSION);
    let tagline = "Hashtag suggestions for your posts";

    let inner_width = tagline.chars().count() + 4;

    let top = format!("  ╔{:═<width$}╗", "", width = inner_width);
    let mid1 = format!("  ║{:^width$}║", version_line, width = inner_width);
    let mid2 = format!("  ║{:^width$}║", tagline, width = inner_width);
    let bot = format!("  ╚{:═<width$}╝", "", width = inner_width);

    let frame = Style::new().for_stderr().magenta();

    eprintln!();
    for line in [&top, &mid1, &mid2, &bot] {
        eprintln!("{}", frame.apply_to(line));
    }
    eprintln!();
}
