//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the styled lines; `display_*` functions print
//! them. Colour is applied through `console`, which drops the escape codes
//! automatically when the stream is not a terminal.

use console::style;

use crate::boundary::ReleaseWarning;

const BANNER: &[&str] = &[
    "   JJ          JJ   ",
    "  JJJ          JJC  ",
    "  JCJJ        JJJJ  ",
    " JJJJJJ      UJCJJJ ",
    "}}rxrxrJJJJJJxrrxr}}",
    "}}}{rrxcJJJJzrxr{}}}",
    " }}}}rrxJJCJrrr}}}[ ",
    "   [}}jrnJJxxj}}[   ",
    "      }}rXXx}}      ",
    "        [tj[        ",
];

fn with_detail(line: String, detail: &str) -> String {
    if detail.is_empty() {
        line
    } else {
        format!("{}  {}", line, style(detail).yellow())
    }
}

/// `[>>] message  detail` in blue
pub fn format_info(message: &str, detail: &str) -> String {
    let line = format!(
        "{}{}{} {}",
        style("[").blue().bold(),
        style(">>").bold(),
        style("]").blue().bold(),
        style(message).blue()
    );
    with_detail(line, detail)
}

/// `[√√] message  detail` in green
pub fn format_success(message: &str, detail: &str) -> String {
    let line = format!(
        "{}{}{} {}",
        style("[").green().bold(),
        style("√√").bold(),
        style("]").green().bold(),
        style(message).green()
    );
    with_detail(line, detail)
}

/// `[!!] message  detail` in red
pub fn format_error(message: &str, detail: &str) -> String {
    let line = format!(
        "{}{}{} {}",
        style("[").red().bold(),
        style("!!").bold(),
        style("]").red().bold(),
        style(message).red()
    );
    with_detail(line, detail)
}

/// `[??] message` in yellow
pub fn format_warning(message: &str) -> String {
    format!(
        "{}{}{} {}",
        style("[").yellow().bold(),
        style("??").bold(),
        style("]").yellow().bold(),
        style(message).yellow()
    )
}

/// Indented `~~ label  value` line for step details
pub fn format_detail(label: &str, value: &str) -> String {
    let line = format!(
        "  {} {}",
        style("~~").magenta().bold(),
        style(label).blue()
    );
    with_detail(line, value)
}

/// Bold underlined section header
pub fn format_header(message: &str) -> String {
    style(message).magenta().bold().underlined().to_string()
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message, ""));
}

/// Format and print a success message with the green marker.
pub fn display_success(message: &str, detail: &str) {
    println!("{}", format_success(message, detail));
}

/// Format and print a status message with the blue marker.
pub fn display_status(message: &str) {
    println!("{}", format_info(message, ""));
}

/// Display a release warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{}", format_warning(&warning.to_string()));
}

/// Print a section header surrounded by blank lines.
pub fn display_header(message: &str) {
    println!();
    println!("{}", format_header(message));
    println!();
}

/// Print the startup banner.
pub fn display_banner() {
    println!();
    for line in BANNER {
        println!("\t{}", style(line).color256(166));
    }
    println!();
}
