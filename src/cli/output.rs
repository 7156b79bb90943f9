//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print a usage error report to stderr, bullets in red
pub fn report(report: &str) {
    for line in report.lines() {
        match line.strip_prefix("* ") {
            Some(item) => eprintln!("{} {}", "*".red().bold(), item),
            None => eprintln!("{}", line),
        }
    }
}

/// Print help text, block headings in bold
pub fn help(text: &str) {
    for line in text.lines() {
        if line.ends_with(':') && !line.starts_with(' ') {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}
