//! Terminal output helpers.
//!
//! Everything goes to stderr: stdout belongs to the stdio transport and to
//! command output meant for piping.

use console::{Term, style};

pub fn header(msg: &str) {
    let _ = Term::stderr().write_line(&format!("{}", style(msg).bold()));
}

pub fn success(msg: &str) {
    let _ = Term::stderr().write_line(&format!("{} {}", style("✓").green(), msg));
}

pub fn error(msg: &str) {
    let _ = Term::stderr().write_line(&format!("{} {}", style("✗").red(), msg));
}

pub fn error_with_details(msg: &str, details: &str) {
    error(msg);
    let _ = Term::stderr().write_line(&format!("  {}", style(details).dim()));
}
