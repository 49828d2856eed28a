use std::io::{self, IsTerminal, Write};

use nu_ansi_term::{Color, Style};

/// Print a non-fatal warning to stderr.
pub fn warn(message: &str) {
    eprintln!("{} {message}", label("warning:", Color::Yellow));
    let _ = io::stderr().flush();
}

/// Print an error to stderr, prefixed with the program name for CLI use.
pub fn report(program: &str, message: &str) {
    eprintln!("{program}: {} {message}", label("error:", Color::Red));
    let _ = io::stderr().flush();
}

/// Style the label when stderr is a terminal; plain text otherwise.
fn label(text: &str, color: Color) -> String {
    if io::stderr().is_terminal() {
        Style::new().fg(color).bold().paint(text).to_string()
    } else {
        text.to_string()
    }
}
