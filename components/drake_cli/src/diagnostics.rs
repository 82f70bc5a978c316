//! Caret diagnostics for front end errors

use core_types::DrakeError;
use std::fmt::Write;

/// Renders an error against the source it came from
pub struct DiagnosticPrinter<'a> {
    name: &'a str,
    source: &'a str,
}

impl<'a> DiagnosticPrinter<'a> {
    /// Create a printer for the source called `name`
    pub fn new(name: &'a str, source: &'a str) -> Self {
        Self { name, source }
    }

    /// Render `error` as
    ///
    /// ```text
    /// error: expected expression, found ')'
    ///   --> main.dk:1:5
    ///    |
    ///  1 | x = )
    ///    |     ^
    /// ```
    pub fn render(&self, error: &DrakeError) -> String {
        let position = error.position();
        let line_number = position.line as usize;
        let line = source_line(self.source, line_number.saturating_sub(1));

        let gutter = line_number.to_string().len().max(2);
        let caret_offset = (position.column as usize).saturating_sub(1);
        let padding: String = line
            .chars()
            .take(caret_offset)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "error: {}", error.summary());
        let _ = writeln!(
            out,
            "{:width$}--> {}:{}:{}",
            "",
            self.name,
            position.line,
            position.column,
            width = gutter
        );
        let _ = writeln!(out, "{:width$} |", "", width = gutter);
        let _ = writeln!(out, "{:>width$} | {}", line_number, line, width = gutter);
        let _ = writeln!(out, "{:width$} | {}^", "", padding, width = gutter);
        out
    }

    /// Print the rendered diagnostic to stderr
    pub fn print(&self, error: &DrakeError) {
        eprint!("{}", self.render(error));
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Line `index` (0-based), where `\n`, `\r\n` and a bare `\r` each end a line
/// the way the lexer counts them
fn source_line(source: &str, index: usize) -> &str {
    let mut rest = source;
    for _ in 0..index {
        let Some(at) = rest.find(is_line_break) else {
            return "";
        };
        let width = if rest[at..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[at + width..];
    }
    let end = rest.find(is_line_break).unwrap_or(rest.len());
    &rest[..end]
}
