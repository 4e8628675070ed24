#![allow(clippy::module_inception)]

use std::{fmt::Display, fs, io::ErrorKind, path::Path};

use crate::errors::errors::{Diagnostic, ErrorTip, SourceError};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

/// Line and column (both 1-based) of the first character of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    pub fn start() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Reads a whole source file, mapping I/O failures onto [`SourceError`].
pub fn read_source(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|err| {
        let path = path.to_string_lossy().into_owned();
        match err.kind() {
            ErrorKind::NotFound => SourceError::NotFound { path },
            _ => SourceError::Unreadable { path, source: err },
        }
    })
}

/// Returns the text of the given 1-based line, without its line break.
/// `\r\n`, a lone `\r` and a lone `\n` each end a line, as in the lexer.
pub fn get_line_at_position(source: &str, position: Position) -> Option<&str> {
    let mut rest = source;
    let mut line = 1;

    while !rest.is_empty() {
        let (text, next) = match rest.find(&['\r', '\n'][..]) {
            Some(end) => {
                let break_len = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                (&rest[..end], &rest[end + break_len..])
            }
            None => (rest, ""),
        };

        if line == position.line {
            return Some(text);
        }
        line += 1;
        rest = next;
    }

    None
}

/// Renders a diagnostic with the offending source line and a caret.
pub fn display_error(diagnostic: &Diagnostic, source: &str) -> String {
    /*
        Error: UnexpectedToken (Unexpected token `==`, did you miss a semicolon?)
        -> Main.btm:20:16
           |
        20 | var a = b == c == d;
           | ---------------^
    */

    let error = &diagnostic.error;
    let position = *error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}:{}\n", diagnostic.file, position));

    let Some(line_text) = get_line_at_position(source, position) else {
        return out;
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = (position.column as usize)
        .saturating_sub(removed_whitespace)
        .max(1);

    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}

#[cfg(test)]
mod tests {
    use super::{get_line_at_position, Position};

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nsecond\r\n\nTesting { }\n";

        assert_eq!(
            get_line_at_position(source, Position::new(1, 10)),
            Some("Hello, world!")
        );
        assert_eq!(get_line_at_position(source, Position::new(2, 1)), Some("second"));
        assert_eq!(get_line_at_position(source, Position::new(3, 1)), Some(""));
        assert_eq!(
            get_line_at_position(source, Position::new(4, 8)),
            Some("Testing { }")
        );
        assert_eq!(get_line_at_position(source, Position::new(9, 1)), None);
        assert_eq!(get_line_at_position(source, Position::new(0, 1)), None);

        let source = "a\rb\r\nc";
        assert_eq!(get_line_at_position(source, Position::new(2, 1)), Some("b"));
        assert_eq!(get_line_at_position(source, Position::new(3, 1)), Some("c"));
    }

    #[test]
    fn test_remove_starting_whitespace() {
        let (line, removed) = super::remove_starting_whitespace("    \tx = 1;");
        assert_eq!(line, "x = 1;");
        assert_eq!(removed, 5);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(12, 4).to_string(), "12:4");
        assert_eq!(Position::start(), Position::new(1, 1));
    }
}
