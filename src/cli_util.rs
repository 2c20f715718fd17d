use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Color;

use crate::error::BrainfuckError;

/// Print a fatal condition as `(error): <kind>: <message>`.
///
/// If `program` is `Some("bf")` the line is prefixed with `bf: `. When `source`
/// is non-empty and the error points into it, a caret window follows.
pub fn print_error(program: Option<&str>, source: &str, err: &BrainfuckError) {
    let tag = if io::stderr().is_terminal() {
        Color::Red.bold().paint("(error)").to_string()
    } else {
        "(error)".to_string()
    };
    let head = match program {
        Some(p) => format!("{p}: {tag}: {}: {err}", err.kind()),
        None => format!("{tag}: {}: {err}", err.kind()),
    };

    match err {
        BrainfuckError::StrayLoopEnd { offset } if !source.is_empty() => {
            print_error_with_context(&head, source, *offset);
        }
        _ => {
            eprintln!("{head}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print `prefix` followed by a short window of `code` with a caret under
/// byte offset `pos`.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix}");
    let (window, caret) = context_window(code, pos);
    eprintln!("  {window}");
    eprintln!("  {caret}");
    let _ = io::stderr().flush();
}

/// Window of at most `WINDOW_CHARS` characters either side of byte offset
/// `pos`, restricted to the line containing it, plus the matching caret line.
fn context_window(code: &str, pos: usize) -> (String, String) {
    const WINDOW_CHARS: usize = 32;

    let pos = floor_char_boundary(code, pos.min(code.len()));
    let line_start = code[..pos].rfind('\n').map_or(0, |i| i + 1);
    let line_end = code[pos..].find('\n').map_or(code.len(), |i| pos + i);

    let before: Vec<char> = code[line_start..pos].chars().collect();
    let skip = before.len().saturating_sub(WINDOW_CHARS);
    let shown_before: String = before[skip..].iter().collect();
    let shown_after: String = code[pos..line_end].chars().take(WINDOW_CHARS + 1).collect();

    let caret = format!("{}^", " ".repeat(before.len() - skip));
    (format!("{shown_before}{shown_after}"), caret)
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_points_at_offset() {
        let (window, caret) = context_window("++]--", 2);
        assert_eq!(window, "++]--");
        assert_eq!(caret, "  ^");
    }

    #[test]
    fn window_stays_on_the_offending_line() {
        let code = "+++\n>>]<<\n...";
        let (window, caret) = context_window(code, 6);
        assert_eq!(window, ">>]<<");
        assert_eq!(caret, "  ^");
    }

    #[test]
    fn long_lines_are_clipped_before_the_caret() {
        let code = format!("{}]", "+".repeat(100));
        let (window, caret) = context_window(&code, 100);
        assert_eq!(window.chars().count(), 33);
        assert_eq!(caret.len(), 33);
        assert!(window.ends_with(']'));
    }

    #[test]
    fn multibyte_text_does_not_split_chars() {
        let code = "é ]";
        let (window, caret) = context_window(code, 3);
        assert_eq!(window, "é ]");
        assert_eq!(caret, "  ^");
    }
}
