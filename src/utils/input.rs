//! Line input helpers for the interactive session.

use std::io::{self, BufRead};

/// Sanitize a line typed at the prompt
///
/// Tabs become 4 spaces and other control characters are dropped. Line
/// breaks are kept only when they separate text.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => sanitized.push('\n'),
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized.trim_matches('\n').to_string()
}

/// Reads one sanitized line. `Ok(None)` means end of input.
pub fn read_prompt_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(sanitize_text_input(line.trim_end_matches(['\r', '\n']))))
}
