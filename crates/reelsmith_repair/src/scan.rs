//! String-aware text scanners behind each repair step.
//!
//! Every scanner tracks whether the current position is inside a JSON string
//! literal, so text inside string values is never rewritten.

/// In-string / escape-pending state of a left-to-right scan.
#[derive(Debug, Default, Clone, Copy)]
struct StringState {
    in_string: bool,
    escape_next: bool,
}

impl StringState {
    /// Advance over `c`. Returns true when `c` belongs to a string literal,
    /// quotes included.
    fn step(&mut self, c: char) -> bool {
        if self.escape_next {
            self.escape_next = false;
            return true;
        }
        if self.in_string {
            match c {
                '\\' => self.escape_next = true,
                '"' => self.in_string = false,
                _ => {}
            }
            return true;
        }
        if c == '"' {
            self.in_string = true;
            return true;
        }
        false
    }
}

/// Truncate to at most `max_chars` characters.
///
/// # Examples
///
/// ```
/// use reelsmith_repair::preview;
///
/// assert_eq!(preview("林默回来了", 2), "林默");
/// assert_eq!(preview("short", 100), "short");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Body of a fenced code block and whether its fences enclosed the whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fenced {
    pub(crate) body: String,
    pub(crate) enclosing: bool,
}

fn skip_language_tag(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_alphanumeric())
}

/// Byte offset of the first fence marker at or after `from` that starts a line.
fn line_start_fence(text: &str, from: usize) -> Option<usize> {
    text[from..]
        .match_indices("```")
        .map(|(i, _)| from + i)
        .find(|&i| {
            text[..i]
                .rsplit('\n')
                .next()
                .is_some_and(|line| line.trim().is_empty())
        })
}

/// Remove a fenced code block's markers.
///
/// A reply wrapped in a fence loses only its outer markers (and the language
/// tag), so backticks inside string values survive. Otherwise the first block
/// whose fences start a line is taken, and a missing closing fence takes
/// everything after the opening one.
pub(crate) fn strip_fences(text: &str) -> Option<Fenced> {
    let text = text.trim();
    let open = if text.starts_with("```") {
        0
    } else {
        line_start_fence(text, 0)?
    };
    let body_start = text.len() - skip_language_tag(&text[open + 3..]).len();

    if open == 0 && text.len() >= body_start + 3 && text.ends_with("```") {
        return Some(Fenced {
            body: text[body_start..text.len() - 3].trim().to_string(),
            enclosing: true,
        });
    }
    let (end, enclosing) = match line_start_fence(text, body_start) {
        Some(end) => (end, false),
        None => (text.len(), open == 0),
    };
    Some(Fenced {
        body: text[body_start..end].trim().to_string(),
        enclosing,
    })
}

fn escaped(c: char) -> String {
    match c {
        '\n' => "n".to_string(),
        '\r' => "r".to_string(),
        '\t' => "t".to_string(),
        other => format!("u{:04x}", other as u32),
    }
}

/// Escape raw control characters that appear inside string literals.
pub(crate) fn escape_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = StringState::default();
    for c in text.chars() {
        if state.in_string && c.is_control() {
            // A backslash already written before a raw newline escapes it.
            if !state.escape_next {
                out.push('\\');
            }
            state.escape_next = false;
            out.push_str(&escaped(c));
            continue;
        }
        state.step(c);
        out.push(c);
    }
    out
}

/// Drop commas that directly precede `}` or `]`.
pub(crate) fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut state = StringState::default();
    for (i, &c) in chars.iter().enumerate() {
        if !state.step(c) && c == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn is_key_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Quote bare identifier keys (`key:` → `"key":`) at object-key position.
pub(crate) fn quote_bare_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut state = StringState::default();
    let mut stack: Vec<char> = Vec::new();
    let mut expecting_key = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if state.step(c) {
            expecting_key = false;
            out.push(c);
            i += 1;
            continue;
        }
        match c {
            '{' => {
                stack.push('{');
                expecting_key = true;
            }
            '[' => {
                stack.push('[');
                expecting_key = false;
            }
            '}' | ']' => {
                stack.pop();
                expecting_key = false;
            }
            ',' => expecting_key = stack.last() == Some(&'{'),
            c if c.is_whitespace() => {}
            c if expecting_key && is_key_start(c) => {
                let end = (i..chars.len())
                    .find(|&j| !is_key_char(chars[j]))
                    .unwrap_or(chars.len());
                let next = (end..chars.len()).find(|&j| !chars[j].is_whitespace());
                expecting_key = false;
                if next.map(|j| chars[j]) == Some(':') {
                    out.push('"');
                    out.extend(&chars[i..end]);
                    out.push('"');
                    i = end;
                    continue;
                }
            }
            _ => expecting_key = false,
        }
        out.push(c);
        i += 1;
    }
    out
}

/// The balanced `{...}` or `[...]` that opens at byte `start`.
pub(crate) fn balanced_from(text: &str, start: usize) -> Option<&str> {
    let mut state = StringState::default();
    let mut depth = 0usize;
    for (offset, c) in text.get(start..)?.char_indices() {
        if state.step(c) {
            continue;
        }
        match c {
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Top-level balanced substrings in order of appearance.
///
/// Scanning stops at the first opener that never closes, so fragments nested
/// inside a truncated document are not reported.
pub(crate) fn balanced_candidates(text: &str) -> Vec<&str> {
    let mut candidates = Vec::new();
    let mut from = 0;
    while let Some(offset) = text[from..].find(['{', '[']) {
        let start = from + offset;
        match balanced_from(text, start) {
            Some(candidate) => {
                candidates.push(candidate);
                from = start + candidate.len();
            }
            None => break,
        }
    }
    candidates
}

/// Append the closers a truncated document is missing.
///
/// Openers are closed in reverse nesting order. An unterminated string is
/// terminated, a dangling comma dropped, and a dangling colon given `null`.
pub(crate) fn close_unbalanced(text: &str) -> String {
    let mut state = StringState::default();
    let mut stack: Vec<char> = Vec::new();
    for c in text.chars() {
        if state.step(c) {
            continue;
        }
        match c {
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' if stack.last() == Some(&c) => {
                stack.pop();
            }
            _ => {}
        }
    }

    let mut out = if state.in_string {
        text.to_string()
    } else {
        text.trim_end().to_string()
    };
    if state.in_string {
        if state.escape_next {
            out.pop();
        }
        out.push('"');
    }
    loop {
        let trimmed_len = out.trim_end().len();
        out.truncate(trimmed_len);
        if out.ends_with(',') {
            out.pop();
        } else if out.ends_with(':') {
            out.push_str(" null");
        } else {
            break;
        }
    }
    out.extend(stack.iter().rev());
    out
}

/// Prefix of `text` up to and including its last closer outside strings.
pub(crate) fn cut_after_last_closer(text: &str) -> Option<&str> {
    let mut state = StringState::default();
    let mut last = None;
    for (i, c) in text.char_indices() {
        if state.step(c) {
            continue;
        }
        if c == '}' || c == ']' {
            last = Some(i + c.len_utf8());
        }
    }
    last.map(|end| &text[..end])
}

/// Byte length of the string literal opening at the start of `text`.
pub(crate) fn string_literal_len(text: &str) -> Option<usize> {
    let mut state = StringState::default();
    for (i, c) in text.char_indices() {
        state.step(c);
        if i > 0 && !state.in_string {
            return Some(i + c.len_utf8());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fences_with_language_tag() {
        let text = "Here:\n```json\n{\"a\": 1}\n```\nDone";
        let fenced = strip_fences(text).unwrap();
        assert_eq!(fenced.body, "{\"a\": 1}");
        assert!(!fenced.enclosing);
    }

    #[test]
    fn unclosed_fence_takes_rest() {
        let fenced = strip_fences("```\n[1, 2]").unwrap();
        assert_eq!(fenced.body, "[1, 2]");
        assert!(fenced.enclosing);
    }

    #[test]
    fn enclosing_fence_keeps_backticks_in_strings() {
        let text = "```json\n{\"visual\": \"sign reads ``` here\", \"b\": 1}\n```";
        assert_eq!(
            strip_fences(text).unwrap().body,
            "{\"visual\": \"sign reads ``` here\", \"b\": 1}"
        );
    }

    #[test]
    fn mid_line_backticks_are_not_fences() {
        assert_eq!(strip_fences(r#"Result: {"visual": "a ``` mark"} done"#), None);
    }

    #[test]
    fn control_chars_only_escaped_inside_strings() {
        let text = "{\n\"a\": \"x\ty\nz\"\n}";
        assert_eq!(escape_control_chars(text), "{\n\"a\": \"x\\ty\\nz\"\n}");
    }

    #[test]
    fn backslash_before_raw_newline_is_reused() {
        let text = "\"a\\\nb\"";
        assert_eq!(escape_control_chars(text), "\"a\\nb\"");
    }

    #[test]
    fn trailing_commas_inside_strings_survive() {
        let text = r#"{"a": "x,}", "b": [1, 2,],}"#;
        assert_eq!(remove_trailing_commas(text), r#"{"a": "x,}", "b": [1, 2]}"#);
    }

    #[test]
    fn bare_keys_quoted_only_at_key_position() {
        let text = r#"{title: "a: b", count: 3, list: [x, y]}"#;
        assert_eq!(
            quote_bare_keys(text),
            r#"{"title": "a: b", "count": 3, "list": [x, y]}"#
        );
    }

    #[test]
    fn bare_cjk_keys_are_quoted() {
        assert_eq!(quote_bare_keys("{标题: 1}"), "{\"标题\": 1}");
    }

    #[test]
    fn balanced_ignores_brackets_in_strings() {
        let text = r#"noise {"a": "}"} tail"#;
        assert_eq!(balanced_candidates(text), vec![r#"{"a": "}"}"#]);
    }

    #[test]
    fn balanced_stops_at_truncated_opener() {
        let text = r#"{"events": [{"id": "E01"}, {"id""#;
        assert!(balanced_candidates(text).is_empty());
    }

    #[test]
    fn close_uses_nesting_order() {
        assert_eq!(close_unbalanced(r#"{"a": [1, {"b": 2"#), r#"{"a": [1, {"b": 2}]}"#);
    }

    #[test]
    fn close_terminates_string_and_drops_comma() {
        assert_eq!(close_unbalanced(r#"["x", "y"#), r#"["x", "y"]"#);
        assert_eq!(close_unbalanced(r#"[1, 2, "#), "[1, 2]");
        assert_eq!(close_unbalanced(r#"{"a":"#), r#"{"a": null}"#);
    }

    #[test]
    fn string_literal_length() {
        assert_eq!(string_literal_len(r#""a\"b", 1"#), Some(6));
        assert_eq!(string_literal_len(r#""open"#), None);
    }
}
