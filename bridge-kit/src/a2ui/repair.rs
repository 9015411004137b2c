//! Repair of malformed JSON from LLM output.
//!
//! Handles the common ways generated JSON goes wrong:
//! - JavaScript-style comments (`//` and `/* */`)
//! - Trailing commas before `]` or `}`
//! - Component lines missing their last `}` or carrying extra ones
//! - Unclosed strings, brackets and braces (token-limit truncation)
//! - An incomplete last element of the top-level array

use std::borrow::Cow;
use std::str::CharIndices;

fn is_valid(json: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(json).is_ok()
}

/// Try to turn `json` into valid JSON.
///
/// Returns the input unchanged when it already parses, the repaired text
/// when one of the passes produced valid JSON, and `None` when nothing did.
pub fn repair_json(json: &str) -> Option<Cow<'_, str>> {
    if is_valid(json) {
        return Some(Cow::Borrowed(json));
    }

    log::warn!("[A2UI repair] JSON is invalid, attempting repair");

    let repaired = strip_trailing_commas(&strip_comments(json));
    if is_valid(&repaired) {
        log::warn!("[A2UI repair] Fixed by stripping comments/trailing commas");
        return Some(Cow::Owned(repaired));
    }

    let balanced = balance_component_lines(&repaired);
    if is_valid(&balanced) {
        log::warn!("[A2UI repair] Fixed by balancing braces on component lines");
        return Some(Cow::Owned(balanced));
    }

    let closed = close_truncated(&repaired);
    if is_valid(&closed) {
        log::warn!(
            "[A2UI repair] Fixed by closing brackets ({} -> {} bytes)",
            json.len(),
            closed.len()
        );
        return Some(Cow::Owned(closed));
    }

    if let Some(truncated) = truncate_to_last_complete_element(&repaired) {
        if is_valid(&truncated) {
            log::warn!(
                "[A2UI repair] Fixed by truncating ({} -> {} bytes)",
                json.len(),
                truncated.len()
            );
            return Some(Cow::Owned(truncated));
        }
    }

    log::warn!("[A2UI repair] Repair failed");
    None
}

/// Walks JSON text and reports, for every char, whether it belongs to a
/// string literal (quotes included).
struct Scan<'a> {
    chars: CharIndices<'a>,
    in_string: bool,
    escaped: bool,
}

fn scan(json: &str) -> Scan<'_> {
    Scan {
        chars: json.char_indices(),
        in_string: false,
        escaped: false,
    }
}

impl Iterator for Scan<'_> {
    type Item = (usize, char, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, ch) = self.chars.next()?;
        let quoted = self.in_string || ch == '"';

        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = false;
            }
        } else if ch == '"' {
            self.in_string = true;
        }

        Some((index, ch, quoted))
    }
}

/// Strip `// line` and `/* block */` comments outside of strings.
fn strip_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            result.push(ch);
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(ch);
            }
            ('/', Some('/')) => {
                // Keep the newline so line structure survives.
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => result.push(ch),
        }
    }
    result
}

/// Drop commas that are followed only by whitespace and then `]` or `}`.
fn strip_trailing_commas(json: &str) -> String {
    let scanned: Vec<(usize, char, bool)> = scan(json).collect();
    let mut result = String::with_capacity(json.len());

    for (i, &(_, ch, quoted)) in scanned.iter().enumerate() {
        if !quoted && ch == ',' {
            let next = scanned[i + 1..]
                .iter()
                .map(|&(_, c, _)| c)
                .find(|c| !c.is_whitespace());
            if matches!(next, Some(']' | '}')) {
                continue;
            }
        }
        result.push(ch);
    }
    result
}

/// Rebalance output written one component per line.
///
/// A component line left open is closed just before the next component
/// line starts. Closers that would drop a component line below its own
/// opening depth are removed, unless they follow a `]` that closes the
/// enclosing list.
fn balance_component_lines(json: &str) -> String {
    let mut result = String::with_capacity(json.len() + 64);
    let mut open = 0usize;

    for (n, line) in json.split('\n').enumerate() {
        if n > 0 {
            result.push('\n');
        }

        if !line.trim_start().starts_with("{\"id\"") {
            if open > 0 {
                open = open.saturating_add_signed(depth_change(line));
            }
            result.push_str(line);
            continue;
        }

        if open > 0 {
            close_open_line(&mut result, open);
        }
        let (fixed, depth) = drop_surplus_closers(line);
        result.push_str(&fixed);
        open = depth;
    }
    result
}

fn depth_change(line: &str) -> isize {
    scan(line)
        .filter(|&(_, _, quoted)| !quoted)
        .map(|(_, ch, _)| match ch {
            '{' | '[' => 1,
            '}' | ']' => -1,
            _ => 0,
        })
        .sum()
}

/// Append `open` closers to the last line of `result`, before its comma.
fn close_open_line(result: &mut String, open: usize) {
    let kept = result.trim_end().len();
    result.truncate(kept);
    let had_comma = result.ends_with(',');
    if had_comma {
        result.pop();
    }
    result.extend(std::iter::repeat_n('}', open));
    if had_comma {
        result.push(',');
    }
    result.push('\n');
}

fn drop_surplus_closers(line: &str) -> (Cow<'_, str>, usize) {
    let mut depth = 0usize;
    let mut list_closed = false;
    let mut surplus = Vec::new();

    for (index, ch, quoted) in scan(line) {
        if quoted {
            continue;
        }
        match ch {
            '{' | '[' => depth += 1,
            '}' | ']' if depth > 0 => depth -= 1,
            ']' => list_closed = true,
            '}' if !list_closed => surplus.push(index),
            _ => {}
        }
    }

    if surplus.is_empty() {
        return (Cow::Borrowed(line), depth);
    }
    log::debug!("[A2UI repair] Dropping {} surplus closer(s) on a component line", surplus.len());
    let fixed = line
        .char_indices()
        .filter(|(index, _)| !surplus.contains(index))
        .map(|(_, ch)| ch)
        .collect();
    (Cow::Owned(fixed), depth)
}

/// Close an unterminated string and every open bracket, dropping a dangling
/// `,` or `:` left by truncation.
fn close_truncated(json: &str) -> String {
    let mut repaired = json.trim_end().trim_end_matches(',').to_string();

    let mut closers = Vec::new();
    let mut scanner = scan(&repaired);
    for (_, ch, quoted) in scanner.by_ref() {
        if quoted {
            continue;
        }
        match ch {
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ']' | '}' => {
                closers.pop();
            }
            _ => {}
        }
    }
    let unterminated = scanner.in_string;

    if unterminated {
        repaired.push('"');
    }

    let trimmed_len = repaired
        .trim_end()
        .trim_end_matches([':', ','])
        .len();
    repaired.truncate(trimmed_len);

    while let Some(closer) = closers.pop() {
        repaired.push(closer);
    }
    repaired
}

/// Cut the text after the last object that closed directly inside the
/// top-level array, then close the array.
fn truncate_to_last_complete_element(json: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut last_complete_end = None;

    for (index, ch, quoted) in scan(json) {
        if quoted {
            continue;
        }
        match ch {
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 1 && ch == '}' {
                    last_complete_end = Some(index);
                }
            }
            _ => {}
        }
    }

    let end = last_complete_end?;
    let mut fixed = json[..=end].to_string();
    fixed.push_str("\n]");
    Some(fixed)
}
