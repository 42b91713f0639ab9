//! Text helpers shared by the render paths.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Shortens `text` to at most `max_width` terminal columns, ending in `…`.
///
/// Width is measured per grapheme column, so CJK titles are cut correctly.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return ELLIPSIS.to_string();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

/// Makes backend or user text safe to paint into the terminal.
///
/// Drops ANSI escape sequences (CSI and OSC forms) and other C0 controls,
/// keeps newlines, and expands tabs to four spaces. Borrows when nothing
/// needs to change.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    let needs_work = s
        .chars()
        .any(|c| c == '\t' || (c.is_control() && c != '\n'));
    if !needs_work {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // CSI ends at the first byte in 0x40..=0x7e.
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    // OSC ends at BEL or ST (ESC \).
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' => out.push_str("    "),
            '\n' => out.push('\n'),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_with_ellipsis("旅行", 10), "旅行");
    }

    #[test]
    fn test_truncate_counts_wide_chars() {
        // Each CJK char takes two columns.
        assert_eq!(truncate_with_ellipsis("关于旅行的计划", 7), "关于旅…");
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello…");
        assert_eq!(truncate_with_ellipsis("hello", 1), "…");
    }

    #[test]
    fn test_sanitize_borrows_clean_text() {
        assert!(matches!(
            sanitize_for_display("plain\ntext"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_sanitize_strips_escape_sequences() {
        assert_eq!(sanitize_for_display("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(
            sanitize_for_display("\x1b]0;title\x07after"),
            "after"
        );
        assert_eq!(sanitize_for_display("a\tb\rc"), "a    bc");
    }
}
