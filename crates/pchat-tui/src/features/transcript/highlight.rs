//! Fenced code block coloring with syntect.
//!
//! Syntax and theme sets are loaded once on first use. Unknown languages and
//! unknown theme names degrade to uncolored [`Style::CodeBlock`] spans.

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::debug;

use super::style::{Rgb, Style, StyledSpan};

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

fn theme(name: &str) -> Option<&'static Theme> {
    THEMES
        .themes
        .get(name)
        .or_else(|| THEMES.themes.get(pchat_core::config::Config::DEFAULT_SYNTAX_THEME))
}

fn plain_lines(code: &str) -> Vec<Vec<StyledSpan>> {
    code.lines()
        .map(|line| vec![StyledSpan::new(line, Style::CodeBlock)])
        .collect()
}

/// Colors `code` as `lang`, one span list per source line.
///
/// Returns uncolored lines when the language is missing or unknown.
pub fn highlight_code(code: &str, lang: Option<&str>, theme_name: &str) -> Vec<Vec<StyledSpan>> {
    let Some(lang) = lang.map(str::trim).filter(|l| !l.is_empty()) else {
        return plain_lines(code);
    };
    let Some(syntax) = SYNTAXES.find_syntax_by_token(lang) else {
        return plain_lines(code);
    };
    let Some(theme) = theme(theme_name) else {
        return plain_lines(code);
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut out = Vec::new();
    for line in LinesWithEndings::from(code) {
        let ranges = match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => ranges,
            Err(err) => {
                debug!(%err, lang, "highlighting failed, falling back to plain code");
                return plain_lines(code);
            }
        };
        let spans = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let text = text.trim_end_matches(['\n', '\r']);
                (!text.is_empty()).then(|| {
                    let fg = style.foreground;
                    StyledSpan::new(
                        text,
                        Style::CodeToken(Rgb {
                            r: fg.r,
                            g: fg.g,
                            b: fg.b,
                        }),
                    )
                })
            })
            .collect();
        out.push(spans);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_gets_token_colors() {
        let lines = highlight_code("fn main() {}\n", Some("rust"), "base16-ocean.dark");
        assert_eq!(lines.len(), 1);
        assert!(
            lines[0]
                .iter()
                .any(|s| matches!(s.style, Style::CodeToken(_)))
        );
        let text: String = lines[0].iter().map(|s| s.text.as_str()).collect();
        assert_eq!(text, "fn main() {}");
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let lines = highlight_code("a\nb", Some("no-such-lang"), "base16-ocean.dark");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].style, Style::CodeBlock);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let lines = highlight_code("x = 1\n", Some("py"), "missing-theme");
        assert!(
            lines[0]
                .iter()
                .any(|s| matches!(s.style, Style::CodeToken(_)))
        );
    }
}
