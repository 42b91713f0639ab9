//! Standalone HTML export of a session transcript.

use std::fmt::Write as _;

use pchat_types::{Message, Session};
use pulldown_cmark::{Options, Parser, html};

/// Banner appended to terminated sessions.
pub const END_BANNER: &str = "本次会话已结束，感谢您的使用";

const STYLE: &str = "body{font-family:sans-serif;max-width:820px;margin:2em auto;color:#222}\
.msg{margin:1em 0;padding:.6em 1em;border-radius:8px}\
.user{background:#e8f0fe;white-space:pre-wrap}\
.assistant{background:#f4f4f4}\
.meta{color:#888;font-size:.8em;margin-top:.4em}\
.banner{text-align:center;color:#a00;margin:2em 0}\
pre{background:#272822;color:#f8f8f2;padding:.8em;overflow-x:auto}";

/// Renders the session as a self-contained HTML page.
///
/// Assistant messages go through Markdown; user messages are escaped and
/// kept verbatim. System messages are skipped.
pub fn render_html(session: &Session, messages: &[Message]) -> String {
    let title = escape_html(session.display_name());
    let ai_name = if session.ai_name.is_empty() {
        "AI助手".to_string()
    } else {
        escape_html(&session.ai_name)
    };

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"zh\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{title}</title>");
    let _ = writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(out, "<h1>{title}</h1>");
    let _ = writeln!(out, "<p class=\"meta\">{ai_name}</p>");

    for message in messages.iter().filter(|m| !m.is_hidden()) {
        let (class, body) = if message.is_assistant() {
            ("assistant", markdown_to_html(&message.content))
        } else {
            ("user", escape_html(&message.content))
        };
        let _ = write!(out, "<div class=\"msg {class}\">{body}");
        if let Some(meta) = message.meta() {
            let _ = write!(out, "<div class=\"meta\">{}</div>", escape_html(meta));
        }
        out.push_str("</div>\n");
    }

    if session.terminated {
        let _ = writeln!(out, "<div class=\"banner\">{END_BANNER}</div>");
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(text, options);
    let mut html_out = String::new();
    html::push_html(&mut html_out, parser);
    html_out
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
