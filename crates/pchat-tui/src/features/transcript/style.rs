//! Render-agnostic line model for the transcript.
//!
//! Cells and the Markdown renderer produce [`StyledLine`]s with semantic
//! [`Style`]s; only `render.rs` maps them onto ratatui colors.

/// Foreground color picked by the syntax highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Semantic style of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Gutter in front of user messages.
    UserPrefix,
    User,
    /// Gutter in front of assistant messages.
    AssistantPrefix,
    Assistant,
    /// `响应时间: …` and `对话总结` lines under a bubble.
    Meta,
    /// The `正在思考中...` bubble while a reply is pending.
    Placeholder,
    /// Failed sends and other inline errors.
    Error,
    /// End-of-session banner.
    Banner,
    CodeInline,
    /// Code block text with no highlighting.
    CodeBlock,
    CodeFence,
    /// Highlighted code token.
    CodeToken(Rgb),
    Emphasis,
    Strong,
    Strikethrough,
    H1,
    H2,
    H3,
    Link,
    BlockQuote,
    ListBullet,
    ListNumber,
    TableBorder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_span(text: impl Into<String>, style: Style) -> Self {
        Self {
            spans: vec![StyledSpan::new(text, style)],
        }
    }

    /// Concatenated text, for tests and width checks.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}
