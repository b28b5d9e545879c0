use serde::{Deserialize, Serialize};

/// One styled span inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextRun {
    Plain(String),
    Bold(String),
    Link { text: String, target: String },
}

impl TextRun {
    /// The visible text of the run, without any styling.
    pub fn text(&self) -> &str {
        match self {
            TextRun::Plain(text) | TextRun::Bold(text) => text,
            TextRun::Link { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbedKind {
    Iframe,
    ScriptSrc,
    ScriptInline,
    Tweet,
    Quote,
}

/// A classified unit of article content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentBlock {
    Paragraph {
        runs: Vec<TextRun>,
    },
    Embed {
        kind: EmbedKind,
        payload: String,
        /// `(width, height)` as written in the source markup; only iframes carry them.
        dimensions: Option<(String, String)>,
    },
}

impl ContentBlock {
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        ContentBlock::Paragraph { runs }
    }

    pub fn embed(kind: EmbedKind, payload: impl Into<String>) -> Self {
        ContentBlock::Embed {
            kind,
            payload: payload.into(),
            dimensions: None,
        }
    }

    pub fn iframe(
        src: impl Into<String>,
        width: impl Into<String>,
        height: impl Into<String>,
    ) -> Self {
        ContentBlock::Embed {
            kind: EmbedKind::Iframe,
            payload: src.into(),
            dimensions: Some((width.into(), height.into())),
        }
    }

    /// Concatenated visible text of a paragraph; embeds have none.
    pub fn plain_text(&self) -> String {
        match self {
            ContentBlock::Paragraph { runs } => runs.iter().map(TextRun::text).collect(),
            ContentBlock::Embed { .. } => String::new(),
        }
    }

    /// A block with nothing to show. Parsed blocks are never empty, but
    /// blocks decoded from marker strings can be.
    pub fn is_empty(&self) -> bool {
        match self {
            ContentBlock::Paragraph { runs } => runs.iter().all(|r| r.text().trim().is_empty()),
            ContentBlock::Embed { payload, .. } => payload.trim().is_empty(),
        }
    }

    /// If this paragraph is exactly one bold run, returns its text.
    pub fn as_heading(&self) -> Option<&str> {
        match self {
            ContentBlock::Paragraph { runs } => match runs.as_slice() {
                [TextRun::Bold(text)] => Some(text),
                _ => None,
            },
            ContentBlock::Embed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_concatenates_runs() {
        let block = ContentBlock::paragraph(vec![
            TextRun::Plain("Xem ".into()),
            TextRun::Bold("ngay".into()),
            TextRun::Plain(" tại ".into()),
            TextRun::Link {
                text: "đây".into(),
                target: "/posts/1".into(),
            },
        ]);
        assert_eq!(block.plain_text(), "Xem ngay tại đây");
    }

    #[test]
    fn test_as_heading_single_bold_run() {
        let block = ContentBlock::paragraph(vec![TextRun::Bold("Tiêu đề".into())]);
        assert_eq!(block.as_heading(), Some("Tiêu đề"));
    }

    #[test]
    fn test_as_heading_rejects_mixed_runs() {
        let block = ContentBlock::paragraph(vec![
            TextRun::Bold("Tiêu đề".into()),
            TextRun::Plain(" phụ".into()),
        ]);
        assert_eq!(block.as_heading(), None);
        assert_eq!(ContentBlock::embed(EmbedKind::Quote, "x").as_heading(), None);
    }

    #[test]
    fn test_is_empty() {
        assert!(ContentBlock::paragraph(vec![TextRun::Plain("  ".into())]).is_empty());
        assert!(ContentBlock::embed(EmbedKind::Tweet, "").is_empty());
        assert!(!ContentBlock::embed(EmbedKind::Tweet, "42").is_empty());
    }
}
