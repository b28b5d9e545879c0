//! Content blocks → presentation.
//!
//! [`Renderer::render`] never fails. Bad links stay links, bad images become
//! the placeholder, and embed failures are reported per slot by
//! [`embed::EmbedSession`].

pub mod embed;
pub mod image;
pub mod links;
pub mod video;

use crate::content::marker;
use crate::domain::{ContentBlock, EmbedKind, TextRun};

use self::links::{LinkClassifier, LinkTarget};
use self::video::{classify_media_link, youtube_embed_url, MediaLink};

pub const TELEGRAM_PANEL_TITLE: &str = "Nội dung Telegram";

const TWEET_URL_BASE: &str = "https://twitter.com/i/status/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Emphasis(String),
    Link { text: String, target: LinkTarget },
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(text) | Inline::Emphasis(text) => text,
            Inline::Link { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockView {
    Paragraph(Vec<Inline>),
    Video { url: String, embed_url: String },
    Telegram { url: String },
    Frame { src: String, width: String, height: String },
    /// `src` is `None` for inline scripts.
    Script { src: Option<String> },
    Tweet { id: String, url: String },
    Quote(String),
}

impl BlockView {
    /// Visible text, matching [`ContentBlock::plain_text`] for the same block.
    pub fn plain_text(&self) -> String {
        match self {
            BlockView::Paragraph(inlines) => inlines.iter().map(Inline::text).collect(),
            BlockView::Video { url, .. } | BlockView::Telegram { url } => url.clone(),
            _ => String::new(),
        }
    }

    /// Link targets in reading order.
    pub fn links(&self) -> impl Iterator<Item = &LinkTarget> {
        let inlines = match self {
            BlockView::Paragraph(inlines) => inlines.as_slice(),
            _ => &[][..],
        };
        inlines.iter().filter_map(|inline| match inline {
            Inline::Link { target, .. } => Some(target),
            _ => None,
        })
    }
}

pub fn tweet_url(id: &str) -> String {
    format!("{}{}", TWEET_URL_BASE, id)
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    links: LinkClassifier,
}

impl Renderer {
    pub fn new(links: LinkClassifier) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &LinkClassifier {
        &self.links
    }

    pub fn render(&self, block: &ContentBlock) -> BlockView {
        match block {
            ContentBlock::Paragraph { runs } => self.paragraph(runs),
            ContentBlock::Embed {
                kind,
                payload,
                dimensions,
            } => match kind {
                EmbedKind::Iframe => {
                    let (width, height) = dimensions.clone().unwrap_or_else(|| {
                        (
                            crate::content::parser::DEFAULT_IFRAME_WIDTH.to_string(),
                            crate::content::parser::DEFAULT_IFRAME_HEIGHT.to_string(),
                        )
                    });
                    BlockView::Frame {
                        src: payload.clone(),
                        width,
                        height,
                    }
                }
                EmbedKind::ScriptSrc => BlockView::Script {
                    src: Some(payload.clone()),
                },
                EmbedKind::ScriptInline => BlockView::Script { src: None },
                EmbedKind::Tweet => BlockView::Tweet {
                    id: payload.clone(),
                    url: tweet_url(payload),
                },
                EmbedKind::Quote => BlockView::Quote(payload.clone()),
            },
        }
    }

    /// Render a marker-encoded block string. `None` when it decodes to nothing.
    pub fn render_marker(&self, text: &str) -> Option<BlockView> {
        marker::decode(text).map(|block| self.render(&block))
    }

    fn paragraph(&self, runs: &[TextRun]) -> BlockView {
        if let [run] = runs {
            match classify_media_link(run.text()) {
                Some(MediaLink::YouTube { url, video_id }) => {
                    return BlockView::Video {
                        url,
                        embed_url: youtube_embed_url(&video_id),
                    };
                }
                Some(MediaLink::Telegram { url }) => return BlockView::Telegram { url },
                None => {}
            }
        }

        BlockView::Paragraph(
            runs.iter()
                .map(|run| match run {
                    TextRun::Plain(text) => Inline::Text(text.clone()),
                    TextRun::Bold(text) => Inline::Emphasis(text.clone()),
                    TextRun::Link { text, target } => Inline::Link {
                        text: text.clone(),
                        target: self.links.classify(target),
                    },
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parser::parse;

    fn renderer() -> Renderer {
        Renderer::new(LinkClassifier::new("https://tintuc.example.vn"))
    }

    #[test]
    fn test_paragraph_runs_and_link_classes() {
        let blocks = parse(
            r#"<p>Đọc <b>thêm</b> <a href="/posts/5">bài này</a> hoặc <a href="https://vnexpress.net/x">nguồn</a></p>"#,
        );
        let view = renderer().render(&blocks[0]);
        assert_eq!(
            view,
            BlockView::Paragraph(vec![
                Inline::Text("Đọc ".into()),
                Inline::Emphasis("thêm".into()),
                Inline::Text(" ".into()),
                Inline::Link {
                    text: "bài này".into(),
                    target: LinkTarget::Internal {
                        href: "/posts/5".into(),
                        article_id: Some("5".into()),
                    },
                },
                Inline::Text(" hoặc ".into()),
                Inline::Link {
                    text: "nguồn".into(),
                    target: LinkTarget::External("https://vnexpress.net/x".into()),
                },
            ])
        );
        assert_eq!(view.links().count(), 2);
    }

    #[test]
    fn test_plain_text_survives_rendering() {
        let html = r#"
            <p>Một <strong>hai</strong> <a href="/posts/3">ba</a>.</p>
            <p>https://youtu.be/abc123</p>
            <p>https://t.me/kenh/5</p>
            <iframe src="https://x/y"></iframe>
            <blockquote>Trích</blockquote>
            <p>Bốn <b>năm</b></p>
        "#;
        let blocks = parse(html);
        let expected: String = blocks.iter().map(ContentBlock::plain_text).collect();
        let rendered: String = blocks
            .iter()
            .map(|b| renderer().render(b).plain_text())
            .collect();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_media_paragraphs() {
        let r = renderer();
        assert_eq!(
            r.render(&parse("<p>https://www.youtube.com/watch?v=xyz_1</p>")[0]),
            BlockView::Video {
                url: "https://www.youtube.com/watch?v=xyz_1".into(),
                embed_url: "https://www.youtube.com/embed/xyz_1".into(),
            }
        );
        assert_eq!(
            r.render(&parse("<p>t.me/kenh</p>")[0]),
            BlockView::Telegram {
                url: "t.me/kenh".into()
            }
        );
        assert!(matches!(
            r.render(&parse("<p>Xem https://youtu.be/abc</p>")[0]),
            BlockView::Paragraph(_)
        ));
    }

    #[test]
    fn test_embed_views() {
        let r = renderer();
        assert_eq!(
            r.render(&ContentBlock::embed(EmbedKind::Tweet, "42")),
            BlockView::Tweet {
                id: "42".into(),
                url: "https://twitter.com/i/status/42".into(),
            }
        );
        assert_eq!(
            r.render(&ContentBlock::embed(EmbedKind::Iframe, "https://x/y")),
            BlockView::Frame {
                src: "https://x/y".into(),
                width: "100%".into(),
                height: "400".into(),
            }
        );
        assert_eq!(
            r.render(&ContentBlock::embed(EmbedKind::ScriptInline, "a()")),
            BlockView::Script { src: None }
        );
        assert_eq!(
            r.render(&ContentBlock::embed(EmbedKind::Quote, " giữ nguyên ")),
            BlockView::Quote(" giữ nguyên ".into())
        );
    }

    #[test]
    fn test_render_marker_strings() {
        let r = renderer();
        assert_eq!(
            r.render_marker("[EMBED:TWITTER:7]"),
            Some(BlockView::Tweet {
                id: "7".into(),
                url: tweet_url("7"),
            })
        );
        assert_eq!(
            r.render_marker("Xin **chào**"),
            Some(BlockView::Paragraph(vec![
                Inline::Text("Xin ".into()),
                Inline::Emphasis("chào".into()),
            ]))
        );
        assert_eq!(r.render_marker("[EMBED:UNKNOWN:x]"), None);
    }
}
