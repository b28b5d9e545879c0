//! Flat-string encoding of content blocks.
//!
//! Used where a block has to travel as plain text (the `blocks` CLI command,
//! logs, anything that only carries strings). The syntax is fixed:
//!
//! ```text
//! **bold**            [label](target)
//! [EMBED:IFRAME:<src>:<width>:<height>]
//! [EMBED:SCRIPT:<src>]          [EMBED:SCRIPT_CONTENT:<body>]
//! [EMBED:TWITTER:<id>]          [EMBED:QUOTE:<text>]
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::content::parser::{DEFAULT_IFRAME_HEIGHT, DEFAULT_IFRAME_WIDTH};
use crate::domain::{ContentBlock, EmbedKind, TextRun};

const EMBED_PREFIX: &str = "[EMBED:";

static INLINE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*.*?\*\*|\[.*?\]\(.*?\)").expect("INLINE_MARKER regex")
});

static LINK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.*?)\]\((.*?)\)$").expect("LINK_MARKER regex"));

fn embed_tag(kind: EmbedKind) -> &'static str {
    match kind {
        EmbedKind::Iframe => "IFRAME",
        EmbedKind::ScriptSrc => "SCRIPT",
        EmbedKind::ScriptInline => "SCRIPT_CONTENT",
        EmbedKind::Tweet => "TWITTER",
        EmbedKind::Quote => "QUOTE",
    }
}

fn embed_kind(tag: &str) -> Option<EmbedKind> {
    match tag {
        "IFRAME" => Some(EmbedKind::Iframe),
        "SCRIPT" => Some(EmbedKind::ScriptSrc),
        "SCRIPT_CONTENT" => Some(EmbedKind::ScriptInline),
        "TWITTER" => Some(EmbedKind::Tweet),
        "QUOTE" => Some(EmbedKind::Quote),
        _ => None,
    }
}

pub fn encode(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Paragraph { runs } => runs
            .iter()
            .map(|run| match run {
                TextRun::Plain(text) => text.clone(),
                TextRun::Bold(text) => format!("**{}**", text),
                TextRun::Link { text, target } => format!("[{}]({})", text, target),
            })
            .collect(),
        ContentBlock::Embed {
            kind: EmbedKind::Iframe,
            payload,
            dimensions,
        } => {
            let (width, height) = dimensions
                .as_ref()
                .map(|(w, h)| (w.as_str(), h.as_str()))
                .unwrap_or((DEFAULT_IFRAME_WIDTH, DEFAULT_IFRAME_HEIGHT));
            format!("[EMBED:IFRAME:{}:{}:{}]", payload, width, height)
        }
        ContentBlock::Embed { kind, payload, .. } => {
            format!("[EMBED:{}:{}]", embed_tag(*kind), payload)
        }
    }
}

/// Decode one marker string.
///
/// Returns `None` for an embed tag that is not recognized or carries no
/// payload, and for text with nothing visible in it.
pub fn decode(text: &str) -> Option<ContentBlock> {
    if let Some(rest) = text.strip_prefix(EMBED_PREFIX) {
        return decode_embed(rest.strip_suffix(']').unwrap_or(rest));
    }

    let runs = split_inline(text);
    let block = ContentBlock::paragraph(runs);
    (!block.is_empty()).then_some(block)
}

fn decode_embed(body: &str) -> Option<ContentBlock> {
    let (tag, payload) = body.split_once(':')?;
    let kind = embed_kind(tag)?;

    let block = if kind == EmbedKind::Iframe {
        // The source URL has colons of its own, so the dimensions are read
        // from the right and only taken when they look like sizes.
        let mut parts = payload.rsplitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(height), Some(width), Some(src))
                if is_dimension(width) && is_dimension(height) =>
            {
                ContentBlock::iframe(src, width, height)
            }
            _ => ContentBlock::iframe(payload, DEFAULT_IFRAME_WIDTH, DEFAULT_IFRAME_HEIGHT),
        }
    } else {
        ContentBlock::embed(kind, payload)
    };

    (!block.is_empty()).then_some(block)
}

fn is_dimension(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '%')
}

/// Split paragraph text on bold and link markers, keeping their order.
pub fn split_inline(text: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for found in INLINE_MARKER.find_iter(text) {
        if found.start() > last {
            runs.push(TextRun::Plain(text[last..found.start()].to_string()));
        }
        last = found.end();

        let marker = found.as_str();
        if let Some(caps) = LINK_MARKER.captures(marker) {
            runs.push(TextRun::Link {
                text: caps[1].to_string(),
                target: caps[2].to_string(),
            });
        } else {
            let inner = &marker[2..marker.len() - 2];
            if !inner.is_empty() {
                runs.push(TextRun::Bold(inner.to_string()));
            }
        }
    }

    if last < text.len() {
        runs.push(TextRun::Plain(text[last..].to_string()));
    }
    runs
}

pub fn encode_all(blocks: &[ContentBlock]) -> Vec<String> {
    blocks.iter().map(encode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parser::parse;

    #[test]
    fn test_encode_paragraph_markers() {
        let block = ContentBlock::paragraph(vec![
            TextRun::Plain("Đọc ".into()),
            TextRun::Bold("ngay".into()),
            TextRun::Plain(" ".into()),
            TextRun::Link {
                text: "tại đây".into(),
                target: "/posts/3".into(),
            },
        ]);
        assert_eq!(encode(&block), "Đọc **ngay** [tại đây](/posts/3)");
    }

    #[test]
    fn test_encode_embeds() {
        assert_eq!(
            encode(&ContentBlock::iframe("https://youtube.com/embed/x", "100%", "400")),
            "[EMBED:IFRAME:https://youtube.com/embed/x:100%:400]"
        );
        assert_eq!(
            encode(&ContentBlock::embed(EmbedKind::ScriptSrc, "https://a/b.js")),
            "[EMBED:SCRIPT:https://a/b.js]"
        );
        assert_eq!(
            encode(&ContentBlock::embed(EmbedKind::ScriptInline, "run()")),
            "[EMBED:SCRIPT_CONTENT:run()]"
        );
        assert_eq!(
            encode(&ContentBlock::embed(EmbedKind::Tweet, "42")),
            "[EMBED:TWITTER:42]"
        );
        assert_eq!(
            encode(&ContentBlock::embed(EmbedKind::Quote, "Trích dẫn")),
            "[EMBED:QUOTE:Trích dẫn]"
        );
    }

    #[test]
    fn test_iframe_src_with_colons_decodes() {
        let block = decode("[EMBED:IFRAME:http://host:8080/v:560:315]").unwrap();
        assert_eq!(block, ContentBlock::iframe("http://host:8080/v", "560", "315"));
    }

    #[test]
    fn test_iframe_without_dimensions_keeps_whole_src() {
        let block = decode("[EMBED:IFRAME:http://host:8080/v]").unwrap();
        assert_eq!(
            block,
            ContentBlock::iframe("http://host:8080/v", DEFAULT_IFRAME_WIDTH, DEFAULT_IFRAME_HEIGHT)
        );
    }

    #[test]
    fn test_round_trip_through_parser_output() {
        let html = r#"
            <p>Mở đầu <strong>quan trọng</strong> rồi <a href="https://vnexpress.net/a">liên kết</a> cuối.</p>
            <iframe src="https://www.youtube.com/embed/abc" width="560"></iframe>
            <script src="https://platform.twitter.com/widgets.js"></script>
            <script>console.log("x")</script>
            <blockquote data-tweet-id="99">t</blockquote>
            <blockquote>Câu nói hay</blockquote>
        "#;
        let blocks = parse(html);
        assert_eq!(blocks.len(), 6);

        let encoded = encode_all(&blocks);
        let decoded: Vec<ContentBlock> = encoded.iter().filter_map(|l| decode(l)).collect();
        assert_eq!(decoded, blocks);
    }

    #[test]
    fn test_unknown_embed_tag_dropped() {
        assert!(decode("[EMBED:VIDEO:x]").is_none());
        assert!(decode("[EMBED:TWITTER:]").is_none());
    }

    #[test]
    fn test_split_inline_plain_only() {
        assert_eq!(split_inline("chỉ chữ"), vec![TextRun::Plain("chỉ chữ".into())]);
        assert!(decode("   ").is_none());
    }
}
