//! HTML fragment → content blocks.
//!
//! The fragment is read as a flat list of top-level elements. Each element is
//! classified by its tag on its own; anything unrecognized is skipped.

use scraper::{ElementRef, Html};

use crate::domain::{ContentBlock, EmbedKind, TextRun};

pub const DEFAULT_IFRAME_WIDTH: &str = "100%";
pub const DEFAULT_IFRAME_HEIGHT: &str = "400";

/// Attribute carrying a tweet id on embedded `<blockquote>`s.
pub const TWEET_ID_ATTR: &str = "data-tweet-id";

/// Parse an HTML fragment into blocks, in source order.
///
/// Never fails: empty or missing input gives an empty list.
pub fn parse<'a>(html: impl Into<Option<&'a str>>) -> Vec<ContentBlock> {
    let Some(html) = html.into() else {
        return Vec::new();
    };
    if html.trim().is_empty() {
        return Vec::new();
    }

    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .filter_map(classify)
        .collect()
}

fn classify(element: ElementRef<'_>) -> Option<ContentBlock> {
    match element.value().name() {
        "p" => paragraph(element),
        "iframe" => iframe(element),
        "script" => script(element),
        "blockquote" => blockquote(element),
        other => {
            tracing::trace!("Skipping top-level <{}>", other);
            None
        }
    }
}

fn paragraph(element: ElementRef<'_>) -> Option<ContentBlock> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut runs = vec![TextRun::Plain(text.to_string())];

    for bold in descendants_named(element, &["strong", "b"]) {
        let bold_text = bold.text().collect::<String>();
        if !bold_text.is_empty() {
            mark_first_occurrence(&mut runs, &bold_text, TextRun::Bold);
        }
    }

    // A link whose text is already bold overlaps a marked run and loses its
    // target.
    for link in descendants_named(element, &["a"]) {
        let link_text = link.text().collect::<String>();
        let href = link.value().attr("href").unwrap_or("");
        if !link_text.is_empty() && !href.is_empty() {
            mark_first_occurrence(&mut runs, &link_text, |t| TextRun::Link {
                text: t,
                target: href.to_string(),
            });
        }
    }

    Some(ContentBlock::paragraph(runs))
}

fn iframe(element: ElementRef<'_>) -> Option<ContentBlock> {
    let src = non_empty_attr(element, "src")?;
    let width = non_empty_attr(element, "width").unwrap_or(DEFAULT_IFRAME_WIDTH);
    let height = non_empty_attr(element, "height").unwrap_or(DEFAULT_IFRAME_HEIGHT);
    Some(ContentBlock::iframe(src, width, height))
}

fn script(element: ElementRef<'_>) -> Option<ContentBlock> {
    if let Some(src) = non_empty_attr(element, "src") {
        return Some(ContentBlock::embed(EmbedKind::ScriptSrc, src));
    }

    let body = element.text().collect::<String>();
    if body.trim().is_empty() {
        return None;
    }
    Some(ContentBlock::embed(EmbedKind::ScriptInline, body))
}

fn blockquote(element: ElementRef<'_>) -> Option<ContentBlock> {
    if let Some(tweet_id) = non_empty_attr(element, TWEET_ID_ATTR) {
        return Some(ContentBlock::embed(EmbedKind::Tweet, tweet_id));
    }

    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(ContentBlock::embed(EmbedKind::Quote, text))
}

fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.is_empty())
}

fn descendants_named<'a>(
    element: ElementRef<'a>,
    names: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |e| names.contains(&e.value().name()))
}

/// Mark the first occurrence of `phrase` in the paragraph's text.
///
/// Only the first occurrence in the whole paragraph is considered. If that
/// occurrence overlaps a run that is already marked, nothing changes, so a
/// phrase repeated later in the paragraph stays plain.
fn mark_first_occurrence(
    runs: &mut Vec<TextRun>,
    phrase: &str,
    make: impl FnOnce(String) -> TextRun,
) {
    let full: String = runs.iter().map(TextRun::text).collect();
    let Some(pos) = full.find(phrase) else {
        return;
    };
    let end = pos + phrase.len();

    let mut start = 0;
    for index in 0..runs.len() {
        let len = runs[index].text().len();
        if pos < start + len {
            let TextRun::Plain(text) = &runs[index] else {
                return;
            };
            if end > start + len {
                return;
            }

            let local = pos - start;
            let before = &text[..local];
            let after = &text[local + phrase.len()..];

            let mut replacement = Vec::with_capacity(3);
            if !before.is_empty() {
                replacement.push(TextRun::Plain(before.to_string()));
            }
            replacement.push(make(phrase.to_string()));
            if !after.is_empty() {
                replacement.push(TextRun::Plain(after.to_string()));
            }
            runs.splice(index..=index, replacement);
            return;
        }
        start += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> TextRun {
        TextRun::Plain(s.into())
    }

    fn bold(s: &str) -> TextRun {
        TextRun::Bold(s.into())
    }

    fn link(text: &str, target: &str) -> TextRun {
        TextRun::Link {
            text: text.into(),
            target: target.into(),
        }
    }

    fn runs_of(block: &ContentBlock) -> &[TextRun] {
        match block {
            ContentBlock::Paragraph { runs } => runs,
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_and_missing_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n ").is_empty());
        assert!(parse(None).is_empty());
    }

    #[test]
    fn test_plain_paragraph() {
        let blocks = parse("<p>  Hello  </p>");
        assert_eq!(blocks, vec![ContentBlock::paragraph(vec![plain("Hello")])]);
    }

    #[test]
    fn test_bold_and_links_in_order() {
        let blocks = parse(
            r#"<p>Giá <strong>Bitcoin</strong> tăng, xem <a href="/posts/9">chi tiết</a> và <b>phân tích</b> tại <a href="https://example.com/x">đây</a>.</p>"#,
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            runs_of(&blocks[0]),
            &[
                plain("Giá "),
                bold("Bitcoin"),
                plain(" tăng, xem "),
                link("chi tiết", "/posts/9"),
                plain(" và "),
                bold("phân tích"),
                plain(" tại "),
                link("đây", "https://example.com/x"),
                plain("."),
            ]
        );
        assert_eq!(
            blocks[0].plain_text(),
            "Giá Bitcoin tăng, xem chi tiết và phân tích tại đây."
        );
    }

    #[test]
    fn test_repeated_bold_phrase_marked_once() {
        let blocks = parse("<p><strong>AI</strong> và <strong>AI</strong> nữa</p>");
        assert_eq!(runs_of(&blocks[0]), &[bold("AI"), plain(" và AI nữa")]);
    }

    #[test]
    fn test_bold_phrase_matches_first_textual_occurrence() {
        // The earlier plain "AI" is the one that gets marked.
        let blocks = parse("<p>AI mới: <strong>AI</strong></p>");
        assert_eq!(runs_of(&blocks[0]), &[bold("AI"), plain(" mới: AI")]);
    }

    #[test]
    fn test_bold_inside_link_keeps_bold_only() {
        let blocks = parse(r#"<p><a href="/posts/7"><strong>Tin</strong></a> mới</p>"#);
        assert_eq!(runs_of(&blocks[0]), &[bold("Tin"), plain(" mới")]);
    }

    #[test]
    fn test_link_without_href_stays_plain() {
        let blocks = parse("<p>Xem <a>ở đây</a></p>");
        assert_eq!(runs_of(&blocks[0]), &[plain("Xem ở đây")]);
    }

    #[test]
    fn test_empty_paragraph_emits_nothing() {
        assert!(parse("<p>   </p><p><strong></strong></p>").is_empty());
    }

    #[test]
    fn test_iframe_defaults() {
        let blocks = parse(r#"<iframe src="https://x/y"></iframe>"#);
        assert_eq!(blocks, vec![ContentBlock::iframe("https://x/y", "100%", "400")]);
    }

    #[test]
    fn test_iframe_explicit_dimensions() {
        let blocks = parse(r#"<iframe src="https://x/y" width="560" height="315"></iframe>"#);
        assert_eq!(blocks, vec![ContentBlock::iframe("https://x/y", "560", "315")]);
    }

    #[test]
    fn test_iframe_without_src_emits_nothing() {
        assert!(parse(r#"<iframe src=""></iframe>"#).is_empty());
        assert!(parse("<iframe></iframe>").is_empty());
    }

    #[test]
    fn test_script_src_and_inline() {
        let blocks = parse(
            r#"<script src="https://telegram.org/js/telegram-widget.js"></script><script>var a = 1;</script><script></script>"#,
        );
        assert_eq!(
            blocks,
            vec![
                ContentBlock::embed(
                    EmbedKind::ScriptSrc,
                    "https://telegram.org/js/telegram-widget.js"
                ),
                ContentBlock::embed(EmbedKind::ScriptInline, "var a = 1;"),
            ]
        );
    }

    #[test]
    fn test_tweet_blockquote_ignores_text() {
        let blocks = parse("<blockquote data-tweet-id='42'>ignored</blockquote>");
        assert_eq!(blocks, vec![ContentBlock::embed(EmbedKind::Tweet, "42")]);
    }

    #[test]
    fn test_quote_blockquote() {
        let blocks = parse("<blockquote>  Học, học nữa, học mãi  </blockquote><blockquote> </blockquote>");
        assert_eq!(
            blocks,
            vec![ContentBlock::embed(EmbedKind::Quote, "Học, học nữa, học mãi")]
        );
    }

    #[test]
    fn test_unknown_tags_skipped_siblings_kept() {
        let blocks = parse("<div>menu</div><p>Một</p><ul><li>x</li></ul><p>Hai</p>");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::paragraph(vec![plain("Một")]),
                ContentBlock::paragraph(vec![plain("Hai")]),
            ]
        );
    }

    #[test]
    fn test_malformed_markup_tolerated() {
        let blocks = parse("<p>Mở <strong>đậm<p>Tiếp theo");
        assert!(!blocks.is_empty());
        assert_eq!(blocks.last().unwrap().plain_text(), "Tiếp theo");
    }

    #[test]
    fn test_entities_are_decoded() {
        let blocks = parse("<p>A &amp; B</p>");
        assert_eq!(blocks[0].plain_text(), "A & B");
    }
}
