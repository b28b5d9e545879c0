//! Grouping of an article's detail items into titled sections.

use std::sync::LazyLock;

use regex::Regex;

use crate::content::parser::parse;
use crate::domain::{ArticleContentSection, ContentBlock, DetailItem};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("TAG regex"));

/// Remove markup from a short HTML string such as an article description.
pub fn strip_tags(html: &str) -> String {
    let without_tags = TAG.replace_all(html, "");
    html_escape::decode_html_entities(without_tags.trim()).to_string()
}

/// Detail items sorted by position. The sort is stable, so items sharing a
/// position keep their original order.
pub fn sorted_by_position<'a, I>(details: I) -> Vec<&'a DetailItem>
where
    I: IntoIterator<Item = &'a DetailItem>,
{
    let mut sorted: Vec<&DetailItem> = details.into_iter().collect();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));
    sorted
}

/// Turn parsed blocks into a section, promoting a leading all-bold paragraph
/// to the section title.
///
/// Returns `None` when no blocks remain after that.
pub fn section_from_blocks(mut blocks: Vec<ContentBlock>) -> Option<ArticleContentSection> {
    let title = blocks.first().and_then(|b| b.as_heading()).map(String::from);
    if title.is_some() {
        blocks.remove(0);
    }
    blocks.retain(|b| !b.is_empty());

    if blocks.is_empty() {
        if let Some(title) = &title {
            tracing::debug!("Dropping section with only a title: {}", title);
        }
        return None;
    }
    Some(ArticleContentSection { title, blocks })
}

/// Build the ordered content sections from an article's text and quote items.
pub fn build_sections(details: &[DetailItem]) -> Vec<ArticleContentSection> {
    sorted_by_position(details.iter().filter(|d| d.is_textual()))
        .into_iter()
        .filter_map(|detail| section_from_blocks(parse(detail.data())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetailKind, EmbedKind, TextRun};

    fn detail(kind: DetailKind, position: f64, data: &str) -> DetailItem {
        DetailItem {
            kind,
            position,
            data: Some(data.into()),
            caption: Vec::new(),
        }
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Giá <b>vàng</b> &amp; USD</p>  "), "Giá vàng & USD");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_title_promoted_from_bold_paragraph() {
        let section =
            section_from_blocks(parse("<p><strong>Bối cảnh</strong></p><p>Nội dung</p>")).unwrap();
        assert_eq!(section.title.as_deref(), Some("Bối cảnh"));
        assert_eq!(section.blocks.len(), 1);
        assert_eq!(section.blocks[0].plain_text(), "Nội dung");
    }

    #[test]
    fn test_partially_bold_paragraph_is_not_a_title() {
        let section = section_from_blocks(parse("<p><strong>Bối cảnh</strong>: thị trường</p>"))
            .unwrap();
        assert_eq!(section.title, None);
        assert_eq!(section.blocks.len(), 1);
    }

    #[test]
    fn test_title_only_section_dropped() {
        assert!(section_from_blocks(parse("<p><strong>Chỉ tiêu đề</strong></p>")).is_none());
        assert!(section_from_blocks(Vec::new()).is_none());
    }

    #[test]
    fn test_sections_follow_position_order_and_skip_images() {
        let details = vec![
            detail(DetailKind::Text, 2.0, "<p>Hai</p>"),
            detail(DetailKind::Image, 0.0, "https://img/a.png"),
            detail(DetailKind::Quotes, 1.0, "<blockquote>Một</blockquote>"),
            detail(DetailKind::Unknown, 0.5, "<p>bỏ qua</p>"),
        ];
        let sections = build_sections(&details);
        assert_eq!(sections.len(), 2);
        assert_eq!(
            sections[0].blocks,
            vec![ContentBlock::embed(EmbedKind::Quote, "Một")]
        );
        assert_eq!(
            sections[1].blocks,
            vec![ContentBlock::paragraph(vec![TextRun::Plain("Hai".into())])]
        );
    }

    #[test]
    fn test_equal_positions_keep_source_order() {
        let details = vec![
            detail(DetailKind::Text, 1.0, "<p>A</p>"),
            detail(DetailKind::Text, 0.0, "<p>B</p>"),
            detail(DetailKind::Text, 1.0, "<p>C</p>"),
        ];
        let texts: Vec<String> = build_sections(&details)
            .iter()
            .map(|s| s.blocks[0].plain_text())
            .collect();
        assert_eq!(texts, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_malformed_item_does_not_affect_siblings() {
        let details = vec![
            detail(DetailKind::Text, 0.0, "<p>Trước</p>"),
            detail(DetailKind::Text, 1.0, "<<<>>> <p"),
            detail(DetailKind::Text, 2.0, "<p>Sau</p>"),
        ];
        let sections = build_sections(&details);
        assert_eq!(sections.first().unwrap().blocks[0].plain_text(), "Trước");
        assert_eq!(sections.last().unwrap().blocks[0].plain_text(), "Sau");
    }
}
