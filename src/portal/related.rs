//! "Cùng chủ đề" cards under an article.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{Article, Card, SummaryDocument};
use crate::portal::fallback;
use crate::portal::home::card_from_raw;

/// Other articles sharing `article`'s category, in lookup order.
///
/// An article listed in several sources appears once. When nothing matches,
/// the static related cards are returned instead.
pub fn related_cards(
    doc: &SummaryDocument,
    article: &Article,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<Card> {
    let mut seen = HashSet::new();
    let cards: Vec<Card> = doc
        .all_articles()
        .filter(|raw| {
            raw.id.as_deref().is_some_and(|id| id != article.id)
                && raw.category_name.as_deref() == Some(article.category.as_str())
        })
        .filter(|raw| seen.insert(raw.id.clone()))
        .take(limit)
        .map(|raw| card_from_raw(raw, now))
        .collect();

    if cards.is_empty() {
        tracing::debug!("No related articles for {}, using static cards", article.id);
        let mut cards = fallback::related_cards();
        cards.truncate(limit);
        return cards;
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ArticleAssembler;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn document() -> SummaryDocument {
        SummaryDocument::from_value(json!({
            "highlighted": [
                {"id": 1, "title": "Gốc", "category_name": "A.I"},
                {"id": 2, "title": "Cùng mục", "category_name": "A.I"},
                {"id": 3, "title": "Khác mục", "category_name": "Game"}
            ],
            "hot_news": {"monthly": [
                {"id": 2, "title": "Lặp lại", "category_name": "A.I"},
                {"id": 4, "title": "Cũng A.I", "category_name": "A.I"},
                {"title": "Không id", "category_name": "A.I"}
            ]},
            "latest_per_category": {
                "CHỨNG KHOÁN": {"new_list": [
                    {"id": 5, "title": "Cuối", "category_name": "A.I"}
                ]},
                "GAME": {"new_list": [
                    {"id": 6, "title": "Một mình", "category_name": "Esports"}
                ]}
            }
        }))
        .unwrap()
    }

    fn article(doc: &SummaryDocument, id: &str) -> Article {
        ArticleAssembler::new().load(doc, id).unwrap()
    }

    #[test]
    fn test_same_category_excluding_self() {
        let doc = document();
        let cards = related_cards(&doc, &article(&doc, "1"), 8, now());
        let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "5"]);
        assert_eq!(cards[0].title, "Cùng mục");
    }

    #[test]
    fn test_limit() {
        let doc = document();
        let cards = related_cards(&doc, &article(&doc, "1"), 2, now());
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn test_falls_back_to_static_cards() {
        let doc = document();
        let cards = related_cards(&doc, &article(&doc, "6"), 8, now());
        assert_eq!(cards, fallback::related_cards());
    }
}
