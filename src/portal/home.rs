use chrono::{DateTime, Utc};

use crate::config::{HomeConfig, SectionConfig};
use crate::domain::article::{DEFAULT_CATEGORY, DEFAULT_TITLE};
use crate::domain::{Card, RawArticle, Slide, SummaryDocument};
use crate::portal::fallback::section_fallback;
use crate::portal::slider::{build_slides, static_slides};
use crate::portal::time_ago::time_ago;
use crate::render::image::resolve_image_url;

/// Highlighted cards shown large; the rest are small.
pub const LARGE_HIGHLIGHTS: usize = 2;

/// Side cards next to a section's main card.
pub const SECTION_SIDE_CARDS: usize = 4;

/// A summary card for a raw article.
pub fn card_from_raw(raw: &RawArticle, now: DateTime<Utc>) -> Card {
    Card {
        id: raw.id.clone().unwrap_or_default(),
        image: resolve_image_url(raw.thumbnail.as_deref()),
        title: raw
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        tag: raw
            .category_name
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        time: time_ago(raw.publish_time.as_deref(), now),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeSection {
    pub label: String,
    pub main: Card,
    pub cards: Vec<Card>,
    /// Built-in content is shown because the category had too few articles.
    pub is_fallback: bool,
}

impl HomeSection {
    pub fn compose(config: &SectionConfig, articles: &[RawArticle], now: DateTime<Utc>) -> Self {
        let Some(first) = articles.first().filter(|_| articles.len() >= config.min_articles)
        else {
            tracing::warn!(
                "Not enough articles for {} ({} < {}), using fallback",
                config.category,
                articles.len(),
                config.min_articles
            );
            return Self::fallback(config);
        };

        let mut main = card_from_raw(first, now);
        let label = first
            .category_name
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| config.label.clone());
        main.tag = label.clone();

        let cards = articles
            .iter()
            .skip(1)
            .take(SECTION_SIDE_CARDS)
            .map(|raw| card_from_raw(raw, now))
            .collect();

        Self {
            label,
            main,
            cards,
            is_fallback: false,
        }
    }

    pub fn fallback(config: &SectionConfig) -> Self {
        let fallback = section_fallback(&config.label);
        let mut main = fallback.main_card();
        main.tag = config.label.clone();
        Self {
            label: config.label.clone(),
            main,
            cards: fallback.cards(),
            is_fallback: true,
        }
    }

    /// Main card followed by the side cards.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        std::iter::once(&self.main).chain(self.cards.iter())
    }
}

/// Everything on the home screen.
#[derive(Debug, Clone)]
pub struct HomeFeed {
    pub highlighted: Vec<Card>,
    pub sections: Vec<HomeSection>,
    pub slides: Vec<Slide>,
    /// The document could not be fetched and only built-in content is shown.
    pub offline: bool,
}

impl HomeFeed {
    pub fn compose(doc: &SummaryDocument, config: &HomeConfig, now: DateTime<Utc>) -> Self {
        let highlighted = doc
            .highlighted
            .iter()
            .take(config.highlighted_limit)
            .map(|raw| card_from_raw(raw, now))
            .collect();

        let sections = config
            .sections
            .iter()
            .map(|section| HomeSection::compose(section, doc.category(&section.category), now))
            .collect();

        Self {
            highlighted,
            sections,
            slides: build_slides(&doc.monthly, config.slider_size),
            offline: false,
        }
    }

    pub fn fallback(config: &HomeConfig) -> Self {
        Self {
            highlighted: Vec::new(),
            sections: config.sections.iter().map(HomeSection::fallback).collect(),
            slides: static_slides(config.slider_size),
            offline: true,
        }
    }

    pub fn large_highlights(&self) -> &[Card] {
        &self.highlighted[..self.highlighted.len().min(LARGE_HIGHLIGHTS)]
    }

    pub fn small_highlights(&self) -> &[Card] {
        &self.highlighted[self.highlighted.len().min(LARGE_HIGHLIGHTS)..]
    }
}
