use chrono::Utc;
use html_escape::decode_html_entities;

use crate::app::{PortalError, Result};
use crate::content::sections::{build_sections, sorted_by_position, strip_tags};
use crate::domain::article::{DEFAULT_CATEGORY, DEFAULT_SUBTITLE, DEFAULT_TITLE};
use crate::domain::{Article, ArticleImage, DetailKind, RawArticle, SummaryDocument};
use crate::render::image::resolve_image_url;

/// Builds detail-view articles from raw API records.
#[derive(Clone)]
pub struct ArticleAssembler;

impl Default for ArticleAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Look up `id` across the whole document and assemble it.
    pub fn load(&self, doc: &SummaryDocument, id: &str) -> Result<Article> {
        let raw = doc
            .find_article(id)
            .ok_or_else(|| PortalError::ArticleNotFound(id.to_string()))?;
        Ok(self.assemble(raw, id))
    }

    pub fn assemble(&self, raw: &RawArticle, id: &str) -> Article {
        let title = raw
            .title
            .as_deref()
            .map(|t| decode_html_entities(t.trim()).to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let subtitle = raw
            .description
            .as_deref()
            .map(strip_tags)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string());

        let category = raw
            .category_name
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let images = sorted_by_position(raw.details.iter().filter(|d| d.kind == DetailKind::Image))
            .into_iter()
            .map(|detail| ArticleImage {
                src: resolve_image_url(detail.data.as_deref()),
                captions: detail.caption.clone(),
            })
            .collect();

        let publish_time = raw
            .publish_time
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let article = Article {
            id: raw.id.clone().unwrap_or_else(|| id.to_string()),
            title,
            subtitle,
            category,
            hero_image: resolve_image_url(raw.thumbnail.as_deref()),
            content_sections: build_sections(&raw.details),
            images,
            publish_time,
        };

        tracing::debug!(
            "Assembled article {}: {} sections, {} images",
            article.id,
            article.content_sections.len(),
            article.images.len()
        );
        article
    }
}
