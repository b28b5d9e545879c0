//! Page composition over the summary document.
//!
//! [`Portal`] fetches the single summary document and builds the home feed
//! and article pages from it. Every page request fetches a fresh copy;
//! nothing is kept between views.

pub mod carousel;
pub mod fallback;
pub mod home;
pub mod related;
pub mod slider;
pub mod time_ago;

use std::sync::Arc;

use chrono::Utc;

use crate::app::Result;
use crate::config::HomeConfig;
use crate::content::ArticleAssembler;
use crate::domain::{Article, Card, SummaryDocument};
use crate::fetcher::Fetcher;

pub use carousel::Carousel;
pub use home::{HomeFeed, HomeSection};

/// An article with its "Cùng chủ đề" cards.
#[derive(Debug, Clone)]
pub struct ArticlePage {
    pub article: Article,
    pub related: Vec<Card>,
}

pub struct Portal {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    summary_url: String,
    home: HomeConfig,
    assembler: ArticleAssembler,
}

impl Portal {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        summary_url: impl Into<String>,
        home: HomeConfig,
    ) -> Self {
        Self {
            fetcher,
            summary_url: summary_url.into(),
            home,
            assembler: ArticleAssembler::new(),
        }
    }

    pub fn summary_url(&self) -> &str {
        &self.summary_url
    }

    pub fn home_config(&self) -> &HomeConfig {
        &self.home
    }

    /// Fetch and parse the summary document.
    pub async fn document(&self) -> Result<SummaryDocument> {
        let body = self.fetcher.fetch(&self.summary_url).await?;
        let doc = SummaryDocument::from_slice(&body)?;
        tracing::debug!(
            "Fetched summary document: {} highlighted, {} monthly, {} categories",
            doc.highlighted.len(),
            doc.monthly.len(),
            doc.categories.len()
        );
        Ok(doc)
    }

    /// The home feed. Never fails: an unavailable document yields the
    /// built-in fallback feed.
    pub async fn home(&self) -> HomeFeed {
        match self.document().await {
            Ok(doc) => HomeFeed::compose(&doc, &self.home, Utc::now()),
            Err(e) => {
                tracing::warn!("Failed to load summary document, showing fallback: {}", e);
                HomeFeed::fallback(&self.home)
            }
        }
    }

    /// The article page for `id`.
    ///
    /// Errors with a fetch failure when the document is unavailable and with
    /// `ArticleNotFound` when no source lists `id`.
    pub async fn article(&self, id: &str) -> Result<ArticlePage> {
        let doc = self.document().await?;
        let article = self.assembler.load(&doc, id)?;
        let related =
            related::related_cards(&doc, &article, self.home.related_limit, Utc::now());
        Ok(ArticlePage { article, related })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PortalError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued responses in order and counts requests.
    #[derive(Default)]
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<Vec<u8>>>>,
        requests: Mutex<usize>,
    }

    impl ScriptedFetcher {
        fn push(&self, response: Result<Vec<u8>>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn requests(&self) -> usize {
            *self.requests.lock().unwrap()
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            *self.requests.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PortalError::Other("no response queued".into())))
        }
    }

    fn body(title: &str) -> Vec<u8> {
        let doc = json!({
            "data": {
                "highlighted": [{
                    "id": "10",
                    "title": title,
                    "category_name": "A.I",
                    "description": "<p>Mô tả</p>",
                    "details": [
                        {"type": "text", "position": 1, "data": "<p><b>Mở đầu</b></p><p>Nội dung</p>"}
                    ]
                }],
                "hot_news": {"monthly": [{"id": "11", "title": "Tháng", "category_name": "A.I"}]},
                "latest_per_category": {}
            }
        });
        serde_json::to_vec(&doc).unwrap()
    }

    fn portal(fetcher: Arc<ScriptedFetcher>) -> Portal {
        Portal::new(fetcher, "http://api.test/summary", HomeConfig::default())
    }

    #[tokio::test]
    async fn test_home_from_document() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.push(Ok(body("Bài nổi bật")));
        let feed = portal(fetcher).home().await;
        assert!(!feed.offline);
        assert_eq!(feed.highlighted[0].id, "10");
        assert_eq!(feed.slides[0].id, "11");
        assert!(feed.sections.iter().all(|s| s.is_fallback));
    }

    #[tokio::test]
    async fn test_home_falls_back_on_failure() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.push(Ok(b"not json".to_vec()));
        let feed = portal(fetcher).home().await;
        assert!(feed.offline);
        assert_eq!(feed.slides.len(), 6);
    }

    #[tokio::test]
    async fn test_every_view_fetches_fresh_document() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.push(Ok(body("Cũ")));
        fetcher.push(Ok(body("Mới")));
        let portal = portal(fetcher.clone());

        assert_eq!(portal.article("10").await.unwrap().article.title, "Cũ");
        assert_eq!(portal.article("10").await.unwrap().article.title, "Mới");
        assert_eq!(fetcher.requests(), 2);
    }

    #[tokio::test]
    async fn test_failed_refetch_is_reported() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.push(Ok(body("Cũ")));
        fetcher.push(Err(PortalError::InvalidDocument("network down".into())));
        let portal = portal(fetcher);

        portal.article("10").await.unwrap();
        let err = portal.article("10").await.unwrap_err();
        assert!(err.is_fetch_failure());
    }

    #[tokio::test]
    async fn test_article_page_and_errors() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.push(Ok(body("Bài nổi bật")));
        fetcher.push(Ok(body("Bài nổi bật")));
        let portal = portal(fetcher);

        let page = portal.article("10").await.unwrap();
        assert_eq!(page.article.subtitle, "Mô tả");
        assert_eq!(
            page.article.content_sections[0].title.as_deref(),
            Some("Mở đầu")
        );
        let related: Vec<&str> = page.related.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(related, vec!["11"]);

        let missing = portal.article("999").await.unwrap_err();
        assert!(matches!(missing, PortalError::ArticleNotFound(id) if id == "999"));
    }

    #[test]
    fn test_article_fetch_failure_is_reported() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.push(Err(PortalError::InvalidDocument("down".into())));
        let err = tokio_test::block_on(portal(fetcher).article("10")).unwrap_err();
        assert!(err.is_fetch_failure());
    }
}
