use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Content API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint returning the article summary document
    pub summary_url: String,

    /// Request timeout in seconds (default: 15)
    pub timeout_secs: u64,

    /// Origin of the web portal. Links on this host open inside the reader.
    pub site_origin: String,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            summary_url: "http://10.208.50.7:3019/gateway/articles/summary?source_id=5".to_string(),
            timeout_secs: 15,
            site_origin: "http://localhost:3000".to_string(),
            user_agent: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The parsed site origin, if it is a valid URL.
    pub fn origin(&self) -> Option<Url> {
        Url::parse(&self.site_origin).ok()
    }
}

/// One category section of the home feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionConfig {
    /// Key in `latest_per_category`, e.g. "ĐẦU TƯ"
    pub category: String,

    /// Heading used when the articles carry no category name
    pub label: String,

    /// Fewer articles than this and the built-in cards are shown instead
    #[serde(default = "default_min_articles")]
    pub min_articles: usize,
}

fn default_min_articles() -> usize {
    1
}

impl SectionConfig {
    fn new(category: &str, label: &str) -> Self {
        Self {
            category: category.to_string(),
            label: label.to_string(),
            min_articles: default_min_articles(),
        }
    }
}

/// Home feed layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Highlighted cards shown at the top (default: 5)
    pub highlighted_limit: usize,

    /// Number of slides in "Tiêu điểm trong tháng" (default: 6)
    pub slider_size: usize,

    /// Maximum "Cùng chủ đề" cards under an article (default: 8)
    pub related_limit: usize,

    pub sections: Vec<SectionConfig>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            highlighted_limit: 5,
            slider_size: 6,
            related_limit: 8,
            sections: vec![
                SectionConfig::new("ĐẦU TƯ", "Khám phá"),
                SectionConfig::new("CHỨNG KHOÁN", "A.I"),
                SectionConfig::new("THỊ TRƯỜNG", "Mobile"),
                SectionConfig::new("CHUYỂN ĐỔI SỐ", "Game"),
            ],
        }
    }
}

/// Slider auto-advance behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Auto-advance interval in milliseconds (default: 1500)
    pub tick_ms: u64,

    /// Quiet period after manual navigation before auto-advance resumes
    /// (default: 5)
    pub idle_resume_secs: u64,

    /// Minimum drag distance that counts as a swipe (default: 50)
    pub swipe_threshold: i32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1500,
            idle_resume_secs: 5,
            swipe_threshold: 50,
        }
    }
}

impl CarouselConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn idle_resume(&self) -> Duration {
        Duration::from_secs(self.idle_resume_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_min_articles_defaults_to_one() {
        let section: SectionConfig =
            toml::from_str("category = \"GAME\"\nlabel = \"Game\"").unwrap();
        assert_eq!(section.min_articles, 1);
    }

    #[test]
    fn test_durations() {
        let carousel = CarouselConfig::default();
        assert_eq!(carousel.tick(), Duration::from_millis(1500));
        assert_eq!(carousel.idle_resume(), Duration::from_secs(5));
        assert_eq!(ApiConfig::default().timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_origin_parsing() {
        let mut api = ApiConfig::default();
        assert_eq!(api.origin().unwrap().host_str(), Some("localhost"));
        api.site_origin = "not a url".to_string();
        assert!(api.origin().is_none());
    }
}
