use serde::Serialize;

use crate::domain::block::ContentBlock;

pub const DEFAULT_TITLE: &str = "Tiêu đề không xác định";
pub const DEFAULT_SUBTITLE: &str = "Mô tả không có";
pub const DEFAULT_CATEGORY: &str = "Đồ chơi số";
pub const DEFAULT_CAPTION: &str = "Hình ảnh minh họa";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleContentSection {
    /// Promoted from a leading all-bold paragraph.
    pub title: Option<String>,
    pub blocks: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleImage {
    pub src: String,
    pub captions: Vec<String>,
}

impl ArticleImage {
    pub fn caption(&self) -> &str {
        self.captions
            .first()
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CAPTION)
    }
}

/// A fully assembled article, ready for the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub hero_image: String,
    pub content_sections: Vec<ArticleContentSection>,
    pub images: Vec<ArticleImage>,
    pub publish_time: String,
}

impl Article {
    /// The image shown right after section `index`.
    ///
    /// Images and sections are paired by position in their lists.
    pub fn image_for_section(&self, index: usize) -> Option<&ArticleImage> {
        self.images.get(index)
    }
}

/// Summary card used by the home feed and the related list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub image: String,
    pub title: String,
    pub tag: String,
    /// Already formatted relative time, e.g. "2 giờ trước".
    pub time: String,
}

/// One entry of the "featured this month" slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub id: String,
    pub image: String,
    pub title: String,
    pub tag: String,
    pub description: String,
}
