pub mod article;
pub mod block;
pub mod raw;

pub use article::{Article, ArticleContentSection, ArticleImage, Card, Slide};
pub use block::{ContentBlock, EmbedKind, TextRun};
pub use raw::{DetailItem, DetailKind, RawArticle, SummaryDocument};
