//! "Tiêu điểm trong tháng" slides.

use crate::content::sections::strip_tags;
use crate::domain::{RawArticle, Slide};
use crate::portal::fallback::static_slide;
use crate::render::image::resolve_image_url;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Slides from the monthly hot list, padded with static slides to `size`.
///
/// Only the first `size` articles are considered; those without an id are
/// skipped, not replaced.
pub fn build_slides(monthly: &[RawArticle], size: usize) -> Vec<Slide> {
    let mut slides: Vec<Slide> = monthly
        .iter()
        .take(size)
        .enumerate()
        .filter_map(|(i, raw)| {
            let id = non_blank(raw.id.as_deref())?;
            let fallback = static_slide(i);
            Some(Slide {
                id: id.to_string(),
                image: match non_blank(raw.thumbnail.as_deref()) {
                    Some(thumbnail) => resolve_image_url(Some(thumbnail)),
                    None => fallback.image,
                },
                title: non_blank(raw.title.as_deref())
                    .map(String::from)
                    .unwrap_or(fallback.title),
                tag: non_blank(raw.category_name.as_deref())
                    .map(String::from)
                    .unwrap_or(fallback.tag),
                description: non_blank(raw.description.as_deref())
                    .map(strip_tags)
                    .unwrap_or(fallback.description),
            })
        })
        .collect();

    if slides.len() < size {
        tracing::debug!("Padding slider with {} static slides", size - slides.len());
    }
    for i in slides.len()..size {
        slides.push(static_slide(i));
    }
    slides
}

/// The static slides alone, used when the document is unavailable.
pub fn static_slides(size: usize) -> Vec<Slide> {
    (0..size).map(static_slide).collect()
}
