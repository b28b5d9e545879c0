//! Image URL validation.
//!
//! Hero images, in-article images and card thumbnails all go through
//! [`resolve_image_url`], so a bad value anywhere ends up as the same
//! placeholder.

use url::Url;

pub const PLACEHOLDER_IMAGE: &str = "/assets/images/default.jpg";

/// Validate an image reference.
///
/// Site-relative paths pass through untouched. Anything else has to be an
/// absolute URL with a host.
pub fn resolve_image_url(src: Option<&str>) -> String {
    let src = src.map(str::trim).unwrap_or("");
    if src.is_empty() {
        return PLACEHOLDER_IMAGE.to_string();
    }
    if is_site_relative(src) {
        return src.to_string();
    }

    match Url::parse(src) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => src.to_string(),
        Ok(_) => {
            tracing::debug!("Image URL has no host, using placeholder: {}", src);
            PLACEHOLDER_IMAGE.to_string()
        }
        Err(e) => {
            tracing::debug!("Invalid image URL {:?} ({}), using placeholder", src, e);
            PLACEHOLDER_IMAGE.to_string()
        }
    }
}

fn is_site_relative(src: &str) -> bool {
    src.starts_with('/') || src.starts_with("./") || src.starts_with("../")
}
