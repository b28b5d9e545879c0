//! Internal vs. external link targets.

use url::Url;

const ARTICLE_PATH_PREFIX: &str = "/posts/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Relative, or on the portal's own host. Opens inside the reader when it
    /// points at an article.
    Internal {
        href: String,
        article_id: Option<String>,
    },
    /// Anywhere else. Opened in the system browser.
    External(String),
}

impl LinkTarget {
    pub fn href(&self) -> &str {
        match self {
            LinkTarget::Internal { href, .. } => href,
            LinkTarget::External(url) => url,
        }
    }
}

/// Classifies link targets against the portal's origin.
#[derive(Debug, Clone, Default)]
pub struct LinkClassifier {
    origin: Option<Url>,
}

impl LinkClassifier {
    pub fn new(site_origin: &str) -> Self {
        let origin = Url::parse(site_origin).ok();
        if origin.is_none() {
            tracing::warn!(
                "site_origin {:?} is not a URL, only relative links are internal",
                site_origin
            );
        }
        Self { origin }
    }

    pub fn classify(&self, target: &str) -> LinkTarget {
        let target = target.trim();

        // Scheme-relative URLs still name a host.
        let absolute = if target.starts_with("//") {
            Url::parse(&format!("https:{}", target))
        } else {
            Url::parse(target)
        };

        match absolute {
            Ok(url) if self.is_same_host(&url) => LinkTarget::Internal {
                href: target.to_string(),
                article_id: article_id_from_path(url.path()),
            },
            Ok(_) => LinkTarget::External(target.to_string()),
            Err(url::ParseError::RelativeUrlWithoutBase) => LinkTarget::Internal {
                href: target.to_string(),
                article_id: article_id_from_path(target),
            },
            Err(e) => {
                tracing::debug!("Unparseable link target {:?}: {}", target, e);
                LinkTarget::External(target.to_string())
            }
        }
    }

    /// An absolute URL for opening `target` outside the reader. Relative
    /// targets are joined onto the site origin when there is one.
    pub fn resolve(&self, target: &LinkTarget) -> String {
        let href = target.href();
        if href.starts_with("//") {
            return format!("https:{}", href);
        }
        match (target, &self.origin) {
            (LinkTarget::Internal { .. }, Some(origin)) => origin
                .join(href)
                .map(String::from)
                .unwrap_or_else(|_| href.to_string()),
            _ => href.to_string(),
        }
    }

    fn is_same_host(&self, url: &Url) -> bool {
        match (&self.origin, url.host_str()) {
            (Some(origin), Some(host)) => origin
                .host_str()
                .is_some_and(|own| own.eq_ignore_ascii_case(host)),
            _ => false,
        }
    }
}

/// The article id in a `/posts/<id>` path, ignoring query and fragment.
pub fn article_id_from_path(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let rest = path
        .strip_prefix(ARTICLE_PATH_PREFIX)
        .or_else(|| path.strip_prefix(&ARTICLE_PATH_PREFIX[1..]))?;
    let id = rest.trim_end_matches('/');
    (!id.is_empty() && !id.contains('/')).then(|| id.to_string())
}
