//! Forced-attachment URL rewriting
//!
//! The CDN serves assets inline unless the delivery URL carries an
//! `fl_attachment/` transformation right after the `/upload/` path marker.
//! With it, the CDN answers with `Content-Disposition: attachment`, which is
//! what a download needs.

use tracing::trace;

/// Path marker that precedes the asset path on the CDN
pub const UPLOAD_MARKER: &str = "/upload/";

/// Segment inserted after [`UPLOAD_MARKER`] to force an attachment response
pub const ATTACHMENT_SEGMENT: &str = "fl_attachment/";

/// Rewrites CDN URLs so the CDN responds with a download
#[derive(Clone, Debug)]
pub struct UrlResolver {
    cdn_host: String,
}

impl UrlResolver {
    /// Create a resolver for the given CDN host
    pub fn new(cdn_host: impl Into<String>) -> Self {
        Self {
            cdn_host: cdn_host.into().to_ascii_lowercase(),
        }
    }

    /// The host whose URLs are rewritten
    pub fn cdn_host(&self) -> &str {
        &self.cdn_host
    }

    /// Resolve `url` to its forced-attachment form
    ///
    /// URLs on other hosts, URLs without the upload marker and URLs that are
    /// already resolved come back unchanged.
    #[must_use]
    pub fn resolve(&self, url: &str) -> String {
        resolve_attachment_url(url, &self.cdn_host)
    }
}

/// Insert [`ATTACHMENT_SEGMENT`] after the first [`UPLOAD_MARKER`] of a URL on `cdn_host`
///
/// # Examples
///
/// ```
/// use wedding_export::resolver::resolve_attachment_url;
///
/// let url = "https://cdn.example.com/upload/x.jpg";
/// let resolved = resolve_attachment_url(url, "cdn.example.com");
/// assert_eq!(resolved, "https://cdn.example.com/upload/fl_attachment/x.jpg");
///
/// // Resolving again is a no-op
/// assert_eq!(resolve_attachment_url(&resolved, "cdn.example.com"), resolved);
///
/// // Other hosts pass through
/// let other = "https://images.example.org/upload/x.jpg";
/// assert_eq!(resolve_attachment_url(other, "cdn.example.com"), other);
/// ```
#[must_use]
pub fn resolve_attachment_url(url: &str, cdn_host: &str) -> String {
    let on_cdn = url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|h| h.eq_ignore_ascii_case(cdn_host)))
        .unwrap_or(false);
    if !on_cdn {
        return url.to_string();
    }

    let Some(idx) = url.find(UPLOAD_MARKER) else {
        return url.to_string();
    };
    let split = idx + UPLOAD_MARKER.len();
    let (head, tail) = url.split_at(split);

    if tail.starts_with(ATTACHMENT_SEGMENT) {
        return url.to_string();
    }

    trace!(url, "forcing attachment response");
    let mut resolved = String::with_capacity(url.len() + ATTACHMENT_SEGMENT.len());
    resolved.push_str(head);
    resolved.push_str(ATTACHMENT_SEGMENT);
    resolved.push_str(tail);
    resolved
}
