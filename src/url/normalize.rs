use crate::UrlError;
use url::Url;

/// Resolves an href against the page it was found on
///
/// The result is normalised with [`normalize_url`].
///
/// # Rejected hrefs
///
/// - empty or fragment-only (`#section`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - anything that does not resolve to an http(s) URL
pub fn resolve_link(href: &str, base: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Err(UrlError::Parse(format!("not a navigable link: '{}'", href)));
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return Err(UrlError::InvalidScheme(href.to_string()));
    }

    let absolute = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    normalize_url(absolute)
}

/// Normalizes an absolute URL for identity comparisons
///
/// # Normalization Steps
///
/// 1. Reject non-http(s) schemes
/// 2. Remove dot segments, empty segments and the trailing slash
/// 3. Drop the fragment and query string
///
/// Host and scheme are left alone: the crawl stays on one site and the
/// fighter identity is the path.
///
/// # Examples
///
/// ```
/// use fight_finder::url::normalize_url;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/fighter//Alpha-1/?x=1#top").unwrap();
/// assert_eq!(normalize_url(url).unwrap().as_str(), "http://example.com/fighter/Alpha-1");
/// ```
pub fn normalize_url(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);
    url.set_fragment(None);
    url.set_query(None);

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}
