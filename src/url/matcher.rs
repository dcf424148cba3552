use url::Url;

/// Checks whether a URL's path starts with the given prefix
///
/// # Examples
///
/// ```
/// use fight_finder::url::matches_path_prefix;
/// use url::Url;
///
/// let url = Url::parse("http://fights.example.com/events/Org-100-Title").unwrap();
/// assert!(matches_path_prefix(&url, "/events/"));
/// assert!(matches_path_prefix(&url, "/events/Org-"));
/// assert!(!matches_path_prefix(&url, "/fighter/"));
/// ```
pub fn matches_path_prefix(url: &Url, prefix: &str) -> bool {
    url.path().starts_with(prefix)
}

/// Checks whether a URL points at the same host and port as `base`
///
/// The scheme is ignored so `http` and `https` links to the same site match.
pub fn is_same_host(url: &Url, base: &Url) -> bool {
    url.host_str() == base.host_str() && url.port() == base.port()
}
