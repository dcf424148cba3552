//! URL handling module for Fight-Finder
//!
//! This module resolves hrefs found in documents against the page they came
//! from, canonicalises fighter profile URLs into [`FighterId`]s, and matches
//! event-page paths.

mod matcher;
mod normalize;

use crate::records::FighterId;
use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use matcher::{is_same_host, matches_path_prefix};
pub use normalize::{normalize_url, resolve_link};

/// Resolves a fighter profile href into its canonical id and absolute URL
///
/// The id is the normalised path of the profile, so absolute and relative
/// links to the same profile yield the same id. Links to another host are
/// rejected, since the id would not tell the two sites apart.
///
/// # Examples
///
/// ```
/// use fight_finder::url::resolve_fighter;
/// use url::Url;
///
/// let base = Url::parse("http://fights.example.com/events/Event-1").unwrap();
/// let (id, url) = resolve_fighter("/fighter/Alpha-One-1/", &base).unwrap();
/// assert_eq!(id.as_str(), "/fighter/Alpha-One-1");
/// assert_eq!(url.as_str(), "http://fights.example.com/fighter/Alpha-One-1");
/// ```
pub fn resolve_fighter(href: &str, base: &Url) -> UrlResult<(FighterId, Url)> {
    let url = resolve_link(href, base)?;
    if !is_same_host(&url, base) {
        return Err(UrlError::ForeignHost(url.to_string()));
    }
    let id = fighter_id(&url)?;
    Ok((id, url))
}

/// Extracts the canonical fighter id from an absolute profile URL
pub fn fighter_id(url: &Url) -> UrlResult<FighterId> {
    let path = url.path();
    if path.is_empty() || path == "/" {
        return Err(UrlError::NotAFighterLink(url.to_string()));
    }
    Ok(FighterId::new(path))
}
