//! URL normalization and host-scope filtering
//!
//! Two URLs are the same work item iff their normalized string forms are
//! byte-equal: scheme + host + path + query, fragment stripped. The
//! frontier only ever sees URLs that went through [`normalize_url`] or
//! [`resolve_against`].

use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL string into the crawler's canonical form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Require an http or https scheme
/// 3. Require a host
/// 4. Remove the fragment (everything after `#`)
///
/// Host lowercasing and the empty-path-to-`/` rule are applied by the
/// `url` crate during parsing. The query string is kept verbatim: two URLs
/// differing only in query are distinct pages.
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Resolves a raw href against the page it was found on
///
/// Returns the normalized absolute URL, or `None` when the href is
/// unresolvable or resolves to a non-http(s) scheme. A `None` here is a
/// silent drop, never an error: pages link to all sorts of junk.
pub fn resolve_against(base: &Url, href: &str) -> Option<Url> {
    let mut url = base.join(href.trim()).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.host_str()?;

    url.set_fragment(None);

    Some(url)
}

/// The same-host restriction limiting the crawl to the root's domain
///
/// Scope is host plus effective port: `http://example.com/` and
/// `http://example.com:80/` are the same authority, while a differing
/// subdomain or port is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostScope {
    host: String,
    port: Option<u16>,
}

impl HostScope {
    /// Derives the scope from the root URL
    pub fn of(url: &Url) -> UrlResult<Self> {
        let host = url.host_str().ok_or(UrlError::MissingHost)?.to_lowercase();
        Ok(Self {
            host,
            port: url.port_or_known_default(),
        })
    }

    /// Returns whether a URL falls inside this scope
    pub fn contains(&self, url: &Url) -> bool {
        url.host_str()
            .map(|h| h.eq_ignore_ascii_case(&self.host) && url.port_or_known_default() == self.port)
            .unwrap_or(false)
    }

    /// The scope's host name
    pub fn host(&self) -> &str {
        &self.host
    }
}
