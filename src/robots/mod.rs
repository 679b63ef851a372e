//! Robots.txt policy gate
//!
//! The site's crawl policy is fetched exactly once, from
//! `<root-origin>/robots.txt`, before any worker starts. After that the
//! gate is immutable and every check is a pure in-memory lookup; there is
//! no per-call I/O and no cache to refresh.
//!
//! Fetch failures fail **open**: an unreachable or non-2xx robots.txt
//! yields an allow-all gate, with a warning logged. A missing policy file
//! must never block the entire crawl.

use reqwest::Client;
use robotstxt::DefaultMatcher;
use url::Url;

/// Wraps the site's published crawl policy and answers "is this URL
/// fetchable by this crawler?"
#[derive(Debug, Clone)]
pub struct RobotsGate {
    /// Raw robots.txt content (empty means allow all)
    content: String,
    /// The user agent matched against the policy's groups
    user_agent: String,
}

impl RobotsGate {
    /// Creates a gate from raw robots.txt content
    pub fn from_content(content: &str, user_agent: &str) -> Self {
        Self {
            content: content.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Creates a permissive gate that allows everything
    ///
    /// Used when robots.txt cannot be fetched or the site publishes none.
    pub fn allow_all(user_agent: &str) -> Self {
        Self {
            content: String::new(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Fetches robots.txt for the root URL's origin and builds the gate
    ///
    /// Any failure (transport error, non-2xx status, unreadable body)
    /// produces an allow-all gate.
    pub async fn fetch(client: &Client, root: &Url, user_agent: &str) -> Self {
        let robots_url = match root.join("/robots.txt") {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Cannot build robots.txt URL for {}: {}", root, e);
                return Self::allow_all(user_agent);
            }
        };

        match client.get(robots_url.as_str()).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(content) => {
                    tracing::debug!("Fetched robots.txt ({} bytes)", content.len());
                    Self::from_content(&content, user_agent)
                }
                Err(e) => {
                    tracing::warn!("Failed to read robots.txt body: {}, allowing all", e);
                    Self::allow_all(user_agent)
                }
            },
            Ok(response) => {
                tracing::warn!(
                    "robots.txt returned HTTP {}, allowing all",
                    response.status()
                );
                Self::allow_all(user_agent)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch robots.txt: {}, allowing all", e);
                Self::allow_all(user_agent)
            }
        }
    }

    /// Checks whether the policy permits fetching a URL
    pub fn is_allowed(&self, url: &Url) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, &self.user_agent, url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_allow_all() {
        let gate = RobotsGate::allow_all("TestBot");
        assert!(gate.is_allowed(&url("https://example.com/any/path")));
        assert!(gate.is_allowed(&url("https://example.com/admin")));
    }

    #[test]
    fn test_disallow_all() {
        let gate = RobotsGate::from_content("User-agent: *\nDisallow: /", "TestBot");
        assert!(!gate.is_allowed(&url("https://example.com/")));
        assert!(!gate.is_allowed(&url("https://example.com/page")));
    }

    #[test]
    fn test_disallow_specific_path() {
        let gate = RobotsGate::from_content("User-agent: *\nDisallow: /private/", "TestBot");
        assert!(gate.is_allowed(&url("https://example.com/")));
        assert!(gate.is_allowed(&url("https://example.com/public")));
        assert!(!gate.is_allowed(&url("https://example.com/private/page")));
    }

    #[test]
    fn test_allow_overrides_disallow() {
        let gate = RobotsGate::from_content(
            "User-agent: *\nDisallow: /private\nAllow: /private/public",
            "TestBot",
        );
        assert!(!gate.is_allowed(&url("https://example.com/private")));
        assert!(gate.is_allowed(&url("https://example.com/private/public")));
    }

    #[test]
    fn test_specific_user_agent() {
        let gate = RobotsGate::from_content(
            "User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /",
            "GoodBot",
        );
        assert!(gate.is_allowed(&url("https://example.com/page")));

        let bad = RobotsGate::from_content(
            "User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /",
            "BadBot",
        );
        assert!(!bad.is_allowed(&url("https://example.com/page")));
    }

    #[test]
    fn test_empty_content_allows() {
        let gate = RobotsGate::from_content("", "TestBot");
        assert!(gate.is_allowed(&url("https://example.com/any")));
    }

    #[test]
    fn test_garbage_content_allows() {
        let gate = RobotsGate::from_content("this is not robots.txt {{{", "TestBot");
        assert!(gate.is_allowed(&url("https://example.com/any")));
    }
}
