use std::fmt;
use std::time::Duration;
use url::Url;

/// Canonical product identifier (ASIN): exactly ten alphanumeric
/// characters, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductId(String);

impl ProductId {
    /// Parse a candidate identifier, accepting any casing.
    ///
    /// Returns `None` unless the input is exactly ten ASCII alphanumerics.
    pub fn parse(candidate: &str) -> Option<Self> {
        if candidate.len() == 10 && candidate.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some(Self(candidate.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Matching rules for one process lifetime.
///
/// Built from `Config` at startup and passed explicitly into the pipeline;
/// nothing in here is read from ambient global state, so tests can inject
/// whatever rules they need.
#[derive(Debug, Clone)]
pub struct LinkRules {
    /// Host markers recognized as marketplace product pages.
    pub marketplace_hosts: Vec<String>,
    /// Host markers recognized as redirecting short links.
    pub shortener_hosts: Vec<String>,
    /// Domain used when building rewritten links.
    pub reply_domain: String,
    /// Tag appended to every rewritten link.
    pub affiliate_tag: String,
    /// Timeout for one short-link expansion request.
    pub resolve_timeout: Duration,
    /// When set, the permissive bare-segment fallback is skipped and only
    /// the explicit path and query-parameter forms are accepted.
    pub strict_segments: bool,
}

impl LinkRules {
    pub fn is_marketplace(&self, url: &str) -> bool {
        host_matches(url, &self.marketplace_hosts)
    }

    pub fn is_shortener(&self, url: &str) -> bool {
        host_matches(url, &self.shortener_hosts)
    }
}

/// True when the URL parses and its host contains one of the markers,
/// case-insensitively. Only the host section is inspected; a marker
/// appearing in the path or query does not count.
fn host_matches(url: &str, markers: &[String]) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    markers
        .iter()
        .any(|marker| host.contains(&marker.to_ascii_lowercase()))
}

/// Canonical affiliate link: always the `/dp/` path form, regardless of
/// which pattern matched the inbound URL.
pub fn affiliate_url(id: &ProductId, rules: &LinkRules) -> String {
    format!(
        "https://{}/dp/{id}?tag={}",
        rules.reply_domain, rules.affiliate_tag
    )
}

/// Per-link processing outcome, kept in message discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Host is neither a recognized marketplace nor a recognized shortener.
    Rejected { url: String },
    /// No identifier pattern matched the (possibly expanded) URL.
    ExtractionFailed { url: String },
    /// Canonical affiliate URL built for this link.
    Success { affiliate_url: String },
}

#[cfg(test)]
pub(crate) fn test_rules() -> LinkRules {
    LinkRules {
        marketplace_hosts: vec!["amazon.".into()],
        shortener_hosts: vec!["amzn.to".into(), "amzn.eu".into()],
        reply_domain: "www.amazon.it".into(),
        affiliate_tag: "test-21".into(),
        resolve_timeout: Duration::from_secs(2),
        strict_segments: false,
    }
}
