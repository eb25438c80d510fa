use super::types::{LinkRules, ProductId};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Path patterns tried in order; first match wins.
///
/// The specific `/dp/`, `/gp/product/` and `/product/` markers come before
/// the bare-segment fallback, which is permissive enough to shadow them:
/// without that ordering an unrelated ten-character slug earlier in the
/// path could win over an explicit `/dp/` segment.
static PATH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)/dp/([A-Z0-9]{10})",
        r"(?i)/gp/product/([A-Z0-9]{10})",
        r"(?i)/product/([A-Z0-9]{10})",
        r"(?i)/([A-Z0-9]{10})(?:[/?]|$)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("pattern literals are valid"))
    .collect()
});

/// Extract the product identifier from a (possibly expanded) URL.
///
/// Legacy product links carry the identifier in several path shapes; query
/// parameters are a last resort because canonical links always prefer the
/// path form. Matching is case-insensitive and the result is uppercased.
/// Never panics; anything that does not fit simply yields `None`.
pub fn extract_product_id(url: &str, rules: &LinkRules) -> Option<ProductId> {
    let tried = if rules.strict_segments {
        // Strict mode drops the bare-segment fallback, which can
        // false-positive on unrelated ten-character path slugs.
        &PATH_PATTERNS[..3]
    } else {
        &PATH_PATTERNS[..]
    };

    for pattern in tried {
        if let Some(caps) = pattern.captures(url) {
            if let Some(id) = ProductId::parse(&caps[1]) {
                return Some(id);
            }
        }
    }

    query_param_id(url)
}

fn query_param_id(url: &str) -> Option<ProductId> {
    let parsed = Url::parse(url).ok()?;
    for name in ["asin", "productID"] {
        let value = parsed
            .query_pairs()
            .find_map(|(key, value)| (key.as_ref() == name).then_some(value));
        if let Some(id) = value.as_deref().and_then(ProductId::parse) {
            return Some(id);
        }
    }
    None
}
