use super::extract::extract_product_id;
use super::resolver::Resolver;
use super::types::{LinkOutcome, LinkRules, affiliate_url};

pub const NO_LINKS_REPLY: &str = "No link found in the message";
pub const SUCCESS_HEADER: &str = "✅ Affiliate link generated:";

/// Everything the transport needs to answer one inbound message.
///
/// Rejections and extraction failures are reported eagerly, one reply per
/// link in discovery order; successes are batched into a single
/// consolidated summary sent last. Pure data: sending and deletion happen
/// in the channel layer, which keeps this whole pipeline testable without
/// a transport.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MessageReport {
    /// Per-link outcomes in discovery order.
    pub outcomes: Vec<LinkOutcome>,
    /// One reply per rejected or failed link, in discovery order.
    pub immediate_replies: Vec<String>,
    /// Consolidated success reply; present iff at least one link succeeded.
    pub summary: Option<String>,
    /// True iff at least one link succeeded.
    pub delete_original: bool,
}

/// Run one message through scan → classify → resolve → extract → build.
///
/// Single pass, links processed sequentially in discovery order, no
/// backtracking and no retries. A bad link never aborts the remaining
/// links in the same message.
pub async fn process(text: &str, rules: &LinkRules, resolver: &Resolver) -> MessageReport {
    let urls = super::detector::detect_urls(text);
    if urls.is_empty() {
        return MessageReport {
            immediate_replies: vec![NO_LINKS_REPLY.to_string()],
            ..MessageReport::default()
        };
    }

    let mut report = MessageReport::default();
    for url in urls {
        let outcome = process_link(&url, rules, resolver).await;
        match &outcome {
            LinkOutcome::Rejected { url } => report
                .immediate_replies
                .push(format!("❌ {url} is not a valid Amazon link")),
            LinkOutcome::ExtractionFailed { url } => report
                .immediate_replies
                .push(format!("❌ Could not extract a product ID from: {url}")),
            LinkOutcome::Success { .. } => {}
        }
        report.outcomes.push(outcome);
    }

    let rewritten: Vec<&str> = report
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            LinkOutcome::Success { affiliate_url } => Some(affiliate_url.as_str()),
            _ => None,
        })
        .collect();

    if !rewritten.is_empty() {
        report.summary = Some(format!("{SUCCESS_HEADER}\n\n{}", rewritten.join("\n\n")));
        report.delete_original = true;
    }

    report
}

async fn process_link(url: &str, rules: &LinkRules, resolver: &Resolver) -> LinkOutcome {
    if !rules.is_marketplace(url) && !rules.is_shortener(url) {
        return LinkOutcome::Rejected {
            url: url.to_string(),
        };
    }

    // Only shortener hosts are expanded; the resolver returns everything
    // else unchanged without a network call.
    let expanded = resolver.resolve(url).await;

    match extract_product_id(&expanded, rules) {
        Some(id) => LinkOutcome::Success {
            affiliate_url: affiliate_url(&id, rules),
        },
        None => LinkOutcome::ExtractionFailed {
            url: url.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::types::test_rules;

    fn resolver() -> Resolver {
        Resolver::new(&test_rules()).unwrap()
    }

    #[tokio::test]
    async fn no_links_single_informational_line() {
        let report = process("hello there", &test_rules(), &resolver()).await;
        assert!(report.outcomes.is_empty());
        assert_eq!(report.immediate_replies, vec![NO_LINKS_REPLY.to_string()]);
        assert!(report.summary.is_none());
        assert!(!report.delete_original);
    }

    #[tokio::test]
    async fn single_product_link_success() {
        let report = process(
            "Check this out https://www.amazon.it/dp/B08N5WRWNW/ref=xyz",
            &test_rules(),
            &resolver(),
        )
        .await;

        assert_eq!(report.outcomes.len(), 1);
        assert!(report.immediate_replies.is_empty());
        let summary = report.summary.unwrap();
        assert!(summary.starts_with(SUCCESS_HEADER));
        assert!(summary.contains("https://www.amazon.it/dp/B08N5WRWNW?tag=test-21"));
        assert!(report.delete_original);
    }

    #[tokio::test]
    async fn out_of_domain_link_rejected() {
        let report = process("https://example.com/page", &test_rules(), &resolver()).await;

        assert_eq!(
            report.outcomes,
            vec![LinkOutcome::Rejected {
                url: "https://example.com/page".into()
            }]
        );
        assert_eq!(report.immediate_replies.len(), 1);
        assert!(report.immediate_replies[0].contains("not a valid Amazon link"));
        assert!(report.summary.is_none());
        assert!(!report.delete_original);
    }

    #[tokio::test]
    async fn marketplace_link_without_id_fails_extraction() {
        let report = process(
            "https://www.amazon.it/gp/help/customer",
            &test_rules(),
            &resolver(),
        )
        .await;

        assert_eq!(report.outcomes.len(), 1);
        assert!(matches!(
            report.outcomes[0],
            LinkOutcome::ExtractionFailed { .. }
        ));
        assert!(report.immediate_replies[0].contains("Could not extract a product ID"));
        assert!(!report.delete_original);
    }

    #[tokio::test]
    async fn mixed_links_report_failures_eagerly_and_batch_successes() {
        let report = process(
            "https://example.com/x and https://www.amazon.it/dp/B08N5WRWNW",
            &test_rules(),
            &resolver(),
        )
        .await;

        assert_eq!(report.outcomes.len(), 2);
        assert!(matches!(report.outcomes[0], LinkOutcome::Rejected { .. }));
        assert!(matches!(report.outcomes[1], LinkOutcome::Success { .. }));
        assert_eq!(report.immediate_replies.len(), 1);
        let summary = report.summary.unwrap();
        assert_eq!(
            summary.matches("https://www.amazon.it/dp/").count(),
            1,
            "exactly one affiliate URL in the summary"
        );
        assert!(report.delete_original);
    }

    #[tokio::test]
    async fn two_successes_blank_line_separated() {
        let report = process(
            "https://www.amazon.it/dp/B08N5WRWNW https://www.amazon.it/dp/B00TEST123",
            &test_rules(),
            &resolver(),
        )
        .await;

        let summary = report.summary.unwrap();
        assert_eq!(
            summary,
            format!(
                "{SUCCESS_HEADER}\n\n{}\n\n{}",
                "https://www.amazon.it/dp/B08N5WRWNW?tag=test-21",
                "https://www.amazon.it/dp/B00TEST123?tag=test-21"
            )
        );
    }

    #[tokio::test]
    async fn duplicate_links_processed_independently() {
        let report = process(
            "https://www.amazon.it/dp/B08N5WRWNW https://www.amazon.it/dp/B08N5WRWNW",
            &test_rules(),
            &resolver(),
        )
        .await;

        assert_eq!(report.outcomes.len(), 2);
        let summary = report.summary.unwrap();
        assert_eq!(summary.matches("?tag=test-21").count(), 2);
    }
}
