use super::types::LinkRules;
use anyhow::Result;

/// Browser-like identification; some shortener origins reject requests
/// that carry a default HTTP-client user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

const MAX_REDIRECTS: usize = 10;

/// Expands shortener links to the URL an end client would land on.
///
/// The client is built once with the configured timeout and reused for
/// every request; expansion is the pipeline's only suspension point.
pub struct Resolver {
    client: reqwest::Client,
    rules: LinkRules,
}

impl Resolver {
    pub fn new(rules: &LinkRules) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(rules.resolve_timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            rules: rules.clone(),
        })
    }

    /// Resolve a URL to its final landed form.
    ///
    /// A URL whose host is not a recognized shortener is returned unchanged
    /// without touching the network. Otherwise a single GET is issued with
    /// redirect-following; the landed URL is returned and the body is never
    /// read. A non-2xx terminal status is still a successful resolution;
    /// only transport-level failures degrade, and they degrade to identity:
    /// the original URL is returned so the pipeline can keep going
    /// (extraction will then most likely fail on the unexpanded form).
    /// No retries.
    pub async fn resolve(&self, url: &str) -> String {
        if !self.rules.is_shortener(url) {
            return url.to_string();
        }

        match self.client.get(url).send().await {
            Ok(response) => {
                let landed = response.url().to_string();
                tracing::info!(short = url, expanded = %landed, "expanded short link");
                landed
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "short link expansion failed, keeping original");
                url.to_string()
            }
        }
    }
}
