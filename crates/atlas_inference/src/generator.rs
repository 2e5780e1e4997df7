use std::sync::Arc;

use atlas_core::{Article, Error, Result};
use tracing::{info, warn};

use crate::backends::GenerationBackend;
use crate::coerce::coerce_article;
use crate::prompt::build_prompt;
use crate::repair::extract_json_candidate;
use crate::response::parse_response;

const MAX_ATTEMPTS: u32 = 3;

/// Drives the generate-repair-coerce-validate loop against a backend.
/// Stateless across invocations; each `generate` call is independent.
pub struct ArticleGenerator {
    backend: Arc<dyn GenerationBackend>,
}

impl ArticleGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Generates a validated article for `topic`, grounding the prompt
    /// in `digest`. Up to three sequential attempts with no backoff;
    /// retryable failures are absorbed, and exhaustion surfaces as
    /// `GenerationFailure` carrying the last raw response text (empty
    /// if no attempt ever produced one).
    pub async fn generate(&self, topic: &str, digest: &str) -> Result<Article> {
        let prompt = build_prompt(topic, digest);
        let mut last_response = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            let raw = match self.backend.complete(&prompt).await {
                Ok(text) => text,
                Err(err) if err.is_retryable() => {
                    warn!(attempt, backend = self.backend.name(), "backend call failed: {err}");
                    continue;
                }
                Err(err) => return Err(err),
            };
            last_response = raw.clone();

            match shape_response(&raw) {
                Ok(article) => {
                    info!(attempt, "✅ Generated valid article for '{topic}'");
                    return Ok(article);
                }
                Err(err) if err.is_retryable() => {
                    warn!(attempt, "attempt failed: {err}");
                    warn!("raw response: {raw}");
                }
                Err(err) => return Err(err),
            }
        }

        Err(Error::GenerationFailure {
            attempts: MAX_ATTEMPTS,
            last_response,
        })
    }
}

/// Repair, parse, coerce and validate one accumulated response.
fn shape_response(raw: &str) -> Result<Article> {
    let candidate = extract_json_candidate(raw);
    let shell = parse_response(&candidate)?;
    let article = coerce_article(shell)?;
    article.validate()?;
    Ok(article)
}
