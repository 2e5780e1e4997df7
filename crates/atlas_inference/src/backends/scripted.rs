use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use atlas_core::{Error, Result};

use super::GenerationBackend;

/// What a scripted backend does on one call.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this text as the accumulated response.
    Text(String),
    /// Fail the call as if the endpoint were unreachable.
    Offline,
}

/// A backend that replays a fixed sequence of canned replies and counts
/// calls. Stands in for the live endpoint in tests and offline runs;
/// calls past the end of the script keep returning the last reply.
pub struct ScriptedBackend {
    script: Mutex<Vec<ScriptedReply>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(script: Vec<ScriptedReply>) -> Self {
        assert!(!script.is_empty(), "scripted backend needs at least one reply");
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self::new(
            responses
                .into_iter()
                .map(|r| ScriptedReply::Text(r.to_string()))
                .collect(),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ScriptedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedBackend")
            .field("calls", &self.calls())
            .finish()
    }
}

#[async_trait::async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap();
        let reply = script.get(call).unwrap_or_else(|| {
            script.last().expect("script is non-empty")
        });
        match reply {
            ScriptedReply::Text(text) => Ok(text.clone()),
            ScriptedReply::Offline => Err(Error::BackendUnavailable(
                "scripted endpoint offline".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order_and_counts_calls() {
        let backend = ScriptedBackend::with_responses(vec!["first", "second"]);
        assert_eq!(backend.complete("p").await.unwrap(), "first");
        assert_eq!(backend.complete("p").await.unwrap(), "second");
        // Past the end the last reply repeats.
        assert_eq!(backend.complete("p").await.unwrap(), "second");
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn offline_reply_is_backend_unavailable() {
        let backend = ScriptedBackend::new(vec![ScriptedReply::Offline]);
        assert!(matches!(
            backend.complete("p").await,
            Err(Error::BackendUnavailable(_))
        ));
    }
}
