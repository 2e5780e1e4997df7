use std::fmt;

use atlas_core::{Error, Result};
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GenerationBackend;

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.1:8b-instruct-q5_K_M";

/// Connection and sampling configuration for the local Ollama endpoint.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub num_ctx: u32,
    pub num_predict: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.5,
            num_ctx: 8000,
            num_predict: 2000,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    format: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Serialize)]
struct SamplingOptions {
    temperature: f32,
    num_ctx: u32,
    num_predict: u32,
}

/// One newline-delimited fragment of the streamed response.
#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

pub struct OllamaBackend {
    client: Client,
    config: OllamaConfig,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn parse_line(line: &[u8]) -> Result<StreamChunk> {
        serde_json::from_slice(line).map_err(|e| {
            Error::MalformedResponse(format!(
                "unparseable stream fragment '{}': {e}",
                String::from_utf8_lossy(line)
            ))
        })
    }
}

impl fmt::Debug for OllamaBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaBackend")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait::async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "Ollama"
    }

    /// POSTs `/api/generate` and accumulates the newline-delimited
    /// fragment stream in arrival order until the terminal `done`
    /// fragment; anything the backend sends after that is ignored. No
    /// client-side timeout beyond the connection's own.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            format: "json",
            stream: true,
            options: SamplingOptions {
                temperature: self.config.temperature,
                num_ctx: self.config.num_ctx,
                num_predict: self.config.num_predict,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.config.endpoint))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut full_response = String::new();

        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
            while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                let line = &line[..line.len() - 1];
                if line.is_empty() {
                    continue;
                }
                let fragment = Self::parse_line(line)?;
                if fragment.done {
                    debug!("stream complete, {} bytes accumulated", full_response.len());
                    return Ok(full_response);
                }
                full_response.push_str(&fragment.response);
            }
        }

        // Stream ended without a terminal fragment; a trailing
        // unterminated line still counts.
        if !buffer.is_empty() {
            let fragment = Self::parse_line(&buffer)?;
            if !fragment.done {
                full_response.push_str(&fragment.response);
            }
        }
        Ok(full_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_local_endpoint() {
        let config = OllamaConfig::default();
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "llama3.1:8b-instruct-q5_K_M");
        assert_eq!(config.num_ctx, 8000);
        assert_eq!(config.num_predict, 2000);
    }

    #[test]
    fn request_serializes_the_wire_shape() {
        let request = GenerateRequest {
            model: "llama3.1:8b-instruct-q5_K_M",
            prompt: "hello",
            format: "json",
            stream: true,
            options: SamplingOptions {
                temperature: 0.5,
                num_ctx: 8000,
                num_predict: 2000,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["format"], "json");
        assert_eq!(value["stream"], true);
        assert_eq!(value["options"]["num_predict"], 2000);
    }

    #[test]
    fn stream_fragments_parse_with_defaults() {
        let partial: StreamChunk = serde_json::from_str(r#"{"response":"{\"ti","done":false}"#).unwrap();
        assert_eq!(partial.response, "{\"ti");
        assert!(!partial.done);

        let terminal: StreamChunk = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(terminal.done);
        assert!(terminal.response.is_empty());
    }

    #[test]
    fn garbage_line_is_malformed_response() {
        assert!(matches!(
            OllamaBackend::parse_line(b"not json"),
            Err(Error::MalformedResponse(_))
        ));
    }
}
