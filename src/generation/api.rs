//! JSON-over-HTTP client for the generation service.

use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::GenerationSettings;
use crate::http_client;

use super::{GenerationError, GenerationReply, GenerationRequest, GenerationService};

const MAX_RESPONSE_BYTES: usize = 256 * 1024;

/// Posts [`GenerationRequest`]s to a configured endpoint.
#[derive(Debug)]
pub struct HttpGenerationService {
    endpoint: Option<String>,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl HttpGenerationService {
    pub fn new(endpoint: Option<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let endpoint = endpoint
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self {
            endpoint,
            api_key,
            agent: http_client::agent_with_timeout(timeout),
        }
    }

    /// Build from settings, reading the API key from the configured env var.
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        let api_key = settings
            .api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok());
        Self::new(settings.endpoint.clone(), api_key, settings.timeout())
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

impl GenerationService for HttpGenerationService {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationReply, GenerationError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Err(GenerationError::NotConfigured);
        };
        let mut req = self
            .agent
            .post(endpoint)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");
        if let Some(key) = self.api_key.as_deref() {
            req = req.set("Authorization", &format!("Bearer {key}"));
        }

        let response = match req.send_json(request) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_response_text(response, MAX_RESPONSE_BYTES)
                    .unwrap_or_else(|err| err);
                warn!("Generation request failed with HTTP {code}");
                return Err(map_status_error(code, body));
            }
            Err(ureq::Error::Transport(err)) => {
                warn!("Generation request transport error: {err}");
                return Err(GenerationError::Transport(err.to_string()));
            }
        };

        let body = http_client::read_response_text(response, MAX_RESPONSE_BYTES)
            .map_err(GenerationError::InvalidResponse)?;
        let reply = parse_reply(&body)?;
        info!(
            architecture = request.architecture.tag(),
            chars = reply.generated_text.chars().count(),
            "Generation reply received"
        );
        Ok(reply)
    }
}

fn map_status_error(code: u16, body: String) -> GenerationError {
    match code {
        401 | 403 => GenerationError::Unauthorized,
        429 => GenerationError::RateLimited,
        500..=599 => GenerationError::ServerError(body),
        _ => GenerationError::Status { code, body },
    }
}

#[derive(Debug, Deserialize)]
struct GenerationReplyWire {
    #[serde(alias = "generatedText")]
    generated_text: Option<String>,
    #[serde(alias = "explanationText", default)]
    explanation_text: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

fn parse_reply(body: &str) -> Result<GenerationReply, GenerationError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::InvalidResponse(
            "Empty response body".to_string(),
        ));
    }
    let parsed: GenerationReplyWire = serde_json::from_str(trimmed)
        .map_err(|err| GenerationError::InvalidResponse(format!("{err}: {trimmed}")))?;
    if let Some(generated_text) = parsed.generated_text {
        return Ok(GenerationReply {
            generated_text,
            explanation_text: parsed.explanation_text.unwrap_or_default(),
        });
    }
    let message = parsed
        .error
        .or(parsed.message)
        .unwrap_or_else(|| "Missing generated_text in response".to_string());
    Err(GenerationError::InvalidResponse(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::architecture::Architecture;
    use crate::http_client::test_server::serve_once;

    fn request() -> GenerationRequest {
        GenerationRequest {
            input_text: "Once upon a time".to_string(),
            architecture: Architecture::Recurrent,
            final_loss: 0.2,
        }
    }

    fn service(url: String) -> HttpGenerationService {
        HttpGenerationService::new(Some(url), None, Duration::from_secs(5))
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn parses_snake_and_camel_case_replies() {
        let reply =
            parse_reply(r#"{ "generated_text": "there was", "explanation_text": "why" }"#).unwrap();
        assert_eq!(reply.generated_text, "there was");
        let reply = parse_reply(r#"{ "generatedText": "a", "explanationText": "b" }"#).unwrap();
        assert_eq!(reply.explanation_text, "b");
    }

    #[test]
    fn reports_error_field() {
        let err = parse_reply(r#"{ "error": "model overloaded" }"#).unwrap_err();
        assert_eq!(
            err,
            GenerationError::InvalidResponse("model overloaded".to_string())
        );
    }

    #[test]
    fn rejects_non_json_body() {
        assert!(matches!(
            parse_reply("<html>oops</html>"),
            Err(GenerationError::InvalidResponse(_))
        ));
        assert!(matches!(parse_reply("  "), Err(GenerationError::InvalidResponse(_))));
    }

    #[test]
    fn unconfigured_endpoint_fails_without_network() {
        let service =
            HttpGenerationService::new(Some("   ".to_string()), None, Duration::from_secs(1));
        assert!(!service.is_configured());
        assert_eq!(service.generate(&request()), Err(GenerationError::NotConfigured));
    }

    #[test]
    fn posts_and_reads_reply_from_server() {
        let url = serve_once(json_response(
            "200 OK",
            r#"{"generated_text":" there lived a cat","explanation_text":"short memory"}"#,
        ));
        let reply = service(url).generate(&request()).unwrap();
        assert_eq!(reply.generated_text, " there lived a cat");
        assert_eq!(reply.explanation_text, "short memory");
    }

    #[test]
    fn maps_server_errors() {
        let url = serve_once(json_response("503 Service Unavailable", "busy"));
        let err = service(url).generate(&request()).unwrap_err();
        assert_eq!(err, GenerationError::ServerError("busy".to_string()));

        let url = serve_once(json_response("429 Too Many Requests", "{}"));
        let err = service(url).generate(&request()).unwrap_err();
        assert_eq!(err, GenerationError::RateLimited);
    }
}
