use async_trait::async_trait;
use eyre::{Result, WrapErr, bail};
use log::debug;
use serde::{Deserialize, Serialize};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// One system instruction plus one user prompt, answered with one text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A text-generation endpoint
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// OpenAI chat completions client
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Build a client from OPENAI_API_KEY, if set
    pub fn from_env(client: reqwest::Client) -> Option<Self> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(|k| Self::new(client, k))
    }
}

fn request_body(request: &CompletionRequest) -> serde_json::Value {
    serde_json::json!({
        "model": request.model,
        "messages": [
            {
                "role": "system",
                "content": request.system
            },
            {
                "role": "user",
                "content": request.prompt
            }
        ],
        "max_tokens": request.max_tokens,
        "temperature": request.temperature
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Message from an OpenAI error envelope, else the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ChatResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!("Requesting completion from OpenAI with model {}", request.model);

        let resp = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body(request))
            .send()
            .await
            .wrap_err("sending completion request")?;

        let status = resp.status();
        let body = resp.text().await.wrap_err("reading completion response")?;
        if !status.is_success() {
            bail!("completion request rejected ({status}): {}", api_error_message(&body));
        }

        completion_text(&body)
    }
}

/// Text of the first choice of a chat completion body
fn completion_text(body: &str) -> Result<String> {
    let resp: ChatResponse = serde_json::from_str(body).wrap_err("decoding completion response")?;
    if let Some(err) = resp.error {
        bail!("completion failed: {}", err.message);
    }
    match resp.choices.into_iter().next().and_then(|c| c.message.content) {
        Some(text) => Ok(text),
        None => bail!("completion response has no message content"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            system: "Eres un experto.".to_string(),
            prompt: "Analiza esto".to_string(),
            max_tokens: 1500,
            temperature: 0.7,
        }
    }

    #[test]
    fn test_request_body() {
        let body = request_body(&sample_request());
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 1500);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Eres un experto.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Analiza esto");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_completion_text_first_choice() {
        let body = r#"{
            "id": "chatcmpl-7",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "🔥 CONFLICTO\n- Giro a mitad"}},
                {"index": 1, "message": {"role": "assistant", "content": "descartada"}}
            ]
        }"#;
        assert_eq!(completion_text(body).unwrap(), "🔥 CONFLICTO\n- Giro a mitad");
    }

    #[test]
    fn test_completion_text_without_choices() {
        let err = completion_text(r#"{"choices": []}"#).unwrap_err();
        assert!(err.to_string().contains("no message content"));

        let err = completion_text(r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#).unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }

    #[test]
    fn test_completion_text_surfaces_api_error() {
        let body = r#"{"error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}}"#;
        let err = completion_text(body).unwrap_err();
        assert_eq!(err.to_string(), "completion failed: You exceeded your current quota");
    }

    #[test]
    fn test_completion_text_not_json() {
        assert!(completion_text("<html>502 Bad Gateway</html>").is_err());
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "code": "invalid_api_key"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
        assert_eq!(api_error_message("  upstream timeout\n"), "upstream timeout");
    }
}
