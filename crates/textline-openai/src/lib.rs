//! OpenAI adapter (message composition).
//!
//! Implements the core `CompletionClient` port over the `chat/completions`
//! endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use textline_core::{
    config::OpenAiSettings,
    errors::Error,
    ports::{CompletionClient, CompletionRequest},
    Result,
};

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    settings: OpenAiSettings,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("openai client build error: {e}")))?;
        Ok(Self { settings, http })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.settings.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, req: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &req.system,
                },
                ChatMessage {
                    role: "user",
                    content: &req.user,
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("openai request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "openai completion failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| Error::External(format!("openai json error: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::External(
                "openai completion returned empty text".to_string(),
            ));
        }

        debug!(model = %self.settings.model, chars = text.len(), "openai completion ok");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(
            OpenAiSettings {
                api_key: "sk-test".to_string(),
                model: "gpt-4".to_string(),
                base_url: base_url.to_string(),
                max_tokens: 150,
                temperature: 0.7,
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "You are Dana from Dana's Bikes.".to_string(),
            user: "Write a reminder message with this context: tune-up at 2pm".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_trimmed_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4",
                "max_tokens": 150,
                "messages": [
                    {"role": "system", "content": "You are Dana from Dana's Bikes."},
                    {"role": "user", "content": "Write a reminder message with this context: tune-up at 2pm"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "\n Tune-up at 2pm today! - Dana \n"}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client(&server.url()).complete(&request()).await.unwrap();
        assert_eq!(text, "Tune-up at 2pm today! - Dana");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let err = client(&server.url()).complete(&request()).await.unwrap_err();
        assert!(matches!(err, Error::External(ref m) if m.contains("401")));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(&server.url()).complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("empty text"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("<html>gateway timeout</html>")
            .create_async()
            .await;

        let err = client(&server.url()).complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("openai json error"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let err = client("http://127.0.0.1:9")
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
