//! Chat-completions client for hosted vision models.
//!
//! Speaks the OpenAI-compatible chat API, sending a text prompt plus an
//! inline image data URL as a single user message.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Clone)]
pub struct VisionClient {
    api_key: String,
    model: String,
    http: Client,
}

impl VisionClient {
    /// `timeout_secs` bounds the whole round trip; a hung remote call
    /// surfaces as a transport error instead of blocking the request.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http,
        }
    }

    /// Send one user turn of (prompt text, image data URL) and return the
    /// text of the first choice.
    pub async fn chat_with_image(
        &self,
        prompt: &str,
        image_data_url: &str,
    ) -> Result<String, VisionError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_data_url } },
                ],
            }],
        });

        let resp = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(VisionError::Api(text));
        }

        let completion: ChatCompletionResponse = resp.json().await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(VisionError::EmptyResponse)?;

        Ok(choice.message.content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug)]
pub enum VisionError {
    Http(reqwest::Error),
    Api(String),
    EmptyResponse,
}

impl From<reqwest::Error> for VisionError {
    fn from(e: reqwest::Error) -> Self {
        VisionError::Http(e)
    }
}

impl std::fmt::Display for VisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisionError::Http(e) => write!(f, "HTTP error: {}", e),
            VisionError::Api(s) => write!(f, "Vision API error: {}", s),
            VisionError::EmptyResponse => write!(f, "Vision API returned no choices"),
        }
    }
}

impl std::error::Error for VisionError {}
