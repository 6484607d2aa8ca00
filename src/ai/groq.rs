use super::voice::{model_tier, voice_for, ModelTier};
use super::{AiError, AiServices};
use crate::config::GroqConfig;
use crate::content;
use crate::session::{Gender, Level, Role, Turn};
use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const CHAT_MAX_TOKENS: u32 = 300;
const CHAT_TEMPERATURE: f32 = 0.8;
const SUMMARY_MAX_TOKENS: u32 = 500;
const SUMMARY_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

/// Client for the OpenAI-compatible Groq REST API
pub struct GroqClient {
    http: Client,
    config: GroqConfig,
    api_key: SecretString,
}

impl GroqClient {
    pub fn new(config: GroqConfig, api_key: SecretString) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key.expose_secret())
    }

    fn chat_model(&self, level: Level) -> &str {
        match model_tier(level) {
            ModelTier::Light => self.config.light_model.as_str(),
            ModelTier::Heavy => self.config.heavy_model.as_str(),
        }
    }

    async fn chat(&self, request: ChatRequest<'_>) -> Result<String, String> {
        let response = self
            .http
            .post(self.url("chat/completions"))
            .header("Authorization", self.bearer())
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let body: ChatResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| e.to_string())?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| "response contained no choices".to_string())
    }
}

/// Turn a non-2xx response into its status and body text
async fn ensure_success(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(format!("HTTP {}: {}", status, text))
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn audio_mime(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        _ => "audio/webm",
    }
}

#[async_trait]
impl AiServices for GroqClient {
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String, AiError> {
        debug!(
            "Transcription request (model={}, file={}, bytes={})",
            self.config.transcription_model,
            filename,
            audio.len()
        );

        let file_part = reqwest::multipart::Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(audio_mime(filename))
            .map_err(|e| AiError::Transcription(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.transcription_model.clone())
            .text("language", "en")
            .text("response_format", "text");

        let response = self
            .http
            .post(self.url("audio/transcriptions"))
            .header("Authorization", self.bearer())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AiError::Transcription(e.to_string()))?;

        let text = ensure_success(response)
            .await
            .map_err(AiError::Transcription)?
            .text()
            .await
            .map_err(|e| AiError::Transcription(e.to_string()))?;

        Ok(text.trim().to_string())
    }

    async fn converse(
        &self,
        user_text: &str,
        level: Level,
        history: &[Turn],
        exchange_count: u32,
    ) -> Result<String, AiError> {
        let model = self.chat_model(level);
        debug!(
            "Chat request (model={}, level={}, exchange={}, context={})",
            model,
            level,
            exchange_count,
            history.len()
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: content::system_prompt(level).to_string(),
        });
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: role_name(turn.role).to_string(),
            content: turn.content.clone(),
        }));
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user_text.to_string(),
        });

        self.chat(ChatRequest {
            model,
            messages,
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
        })
        .await
        .map_err(|e| {
            error!("Chat completion failed: {}", e);
            AiError::Completion(e)
        })
    }

    async fn synthesize(
        &self,
        text: &str,
        level: Level,
        gender: Gender,
    ) -> Result<Vec<u8>, AiError> {
        let request = SpeechRequest {
            model: &self.config.speech_model,
            voice: voice_for(level, gender),
            input: text,
            response_format: "wav",
        };
        debug!("Speech request (voice={}, chars={})", request.voice, request.input.len());

        let response = self
            .http
            .post(self.url("audio/speech"))
            .header("Authorization", self.bearer())
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Synthesis(e.to_string()))?;

        let bytes = ensure_success(response)
            .await
            .map_err(AiError::Synthesis)?
            .bytes()
            .await
            .map_err(|e| AiError::Synthesis(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn summarize(&self, user_messages: &[&str], level: Level) -> Result<String, AiError> {
        debug!("Summary request (level={}, messages={})", level, user_messages.len());

        self.chat(ChatRequest {
            model: &self.config.heavy_model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: content::summary_prompt(level, user_messages),
            }],
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        })
        .await
        .map_err(|e| {
            error!("Summary completion failed: {}", e);
            AiError::Completion(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GroqClient {
        let config = GroqConfig {
            base_url: "http://localhost:9/v1/".to_string(),
            ..GroqConfig::default()
        };
        GroqClient::new(config, SecretString::from("test-key".to_string())).unwrap()
    }

    #[test]
    fn builds_endpoint_urls() {
        assert_eq!(
            client().url("chat/completions"),
            "http://localhost:9/v1/chat/completions"
        );
    }

    #[test]
    fn picks_model_by_level() {
        let c = client();
        assert_eq!(c.chat_model(Level::Beginner), "gemma2-9b-it");
        assert_eq!(c.chat_model(Level::Advanced), "llama-3.3-70b-versatile");
    }

    #[test]
    fn guesses_upload_mime_type() {
        assert_eq!(audio_mime("clip.mp3"), "audio/mpeg");
        assert_eq!(audio_mime("audio.webm"), "audio/webm");
        assert_eq!(audio_mime("noext"), "audio/webm");
    }

    #[test]
    fn chat_request_serializes_openai_shape() {
        let request = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: "hi".to_string(),
            }],
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "m");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "system");
    }
}
