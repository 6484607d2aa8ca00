use anyhow::{bail, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable holding the Groq API key
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub groq: GroqConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Largest accepted request body, voice uploads included
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroqConfig {
    pub base_url: String,
    /// Chat model for beginners
    pub light_model: String,
    /// Chat model for intermediate/advanced and for summaries
    pub heavy_model: String,
    pub transcription_model: String,
    pub speech_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle sessions are evicted after this many seconds; 0 disables eviction
    pub idle_ttl_secs: u64,
    pub reap_interval_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "speaking-partner".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            light_model: "gemma2-9b-it".to_string(),
            heavy_model: "llama-3.3-70b-versatile".to_string(),
            transcription_model: "whisper-large-v3".to_string(),
            speech_model: "playai-tts".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 3600,
            reap_interval_secs: 60,
        }
    }
}

impl Config {
    /// Load `path` (any format the `config` crate knows, extension optional)
    /// if it exists, then apply `SPEAKING_PARTNER__SECTION__KEY` overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SPEAKING_PARTNER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl HttpConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl GroqConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SessionConfig {
    /// `None` when idle eviction is disabled
    pub fn idle_ttl(&self) -> Option<Duration> {
        (self.idle_ttl_secs > 0).then(|| Duration::from_secs(self.idle_ttl_secs))
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs.max(1))
    }
}

/// Read the required API key; a missing or blank key is a startup error.
pub fn api_key_from_env() -> Result<SecretString> {
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(SecretString::from(key)),
        Ok(_) => bail!("{} is set but empty", API_KEY_VAR),
        Err(_) => bail!("Missing environment variable: {}", API_KEY_VAR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load("/nonexistent/speaking-partner").unwrap();

        assert_eq!(cfg.service.name, "speaking-partner");
        assert_eq!(cfg.service.http.address(), "0.0.0.0:8000");
        assert_eq!(cfg.groq.light_model, "gemma2-9b-it");
        assert_eq!(cfg.groq.heavy_model, "llama-3.3-70b-versatile");
        assert_eq!(cfg.session.idle_ttl(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[service.http]\nport = 9100\n\n[session]\nidle_ttl_secs = 0\n\n[groq]\ntimeout_secs = 5"
        )
        .unwrap();

        let cfg = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(cfg.service.http.port, 9100);
        assert_eq!(cfg.service.http.bind, "0.0.0.0");
        assert_eq!(cfg.session.idle_ttl(), None);
        assert_eq!(cfg.groq.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.groq.speech_model, "playai-tts");
    }
}
