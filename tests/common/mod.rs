// Scripted stand-in for the Groq services shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use speaking_partner::session::Turn;
use speaking_partner::{AiError, AiServices, Gender, Level};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ConverseCall {
    pub user_text: String,
    pub level: Level,
    pub history: Vec<Turn>,
    pub exchange_count: u32,
}

#[derive(Debug, Clone)]
pub struct SynthesizeCall {
    pub text: String,
    pub level: Level,
    pub gender: Gender,
}

#[derive(Default)]
pub struct FakeAi {
    /// Queued chat replies; "Sounds good!" once exhausted
    pub replies: Mutex<VecDeque<Result<String, AiError>>>,
    pub transcript: Mutex<Option<Result<String, AiError>>>,
    pub summary: Mutex<Option<Result<String, AiError>>>,
    pub fail_synthesis: AtomicBool,
    pub converse_delay: Option<Duration>,

    pub converse_calls: Mutex<Vec<ConverseCall>>,
    pub synthesize_calls: Mutex<Vec<SynthesizeCall>>,
    pub summarize_calls: Mutex<Vec<Vec<String>>>,
}

impl FakeAi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fake = Self::new();
        fake.replies
            .lock()
            .unwrap()
            .extend(replies.into_iter().map(|r| Ok(r.into())));
        fake
    }

    pub fn push_reply(&self, reply: Result<String, AiError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn set_transcript(&self, transcript: Result<String, AiError>) {
        *self.transcript.lock().unwrap() = Some(transcript);
    }

    pub fn set_summary(&self, summary: Result<String, AiError>) {
        *self.summary.lock().unwrap() = Some(summary);
    }

    pub fn fail_synthesis(&self, fail: bool) {
        self.fail_synthesis.store(fail, Ordering::SeqCst);
    }

    pub fn converse_calls(&self) -> Vec<ConverseCall> {
        self.converse_calls.lock().unwrap().clone()
    }

    pub fn synthesize_calls(&self) -> Vec<SynthesizeCall> {
        self.synthesize_calls.lock().unwrap().clone()
    }

    pub fn summarize_calls(&self) -> Vec<Vec<String>> {
        self.summarize_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiServices for FakeAi {
    async fn transcribe(&self, _audio: Vec<u8>, _filename: &str) -> Result<String, AiError> {
        match self.transcript.lock().unwrap().take() {
            Some(result) => result,
            None => Ok("hello from the microphone".to_string()),
        }
    }

    async fn converse(
        &self,
        user_text: &str,
        level: Level,
        history: &[Turn],
        exchange_count: u32,
    ) -> Result<String, AiError> {
        if let Some(delay) = self.converse_delay {
            tokio::time::sleep(delay).await;
        }
        self.converse_calls.lock().unwrap().push(ConverseCall {
            user_text: user_text.to_string(),
            level,
            history: history.to_vec(),
            exchange_count,
        });
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("Sounds good!".to_string()))
    }

    async fn synthesize(
        &self,
        text: &str,
        level: Level,
        gender: Gender,
    ) -> Result<Vec<u8>, AiError> {
        self.synthesize_calls.lock().unwrap().push(SynthesizeCall {
            text: text.to_string(),
            level,
            gender,
        });
        if self.fail_synthesis.load(Ordering::SeqCst) {
            return Err(AiError::Synthesis("voice unavailable".to_string()));
        }
        Ok(b"RIFF".to_vec())
    }

    async fn summarize(&self, user_messages: &[&str], _level: Level) -> Result<String, AiError> {
        self.summarize_calls
            .lock()
            .unwrap()
            .push(user_messages.iter().map(|m| m.to_string()).collect());
        match self.summary.lock().unwrap().take() {
            Some(result) => result,
            None => Ok("1. Overall Score: 7/10".to_string()),
        }
    }
}
