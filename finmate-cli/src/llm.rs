use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::chat::Conversation;
use crate::config::Config;

/// Hidden first turn restricting the assistant to finance topics.
pub const SCOPE_PREAMBLE: &str = "System Instruction: Your expertise is strictly limited to finance and advisory topics. \
Your answers must be crisp and short. Do not answer questions or engage in conversations \
about any other subject. If a user asks about a topic outside of finance or advisory, \
you must politely decline and state that you can only discuss financial matters.";

pub const SCOPE_ACK: &str =
    "Understood. I will only answer questions about finance and advisory, and I will keep my answers concise.";

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: String,
}

impl LlmConfig {
    /// Resolve the API key from the environment variable named in the config.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let var = &cfg.llm.api_key_env;
        let api_key = std::env::var(var).unwrap_or_default();
        if api_key.trim().is_empty() {
            bail!("the {var} environment variable is not set; export your API key as {var}");
        }
        Ok(Self {
            model: cfg.llm.model.clone(),
            base_url: cfg.llm.base_url.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `user` or `model`
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            content: content.into(),
        }
    }
}

/// History every session starts from.
pub fn seeded_history() -> Vec<ChatTurn> {
    vec![ChatTurn::user(SCOPE_PREAMBLE), ChatTurn::model(SCOPE_ACK)]
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentOut>,
}

#[derive(Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    text: Option<String>,
}

fn build_request(turns: &[ChatTurn]) -> GenerateRequest {
    GenerateRequest {
        contents: turns
            .iter()
            .map(|t| Content {
                role: t.role.clone(),
                parts: vec![Part {
                    text: t.content.clone(),
                }],
            })
            .collect(),
    }
}

fn reply_text(resp: GenerateResponse) -> Result<String> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .context("model returned no candidates")?;
    let mut s = String::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(t) = part.text {
            s.push_str(&t);
        }
    }
    Ok(s.trim().to_string())
}

pub fn chat_complete(config: &LlmConfig, turns: &[ChatTurn]) -> Result<String> {
    // The CLI runs under #[tokio::main]; a nested runtime would panic.
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        tokio::task::block_in_place(|| handle.block_on(gemini_complete(config, turns)))
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        rt.block_on(gemini_complete(config, turns))
    }
}

async fn gemini_complete(config: &LlmConfig, turns: &[ChatTurn]) -> Result<String> {
    let client = reqwest::Client::new();
    let resp = client
        .post(config.endpoint())
        .header("x-goog-api-key", &config.api_key)
        .json(&build_request(turns))
        .send()
        .await
        .context("gemini request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("gemini error: {status} {txt}");
    }

    let out: GenerateResponse = resp.json().await.context("parse gemini response")?;
    reply_text(out)
}

/// Chat session backed by the Gemini `generateContent` endpoint.
pub struct GeminiConversation {
    config: LlmConfig,
    history: Vec<ChatTurn>,
}

impl GeminiConversation {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            history: seeded_history(),
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }
}

impl Conversation for GeminiConversation {
    fn send(&mut self, query: &str) -> Result<String> {
        let mut turns = self.history.clone();
        turns.push(ChatTurn::user(query));
        let reply = chat_complete(&self.config, &turns)?;
        // History only grows on success.
        turns.push(ChatTurn::model(reply.clone()));
        self.history = turns;
        Ok(reply)
    }
}
