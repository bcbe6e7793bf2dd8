// src/llm.rs
// Answer generation: Groq chat completions with model fallback, plus the
// engine that gates questions and persists both sides of an exchange.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classifier;
use crate::config::Config;
use crate::database::{Database, Role};
use crate::error::{Result, VakilError};

/// Models tried in order until one answers.
pub const FALLBACK_MODELS: &[&str] = &["llama-3.1-70b-specdec", "llama-3.1-8b-instant"];

/// Canned apology when every model attempt fails.
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't process this legal question right now.";

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are a helpful legal assistant.";
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 800;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionReply,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionReply {
    content: String,
}

/// Chat-completion backend talking to the Groq API.
#[derive(Debug, Clone)]
pub struct GroqStrategy {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GroqStrategy {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_CHAT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint,
        }
    }

    /// Tries each fallback model in order and returns the first answer.
    pub async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let user_prompt = format!("Document:\n{}\n\nQuestion:\n{}", context, question);

        for &model in FALLBACK_MODELS {
            match self.complete(model, &user_prompt).await {
                Ok(answer) => return Ok(answer),
                Err(e) => {
                    warn!(model, error = %e, "chat completion attempt failed");
                }
            }
        }

        Err(VakilError::ModelError(
            "all fallback models failed".to_string(),
        ))
    }

    async fn complete(&self, model: &str, user_prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model,
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatCompletionMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatCompletionResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| VakilError::ModelError(format!("{} returned no choices", model)))
    }
}

/// Backend used when no Groq API key is configured. Always fails so
/// callers fall back to their canned replies.
#[derive(Debug, Clone, Default)]
pub struct OfflineStrategy;

impl OfflineStrategy {
    pub async fn answer(&self, _question: &str, _context: &str) -> Result<String> {
        Err(VakilError::ModelError(
            "no Groq API key configured".to_string(),
        ))
    }
}

/// Strategy pattern over the available answer backends.
#[derive(Debug, Clone)]
pub enum AnswerStrategy {
    Groq(GroqStrategy),
    Offline(OfflineStrategy),
}

impl AnswerStrategy {
    pub fn from_config(config: &Config) -> Self {
        match &config.groq_api_key {
            Some(key) => AnswerStrategy::Groq(GroqStrategy::new(key.clone())),
            None => AnswerStrategy::Offline(OfflineStrategy),
        }
    }

    pub async fn answer(&self, question: &str, context: &str) -> Result<String> {
        match self {
            AnswerStrategy::Groq(strategy) => strategy.answer(question, context).await,
            AnswerStrategy::Offline(strategy) => strategy.answer(question, context).await,
        }
    }

    pub fn model_info(&self) -> &str {
        match self {
            AnswerStrategy::Groq(_) => "Groq chat completions",
            AnswerStrategy::Offline(_) => "Offline (no API key)",
        }
    }
}

/// Coordinates the legal gate, the model call, and history persistence
/// for one chat exchange.
#[derive(Debug)]
pub struct AnswerEngine {
    strategy: AnswerStrategy,
    database: Database,
}

impl AnswerEngine {
    pub fn new(strategy: AnswerStrategy, database: Database) -> Self {
        Self { strategy, database }
    }

    /// One full exchange: persist the user turn, gate it, answer legal
    /// questions through the model, and persist the assistant turn.
    /// Model failures degrade to [`FALLBACK_ANSWER`] rather than
    /// erroring the exchange; non-legal prompts get the canned redirect
    /// without touching the model.
    pub async fn answer_chat(
        &self,
        username: &str,
        role: Role,
        conversation_id: &str,
        question: &str,
    ) -> Result<String> {
        self.database
            .save_chat_message(username, role, conversation_id, true, question)?;

        let answer = if classifier::is_legal_question(question) {
            let context = match role {
                Role::Lawyer => "Legal context",
                Role::Civilian => "Civilian legal context",
            };
            match self.strategy.answer(question, context).await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(error = %e, "model unavailable, returning canned answer");
                    FALLBACK_ANSWER.to_string()
                }
            }
        } else {
            classifier::NON_LEGAL_RESPONSE.to_string()
        };

        if let Err(e) =
            self.database
                .save_chat_message(username, role, conversation_id, false, &answer)
        {
            warn!(error = %e, "failed to store assistant reply");
        }

        Ok(answer)
    }

    /// Summarizes an uploaded document. Failures surface to the caller
    /// so the screen can report them.
    pub async fn analyze_document(&self, document_text: &str) -> Result<String> {
        self.strategy
            .answer("Analyze this legal document", document_text)
            .await
    }

    pub fn model_info(&self) -> &str {
        self.strategy.model_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat_body(content: &str) -> serde_json::Value {
        json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    #[tokio::test]
    async fn first_model_answer_wins() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Court answer")))
            .expect(1)
            .mount(&server)
            .await;

        let strategy = GroqStrategy::with_endpoint(
            "test-key".to_string(),
            format!("{}/v1/chat/completions", server.uri()),
        );
        let answer = strategy.answer("What is bail?", "Legal context").await.unwrap();
        assert_eq!(answer, "Court answer");
    }

    #[tokio::test]
    async fn failed_model_falls_through_to_next() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "model": "llama-3.1-70b-specdec" })))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "model": "llama-3.1-8b-instant" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Backup answer")))
            .expect(1)
            .mount(&server)
            .await;

        let strategy = GroqStrategy::with_endpoint(
            "test-key".to_string(),
            format!("{}/v1/chat/completions", server.uri()),
        );
        let answer = strategy.answer("What is bail?", "Legal context").await.unwrap();
        assert_eq!(answer, "Backup answer");
    }

    #[tokio::test]
    async fn exhausted_models_report_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let strategy = GroqStrategy::with_endpoint(
            "test-key".to_string(),
            format!("{}/v1/chat/completions", server.uri()),
        );
        let result = strategy.answer("What is bail?", "Legal context").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn request_carries_prompt_and_sampling_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "temperature": 0.2,
                "max_tokens": 800,
                "messages": [
                    { "role": "system", "content": "You are a helpful legal assistant." },
                    { "role": "user", "content": "Document:\nLegal context\n\nQuestion:\nWhat is bail?" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let strategy = GroqStrategy::with_endpoint(
            "test-key".to_string(),
            format!("{}/v1/chat/completions", server.uri()),
        );
        strategy.answer("What is bail?", "Legal context").await.unwrap();
    }
}
