//! Remote decision and chat agents.
//!
//! Both talk to a completion service through the [`CompletionBackend`]
//! trait. Neither ever fails the caller's frame: the decision agent returns
//! an error the day reset turns into "no weather change", and the chat agent
//! substitutes an apology line and still records it in the conversation.

use std::sync::Arc;

use bevy::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::data::GameConfig;
use crate::shared::*;

pub mod openai;

pub use openai::OpenAiBackend;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent is disabled")]
    Disabled,
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("reply is missing choices[0].message.content")]
    MissingContent,
    #[error("decision reply {0:?} is not a number")]
    MalformedDecision(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A request/response completion service.
pub trait CompletionBackend: Send + Sync {
    /// Reply to the conversation so far.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AgentError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Backend used when the agent is switched off. Every call fails fast.
pub struct DisabledBackend;

impl CompletionBackend for DisabledBackend {
    fn complete(&self, _messages: &[ChatMessage]) -> Result<String, AgentError> {
        Err(AgentError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Ordered message history starting with a system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(system_prompt: &str) -> Self {
        Self {
            messages: vec![ChatMessage::new(Role::System, system_prompt)],
        }
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Forget everything but the system prompt.
    pub fn clear(&mut self) {
        self.messages.truncate(1);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision agent
// ─────────────────────────────────────────────────────────────────────────────

/// `1` means rain, any other integer means dry weather. Anything else is an
/// error.
pub fn parse_decision(reply: &str) -> Result<bool, AgentError> {
    let trimmed = reply.trim();
    trimmed
        .parse::<i64>()
        .map(|value| value == 1)
        .map_err(|_| AgentError::MalformedDecision(trimmed.to_string()))
}

/// Decides tomorrow's weather from the player's money.
#[derive(Resource)]
pub struct DecisionAgent {
    backend: Arc<dyn CompletionBackend>,
    conversation: Conversation,
    enabled: bool,
}

impl DecisionAgent {
    pub fn new(backend: Arc<dyn CompletionBackend>, system_prompt: &str, enabled: bool) -> Self {
        Self {
            backend,
            conversation: Conversation::new(system_prompt),
            enabled,
        }
    }

    /// Whether the day reset should ask this agent instead of rolling dice.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Ask whether it rains. Successful exchanges stay in the history;
    /// failed ones leave no trace.
    pub fn decide(&mut self, money: i64) -> Result<bool, AgentError> {
        self.conversation.push(Role::User, money.to_string());
        let result = self
            .backend
            .complete(self.conversation.messages())
            .and_then(|reply| parse_decision(&reply).map(|raining| (reply, raining)));

        match result {
            Ok((reply, raining)) => {
                self.conversation.push(Role::Assistant, reply.trim());
                Ok(raining)
            }
            Err(err) => {
                self.conversation.messages.pop();
                Err(err)
            }
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat agent
// ─────────────────────────────────────────────────────────────────────────────

/// The trader's side of the shop chat.
#[derive(Resource)]
pub struct ChatAgent {
    backend: Arc<dyn CompletionBackend>,
    conversation: Conversation,
    apology: String,
}

impl ChatAgent {
    pub fn new(backend: Arc<dyn CompletionBackend>, system_prompt: &str, apology: &str) -> Self {
        Self {
            backend,
            conversation: Conversation::new(system_prompt),
            apology: apology.to_string(),
        }
    }

    /// Record the user's line and return what to send: the backend and a
    /// snapshot of the history.
    pub fn begin(&mut self, text: &str) -> (Arc<dyn CompletionBackend>, Vec<ChatMessage>) {
        self.conversation.push(Role::User, text);
        (self.backend.clone(), self.conversation.messages().to_vec())
    }

    /// Record the reply (or the apology on failure) and return it.
    pub fn finish(&mut self, result: Result<String, AgentError>) -> String {
        let reply = match result {
            Ok(reply) => reply.trim().to_string(),
            Err(err) => {
                warn!("[Agent] chat failed: {err}");
                self.apology.clone()
            }
        };
        self.conversation.push(Role::Assistant, reply.clone());
        reply
    }

    /// Blocking round trip.
    pub fn send(&mut self, text: &str) -> String {
        let (backend, messages) = self.begin(text);
        let result = backend.complete(&messages);
        self.finish(result)
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

/// A new run starts new conversations.
fn forget_conversations(
    decision: Option<ResMut<DecisionAgent>>,
    chat: Option<ResMut<ChatAgent>>,
) {
    if let Some(mut decision) = decision {
        decision.conversation.clear();
    }
    if let Some(mut chat) = chat {
        chat.conversation.clear();
    }
}

/// Build the agents from config once it is loaded. Agents inserted
/// beforehand (tests) are kept.
fn install_agents(
    mut commands: Commands,
    config: Res<GameConfig>,
    existing: Option<Res<ChatAgent>>,
) {
    if existing.is_some() {
        return;
    }
    let agent = &config.agent;
    let backend: Arc<dyn CompletionBackend> = if agent.enabled {
        match OpenAiBackend::new(agent) {
            Ok(backend) => Arc::new(backend),
            Err(err) => {
                warn!("[Agent] cannot create client, running offline: {err}");
                Arc::new(DisabledBackend)
            }
        }
    } else {
        Arc::new(DisabledBackend)
    };
    let enabled = backend.name() != DisabledBackend.name();
    info!("[Agent] backend: {} (model {})", backend.name(), agent.model);

    commands.insert_resource(DecisionAgent::new(
        backend.clone(),
        &agent.decision_system_prompt,
        enabled,
    ));
    commands.insert_resource(ChatAgent::new(backend, &agent.chat_system_prompt, &agent.apology));
}

pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnExit(GameState::Loading), install_agents)
            .add_systems(OnEnter(GameState::Start), forget_conversations);
    }
}
