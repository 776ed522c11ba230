//! Maintenance advice from an external model.
//!
//! [`AdvisoryGateway::advise`] never fails: whatever goes wrong talking to
//! the service, the caller gets an [`Advice`] carrying the fixed apology
//! text. [`AdvisorSession`] keeps the question/answer transcript.

pub mod error;
pub mod gemini;
pub mod prompt;

pub use error::AdvisoryError;
pub use gemini::GeminiAdvisor;
pub use prompt::build_prompt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::clock::Clock;
use crate::health::HealthMap;
use crate::part::Part;

/// Returned in place of advice when the service cannot be used.
pub const APOLOGY: &str = "Sorry, I encountered an error communicating with the maintenance AI.";
/// Returned when the service answers with no text.
pub const NO_RESPONSE: &str = "I couldn't generate a response at this time.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    /// Text produced by the model
    Model,
    /// The model answered with nothing; `NO_RESPONSE` was substituted
    Empty,
    /// The call failed; `APOLOGY` was substituted
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
}

impl Advice {
    #[must_use]
    pub fn from_model(text: String) -> Self {
        if text.trim().is_empty() {
            Self {
                text: NO_RESPONSE.to_string(),
                source: AdviceSource::Empty,
            }
        } else {
            Self {
                text,
                source: AdviceSource::Model,
            }
        }
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self {
            text: APOLOGY.to_string(),
            source: AdviceSource::Fallback,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == AdviceSource::Fallback
    }
}

/// Something that can answer maintenance questions about an inventory.
pub trait AdvisoryGateway {
    /// Answer `query` with `parts` and their `health` as context.
    fn advise(&self, parts: &[Part], health: &HealthMap, query: &str) -> Advice;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Transcript of one advisory conversation.
pub struct AdvisorSession {
    messages: Vec<ChatMessage>,
    clock: Arc<dyn Clock>,
}

impl AdvisorSession {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            messages: Vec::new(),
            clock,
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Record `query`, ask `gateway`, record and return the reply.
    pub fn ask(
        &mut self,
        gateway: &dyn AdvisoryGateway,
        parts: &[Part],
        health: &HealthMap,
        query: &str,
    ) -> &ChatMessage {
        self.push(ChatRole::User, query.to_string());
        let advice = gateway.advise(parts, health, query);
        self.push(ChatRole::Model, advice.text)
    }

    fn push(&mut self, role: ChatRole, text: String) -> &ChatMessage {
        self.messages.push(ChatMessage {
            role,
            text,
            timestamp: self.clock.now(),
        });
        &self.messages[self.messages.len() - 1]
    }
}
