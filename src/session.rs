//! Conversation state for one loaded document.
//!
//! A [`Session`] owns the document context and the transcript. Work that
//! finishes later (PDF extraction, answer requests) is started through the
//! session, which hands out a ticket tagged with the current generation. When
//! the result comes back it is applied only if its ticket is still current;
//! loading another document or resetting bumps the generation, so late
//! results for a superseded session are dropped.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::ChatError;

pub const WELCOME_MESSAGE: &str = "I've processed the document. What would you like to know?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NoDocument,
    Extracting,
    Ready,
    Answering,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::NoDocument => write!(f, "no document"),
            SessionStatus::Extracting => write!(f, "extracting"),
            SessionStatus::Ready => write!(f, "ready"),
            SessionStatus::Answering => write!(f, "answering"),
        }
    }
}

/// Issued by [`Session::begin_extraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTicket {
    generation: u64,
}

/// Issued by [`Session::submit`]. Carries everything the answer call needs.
#[derive(Debug, Clone)]
pub struct AnswerTicket {
    generation: u64,
    request: u64,
    pub question: String,
    pub context: Arc<str>,
}

#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
    next_request: u64,
    context: Option<Arc<str>>,
    messages: Vec<Message>,
    extracting: bool,
    pending: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        if self.extracting {
            SessionStatus::Extracting
        } else if self.context.is_none() {
            SessionStatus::NoDocument
        } else if self.pending.is_some() {
            SessionStatus::Answering
        } else {
            SessionStatus::Ready
        }
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Transcript in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Start loading a new document. The previous context and transcript are
    /// dropped immediately and any in-flight work becomes stale.
    pub fn begin_extraction(&mut self) -> ExtractionTicket {
        self.supersede();
        self.extracting = true;
        tracing::debug!(generation = self.generation, "extraction started");
        ExtractionTicket {
            generation: self.generation,
        }
    }

    /// Apply the outcome of an extraction. Returns `false` when the ticket is
    /// stale and nothing changed.
    pub fn finish_extraction(
        &mut self,
        ticket: ExtractionTicket,
        outcome: Result<String, ChatError>,
    ) -> bool {
        if !self.extracting || ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale extraction result"
            );
            return false;
        }

        self.extracting = false;
        match outcome {
            Ok(text) => {
                self.context = Some(Arc::from(text));
                self.messages.clear();
                self.push(Message::new(Sender::Bot, WELCOME_MESSAGE));
            }
            Err(err) => {
                tracing::debug!(kind = err.kind(), "extraction failed");
                self.context = None;
                self.messages.clear();
                self.push(Message::new(Sender::Bot, extraction_failure_text(&err)));
            }
        }
        true
    }

    /// Append the user's question and hand out a ticket for answering it.
    ///
    /// Returns `None`, leaving the session untouched, when the text is blank
    /// or the session is not [`SessionStatus::Ready`]. At most one question
    /// is in flight at a time.
    pub fn submit(&mut self, question: &str) -> Option<AnswerTicket> {
        if question.trim().is_empty() || self.status() != SessionStatus::Ready {
            return None;
        }
        let context = self.context.clone()?;

        self.next_request += 1;
        self.pending = Some(self.next_request);
        self.push(Message::new(Sender::User, question));

        Some(AnswerTicket {
            generation: self.generation,
            request: self.next_request,
            question: question.to_string(),
            context,
        })
    }

    /// Apply the outcome of an answer request: exactly one bot message is
    /// appended, whether the call succeeded or not. Returns `false` when the
    /// ticket is stale and nothing changed.
    pub fn settle(&mut self, ticket: &AnswerTicket, outcome: Result<String, ChatError>) -> bool {
        if ticket.generation != self.generation || self.pending != Some(ticket.request) {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale answer"
            );
            return false;
        }

        self.pending = None;
        let text = match outcome {
            Ok(answer) => answer,
            Err(err) => answer_failure_text(&err),
        };
        self.push(Message::new(Sender::Bot, text));
        true
    }

    /// Forget the document and the transcript.
    pub fn reset(&mut self) {
        self.supersede();
        tracing::debug!(generation = self.generation, "session reset");
    }

    fn push(&mut self, message: Message) {
        tracing::debug!(id = %message.id, sender = ?message.sender, "message appended");
        self.messages.push(message);
    }

    fn supersede(&mut self) {
        self.generation += 1;
        self.context = None;
        self.messages.clear();
        self.extracting = false;
        self.pending = None;
    }
}

pub fn extraction_failure_text(err: &ChatError) -> String {
    format!("Sorry, I couldn't process that PDF. Please try another one. Error: {err}")
}

pub fn answer_failure_text(err: &ChatError) -> String {
    format!("An error occurred while communicating with the AI model: {err}")
}
