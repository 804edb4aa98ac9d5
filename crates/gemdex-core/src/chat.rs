//! Chat state: the message log, the input buffer and the in-flight requests.

use serde::{Deserialize, Serialize};

use crate::ai::{GenerateResponse, TextGenerator};
use crate::error::GeminiError;
use crate::input::TextInput;

/// Shown when the reply envelope has no text where it is expected.
pub const NO_RESPONSE_TEXT: &str = "No response from Gemini AI.";
/// Shown when the generation request itself fails.
pub const ERROR_RESPONSE_TEXT: &str = "Error fetching response from Gemini.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { sender: Sender::Bot, text: text.into() }
    }
}

/// Append-only conversation log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog {
    messages: Vec<Message>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a ChatLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// A send that has been recorded in the log and still awaits its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    id: u64,
    prompt: String,
}

impl PendingSend {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The exact text to send; it is the whole conversation for the request.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Default)]
pub struct ChatSession {
    log: ChatLog,
    input: TextInput,
    in_flight: usize,
    sent: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut TextInput {
        &mut self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input.set(text);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Record the user's message and mark a request as in flight.
    ///
    /// Returns `None` without touching any state when the input is blank.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        if self.input.is_blank() {
            return None;
        }

        let prompt = self.input.take();
        self.log.push(Message::user(prompt.clone()));
        self.in_flight += 1;
        self.sent += 1;

        Some(PendingSend { id: self.sent, prompt })
    }

    /// Append the bot's reply (or the fixed error text) for a finished send.
    pub fn finish_send(&mut self, pending: PendingSend, result: Result<GenerateResponse, GeminiError>) {
        let text = match result {
            Ok(response) => reply_text(&response),
            Err(err) => {
                tracing::error!(send = pending.id, "Error fetching response: {}", err);
                ERROR_RESPONSE_TEXT.to_string()
            }
        };

        self.log.push(Message::bot(text));
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Send the current input and wait for the reply.
    pub async fn send_message(&mut self, generator: &dyn TextGenerator) {
        let Some(pending) = self.begin_send() else {
            return;
        };

        tracing::info!(send = pending.id, chars = pending.prompt.chars().count(), "sending chat message");
        let result = generator.generate(pending.prompt()).await;
        self.finish_send(pending, result);
    }
}

/// The text to show for a reply, with the placeholder for a missing shape.
pub fn reply_text(response: &GenerateResponse) -> String {
    match response.first_text() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_RESPONSE_TEXT.to_string(),
    }
}
