//! AI analyst chat

use crate::api::types::{ChatMessage, ChatRole};
use crate::refresh::ViewCell;
use crate::state::AppContext;
use crate::views::{Page, View};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

pub const GREETING: &str = "Hello! I'm your AI Stock Analyst. I can help you with stock analysis \
and recommendations, market trends and insights, technical and fundamental analysis, comparing \
stocks and ETFs, and understanding financial metrics. What would you like to know?";

pub const CLEARED: &str = "Chat cleared. How can I help you with stock analysis?";

/// Canned questions offered next to the input
pub const QUICK_PROMPTS: [&str; 5] = [
    "What are the top performing stocks today?",
    "Give me a market overview and sentiment analysis",
    "What are the best ETFs to invest in right now?",
    "Analyze the tech sector outlook",
    "What stocks should I buy for long-term growth?",
];

pub const POPULAR_SYMBOLS: [&str; 8] = ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "SPY"];

/// Trimmed, upper-cased symbol; blank input means no symbol
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

fn error_reply(message: &str) -> String {
    format!(
        "Sorry, I encountered an error: {}. Please make sure the backend is running and the OpenAI API key is configured.",
        message
    )
}

/// Message as displayed; errors are shown in the assistant's voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub role: ChatRole,
    pub content: String,
    pub is_error: bool,
}

impl TranscriptEntry {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            is_error: false,
        }
    }

    fn error(content: String) -> Self {
        Self {
            role: ChatRole::Assistant,
            content,
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatState {
    pub transcript: Vec<TranscriptEntry>,
    pub current_symbol: Option<String>,
    /// Set while a reply is outstanding
    pub typing: bool,
    /// Turns sent back to the backend; only successful exchanges are kept
    #[serde(skip)]
    pub history: Vec<ChatMessage>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            transcript: vec![TranscriptEntry::new(ChatRole::Assistant, GREETING)],
            current_symbol: None,
            typing: false,
            history: Vec::new(),
        }
    }
}

pub struct ChatView {
    ctx: AppContext,
    state: ViewCell<ChatState>,
}

impl ChatView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ViewCell::new(ChatState::default()),
        }
    }

    /// Ask the assistant; `symbol` replaces the current symbol when given
    ///
    /// Returns false when `message` is blank and nothing was sent.
    pub async fn send_message(&self, message: &str, symbol: Option<&str>) -> bool {
        let message = message.trim();
        if message.is_empty() {
            return false;
        }

        let mut history = Vec::new();
        let mut current_symbol = None;
        let symbol = symbol.map(normalize_symbol);
        self.state.update(|s| {
            if let Some(symbol) = symbol {
                s.current_symbol = symbol;
            }
            s.transcript.push(TranscriptEntry::new(ChatRole::User, message));
            s.typing = true;
            history = s.history.clone();
            current_symbol = s.current_symbol.clone();
        });

        debug!(
            "Sending chat message ({} prior turns, symbol {:?})",
            history.len(),
            current_symbol
        );

        let result = self
            .ctx
            .api
            .chat()
            .send(message, current_symbol.as_deref(), &history)
            .await;

        self.state.update(|s| {
            s.typing = false;
            match result {
                Ok(reply) => {
                    s.history.push(ChatMessage::user(message));
                    s.history.push(ChatMessage::assistant(reply.response.clone()));
                    s.transcript
                        .push(TranscriptEntry::new(ChatRole::Assistant, reply.response));
                }
                Err(e) => {
                    error!("Chat request failed: {}", e);
                    s.transcript.push(TranscriptEntry::error(error_reply(e.message())));
                }
            }
        });
        true
    }

    pub fn set_symbol(&self, raw: &str) {
        let symbol = normalize_symbol(raw);
        self.state.update(|s| s.current_symbol = symbol);
    }

    pub fn clear_symbol(&self) {
        self.state.update(|s| s.current_symbol = None);
    }

    /// Forget the conversation and reset the transcript
    pub fn clear_chat(&self) {
        self.state.update(|s| {
            s.history.clear();
            s.transcript = vec![TranscriptEntry::new(ChatRole::Assistant, CLEARED)];
        });
    }

    /// Send the quick prompt at `index`; out-of-range indices send nothing
    pub async fn quick_prompt(&self, index: usize) -> bool {
        match QUICK_PROMPTS.get(index) {
            Some(prompt) => self.send_message(prompt, None).await,
            None => false,
        }
    }

    /// Focus the chat on `symbol` and ask for a full analysis of it
    pub async fn analyze_symbol(&self, symbol: &str) -> bool {
        let Some(symbol) = normalize_symbol(symbol) else {
            return false;
        };
        let prompt = format!("Give me a comprehensive analysis of {}", symbol);
        self.send_message(&prompt, Some(&symbol)).await
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.state.read(|s| s.history.clone())
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.snapshot()
    }
}

#[async_trait]
impl View for ChatView {
    fn page(&self) -> Page {
        Page::Chat
    }

    async fn init(&mut self) {}

    fn teardown(&mut self) {
        self.state.close();
    }
}
