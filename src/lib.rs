//! Learnbot - a question-answering agent that learns from its users
//!
//! Matches free-text questions against a JSON knowledge base of
//! question/answer pairs, falls back to weather and news lookups, and
//! asks to be taught when it has no answer.
//!
//! # Example
//!
//! ```ignore
//! use learnbot::{Chatbot, Config, KnowledgeStore};
//! use learnbot::agent::TerminalConsole;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let store = KnowledgeStore::new(&config.knowledge.path);
//!     let mut bot = Chatbot::from_config(&config, store)?;
//!     bot.run(&mut TerminalConsole::new()?)?;
//!     Ok(())
//! }
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod types;
pub mod config;
pub mod security;
pub mod knowledge;
pub mod tools;
pub mod agent;
pub mod cli;

// Re-export commonly used types for convenience
pub use agent::{
    Chatbot,
    Reply,
    SessionSummary,
};

pub use knowledge::{
    KnowledgeBase,
    KnowledgeRecord,
    KnowledgeStore,
    KnowledgeError,
};

pub use tools::{
    NewsProvider,
    WeatherProvider,
    ProviderError,
};

pub use config::Config;
pub use types::{Intent, Utterance};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Learning question-answering agent", NAME, VERSION)
}
