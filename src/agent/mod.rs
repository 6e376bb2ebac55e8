//! Conversational agent
//!
//! - `classifier`: entity extraction and keyword intent detection
//! - `matcher`: fuzzy lookup of known questions
//! - `conversation`: the prompt/answer/teach loop
//! - `console`: terminal and scripted I/O

pub mod classifier;
pub mod console;
pub mod conversation;
pub mod matcher;

pub use classifier::{Classifier, EntityExtractor, HeuristicExtractor, NoEntities, classify_intent};
pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use conversation::{Chatbot, Reply, SessionSummary};
pub use matcher::{QuestionMatcher, SequenceRatioMatcher, StringMatcher};
