//! Knowledge base of question/answer pairs
//!
//! Provides:
//! - The in-memory `KnowledgeBase` owned by a chat session
//! - JSON persistence with atomic full-file replacement (see [`store`])
//!
//! Records are only ever appended. Correcting an answer adds a new record
//! for the user's own wording and leaves the matched one untouched, so the
//! same question may appear more than once.
//!
//! Fields this crate does not know about, on a record or at the top level
//! of the file, are carried through load and save unchanged.

pub mod store;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use store::{KnowledgeError, KnowledgeStore};

/// A single learned question and its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub question: String,
    pub answer: String,
    /// Unrecognised fields, kept for the next save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KnowledgeRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            extra: Map::new(),
        }
    }
}

/// Ordered collection of records, persisted as `{"questions": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    questions: Vec<KnowledgeRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing records, keeping their order
    pub fn from_records(records: Vec<KnowledgeRecord>) -> Self {
        Self {
            questions: records,
            extra: Map::new(),
        }
    }

    /// All records in insertion order
    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.questions
    }

    /// Known question strings, in insertion order, duplicates included
    pub fn questions(&self) -> Vec<&str> {
        self.questions.iter().map(|r| r.question.as_str()).collect()
    }

    /// Answer of the first record whose question is exactly `question`
    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.questions
            .iter()
            .find(|r| r.question == question)
            .map(|r| r.answer.as_str())
    }

    /// Append a new record. Existing records are never edited.
    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.questions.push(KnowledgeRecord::new(question, answer));
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_for_returns_first_exact_match() {
        let kb = KnowledgeBase::from_records(vec![
            KnowledgeRecord::new("hi", "hello!"),
            KnowledgeRecord::new("hi", "hey there"),
        ]);
        assert_eq!(kb.answer_for("hi"), Some("hello!"));
        assert_eq!(kb.answer_for("Hi"), None);
        assert_eq!(kb.answer_for("hi "), None);
    }

    #[test]
    fn test_append_keeps_duplicates_and_order() {
        let mut kb = KnowledgeBase::new();
        kb.append("what is rust", "a language");
        kb.append("what is rust", "a systems language");
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.questions(), vec!["what is rust", "what is rust"]);
        assert_eq!(kb.answer_for("what is rust"), Some("a language"));
    }

    #[test]
    fn test_serialized_shape() {
        let kb = KnowledgeBase::from_records(vec![KnowledgeRecord::new("hi", "hello!")]);
        let value = serde_json::to_value(&kb).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"questions": [{"question": "hi", "answer": "hello!"}]})
        );
    }

    #[test]
    fn test_unknown_fields_survive_a_round_trip() {
        let original = serde_json::json!({
            "version": 2,
            "questions": [{"question": "hi", "answer": "hello!", "added_by": "ops"}]
        });
        let mut kb: KnowledgeBase = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(kb.answer_for("hi"), Some("hello!"));
        assert_eq!(serde_json::to_value(&kb).unwrap(), original);

        kb.append("bye", "see you");
        let value = serde_json::to_value(&kb).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["questions"][0]["added_by"], "ops");
        assert_eq!(value["questions"][1], serde_json::json!({"question": "bye", "answer": "see you"}));
    }
}
