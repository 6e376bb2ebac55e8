//! Shared types used across modules
//!
//! This module contains types that are used by multiple modules
//! to avoid circular dependencies.

use serde::{Deserialize, Serialize};

/// Coarse purpose of an utterance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Weather,
    News,
    General,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Weather => write!(f, "weather"),
            Intent::News => write!(f, "news"),
            Intent::General => write!(f, "general"),
        }
    }
}

/// One line of user input plus what was derived from it.
///
/// Lives for a single loop iteration only.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Raw text as typed
    pub text: String,
    /// Named entities, in the order the extractor reported them
    pub entities: Vec<String>,
    /// Classified intent
    pub intent: Intent,
}

impl Utterance {
    /// Text used for matching: the raw input followed by the entity list.
    ///
    /// Always contains the separating space, even with no entities.
    pub fn match_input(&self) -> String {
        format!("{} {}", self.text, self.entities.join(", "))
    }
}
