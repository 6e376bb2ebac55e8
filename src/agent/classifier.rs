//! Entity extraction and intent classification
//!
//! Intent comes from a small priority-ordered keyword table: the first
//! keyword found (case-insensitive substring) decides, otherwise the
//! utterance is general. Entity extraction sits behind [`EntityExtractor`]
//! and is treated as opaque by the rest of the agent.

use tracing::debug;

use crate::config::EntityMode;
use crate::types::{Intent, Utterance};

/// Keyword table, checked in order
const INTENT_KEYWORDS: &[(&str, Intent)] = &[
    ("weather", Intent::Weather),
    ("news", Intent::News),
];

/// Classify an utterance by keyword
pub fn classify_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();
    INTENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::General)
}

/// Named-entity extraction capability
pub trait EntityExtractor {
    /// Entities found in `text`, in order of appearance
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Extractor that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntities;

impl EntityExtractor for NoEntities {
    fn extract(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Lightweight extractor for proper nouns and numbers.
///
/// Runs of capitalised words become one entity unless they open a
/// sentence; standalone numbers are entities on their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl EntityExtractor for HeuristicExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        let mut entities = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut sentence_start = true;

        for raw in text.split_whitespace() {
            let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
            let ends_sentence = raw.ends_with(|c: char| matches!(c, '.' | '?' | '!'));

            let capitalised = !sentence_start
                && word != "I"
                && word.chars().next().is_some_and(char::is_uppercase);
            let number = !word.is_empty() && word.chars().all(|c| c.is_ascii_digit());

            if capitalised {
                run.push(word);
            } else {
                flush(&mut run, &mut entities);
                if number {
                    entities.push(word.to_string());
                }
            }

            if ends_sentence || raw.ends_with(|c: char| matches!(c, ',' | ';' | ':')) {
                flush(&mut run, &mut entities);
            }
            sentence_start = ends_sentence;
        }

        flush(&mut run, &mut entities);
        entities
    }
}

fn flush(run: &mut Vec<&str>, entities: &mut Vec<String>) {
    if !run.is_empty() {
        entities.push(run.join(" "));
        run.clear();
    }
}

/// Turns raw input into an [`Utterance`]
pub struct Classifier {
    extractor: Box<dyn EntityExtractor>,
}

impl Classifier {
    pub fn new(extractor: Box<dyn EntityExtractor>) -> Self {
        Self { extractor }
    }

    /// Classifier using the configured extractor
    pub fn from_mode(mode: EntityMode) -> Self {
        match mode {
            EntityMode::Heuristic => Self::new(Box::new(HeuristicExtractor)),
            EntityMode::None => Self::new(Box::new(NoEntities)),
        }
    }

    /// Extract entities and classify intent for one line of input
    pub fn process(&self, text: &str) -> Utterance {
        let entities = self.extractor.extract(text);
        let intent = classify_intent(text);
        debug!("Named entities: {}; intent: {}", entities.join(", "), intent);

        Utterance {
            text: text.to_string(),
            entities,
            intent,
        }
    }
}
