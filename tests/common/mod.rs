//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use learnbot::agent::{Classifier, NoEntities, QuestionMatcher};
use learnbot::config::{EntityMode, MatcherConfig, NewsConfig, WeatherConfig};
use learnbot::tools::{HttpFetch, HttpRequest, HttpResponse, NewsProvider, ProviderError, WeatherProvider};
use learnbot::{Chatbot, KnowledgeBase, KnowledgeStore};

/// Fetcher that always returns the same response and counts calls
#[derive(Clone)]
pub struct CannedFetch {
    status: u16,
    body: String,
    calls: Rc<Cell<usize>>,
}

impl CannedFetch {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// Fetcher that panics if a request is made
    pub fn unreachable() -> Self {
        Self::new(0, "")
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl HttpFetch for CannedFetch {
    fn get(&self, _request: &HttpRequest) -> Result<HttpResponse, ProviderError> {
        assert_ne!(self.status, 0, "unexpected provider request");
        self.calls.set(self.calls.get() + 1);
        Ok(HttpResponse::new(self.status, self.body.clone()))
    }
}

pub fn weather(fetch: CannedFetch) -> WeatherProvider {
    WeatherProvider::new(WeatherConfig::default(), Some("weather-key".to_string()), Box::new(fetch))
}

pub fn news(fetch: CannedFetch) -> NewsProvider {
    NewsProvider::new(NewsConfig::default(), Some("news-key".to_string()), Box::new(fetch))
}

/// Write `json` to `kb.json` in `dir` and return its store
pub fn store_with(dir: &Path, json: &str) -> KnowledgeStore {
    let path = dir.join("kb.json");
    std::fs::write(&path, json).unwrap();
    KnowledgeStore::new(path)
}

/// Bot over `store` with no entity extraction and the given providers
pub fn bot(store: KnowledgeStore, weather: WeatherProvider, news: NewsProvider) -> Chatbot {
    bot_with(store, Classifier::new(Box::new(NoEntities)), weather, news)
}

fn bot_with(store: KnowledgeStore, classifier: Classifier, weather: WeatherProvider, news: NewsProvider) -> Chatbot {
    let knowledge: KnowledgeBase = store.load().unwrap();
    Chatbot::new(
        store,
        knowledge,
        classifier,
        QuestionMatcher::from_config(&MatcherConfig::default()).unwrap(),
        weather,
        news,
    )
}

/// Bot whose providers fail the test if they are called
pub fn offline_bot(store: KnowledgeStore) -> Chatbot {
    bot(store, weather(CannedFetch::unreachable()), news(CannedFetch::unreachable()))
}

/// Offline bot using the default heuristic entity extractor
pub fn heuristic_bot(store: KnowledgeStore) -> Chatbot {
    bot_with(
        store,
        Classifier::from_mode(EntityMode::Heuristic),
        weather(CannedFetch::unreachable()),
        news(CannedFetch::unreachable()),
    )
}
