//! The question-answering loop
//!
//! Each turn reads a line, ends the session if it mentions the exit word,
//! and otherwise either:
//! - answers from the knowledge base and asks for feedback, learning a
//!   corrected answer on "no";
//! - hands weather or news questions to the matching provider;
//! - asks the user to teach it an answer.
//!
//! Learned answers are always stored under the user's own wording as a new
//! record and the whole knowledge base is saved immediately.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::knowledge::{KnowledgeBase, KnowledgeStore};
use crate::tools::{NewsProvider, WeatherProvider};
use crate::types::{Intent, Utterance};
use super::classifier::Classifier;
use super::console::Console;
use super::matcher::QuestionMatcher;

/// Typing this anywhere in a line (any case) ends the session
pub const EXIT_WORD: &str = "bye";
/// Answer to the teaching prompt that declines to teach
pub const SKIP_WORD: &str = "skip";

pub const USER_PROMPT: &str = "You: ";
pub const FEEDBACK_PROMPT: &str = "Did I respond well? (yes/no): ";
pub const CORRECTION_PROMPT: &str = "Please provide the correct answer: ";
pub const TEACH_PROMPT: &str = "Type the answer or \"skip\" to skip: ";

pub const FAREWELL: &str = "Bot: Goodbye!";
pub const FEEDBACK_THANKS: &str = "Bot: Thank you for the feedback. I will learn from it.";
pub const WEATHER_INTRO: &str = "Bot: I can fetch the weather information for you.";
pub const NEWS_INTRO: &str = "Bot: I can provide you with the latest news updates.";
pub const TEACH_REQUEST: &str = "Bot: I don't know how to respond. Can you teach me?";
pub const TEACH_THANKS: &str = "Bot: Thank you! I learned a new response!";

/// What the bot decided to do with an utterance
#[derive(Debug, Clone, PartialEq)]
enum Route {
    Answer { question: String, answer: String },
    Weather,
    News,
    Teach,
}

/// Outcome of a one-shot question
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A stored answer, with the known question it matched
    Answer { question: String, answer: String },
    /// Weather provider output
    Weather(String),
    /// News provider output
    News(String),
    /// Nothing matched and no provider applies
    Unknown,
}

/// Counts for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Utterances processed, not counting the exit line
    pub turns: usize,
    /// Records appended to the knowledge base
    pub learned: usize,
}

enum Turn {
    Continue,
    End,
}

/// Whether `input` asks to end the session
pub fn is_exit(input: &str) -> bool {
    input.to_lowercase().contains(EXIT_WORD)
}

/// A chat session's state: the knowledge base it owns and its collaborators
pub struct Chatbot {
    store: KnowledgeStore,
    knowledge: KnowledgeBase,
    classifier: Classifier,
    matcher: QuestionMatcher,
    weather: WeatherProvider,
    news: NewsProvider,
}

impl Chatbot {
    pub fn new(
        store: KnowledgeStore,
        knowledge: KnowledgeBase,
        classifier: Classifier,
        matcher: QuestionMatcher,
        weather: WeatherProvider,
        news: NewsProvider,
    ) -> Self {
        Self {
            store,
            knowledge,
            classifier,
            matcher,
            weather,
            news,
        }
    }

    /// Load the knowledge base from `store` and wire up configured collaborators
    pub fn from_config(config: &Config, store: KnowledgeStore) -> Result<Self> {
        let knowledge = store
            .load()
            .with_context(|| format!("Cannot start without a knowledge base at {}", store.path().display()))?;
        info!("Loaded {} known questions", knowledge.len());

        Ok(Self::new(
            store,
            knowledge,
            Classifier::from_mode(config.chat.entities),
            QuestionMatcher::from_config(&config.matcher)?,
            WeatherProvider::from_config(&config.weather)?,
            NewsProvider::from_config(&config.news)?,
        ))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Answer a single question without any follow-up prompts
    pub fn ask(&self, text: &str) -> Result<Reply> {
        let utterance = self.classifier.process(text);
        let reply = match self.route(&utterance) {
            Route::Answer { question, answer } => Reply::Answer { question, answer },
            Route::Weather => Reply::Weather(self.weather.current_weather()?),
            Route::News => Reply::News(self.news.headlines()?),
            Route::Teach => Reply::Unknown,
        };
        Ok(reply)
    }

    /// Run the interactive loop until the exit word or end of input
    pub fn run(&mut self, console: &mut dyn Console) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        while let Some(line) = console.read_line(USER_PROMPT)? {
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if is_exit(input) {
                break;
            }

            summary.turns += 1;
            if let Turn::End = self.turn(input, console, &mut summary)? {
                break;
            }
        }

        console.say(FAREWELL);
        info!("Session ended after {} turns, {} answers learned", summary.turns, summary.learned);
        Ok(summary)
    }

    fn route(&self, utterance: &Utterance) -> Route {
        let match_input = utterance.match_input();
        let known = self.knowledge.questions();

        if let Some(question) = self.matcher.find_best_match(&match_input, &known) {
            if let Some(answer) = self.knowledge.answer_for(question) {
                return Route::Answer {
                    question: question.to_string(),
                    answer: answer.to_string(),
                };
            }
        }

        match utterance.intent {
            Intent::Weather => Route::Weather,
            Intent::News => Route::News,
            Intent::General => Route::Teach,
        }
    }

    fn turn(&mut self, input: &str, console: &mut dyn Console, summary: &mut SessionSummary) -> Result<Turn> {
        let utterance = self.classifier.process(input);
        let route = self.route(&utterance);
        debug!("Routing {:?} -> {:?}", utterance.text, route);

        match route {
            Route::Answer { answer, .. } => {
                console.say(&format!("Bot: {}", answer));

                let Some(feedback) = console.read_line(FEEDBACK_PROMPT)? else {
                    return Ok(Turn::End);
                };
                if feedback.trim().eq_ignore_ascii_case("no") {
                    let Some(correct) = console.read_line(CORRECTION_PROMPT)? else {
                        return Ok(Turn::End);
                    };
                    self.learn(&utterance.text, &correct)?;
                    summary.learned += 1;
                    console.say(FEEDBACK_THANKS);
                }
            }
            Route::Weather => {
                console.say(WEATHER_INTRO);
                let report = self.weather.current_weather()?;
                console.say(&report);
            }
            Route::News => {
                console.say(NEWS_INTRO);
                let headlines = self.news.headlines()?;
                console.say(&headlines);
            }
            Route::Teach => {
                console.say(TEACH_REQUEST);

                let Some(answer) = console.read_line(TEACH_PROMPT)? else {
                    return Ok(Turn::End);
                };
                if !answer.trim().eq_ignore_ascii_case(SKIP_WORD) {
                    self.learn(&utterance.text, &answer)?;
                    summary.learned += 1;
                    console.say(TEACH_THANKS);
                }
            }
        }

        Ok(Turn::Continue)
    }

    /// Append a record and persist the whole knowledge base
    fn learn(&mut self, question: &str, answer: &str) -> Result<()> {
        self.knowledge.append(question, answer);
        self.store
            .save(&self.knowledge)
            .context("Failed to save the knowledge base")?;
        info!("Learned an answer for {:?} ({} records)", question, self.knowledge.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::classifier::NoEntities;
    use crate::agent::console::ScriptedConsole;
    use crate::config::{MatcherConfig, NewsConfig, WeatherConfig};
    use crate::knowledge::KnowledgeRecord;
    use crate::tools::{HttpResponse, MockHttpFetch};
    use tempfile::TempDir;

    fn offline_fetch() -> Box<MockHttpFetch> {
        let mut fetch = MockHttpFetch::new();
        fetch.expect_get().never();
        Box::new(fetch)
    }

    fn bot(dir: &TempDir, records: Vec<KnowledgeRecord>) -> Chatbot {
        let store = KnowledgeStore::new(dir.path().join("kb.json"));
        let knowledge = KnowledgeBase::from_records(records);
        store.save(&knowledge).unwrap();

        Chatbot::new(
            store,
            knowledge,
            Classifier::new(Box::new(NoEntities)),
            QuestionMatcher::from_config(&MatcherConfig::default()).unwrap(),
            WeatherProvider::new(WeatherConfig::default(), None, offline_fetch()),
            NewsProvider::new(NewsConfig::default(), None, offline_fetch()),
        )
    }

    #[test]
    fn test_is_exit() {
        assert!(is_exit("bye"));
        assert!(is_exit("Bye now"));
        assert!(is_exit("goodBYE"));
        assert!(!is_exit("by the way"));
    }

    #[test]
    fn test_route_prefers_known_answer_over_intent() {
        let dir = tempfile::tempdir().unwrap();
        let bot = bot(&dir, vec![KnowledgeRecord::new("what's the weather", "always sunny")]);
        let reply = bot.ask("what's the weather").unwrap();
        assert_eq!(
            reply,
            Reply::Answer {
                question: "what's the weather".to_string(),
                answer: "always sunny".to_string()
            }
        );
    }

    #[test]
    fn test_ask_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let bot = bot(&dir, vec![]);
        assert_eq!(bot.ask("tell me a joke").unwrap(), Reply::Unknown);
    }

    #[test]
    fn test_ask_weather_without_key_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bot = bot(&dir, vec![]);
        assert_eq!(
            bot.ask("weather please").unwrap(),
            Reply::Weather(crate::tools::WEATHER_FAILURE.to_string())
        );
    }

    #[test]
    fn test_correction_appends_under_user_wording() {
        let dir = tempfile::tempdir().unwrap();
        let mut bot = bot(&dir, vec![KnowledgeRecord::new("hello there", "hi!")]);
        let mut console = ScriptedConsole::new(["hello there!", "no", "general kenobi", "bye"]);

        let summary = bot.run(&mut console).unwrap();

        assert_eq!(summary, SessionSummary { turns: 1, learned: 1 });
        assert_eq!(
            bot.knowledge().records(),
            &[
                KnowledgeRecord::new("hello there", "hi!"),
                KnowledgeRecord::new("hello there!", "general kenobi"),
            ]
        );
        let saved = KnowledgeStore::new(dir.path().join("kb.json")).load().unwrap();
        assert_eq!(&saved, bot.knowledge());
    }

    #[test]
    fn test_positive_or_unclear_feedback_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut bot = bot(&dir, vec![KnowledgeRecord::new("hi", "hello!")]);
        let mut console = ScriptedConsole::new(["hi", "yes", "hi", "maybe", "bye"]);

        let summary = bot.run(&mut console).unwrap();

        assert_eq!(summary, SessionSummary { turns: 2, learned: 0 });
        assert_eq!(bot.knowledge().len(), 1);
    }

    #[test]
    fn test_taught_question_is_stored_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let mut bot = bot(&dir, vec![]);
        let mut console = ScriptedConsole::new(["  what is rust \t", "a language", "bye"]);

        bot.run(&mut console).unwrap();

        assert_eq!(bot.knowledge().records(), &[KnowledgeRecord::new("what is rust", "a language")]);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut bot = bot(&dir, vec![]);
        let mut console = ScriptedConsole::new(["", "   ", "bye"]);

        let summary = bot.run(&mut console).unwrap();

        assert_eq!(summary.turns, 0);
        assert_eq!(console.output().last().map(String::as_str), Some(FAREWELL));
    }

    #[test]
    fn test_end_of_input_mid_teaching_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut bot = bot(&dir, vec![]);
        let mut console = ScriptedConsole::new(["what is rust"]);

        let summary = bot.run(&mut console).unwrap();

        assert_eq!(summary, SessionSummary { turns: 1, learned: 0 });
        assert_eq!(console.output().last().map(String::as_str), Some(FAREWELL));
        assert!(bot.knowledge().is_empty());
    }

    #[test]
    fn test_news_provider_output_is_shown() {
        let dir = tempfile::tempdir().unwrap();
        let mut bot = bot(&dir, vec![]);
        let mut fetch = MockHttpFetch::new();
        fetch
            .expect_get()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"articles": [{"title": "Headline"}]}"#)));
        bot.news = NewsProvider::new(NewsConfig::default(), Some("key".to_string()), Box::new(fetch));

        let mut console = ScriptedConsole::new(["any news?", "bye"]);
        bot.run(&mut console).unwrap();

        let output = console.output();
        let intro = output.iter().position(|l| l == NEWS_INTRO).unwrap();
        assert_eq!(output[intro + 1], "Here are the latest news headlines:\nHeadline");
    }
}
