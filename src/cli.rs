//! CLI interface for learnbot

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::agent::{Chatbot, Reply, TerminalConsole};
use crate::config::{self, Config};
use crate::knowledge::KnowledgeStore;
use crate::security::{self, Credential};
use crate::tools::{NewsProvider, WeatherProvider};

#[derive(Parser)]
#[command(name = "learnbot")]
#[command(about = "Question-answering agent that learns new answers as you chat", long_about = None)]
#[command(version)]
struct Cli {
    /// Knowledge base file (overrides the configured path)
    #[arg(short, long, global = true, env = "LEARNBOT_KNOWLEDGE_BASE")]
    knowledge_base: Option<PathBuf>,

    /// Read settings from this file instead of the default config location
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (default when no command given)
    Chat,
    /// Answer one question and exit (never learns)
    Ask {
        /// The question
        question: String,
    },
    /// Show the current weather for the configured location
    Weather,
    /// Show top headlines for the configured country
    News,
    /// Manage the knowledge base file
    Knowledge {
        #[command(subcommand)]
        command: KnowledgeCommands,
    },
    /// Configure the agent
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Store the weather provider API key
        #[arg(long)]
        set_weather_key: Option<String>,
        /// Store the news provider API key
        #[arg(long)]
        set_news_key: Option<String>,
        /// Remove both stored API keys
        #[arg(long)]
        clear_keys: bool,
        /// Set the weather location query (e.g. "Oslo,NO")
        #[arg(long)]
        set_location: Option<String>,
        /// Set the news country code (e.g. "gb")
        #[arg(long)]
        set_country: Option<String>,
        /// Set the temperature unit (fahrenheit or celsius)
        #[arg(long)]
        set_unit: Option<String>,
        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
enum KnowledgeCommands {
    /// Create an empty knowledge base file
    Init,
    /// List every stored question and answer
    List,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn knowledge_store(cli_path: Option<PathBuf>, config: &Config) -> KnowledgeStore {
    KnowledgeStore::new(cli_path.unwrap_or_else(|| config.knowledge.path.clone()))
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Chat) => {
            let config = load_config(cli.config_file.as_ref())?;
            let store = knowledge_store(cli.knowledge_base, &config);
            let mut bot = Chatbot::from_config(&config, store)?;
            let mut console = TerminalConsole::new()?;
            bot.run(&mut console)?;
        }
        Some(Commands::Ask { question }) => {
            let config = load_config(cli.config_file.as_ref())?;
            let store = knowledge_store(cli.knowledge_base, &config);
            let bot = Chatbot::from_config(&config, store)?;
            match bot.ask(&question)? {
                Reply::Answer { answer, .. } => println!("Bot: {}", answer),
                Reply::Weather(report) => println!("{}", report),
                Reply::News(headlines) => println!("{}", headlines),
                Reply::Unknown => println!("Bot: I don't know how to respond to that yet."),
            }
        }
        Some(Commands::Weather) => {
            let config = load_config(cli.config_file.as_ref())?;
            let provider = WeatherProvider::from_config(&config.weather)?;
            println!("{}", provider.current_weather()?);
        }
        Some(Commands::News) => {
            let config = load_config(cli.config_file.as_ref())?;
            let provider = NewsProvider::from_config(&config.news)?;
            println!("{}", provider.headlines()?);
        }
        Some(Commands::Knowledge { command }) => {
            let config = load_config(cli.config_file.as_ref())?;
            let store = knowledge_store(cli.knowledge_base, &config);
            match command {
                KnowledgeCommands::Init => {
                    store.init()?;
                    println!("Created empty knowledge base at {}", store.path().display());
                }
                KnowledgeCommands::List => {
                    let kb = store.load()
                        .with_context(|| format!("Failed to load {}", store.path().display()))?;
                    if kb.is_empty() {
                        println!("Knowledge base is empty.");
                    }
                    for (i, record) in kb.records().iter().enumerate() {
                        println!("{:>3}. Q: {}", i + 1, record.question);
                        println!("     A: {}", record.answer);
                    }
                }
            }
        }
        Some(Commands::Config {
            show,
            set_weather_key,
            set_news_key,
            clear_keys,
            set_location,
            set_country,
            set_unit,
            reset,
        }) => {
            if let Some(key) = set_weather_key {
                security::set_api_key(Credential::Weather, &key)?;
            } else if let Some(key) = set_news_key {
                security::set_api_key(Credential::News, &key)?;
            } else if clear_keys {
                security::delete_credential(Credential::Weather)?;
                security::delete_credential(Credential::News)?;
                println!("Stored API keys removed.");
            } else if let Some(location) = set_location {
                config::set_location(&location)?;
            } else if let Some(country) = set_country {
                config::set_country(&country)?;
            } else if let Some(unit) = set_unit {
                config::set_unit(&unit)?;
            } else if reset {
                config::reset_config()?;
            } else if show {
                config::show_config()?;
            } else {
                println!("Nothing to change. Use 'learnbot config --show' or 'learnbot config --help'.");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_chat() {
        let cli = Cli::try_parse_from(["learnbot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_knowledge_base_flag_is_global() {
        let cli = Cli::try_parse_from(["learnbot", "knowledge", "list", "--knowledge-base", "kb.json"]).unwrap();
        assert_eq!(cli.knowledge_base, Some(PathBuf::from("kb.json")));
        assert!(matches!(
            cli.command,
            Some(Commands::Knowledge { command: KnowledgeCommands::List })
        ));
    }

    #[test]
    fn test_ask_takes_question() {
        let cli = Cli::try_parse_from(["learnbot", "ask", "what's the weather"]).unwrap();
        match cli.command {
            Some(Commands::Ask { question }) => assert_eq!(question, "what's the weather"),
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_knowledge_store_prefers_cli_path() {
        let config = Config::default();
        let store = knowledge_store(Some(PathBuf::from("other.json")), &config);
        assert_eq!(store.path(), std::path::Path::new("other.json"));
        let store = knowledge_store(None, &config);
        assert_eq!(store.path(), config.knowledge.path.as_path());
    }
}
