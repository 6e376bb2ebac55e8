//! Line-oriented console used by the chat loop

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use std::collections::VecDeque;

/// Prompt/response channel to the user
pub trait Console {
    /// Show `prompt` and read one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Print one line of output
    fn say(&mut self, line: &str);
}

/// Interactive terminal console with line editing and history
pub struct TerminalConsole {
    editor: rustyline::DefaultEditor,
}

impl TerminalConsole {
    pub fn new() -> Result<Self> {
        let config = rustyline::Config::builder()
            .edit_mode(rustyline::EditMode::Emacs)
            .auto_add_history(true)
            .build();

        let editor = rustyline::DefaultEditor::with_config(config)
            .context("Failed to initialise line editor")?;

        Ok(Self { editor })
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Ok(Some(line)),
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(err).context("Failed to read input"),
            }
        }
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Console that replays canned input and records everything shown.
///
/// Prompts are recorded as output lines too, so a transcript reads in
/// the order a user would have seen it.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Everything printed so far, prompts included
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Lines of input not yet consumed
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}
