//! Terminal prompts built on rustyline.
//!
//! Ctrl-C and Ctrl-D cancel whatever is being asked.

use anyhow::bail;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::matching::{Selection, Selector};

/// Parse a 1-based menu answer. An empty answer picks the first entry.
pub fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return (count > 0).then_some(0);
    }

    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Numbered list selector on the terminal
pub struct TerminalSelector {
    editor: DefaultEditor,
}

impl TerminalSelector {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Selector for TerminalSelector {
    fn select(&mut self, heading: &str, options: &[String]) -> Selection {
        println!();
        println!("{}", heading);
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }

        let prompt = format!("Choice [1-{}, Enter = 1]: ", options.len());
        loop {
            match self.editor.readline(&prompt) {
                Ok(line) => match parse_choice(&line, options.len()) {
                    Some(index) => return Selection::Chosen(index),
                    None => println!("Enter a number between 1 and {}.", options.len()),
                },
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Selection::Cancelled,
                Err(e) => {
                    tracing::warn!("Prompt failed: {}", e);
                    return Selection::Cancelled;
                }
            }
        }
    }
}

/// Ask until a non-empty value is entered.
pub fn prompt_value(editor: &mut DefaultEditor, label: &str) -> anyhow::Result<String> {
    loop {
        match editor.readline(label) {
            Ok(line) if !line.trim().is_empty() => return Ok(line.trim().to_string()),
            Ok(_) => println!("A value is required."),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => bail!("Cancelled by user"),
            Err(e) => return Err(e.into()),
        }
    }
}
