//! Yes/no prompts on the terminal.
//!
//! The pipeline runs on a worker thread, so its questions travel to the
//! terminal thread as [`PromptRequest`]s and the answer comes back on a
//! one-shot channel.

use console::Term;
use crossbeam_channel::{bounded, Sender};
use media_organizer::core::ConfirmPrompt;
use std::io::{self, BufRead};

/// A question waiting for the terminal thread
pub struct PromptRequest {
    pub question: String,
    pub default: bool,
    pub reply: Sender<bool>,
}

/// Worker-side prompt that forwards questions to the terminal thread
pub struct RelayPrompt {
    requests: Sender<PromptRequest>,
}

impl RelayPrompt {
    pub fn new(requests: Sender<PromptRequest>) -> Self {
        Self { requests }
    }
}

impl ConfirmPrompt for RelayPrompt {
    fn confirm(&mut self, question: &str, default: bool) -> bool {
        let (reply, answer) = bounded(1);
        let request = PromptRequest {
            question: question.to_string(),
            default,
            reply,
        };
        if self.requests.send(request).is_err() {
            return default;
        }
        answer.recv().unwrap_or(default)
    }
}

/// Prompt that asks directly on the given terminal
pub struct TermPrompt {
    term: Term,
}

impl TermPrompt {
    pub fn new(term: Term) -> Self {
        Self { term }
    }
}

impl ConfirmPrompt for TermPrompt {
    fn confirm(&mut self, question: &str, default: bool) -> bool {
        ask(&self.term, question, default)
    }
}

/// Print `question [Y/n]` and read one line of answer
pub fn ask(term: &Term, question: &str, default: bool) -> bool {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    if term.write_str(&format!("{} {} ", question, hint)).is_err() {
        return default;
    }
    let _ = term.flush();

    let line = if term.is_term() {
        term.read_line()
    } else {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map(|_| line)
    };

    match line {
        Ok(line) => parse_answer(&line, default),
        Err(_) => default,
    }
}

/// `y`/`yes` and `n`/`no` in any case; blank means `default`
pub fn parse_answer(line: &str, default: bool) -> bool {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}
