//! Where `input` reads lines from.
//!
//! Mirrors the print handler: stdin by default, a scripted queue of lines
//! for tests and embedders, or an always-empty source.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use parking_lot::Mutex;

/// Line source for the `input` built-in.
pub enum InputHandlerImpl {
    /// Prompts on stdout and reads from stdin.
    Stdin,
    /// Pops pre-recorded lines; exhausted once empty.
    Scripted(Mutex<VecDeque<String>>),
    /// Never produces a line.
    Empty,
}

impl InputHandlerImpl {
    /// Read one line, showing `prompt` first where that makes sense.
    ///
    /// Returns `None` at end of input. The trailing newline is stripped.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        match self {
            Self::Stdin => {
                let mut stdout = std::io::stdout();
                if write!(stdout, "{prompt}").and_then(|()| stdout.flush()).is_err() {
                    tracing::warn!("could not write input prompt");
                }
                let mut line = String::new();
                match std::io::stdin().lock().read_line(&mut line) {
                    Ok(0) | Err(_) => None,
                    Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_owned()),
                }
            }
            Self::Scripted(lines) => lines.lock().pop_front(),
            Self::Empty => None,
        }
    }

    /// Queue another line on a scripted handler. Ignored by other handlers.
    pub fn push_line(&self, line: impl Into<String>) {
        if let Self::Scripted(lines) = self {
            lines.lock().push_back(line.into());
        }
    }
}

/// Input handler shared between the interpreter and its built-ins.
pub type SharedInputHandler = std::sync::Arc<InputHandlerImpl>;

pub fn stdin_handler() -> SharedInputHandler {
    std::sync::Arc::new(InputHandlerImpl::Stdin)
}

/// A handler that replays `lines` in order.
pub fn scripted_handler<I, S>(lines: I) -> SharedInputHandler
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let queue = lines.into_iter().map(Into::into).collect();
    std::sync::Arc::new(InputHandlerImpl::Scripted(Mutex::new(queue)))
}

pub fn empty_input_handler() -> SharedInputHandler {
    std::sync::Arc::new(InputHandlerImpl::Empty)
}

#[cfg(test)]
mod tests;
