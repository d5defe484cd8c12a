//! Count acquisition from the operator

use crate::error::CoreError;
use std::io::{self, BufRead, Stdout, StdinLock, Write};

/// Source of expected-OK counts, asked once per base component name.
pub trait CountPrompt {
    /// Request raw input for `name`. An error here is terminal for the session.
    fn ask(&mut self, name: &str) -> Result<String, CoreError>;

    /// Called when the input for `name` was not a valid count, before asking again.
    fn rejected(&mut self, _name: &str, _input: &str) {}
}

/// Adapts a closure into a [`CountPrompt`].
pub struct FnPrompt<F>(pub F);

impl<F> CountPrompt for FnPrompt<F>
where
    F: FnMut(&str) -> Result<String, CoreError>,
{
    fn ask(&mut self, name: &str) -> Result<String, CoreError> {
        (self.0)(name)
    }
}

/// Ask until the prompt yields a non-negative integer.
pub(crate) fn acquire_count<P: CountPrompt + ?Sized>(
    name: &str,
    prompt: &mut P,
) -> Result<i64, CoreError> {
    loop {
        let input = prompt.ask(name)?;
        match input.trim().parse::<i64>() {
            Ok(count) if count >= 0 => return Ok(count),
            _ => {
                log::debug!("Rejected count input {:?} for '{}'", input, name);
                prompt.rejected(name, &input);
            }
        }
    }
}

/// Line-oriented interactive prompt.
pub struct ConsolePrompt<R, W> {
    reader: R,
    writer: W,
}

impl ConsolePrompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print `message` and read one line. Returns `None` once input is closed.
    pub fn read_reply(&mut self, message: &str) -> Result<Option<String>, CoreError> {
        let closed = |e: io::Error| CoreError::InputUnavailable {
            name: message.trim().to_string(),
            reason: e.to_string(),
        };

        write!(self.writer, "{}", message).map_err(closed)?;
        self.writer.flush().map_err(closed)?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(closed)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Output side, for messages that are not questions
    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> CountPrompt for ConsolePrompt<R, W> {
    fn ask(&mut self, name: &str) -> Result<String, CoreError> {
        self.read_reply(&format!("Enter expected OK count for '{}': ", name))?
            .ok_or_else(|| CoreError::InputUnavailable {
                name: name.to_string(),
                reason: "input closed".to_string(),
            })
    }

    fn rejected(&mut self, _name: &str, _input: &str) {
        // Best effort: a broken writer surfaces on the next ask.
        let _ = writeln!(self.writer, "Please enter a valid integer.");
    }
}
