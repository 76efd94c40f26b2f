//! Line-oriented console prompts with re-prompting on invalid answers.

use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use anyhow::{Result, bail};
use tracing::debug;

use crate::error::InputFormatError;

/// Matches a yes/no answer case-insensitively.
pub fn parse_yes_no(input: &str) -> Result<bool, InputFormatError> {
    let answer = input.trim();
    if answer.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if answer.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(InputFormatError::NotYesNo(answer.to_string()))
    }
}

/// Blocking question/answer channel.
///
/// Generic over its streams so sessions can be replayed from memory.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for anything the session prints between questions.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `prompt` and reads one line, without its line terminator.
    ///
    /// End of input is fatal: no further answer can arrive.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            bail!("input closed while waiting for an answer");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Asks until `parse` accepts the answer, printing each rejection.
    pub fn ask_until<T, E: Display>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, E>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!(prompt, answer = %answer, error = %e, "Answer rejected");
                    writeln!(self.output, "{e}")?;
                }
            }
        }
    }

    pub fn ask_yes_no(&mut self, prompt: &str) -> Result<bool> {
        self.ask_until(prompt, parse_yes_no)
    }
}
