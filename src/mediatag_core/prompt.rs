use crate::mediatag_core::error::{Result, TaggerError};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// The person answering the workflow's questions.
pub trait Operator {
    /// Ask a yes/no question. Only `y` (any case) counts as yes.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Ask for a line of text, returned without surrounding whitespace.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Show a line of text.
    fn say(&mut self, message: &str) -> Result<()>;
}

/// Line-based prompts over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(TaggerError::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Operator for Console<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.read_answer(&format!("{question} [y/n]: "))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.read_answer(&format!("{question}: "))
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}
