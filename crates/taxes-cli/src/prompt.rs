//! Interactive prompter for `taxes solve --prompt-missing`.
//!
//! Each missing input is asked for once. Entries that do not parse are
//! asked for again; end of input refuses, which ends prompting for the
//! rest of the solve.

use std::io::{self, BufRead, Write};

use taxes_core::{InputSpec, Prompter};

/// Prompter over a line reader and a writer.
#[derive(Debug)]
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Prompt on `writer` and read from `reader`.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, name: &str, input: &InputSpec, waiting: &[String]) -> io::Result<Option<String>> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{name}: {}", input.help())?;
        if !waiting.is_empty() {
            writeln!(self.writer, "  needed by {}", waiting.join(", "))?;
        }
        loop {
            write!(self.writer, "[{}] > ", input.format_suggestion())?;
            self.writer.flush()?;
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                writeln!(self.writer)?;
                return Ok(None);
            }
            let entry = line.trim();
            match input.parse(entry) {
                Ok(_) => return Ok(Some(entry.to_string())),
                Err(reason) => writeln!(self.writer, "  {reason}")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn prompt(&mut self, name: &str, input: &InputSpec, waiting: &[String]) -> Option<String> {
        match self.ask(name, input, waiting) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(input = %name, error = %e, "prompt failed, treating as refused");
                None
            }
        }
    }
}
