use anyhow::{Context, Result};

use crate::command::Command;
use crate::input::LineReader;
use crate::jobs;
use crate::prompt::Prompt;

pub struct Shell {
    prompt: Prompt,
    reader: LineReader,
    running: bool,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            prompt: Prompt::new(),
            reader: LineReader::new(),
            running: true,
        }
    }

    /// Prompt, read, parse, dispatch. Runs until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        while self.running {
            // notices for jobs the reaper collected since the last prompt
            jobs::report_finished();

            self.prompt.display().context("failed to write prompt")?;

            match self.reader.read_line().context("failed to read input")? {
                Some(line) => {
                    let command = Command::parse(&line);
                    self.running = command.execute()?;
                }
                None => {
                    // end of input; leave the terminal on a fresh line
                    println!();
                    self.running = false;
                }
            }
        }
        Ok(())
    }
}
