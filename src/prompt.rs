use std::io::{self, Write};

use colored::Colorize;

pub struct Prompt {
    prefix: String,
}

impl Prompt {
    pub fn new() -> Self {
        let user = whoami::username();
        let host = whoami::fallible::hostname().unwrap_or_else(|_| String::from("unix"));
        Self {
            prefix: format!("{}@{}$:", user, host).green().to_string(),
        }
    }

    /// Prints the prompt and flushes, so it shows before the blocking read.
    pub fn display(&self) -> io::Result<()> {
        print!("{} ", self.prefix);
        io::stdout().flush()
    }
}
