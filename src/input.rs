use std::io::{self, Stdin};

/// Blocking line source over stdin.
pub struct LineReader {
    stdin: Stdin,
    buffer: String,
}

impl LineReader {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            buffer: String::new(),
        }
    }

    /// Reads one line, without the trailing newline. `Ok(None)` means clean
    /// end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        self.buffer.clear();
        let bytes_read = self.stdin.read_line(&mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        Ok(Some(self.buffer.trim_end_matches('\n').to_string()))
    }
}
