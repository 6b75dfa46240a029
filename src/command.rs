use std::ffi::CString;

use anyhow::{Context, Result};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{execvp, fork, ForkResult, Pid};

use crate::builtins;
use crate::jobs::BACKGROUND;
use crate::signal_handler;
use crate::tokenizer;

/// One parsed command line: the argv tokens plus the background flag.
#[derive(Debug)]
pub struct Command {
    pub argv: Vec<String>,
    pub background: bool,
}

impl Command {
    /// Tokenizes a line. A final token that is exactly `&` marks the command
    /// as background and is dropped from argv; `&` anywhere else stays a
    /// literal argument.
    pub fn parse(line: &str) -> Self {
        let mut argv = tokenizer::tokenize(line);
        let background = argv.last().map(|token| token == "&").unwrap_or(false);
        if background {
            argv.pop();
        }
        Self { argv, background }
    }

    /// Runs the command. Returns whether the shell should keep looping.
    pub fn execute(&self) -> Result<bool> {
        let name = match self.argv.first() {
            Some(name) => name,
            None => return Ok(true),
        };
        if let Some(builtin) = builtins::find(name) {
            return (builtin.run)(&self.argv);
        }
        self.launch()
    }

    /// Forks and execs argv, waiting in the foreground case and registering
    /// the child in the background case.
    ///
    /// SIGCHLD is blocked from before the fork until the child is either
    /// collected (foreground) or registered and acknowledged (background),
    /// so the reaper never observes a child this function still owns.
    fn launch(&self) -> Result<bool> {
        let argv_c = match to_cstrings(&self.argv) {
            Some(argv_c) => argv_c,
            None => {
                eprintln!("ush: argument contains a NUL byte");
                return Ok(true);
            }
        };

        let mask = signal_handler::sigchld_set();
        mask.thread_block().context("failed to block SIGCHLD")?;

        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                // the blocked mask would survive exec; clear it first
                let _ = mask.thread_unblock();
                exec_child(&argv_c)
            }
            Ok(ForkResult::Parent { child }) => {
                let outcome = if self.background {
                    BACKGROUND.add(child.as_raw());
                    println!("[{}] {}", BACKGROUND.len(), child);
                    Ok(true)
                } else {
                    wait_foreground(child)
                };
                mask.thread_unblock().context("failed to unblock SIGCHLD")?;
                outcome
            }
            Err(e) => {
                let _ = mask.thread_unblock();
                Err(e).context("fork failed")
            }
        }
    }
}

/// Replaces the child's image with the target program. On exec failure the
/// child reports and leaves with a failure status; it must never return
/// into the shell's own control flow.
fn exec_child(argv: &[CString]) -> ! {
    if let Err(e) = execvp(&argv[0], argv) {
        eprintln!("ush: {}: {}", argv[0].to_string_lossy(), e.desc());
    }
    unsafe { libc::_exit(libc::EXIT_FAILURE) }
}

/// Blocks until the given child exits or is killed, retrying while it is
/// merely stopped. A wait failure here is fatal to the shell.
fn wait_foreground(child: Pid) -> Result<bool> {
    loop {
        let status = waitpid(child, Some(WaitPidFlag::WUNTRACED)).context("waitpid failed")?;
        match status {
            WaitStatus::Exited(..) | WaitStatus::Signaled(..) => return Ok(true),
            _ => continue,
        }
    }
}

fn to_cstrings(argv: &[String]) -> Option<Vec<CString>> {
    argv.iter()
        .map(|arg| CString::new(arg.as_str()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_foreground() {
        let command = Command::parse("ls -la");
        assert_eq!(command.argv, vec!["ls", "-la"]);
        assert!(!command.background);
    }

    #[test]
    fn test_parse_background() {
        let command = Command::parse("sleep 5 &");
        assert_eq!(command.argv, vec!["sleep", "5"]);
        assert!(command.background);
    }

    #[test]
    fn test_ampersand_must_stand_alone() {
        let command = Command::parse("echo hello&");
        assert_eq!(command.argv, vec!["echo", "hello&"]);
        assert!(!command.background);
    }

    #[test]
    fn test_parse_empty() {
        let command = Command::parse("   ");
        assert!(command.argv.is_empty());
        assert!(!command.background);
    }

    #[test]
    fn test_lone_ampersand() {
        let command = Command::parse("&");
        assert!(command.argv.is_empty());
        assert!(command.background);
    }

    #[test]
    fn test_nul_rejected() {
        assert!(to_cstrings(&["a\0b".to_string()]).is_none());
    }
}
