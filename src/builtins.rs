use std::env;

use anyhow::{Context, Result};
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::Pid;

use crate::jobs::{self, BACKGROUND};
use crate::signal_handler;

pub struct Builtin {
    pub name: &'static str,
    pub run: fn(&[String]) -> Result<bool>,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "cd", run: cd },
    Builtin { name: "exit", run: exit },
];

/// Exact-name lookup; no prefixes, no aliases.
pub fn find(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

fn cd(args: &[String]) -> Result<bool> {
    match args.get(1) {
        None => eprintln!("ush: Expected argument to \"cd\""),
        Some(path) => {
            if let Err(e) = env::set_current_dir(path) {
                eprintln!("ush: cd: {}", e);
            }
        }
    }
    Ok(true)
}

/// Terminates every tracked background job, reporting how each one went
/// down, then tells the loop to stop.
fn exit(_args: &[String]) -> Result<bool> {
    println!("ush: Exiting...");

    // SIGCHLD stays blocked for the whole drain; each pid taken from the
    // table below is ours to kill and wait on.
    let mask = signal_handler::sigchld_set();
    mask.thread_block().context("failed to block SIGCHLD")?;

    jobs::report_finished();

    for pid in BACKGROUND.take_all() {
        let pid = Pid::from_raw(pid);
        if let Err(e) = kill(pid, Signal::SIGTERM) {
            eprintln!("ush: kill: {}", e);
            continue;
        }
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                println!("Background job [{}] exited with status {}", pid, code);
            }
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                println!("Background job [{}] killed by signal {}", pid, signal as i32);
            }
            Ok(_) => {}
            Err(e) => eprintln!("ush: waitpid: {}", e),
        }
    }

    mask.thread_unblock().context("failed to unblock SIGCHLD")?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_exact() {
        assert!(find("cd").is_some());
        assert!(find("exit").is_some());
        assert!(find("c").is_none());
        assert!(find("cdd").is_none());
        assert!(find("ls").is_none());
    }

    #[test]
    fn test_cd_missing_argument_keeps_running() {
        assert!(cd(&["cd".to_string()]).unwrap());
    }

    #[test]
    fn test_cd_bad_path_keeps_running() {
        let args = vec!["cd".to_string(), "/definitely/not/a/dir".to_string()];
        assert!(cd(&args).unwrap());
    }

    #[test]
    fn test_exit_requests_stop() {
        assert!(!exit(&["exit".to_string()]).unwrap());
    }
}
